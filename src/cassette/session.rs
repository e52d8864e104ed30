//! Recording session owning the backend cassette recorder.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use super::recorder::CassetteRecorder;

/// One recording run: every backend call of a CLI invocation lands in a
/// single timestamped cassette under the record directory.
pub struct RecordingSession {
    /// Recorder shared with the recording backend adapter.
    pub backend: Arc<Mutex<CassetteRecorder>>,
    /// Cassette file the session will write.
    path: PathBuf,
}

impl RecordingSession {
    /// Create a session writing `<dir>/<timestamp>.cassette.yaml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the cassette
    /// file already exists.
    pub fn new(dir: &Path, backend_url: &str) -> Result<Self, String> {
        let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S%.3f").to_string();
        let path = dir.join(format!("{timestamp}.cassette.yaml"));

        if path.exists() {
            return Err(format!("Cassette already exists: {}", path.display()));
        }

        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create cassette directory: {e}"))?;

        let recorder = CassetteRecorder::new(&path, timestamp, backend_url);
        Ok(Self { backend: Arc::new(Mutex::new(recorder)), path })
    }

    /// Cassette file the session will write.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the cassette to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the recording adapter is still alive or the file
    /// cannot be written.
    pub fn finish(self) -> Result<PathBuf, String> {
        let recorder = Arc::try_unwrap(self.backend)
            .map_err(|_| "Recording backend still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock poisoned: {e}"))?;
        let count = recorder.len();
        let path = recorder.finish().map_err(|e| format!("Failed to write cassette: {e}"))?;
        tracing::info!(path = %path.display(), interactions = count, "cassette written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_creates_directory_and_writes_cassette() {
        let dir = std::env::temp_dir().join("school_session_test");
        let _ = std::fs::remove_dir_all(&dir);

        let session = RecordingSession::new(&dir, "http://backend.test").unwrap();
        assert!(dir.exists());
        let expected = session.path().to_path_buf();

        let written = session.finish().unwrap();
        assert_eq!(written, expected);
        assert!(written.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn finish_fails_while_recorder_is_shared() {
        let dir = std::env::temp_dir().join("school_session_shared_test");
        let session = RecordingSession::new(&dir, "http://backend.test").unwrap();
        let _adapter_handle = Arc::clone(&session.backend);

        let err = session.finish().unwrap_err();
        assert!(err.contains("still has references"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

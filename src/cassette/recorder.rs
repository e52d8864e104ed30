//! Records interactions into a cassette file.

use std::path::PathBuf;

use chrono::Utc;
use serde_json::Value;

use super::format::{Cassette, Interaction};

/// Buffers backend interactions in call order until [`finish`](Self::finish)
/// writes them out as one YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    backend_url: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// Create a recorder that will write to `path`.
    pub fn new(
        path: impl Into<PathBuf>,
        name: impl Into<String>,
        backend_url: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            backend_url: backend_url.into(),
            interactions: Vec::new(),
        }
    }

    /// Appends one call. Sequence numbers follow call order from zero.
    pub fn record(&mut self, port: &str, method: &str, input: Value, output: Value) {
        let seq = self.interactions.len() as u64;
        tracing::trace!(seq, port, method, "recorded interaction");
        self.interactions.push(Interaction {
            seq,
            port: port.to_owned(),
            method: method.to_owned(),
            input,
            output,
        });
    }

    /// Interactions recorded so far.
    #[must_use]
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Number of recorded calls.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Stamps the cassette with the current time and writes it, creating
    /// the parent directory when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn finish(self) -> Result<PathBuf, std::io::Error> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let cassette = Cassette {
            name: self.name,
            recorded_at: Utc::now(),
            backend_url: self.backend_url,
            interactions: self.interactions,
        };
        let yaml = serde_yaml::to_string(&cassette).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, yaml)?;
        Ok(self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn finish_writes_numbered_interactions() {
        let dir = std::env::temp_dir().join("school_recorder_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("board.cassette.yaml");

        let mut recorder = CassetteRecorder::new(&path, "board", "http://backend.test");
        assert!(recorder.is_empty());
        recorder.record("backend", "list_todos", json!({}), json!({"Ok": []}));
        recorder.record("backend", "create_todo", json!({"text": "a"}), json!({"Ok": "t1"}));
        recorder.record("backend", "delete_todo", json!({"task_id": "t1"}), json!({"Err": "gone"}));
        assert_eq!(recorder.len(), 3);

        let written = recorder.finish().expect("finish should succeed");
        assert_eq!(written, path);

        let cassette: Cassette =
            serde_yaml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(cassette.backend_url, "http://backend.test");
        let seqs: Vec<u64> = cassette.interactions.iter().map(|i| i.seq).collect();
        assert_eq!(seqs, [0, 1, 2]);
        assert_eq!(cassette.interactions[2].output, json!({"Err": "gone"}));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

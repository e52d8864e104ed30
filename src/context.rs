//! Service context bundling the backend port with the invocation's settings.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::adapters::live::LiveSchoolBackend;
use crate::adapters::recording::RecordingSchoolBackend;
use crate::adapters::replaying::ReplayingSchoolBackend;
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::session::RecordingSession;
use crate::config::{Settings, TrafficMode};
use crate::ports::SchoolBackend;
use crate::session::{SessionState, SessionStore};

/// Everything a command handler needs.
///
/// Constructors wire up different backend implementations (live, recording,
/// replaying); handlers only see the [`SchoolBackend`] trait object.
pub struct ServiceContext {
    /// Remote operations.
    pub backend: Box<dyn SchoolBackend>,
    /// Settings the context was built from.
    pub settings: Settings,
    /// Saved login session.
    pub session: SessionStore,
}

impl ServiceContext {
    /// Builds the context selected by `settings.traffic`.
    ///
    /// Returns the recording session alongside the context when recording;
    /// the caller finishes it after dropping the context.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client, cassette, or record directory
    /// cannot be set up.
    pub fn from_settings(settings: Settings) -> Result<(Self, Option<RecordingSession>), String> {
        match settings.traffic.clone() {
            TrafficMode::Live => Ok((Self::live(settings)?, None)),
            TrafficMode::Record(dir) => {
                let (ctx, session) = Self::recording(settings, &dir)?;
                Ok((ctx, Some(session)))
            }
            TrafficMode::Replay(path) => Ok((Self::replaying(settings, &path)?, None)),
        }
    }

    /// Creates a context talking to the backend directly.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn live(settings: Settings) -> Result<Self, String> {
        let session = SessionStore::new(&settings.session_path);
        let backend = live_backend(&settings, &session)?;
        Ok(Self { backend: Box::new(backend), settings, session })
    }

    /// Creates a context that records every backend interaction into `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the cassette directory cannot
    /// be set up.
    pub fn recording(settings: Settings, dir: &Path) -> Result<(Self, RecordingSession), String> {
        let session = SessionStore::new(&settings.session_path);
        let live = live_backend(&settings, &session)?;
        let recording = RecordingSession::new(dir, &settings.backend_url)?;
        tracing::info!(path = %recording.path().display(), "recording backend traffic");

        let backend = RecordingSchoolBackend::new(Box::new(live), Arc::clone(&recording.backend));
        Ok((Self { backend: Box::new(backend), settings, session }, recording))
    }

    /// Creates a context served entirely from the cassette at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(settings: Settings, path: &Path) -> Result<Self, String> {
        let replayer = CassetteReplayer::load(path)?;
        tracing::info!(path = %path.display(), "replaying backend traffic");
        let backend = ReplayingSchoolBackend::new(Arc::new(Mutex::new(replayer)));
        let session = SessionStore::new(&settings.session_path);
        Ok(Self { backend: Box::new(backend), settings, session })
    }

    /// Creates a context around an existing backend.
    #[must_use]
    pub fn with_backend(backend: Box<dyn SchoolBackend>, settings: Settings) -> Self {
        let session = SessionStore::new(&settings.session_path);
        Self { backend, settings, session }
    }

    /// Loads the user context once for the current command. The result is
    /// always settled: `Failed` or `Ready`, never `Loading`.
    #[must_use]
    pub fn session_state(&self) -> SessionState {
        SessionState::load(&self.session)
    }
}

/// Token precedence: `SCHOOL_TOKEN`, then the saved session.
fn live_backend(settings: &Settings, session: &SessionStore) -> Result<LiveSchoolBackend, String> {
    let token = match &settings.token {
        Some(token) => Some(token.clone()),
        None => session.load()?.map(|user| user.token),
    };
    LiveSchoolBackend::new(settings.backend_url.clone(), token, settings.timeout)
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{sample_user, UserType};

    fn settings_in(dir: &Path) -> Settings {
        Settings { session_path: dir.join("session.json"), ..Settings::default() }
    }

    #[test]
    fn live_context_reads_saved_session() {
        let dir = std::env::temp_dir().join("school_context_live_test");
        let _ = std::fs::remove_dir_all(&dir);
        let ctx = ServiceContext::live(settings_in(&dir)).unwrap();
        assert!(ctx.session_state().user().is_none());

        ctx.session.save(&sample_user(UserType::Student)).unwrap();
        assert_eq!(ctx.session_state().require().unwrap().user_id, "u-1");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn replaying_context_requires_readable_cassette() {
        let dir = std::env::temp_dir().join("school_context_replay_test");
        let err = ServiceContext::replaying(settings_in(&dir), &dir.join("missing.yaml"))
            .err()
            .unwrap();
        assert!(err.contains("Failed to read cassette file"));
    }

    #[test]
    fn recording_context_writes_cassette_on_finish() {
        let dir = std::env::temp_dir().join("school_context_record_test");
        let _ = std::fs::remove_dir_all(&dir);
        let settings = Settings {
            traffic: TrafficMode::Record(dir.join("cassettes")),
            ..settings_in(&dir)
        };

        let (ctx, session) = ServiceContext::from_settings(settings).unwrap();
        let session = session.unwrap();
        drop(ctx);
        let written = session.finish().unwrap();
        assert!(written.starts_with(dir.join("cassettes")));

        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Runtime settings read from the environment (and an optional `.env` file).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend base URL when `SCHOOL_BACKEND_URL` is unset.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Default location of the saved login session, relative to the working directory.
pub const DEFAULT_SESSION_PATH: &str = ".school/session.json";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors raised while reading settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Recording and replaying were both requested.
    #[error("SCHOOL_RECORD and SCHOOL_REPLAY cannot be combined")]
    RecordAndReplay,
}

/// How backend traffic is routed for this process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrafficMode {
    /// Talk to the backend directly.
    Live,
    /// Talk to the backend and write every interaction to a cassette in this directory.
    Record(PathBuf),
    /// Serve every interaction from this cassette file; no network.
    Replay(PathBuf),
}

/// Settings for one CLI invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base URL of the backend service, without the `/api` suffix.
    pub backend_url: String,
    /// Bearer token override; takes precedence over the saved session.
    pub token: Option<String>,
    /// Where the login session is saved.
    pub session_path: PathBuf,
    /// Upper bound on a single backend request.
    pub timeout: Duration,
    /// Live, recording, or replaying traffic.
    pub traffic: TrafficMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            token: None,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            traffic: TrafficMode::Live,
        }
    }
}

impl Settings {
    /// Loads `.env` (if present) and reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the traffic mode is contradictory.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is malformed or the traffic mode is contradictory.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend_url = non_empty("SCHOOL_BACKEND_URL").map_or_else(
            || DEFAULT_BACKEND_URL.to_string(),
            |v| v.trim_end_matches('/').to_string(),
        );

        let timeout = match non_empty("SCHOOL_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        name: "SCHOOL_TIMEOUT_SECS",
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                if secs == 0 {
                    return Err(ConfigError::Invalid {
                        name: "SCHOOL_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Duration::from_secs(secs)
            }
        };

        let traffic = match (non_empty("SCHOOL_RECORD"), non_empty("SCHOOL_REPLAY")) {
            (Some(_), Some(_)) => return Err(ConfigError::RecordAndReplay),
            (Some(dir), None) => TrafficMode::Record(PathBuf::from(dir)),
            (None, Some(file)) => TrafficMode::Replay(PathBuf::from(file)),
            (None, None) => TrafficMode::Live,
        };

        let session_path = non_empty("SCHOOL_SESSION")
            .map_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH), PathBuf::from);

        Ok(Self { backend_url, token: non_empty("SCHOOL_TOKEN"), session_path, timeout, traffic })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn trims_trailing_slash_from_backend_url() {
        let settings =
            Settings::from_lookup(lookup_from(&[("SCHOOL_BACKEND_URL", "https://school.test/")]))
                .unwrap();
        assert_eq!(settings.backend_url, "https://school.test");
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let settings = Settings::from_lookup(lookup_from(&[("SCHOOL_TOKEN", "  ")])).unwrap();
        assert!(settings.token.is_none());
    }

    #[test]
    fn rejects_zero_timeout() {
        let err = Settings::from_lookup(lookup_from(&[("SCHOOL_TIMEOUT_SECS", "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "SCHOOL_TIMEOUT_SECS", .. }));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        let err =
            Settings::from_lookup(lookup_from(&[("SCHOOL_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("SCHOOL_TIMEOUT_SECS"));
    }

    #[test]
    fn record_and_replay_are_exclusive() {
        let err = Settings::from_lookup(lookup_from(&[
            ("SCHOOL_RECORD", "/tmp/rec"),
            ("SCHOOL_REPLAY", "/tmp/rep.yaml"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::RecordAndReplay);
    }

    #[test]
    fn replay_mode_carries_cassette_path() {
        let settings =
            Settings::from_lookup(lookup_from(&[("SCHOOL_REPLAY", "fixtures/todo.yaml")])).unwrap();
        assert_eq!(settings.traffic, TrafficMode::Replay(PathBuf::from("fixtures/todo.yaml")));
    }
}

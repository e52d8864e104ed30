//! Cassette data structures for recording and replaying interactions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single recorded backend call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Sequence number (assigned automatically by the recorder).
    pub seq: u64,
    /// Port name, always [`BACKEND_PORT`](super::BACKEND_PORT) for cassettes written by this crate.
    pub port: String,
    /// Backend operation, e.g. `create_todo`.
    pub method: String,
    /// Arguments of the call.
    pub input: serde_json::Value,
    /// `{"Ok": value}` or `{"Err": message}`.
    pub output: serde_json::Value,
}

/// A recorded session against one backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name for this cassette.
    pub name: String,
    /// When this cassette was recorded.
    pub recorded_at: DateTime<Utc>,
    /// Backend the traffic was captured from.
    pub backend_url: String,
    /// Ordered list of interactions.
    pub interactions: Vec<Interaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cassette_reads_back_from_yaml() {
        let cassette = Cassette {
            name: "todo-board".into(),
            recorded_at: Utc::now(),
            backend_url: "http://localhost:8000".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "backend".into(),
                method: "create_todo".into(),
                input: json!({"text": "essay", "lane": "NOT_STARTED"}),
                output: json!({"Ok": "t-17"}),
            }],
        };
        let yaml = serde_yaml::to_string(&cassette).expect("serialize");
        assert!(yaml.contains("create_todo"));
        let parsed: Cassette = serde_yaml::from_str(&yaml).expect("deserialize");
        assert_eq!(parsed, cassette);
    }
}

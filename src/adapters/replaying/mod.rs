//! Replaying adapters that serve recorded interactions.

pub mod backend;

pub use backend::ReplayingSchoolBackend;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::ports::BackendError;

/// Take the recorded output of the next `port::method` call.
///
/// # Panics
///
/// Panics when the cassette holds no further interaction for the call.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).output.clone()
}

/// Decode an output written by `recording::record_result`.
///
/// # Errors
///
/// Returns the recorded failure, or [`BackendError::Decode`] when the output
/// does not follow the Ok/Err convention.
pub(crate) fn replay_result<T>(output: serde_json::Value) -> Result<T, BackendError>
where
    T: DeserializeOwned,
{
    match output {
        serde_json::Value::Object(mut map) => {
            if let Some(value) = map.remove("Ok") {
                serde_json::from_value(value).map_err(|e| BackendError::Decode(e.to_string()))
            } else if let Some(err) = map.remove("Err") {
                let message = err.as_str().map_or_else(|| err.to_string(), str::to_string);
                Err(BackendError::Recorded(message))
            } else {
                Err(BackendError::Decode("recorded output has neither Ok nor Err".into()))
            }
        }
        other => Err(BackendError::Decode(format!("recorded output is not an object: {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replay_result_follows_ok_err_convention() {
        let id: Result<String, _> = replay_result(json!({"Ok": "t-3"}));
        assert_eq!(id, Ok("t-3".to_string()));

        let unit: Result<(), _> = replay_result(json!({"Ok": null}));
        assert_eq!(unit, Ok(()));

        let failed: Result<(), _> = replay_result(json!({"Err": "Forbidden (HTTP 403)"}));
        assert_eq!(failed, Err(BackendError::Recorded("Forbidden (HTTP 403)".into())));

        let malformed: Result<(), _> = replay_result(json!([1, 2]));
        assert!(matches!(malformed, Err(BackendError::Decode(_))));
    }
}

//! Workflow lanes and the task card record.

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identity given to a task between local creation and server acknowledgment.
pub const PLACEHOLDER_ID: &str = "something_temporary";

/// One of the three workflow buckets a task belongs to.
///
/// Serialized as `NOT_STARTED`, `IN_PROGRESS` or `DONE`. Deserialization also
/// accepts the numeric ordinals `0`, `1`, `2` that the todo listing uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Not Started.
    NotStarted,
    /// In Progress.
    InProgress,
    /// Done.
    Done,
}

impl Lane {
    /// All lanes in display order.
    pub const ALL: [Self; 3] = [Self::NotStarted, Self::InProgress, Self::Done];

    /// Wire token for this lane.
    #[must_use]
    pub fn as_token(self) -> &'static str {
        match self {
            Self::NotStarted => "NOT_STARTED",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }

    /// Column heading.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::NotStarted => "Not Started",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
        }
    }

    /// Lane for a numeric ordinal.
    #[must_use]
    pub fn from_ordinal(ordinal: u64) -> Option<Self> {
        match ordinal {
            0 => Some(Self::NotStarted),
            1 => Some(Self::InProgress),
            2 => Some(Self::Done),
            _ => None,
        }
    }
}

impl fmt::Display for Lane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for Lane {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "NOT_STARTED" | "TODO" => Ok(Self::NotStarted),
            "IN_PROGRESS" | "DOING" => Ok(Self::InProgress),
            "DONE" => Ok(Self::Done),
            _ => Err(format!(
                "unknown lane {s:?} (expected not-started, in-progress or done)"
            )),
        }
    }
}

impl Serialize for Lane {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_token())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LaneRepr {
    Ordinal(u64),
    Token(String),
}

impl<'de> Deserialize<'de> for Lane {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LaneRepr::deserialize(deserializer)? {
            LaneRepr::Ordinal(n) => {
                Self::from_ordinal(n).ok_or_else(|| D::Error::custom(format!("unknown lane {n}")))
            }
            LaneRepr::Token(token) => token.parse().map_err(D::Error::custom),
        }
    }
}

/// One to-do card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Backend identity, or [`PLACEHOLDER_ID`] until the create is acknowledged.
    #[serde(rename = "todo_id")]
    pub id: String,
    /// Free-form description.
    pub text: String,
    /// Current lane.
    #[serde(rename = "type")]
    pub lane: Lane,
}

impl Task {
    /// A freshly created local task awaiting its server identity.
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self { id: PLACEHOLDER_ID.to_string(), text: text.into(), lane: Lane::NotStarted }
    }

    /// Whether the server has not assigned an identity yet.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.id == PLACEHOLDER_ID
    }
}

//! Questions asked inside a course and the answers given to them.

use serde::{Deserialize, Serialize};

use crate::courses::null_as_empty;
use crate::session::{User, UserType};

/// An answer to a course question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswer {
    /// Backend identity.
    pub id: String,
    /// Question this answers.
    #[serde(default)]
    pub question_id: String,
    /// Answer text.
    pub content: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Author identity.
    #[serde(default)]
    pub created_by_user_id: String,
    /// Author display name.
    #[serde(default)]
    pub created_by_user_name: String,
}

impl QuestionAnswer {
    /// Admins may delete any answer; everyone else only their own.
    #[must_use]
    pub fn can_delete(&self, viewer: &User) -> bool {
        viewer.user_type == UserType::Admin || viewer.user_id == self.created_by_user_id
    }
}

/// A question posted in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Backend identity.
    pub id: String,
    /// Question text.
    pub content: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Author identity.
    #[serde(default)]
    pub created_by_user_id: String,
    /// Author display name.
    #[serde(default)]
    pub created_by_user_name: String,
    /// Answers given so far.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answers: Vec<QuestionAnswer>,
}

impl Question {
    /// Staff may delete any question; students only their own.
    #[must_use]
    pub fn can_delete(&self, viewer: &User) -> bool {
        viewer.user_type.is_staff() || viewer.user_id == self.created_by_user_id
    }

    /// Looks up one of this question's answers.
    #[must_use]
    pub fn find_answer(&self, answer_id: &str) -> Option<&QuestionAnswer> {
        self.answers.iter().find(|a| a.id == answer_id)
    }
}

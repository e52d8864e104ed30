//! School-wide announcements and the answers posted under them.

use serde::{Deserialize, Serialize};

use crate::courses::null_as_empty;
use crate::forms::{require_text, FormError};
use crate::session::{User, UserType};

/// A reply posted under an announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnouncementAnswer {
    /// Backend identity.
    pub id: String,
    /// Reply text.
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

impl AnnouncementAnswer {
    /// Admins may delete any answer; everyone else only their own.
    #[must_use]
    pub fn can_delete(&self, viewer: &User) -> bool {
        viewer.user_type == UserType::Admin || viewer.user_id == self.created_by_user_id
    }
}

/// An announcement visible to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    /// Backend identity.
    pub id: String,
    /// Heading.
    pub title: String,
    /// Body text.
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
    /// Whether readers may reply.
    #[serde(default)]
    pub allow_answers: bool,
    /// Replies, in the order the backend sends them.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub answers: Vec<AnnouncementAnswer>,
}

impl Announcement {
    /// Replies sorted newest first.
    #[must_use]
    pub fn answers_newest_first(&self) -> Vec<&AnnouncementAnswer> {
        let mut answers: Vec<_> = self.answers.iter().collect();
        answers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        answers
    }

    /// Validates a reply against this announcement.
    ///
    /// # Errors
    ///
    /// Returns an error if replies are disabled or the text is empty.
    pub fn answer(&self, content: &str) -> Result<String, FormError> {
        if !self.allow_answers {
            return Err(FormError::AnswersClosed);
        }
        require_text("answer", content)
    }
}

/// A validated announcement payload.
///
/// The backend creates the announcement from title, content and
/// `allow_answers`; `tags` are attached in a second call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnouncementDraft {
    /// Heading.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Whether readers may reply.
    pub allow_answers: bool,
    /// Tags the announcement is published under.
    #[serde(skip)]
    pub tags: Vec<String>,
}

impl AnnouncementDraft {
    /// Validates title, content and the tag selection. Duplicate tags are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the title or content is empty or no tag is selected.
    pub fn new(
        title: &str,
        content: &str,
        allow_answers: bool,
        tags: &[String],
    ) -> Result<Self, FormError> {
        let title = require_text("title", title)?;
        let content = require_text("content", content)?;
        let mut selected: Vec<String> = Vec::new();
        for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !selected.iter().any(|s| s == tag) {
                selected.push(tag.to_string());
            }
        }
        if selected.is_empty() {
            return Err(FormError::NoTags);
        }
        Ok(Self { title, content, allow_answers, tags: selected })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::sample_user;

    fn tags(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn draft_rejects_empty_content() {
        let err = AnnouncementDraft::new("Exams", " ", false, &tags(&["t1"]));
        assert_eq!(err, Err(FormError::Empty("content")));
    }

    #[test]
    fn draft_needs_at_least_one_tag() {
        let err = AnnouncementDraft::new("Exams", "Monday", false, &tags(&[" "]));
        assert_eq!(err, Err(FormError::NoTags));

        let draft = AnnouncementDraft::new("Exams", "Monday", true, &tags(&["t1", "t2", "t1"]))
            .unwrap();
        assert_eq!(draft.tags, ["t1", "t2"]);
    }

    #[test]
    fn draft_body_leaves_tags_out() {
        let draft = AnnouncementDraft::new("Trip", "Friday", false, &tags(&["t1"])).unwrap();
        let body = serde_json::to_value(&draft).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"title": "Trip", "content": "Friday", "allow_answers": false})
        );
    }

    #[test]
    fn announcement_reads_minimal_record() {
        let a: Announcement =
            serde_json::from_str(r#"{"id": "a1", "title": "Trip", "content": "Friday"}"#).unwrap();
        assert!(!a.allow_answers);
        assert!(a.answers.is_empty());
        assert_eq!(a.answer("me too"), Err(FormError::AnswersClosed));
    }

    #[test]
    fn answers_sort_newest_first() {
        let a: Announcement = serde_json::from_str(
            r#"{"id": "a1", "title": "Trip", "content": "Friday", "allow_answers": true,
                "answers": [{"id": "x", "content": "old", "created_at": 1},
                            {"id": "y", "content": "new", "created_at": 5}]}"#,
        )
        .unwrap();
        let ids: Vec<&str> = a.answers_newest_first().iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, ["y", "x"]);
        assert_eq!(a.answer("  ok "), Ok("ok".to_string()));
    }

    #[test]
    fn only_author_or_admin_deletes_answer() {
        let answer = AnnouncementAnswer {
            id: "x".into(),
            content: "hi".into(),
            created_at: 0,
            created_by_user_id: "someone".into(),
            created_by_user_name: "Someone".into(),
        };
        assert!(!answer.can_delete(&sample_user(UserType::Teacher)));
        assert!(answer.can_delete(&sample_user(UserType::Admin)));

        let own = AnnouncementAnswer { created_by_user_id: "u-1".into(), ..answer };
        assert!(own.can_delete(&sample_user(UserType::Student)));
    }
}

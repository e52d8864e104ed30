//! School backend port: every remote operation the client performs.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::announcements::{Announcement, AnnouncementAnswer, AnnouncementDraft};
use crate::board::{Lane, Task};
use crate::courses::{Course, CourseDraft, CourseMember, CourseUpdate};
use crate::grades::{CourseGrades, Grade, NewGrade};
use crate::questions::{Question, QuestionAnswer};
use crate::session::{Credentials, User};
use crate::tags::{Tag, TagDraft};
use crate::users::{NewUser, UserProfile};

/// Boxed future type alias used by [`SchoolBackend`] to keep the trait dyn-compatible.
pub type BackendFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, BackendError>> + Send + 'a>>;

/// Failure of a remote operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the `{"error": ...}` body, or the raw body.
        message: String,
    },
    /// The request never completed.
    #[error("request failed: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
    /// No session token is available.
    #[error("Not logged in!")]
    NotLoggedIn,
    /// No response within the configured timeout.
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    /// A failure served from a cassette.
    #[error("{0}")]
    Recorded(String),
}

/// Remote operations of the school backend.
///
/// The board engine only needs the three todo mutations; the rest back the
/// CLI views.
pub trait SchoolBackend: Send + Sync {
    /// Authenticates and returns the user with a fresh token.
    fn login<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, User>;

    /// Invalidates the current token.
    fn logout(&self) -> BackendFuture<'_, ()>;

    /// All todo items of the logged-in user.
    fn list_todos(&self) -> BackendFuture<'_, Vec<Task>>;

    /// Creates a todo item and returns its server-assigned id.
    fn create_todo<'a>(&'a self, text: &'a str, lane: Lane) -> BackendFuture<'a, String>;

    /// Moves a todo item to `lane`.
    fn update_todo_lane<'a>(&'a self, task_id: &'a str, lane: Lane) -> BackendFuture<'a, ()>;

    /// Deletes a todo item.
    fn delete_todo<'a>(&'a self, task_id: &'a str) -> BackendFuture<'a, ()>;

    /// Grades of the logged-in student, grouped by course.
    fn my_grades(&self) -> BackendFuture<'_, Vec<CourseGrades>>;

    /// Every grade recorded in a course.
    fn course_grades<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Grade>>;

    /// Records a grade.
    fn create_grade<'a>(&'a self, grade: &'a NewGrade) -> BackendFuture<'a, Grade>;

    /// Deletes a grade.
    fn delete_grade<'a>(&'a self, grade_id: &'a str) -> BackendFuture<'a, ()>;

    /// Courses of the logged-in user.
    fn list_courses(&self) -> BackendFuture<'_, Vec<Course>>;

    /// One course.
    fn course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Course>;

    /// Creates a course.
    fn create_course<'a>(&'a self, draft: &'a CourseDraft) -> BackendFuture<'a, Course>;

    /// Renames a course or moves its dates.
    fn update_course<'a>(
        &'a self,
        course_id: &'a str,
        update: &'a CourseUpdate,
    ) -> BackendFuture<'a, ()>;

    /// Deletes a course.
    fn delete_course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, ()>;

    /// Users enrolled in a course.
    fn course_members<'a>(&'a self, course_id: &'a str)
        -> BackendFuture<'a, Vec<CourseMember>>;

    /// Enrols a user in a course.
    fn add_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()>;

    /// Removes a user from a course.
    fn remove_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()>;

    /// Questions asked in a course, with their answers.
    fn course_questions<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Question>>;

    /// Asks a question in a course.
    fn ask_question<'a>(
        &'a self,
        course_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, Question>;

    /// Deletes a question.
    fn delete_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
    ) -> BackendFuture<'a, ()>;

    /// Answers a question.
    fn answer_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, QuestionAnswer>;

    /// Deletes an answer to a question.
    fn delete_question_answer<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()>;

    /// Every tag of the school.
    fn list_tags(&self) -> BackendFuture<'_, Vec<Tag>>;

    /// Creates a tag.
    fn create_tag<'a>(&'a self, draft: &'a TagDraft) -> BackendFuture<'a, Tag>;

    /// Renames or recolours a tag.
    fn update_tag<'a>(&'a self, tag_id: &'a str, draft: &'a TagDraft) -> BackendFuture<'a, ()>;

    /// Deletes a tag.
    fn delete_tag<'a>(&'a self, tag_id: &'a str) -> BackendFuture<'a, ()>;

    /// Tags attached to a user.
    fn personal_tags<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, Vec<Tag>>;

    /// Attaches a tag to a user.
    fn add_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str) -> BackendFuture<'a, ()>;

    /// Detaches a tag from a user.
    fn remove_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str)
        -> BackendFuture<'a, ()>;

    /// Announcements addressed to the logged-in user.
    fn list_announcements(&self) -> BackendFuture<'_, Vec<Announcement>>;

    /// Creates an announcement from title, content and `allow_answers`.
    fn create_announcement<'a>(
        &'a self,
        draft: &'a AnnouncementDraft,
    ) -> BackendFuture<'a, Announcement>;

    /// Publishes an announcement under `tag_ids`.
    fn tag_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        tag_ids: &'a [String],
    ) -> BackendFuture<'a, ()>;

    /// Deletes an announcement.
    fn delete_announcement<'a>(&'a self, announcement_id: &'a str) -> BackendFuture<'a, ()>;

    /// Replies to an announcement.
    fn answer_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, AnnouncementAnswer>;

    /// Deletes a reply to an announcement.
    fn delete_announcement_answer<'a>(
        &'a self,
        announcement_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()>;

    /// Every user of the school.
    fn list_users(&self) -> BackendFuture<'_, Vec<CourseMember>>;

    /// Profile of one user.
    fn user<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, UserProfile>;

    /// Creates a user account.
    fn create_user<'a>(&'a self, user: &'a NewUser) -> BackendFuture<'a, ()>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_shows_backend_message() {
        let err = BackendError::Status { status: 403, message: "Forbidden".into() };
        assert_eq!(err.to_string(), "Forbidden (HTTP 403)");
        assert_eq!(BackendError::NotLoggedIn.to_string(), "Not logged in!");
    }
}

//! Replaying adapter for the `SchoolBackend` port.

use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;

use super::{next_output, replay_result};
use crate::announcements::{Announcement, AnnouncementAnswer, AnnouncementDraft};
use crate::board::{Lane, Task};
use crate::cassette::replayer::CassetteReplayer;
use crate::cassette::BACKEND_PORT;
use crate::courses::{Course, CourseDraft, CourseMember, CourseUpdate};
use crate::grades::{CourseGrades, Grade, NewGrade};
use crate::ports::{BackendFuture, SchoolBackend};
use crate::questions::{Question, QuestionAnswer};
use crate::session::{Credentials, User};
use crate::tags::{Tag, TagDraft};
use crate::users::{NewUser, UserProfile};

/// Serves recorded backend responses from a cassette.
///
/// Arguments are not compared against the recording: each call takes the
/// next interaction recorded for its method.
pub struct ReplayingSchoolBackend {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingSchoolBackend {
    /// Create a replaying backend over `replayer`.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }

    fn replay<T>(&self, method: &str) -> BackendFuture<'_, T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        let output = next_output(&self.replayer, BACKEND_PORT, method);
        Box::pin(async move { replay_result(output) })
    }
}

impl SchoolBackend for ReplayingSchoolBackend {
    fn login<'a>(&'a self, _credentials: &'a Credentials) -> BackendFuture<'a, User> {
        self.replay("login")
    }

    fn logout(&self) -> BackendFuture<'_, ()> {
        self.replay("logout")
    }

    fn list_todos(&self) -> BackendFuture<'_, Vec<Task>> {
        self.replay("list_todos")
    }

    fn create_todo<'a>(&'a self, _text: &'a str, _lane: Lane) -> BackendFuture<'a, String> {
        self.replay("create_todo")
    }

    fn update_todo_lane<'a>(&'a self, _task_id: &'a str, _lane: Lane) -> BackendFuture<'a, ()> {
        self.replay("update_todo_lane")
    }

    fn delete_todo<'a>(&'a self, _task_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("delete_todo")
    }

    fn my_grades(&self) -> BackendFuture<'_, Vec<CourseGrades>> {
        self.replay("my_grades")
    }

    fn course_grades<'a>(&'a self, _course_id: &'a str) -> BackendFuture<'a, Vec<Grade>> {
        self.replay("course_grades")
    }

    fn create_grade<'a>(&'a self, _grade: &'a NewGrade) -> BackendFuture<'a, Grade> {
        self.replay("create_grade")
    }

    fn delete_grade<'a>(&'a self, _grade_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("delete_grade")
    }

    fn list_courses(&self) -> BackendFuture<'_, Vec<Course>> {
        self.replay("list_courses")
    }

    fn course<'a>(&'a self, _course_id: &'a str) -> BackendFuture<'a, Course> {
        self.replay("course")
    }

    fn create_course<'a>(&'a self, _draft: &'a CourseDraft) -> BackendFuture<'a, Course> {
        self.replay("create_course")
    }

    fn update_course<'a>(
        &'a self,
        _course_id: &'a str,
        _update: &'a CourseUpdate,
    ) -> BackendFuture<'a, ()> {
        self.replay("update_course")
    }

    fn delete_course<'a>(&'a self, _course_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("delete_course")
    }

    fn course_members<'a>(&'a self, _course_id: &'a str) -> BackendFuture<'a, Vec<CourseMember>> {
        self.replay("course_members")
    }

    fn add_course_member<'a>(
        &'a self,
        _course_id: &'a str,
        _user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("add_course_member")
    }

    fn remove_course_member<'a>(
        &'a self,
        _course_id: &'a str,
        _user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("remove_course_member")
    }

    fn course_questions<'a>(&'a self, _course_id: &'a str) -> BackendFuture<'a, Vec<Question>> {
        self.replay("course_questions")
    }

    fn ask_question<'a>(
        &'a self,
        _course_id: &'a str,
        _content: &'a str,
    ) -> BackendFuture<'a, Question> {
        self.replay("ask_question")
    }

    fn delete_question<'a>(
        &'a self,
        _course_id: &'a str,
        _question_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("delete_question")
    }

    fn answer_question<'a>(
        &'a self,
        _course_id: &'a str,
        _question_id: &'a str,
        _content: &'a str,
    ) -> BackendFuture<'a, QuestionAnswer> {
        self.replay("answer_question")
    }

    fn delete_question_answer<'a>(
        &'a self,
        _course_id: &'a str,
        _question_id: &'a str,
        _answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("delete_question_answer")
    }

    fn list_tags(&self) -> BackendFuture<'_, Vec<Tag>> {
        self.replay("list_tags")
    }

    fn create_tag<'a>(&'a self, _draft: &'a TagDraft) -> BackendFuture<'a, Tag> {
        self.replay("create_tag")
    }

    fn update_tag<'a>(&'a self, _tag_id: &'a str, _draft: &'a TagDraft) -> BackendFuture<'a, ()> {
        self.replay("update_tag")
    }

    fn delete_tag<'a>(&'a self, _tag_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("delete_tag")
    }

    fn personal_tags<'a>(&'a self, _user_id: &'a str) -> BackendFuture<'a, Vec<Tag>> {
        self.replay("personal_tags")
    }

    fn add_user_tag<'a>(&'a self, _tag_id: &'a str, _user_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("add_user_tag")
    }

    fn remove_user_tag<'a>(
        &'a self,
        _tag_id: &'a str,
        _user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("remove_user_tag")
    }

    fn list_announcements(&self) -> BackendFuture<'_, Vec<Announcement>> {
        self.replay("list_announcements")
    }

    fn create_announcement<'a>(
        &'a self,
        _draft: &'a AnnouncementDraft,
    ) -> BackendFuture<'a, Announcement> {
        self.replay("create_announcement")
    }

    fn tag_announcement<'a>(
        &'a self,
        _announcement_id: &'a str,
        _tag_ids: &'a [String],
    ) -> BackendFuture<'a, ()> {
        self.replay("tag_announcement")
    }

    fn delete_announcement<'a>(&'a self, _announcement_id: &'a str) -> BackendFuture<'a, ()> {
        self.replay("delete_announcement")
    }

    fn answer_announcement<'a>(
        &'a self,
        _announcement_id: &'a str,
        _content: &'a str,
    ) -> BackendFuture<'a, AnnouncementAnswer> {
        self.replay("answer_announcement")
    }

    fn delete_announcement_answer<'a>(
        &'a self,
        _announcement_id: &'a str,
        _answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.replay("delete_announcement_answer")
    }

    fn list_users(&self) -> BackendFuture<'_, Vec<CourseMember>> {
        self.replay("list_users")
    }

    fn user<'a>(&'a self, _user_id: &'a str) -> BackendFuture<'a, UserProfile> {
        self.replay("user")
    }

    fn create_user<'a>(&'a self, _user: &'a NewUser) -> BackendFuture<'a, ()> {
        self.replay("create_user")
    }
}

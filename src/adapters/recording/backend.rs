//! Recording adapter for the `SchoolBackend` port.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde_json::{json, Value};

use super::record_result;
use crate::announcements::{Announcement, AnnouncementAnswer, AnnouncementDraft};
use crate::board::{Lane, Task};
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::BACKEND_PORT;
use crate::courses::{Course, CourseDraft, CourseMember, CourseUpdate};
use crate::grades::{CourseGrades, Grade, NewGrade};
use crate::ports::{BackendFuture, SchoolBackend};
use crate::questions::{Question, QuestionAnswer};
use crate::session::{Credentials, User};
use crate::tags::{Tag, TagDraft};
use crate::users::{NewUser, UserProfile};

/// Token written to cassettes in place of real session tokens.
pub const REDACTED_TOKEN: &str = "<redacted>";

/// Records backend interactions while delegating to an inner implementation.
pub struct RecordingSchoolBackend {
    inner: Box<dyn SchoolBackend>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSchoolBackend {
    /// Creates a recording backend wrapping `inner`.
    pub fn new(inner: Box<dyn SchoolBackend>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }

    fn record<'a, T>(
        &'a self,
        method: &'static str,
        input: Value,
        call: BackendFuture<'a, T>,
    ) -> BackendFuture<'a, T>
    where
        T: Serialize + Send + 'a,
    {
        Box::pin(async move {
            let result = call.await;
            record_result(&self.recorder, BACKEND_PORT, method, &input, &result);
            result
        })
    }
}

impl SchoolBackend for RecordingSchoolBackend {
    fn login<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, User> {
        Box::pin(async move {
            let result = self.inner.login(credentials).await;
            let redacted = result
                .as_ref()
                .map(|user| User { token: REDACTED_TOKEN.into(), ..user.clone() });
            let input = json!({
                "email": credentials.email,
                "school_id": credentials.school_id,
            });
            record_result(&self.recorder, BACKEND_PORT, "login", &input, &redacted);
            result
        })
    }

    fn logout(&self) -> BackendFuture<'_, ()> {
        self.record("logout", json!({}), self.inner.logout())
    }

    fn list_todos(&self) -> BackendFuture<'_, Vec<Task>> {
        self.record("list_todos", json!({}), self.inner.list_todos())
    }

    fn create_todo<'a>(&'a self, text: &'a str, lane: Lane) -> BackendFuture<'a, String> {
        self.record(
            "create_todo",
            json!({ "text": text, "lane": lane }),
            self.inner.create_todo(text, lane),
        )
    }

    fn update_todo_lane<'a>(&'a self, task_id: &'a str, lane: Lane) -> BackendFuture<'a, ()> {
        self.record(
            "update_todo_lane",
            json!({ "task_id": task_id, "lane": lane }),
            self.inner.update_todo_lane(task_id, lane),
        )
    }

    fn delete_todo<'a>(&'a self, task_id: &'a str) -> BackendFuture<'a, ()> {
        let input = json!({ "task_id": task_id });
        self.record("delete_todo", input, self.inner.delete_todo(task_id))
    }

    fn my_grades(&self) -> BackendFuture<'_, Vec<CourseGrades>> {
        self.record("my_grades", json!({}), self.inner.my_grades())
    }

    fn course_grades<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Grade>> {
        let input = json!({ "course_id": course_id });
        self.record("course_grades", input, self.inner.course_grades(course_id))
    }

    fn create_grade<'a>(&'a self, grade: &'a NewGrade) -> BackendFuture<'a, Grade> {
        self.record("create_grade", json!(grade), self.inner.create_grade(grade))
    }

    fn delete_grade<'a>(&'a self, grade_id: &'a str) -> BackendFuture<'a, ()> {
        let input = json!({ "grade_id": grade_id });
        self.record("delete_grade", input, self.inner.delete_grade(grade_id))
    }

    fn list_courses(&self) -> BackendFuture<'_, Vec<Course>> {
        self.record("list_courses", json!({}), self.inner.list_courses())
    }

    fn course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Course> {
        self.record("course", json!({ "course_id": course_id }), self.inner.course(course_id))
    }

    fn create_course<'a>(&'a self, draft: &'a CourseDraft) -> BackendFuture<'a, Course> {
        self.record("create_course", json!(draft), self.inner.create_course(draft))
    }

    fn update_course<'a>(
        &'a self,
        course_id: &'a str,
        update: &'a CourseUpdate,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "update_course",
            json!({ "course_id": course_id, "update": update }),
            self.inner.update_course(course_id, update),
        )
    }

    fn delete_course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, ()> {
        let input = json!({ "course_id": course_id });
        self.record("delete_course", input, self.inner.delete_course(course_id))
    }

    fn course_members<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<CourseMember>> {
        let input = json!({ "course_id": course_id });
        self.record("course_members", input, self.inner.course_members(course_id))
    }

    fn add_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "add_course_member",
            json!({ "course_id": course_id, "user_id": user_id }),
            self.inner.add_course_member(course_id, user_id),
        )
    }

    fn remove_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "remove_course_member",
            json!({ "course_id": course_id, "user_id": user_id }),
            self.inner.remove_course_member(course_id, user_id),
        )
    }

    fn course_questions<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Question>> {
        let input = json!({ "course_id": course_id });
        self.record("course_questions", input, self.inner.course_questions(course_id))
    }

    fn ask_question<'a>(
        &'a self,
        course_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, Question> {
        self.record(
            "ask_question",
            json!({ "course_id": course_id, "content": content }),
            self.inner.ask_question(course_id, content),
        )
    }

    fn delete_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "delete_question",
            json!({ "course_id": course_id, "question_id": question_id }),
            self.inner.delete_question(course_id, question_id),
        )
    }

    fn answer_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, QuestionAnswer> {
        self.record(
            "answer_question",
            json!({ "course_id": course_id, "question_id": question_id, "content": content }),
            self.inner.answer_question(course_id, question_id, content),
        )
    }

    fn delete_question_answer<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "delete_question_answer",
            json!({ "course_id": course_id, "question_id": question_id, "answer_id": answer_id }),
            self.inner.delete_question_answer(course_id, question_id, answer_id),
        )
    }

    fn list_tags(&self) -> BackendFuture<'_, Vec<Tag>> {
        self.record("list_tags", json!({}), self.inner.list_tags())
    }

    fn create_tag<'a>(&'a self, draft: &'a TagDraft) -> BackendFuture<'a, Tag> {
        self.record("create_tag", json!(draft), self.inner.create_tag(draft))
    }

    fn update_tag<'a>(&'a self, tag_id: &'a str, draft: &'a TagDraft) -> BackendFuture<'a, ()> {
        self.record(
            "update_tag",
            json!({ "tag_id": tag_id, "name": draft.name, "colour": draft.colour }),
            self.inner.update_tag(tag_id, draft),
        )
    }

    fn delete_tag<'a>(&'a self, tag_id: &'a str) -> BackendFuture<'a, ()> {
        self.record("delete_tag", json!({ "tag_id": tag_id }), self.inner.delete_tag(tag_id))
    }

    fn personal_tags<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, Vec<Tag>> {
        let input = json!({ "user_id": user_id });
        self.record("personal_tags", input, self.inner.personal_tags(user_id))
    }

    fn add_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str) -> BackendFuture<'a, ()> {
        self.record(
            "add_user_tag",
            json!({ "tag_id": tag_id, "user_id": user_id }),
            self.inner.add_user_tag(tag_id, user_id),
        )
    }

    fn remove_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str) -> BackendFuture<'a, ()> {
        self.record(
            "remove_user_tag",
            json!({ "tag_id": tag_id, "user_id": user_id }),
            self.inner.remove_user_tag(tag_id, user_id),
        )
    }

    fn list_announcements(&self) -> BackendFuture<'_, Vec<Announcement>> {
        self.record("list_announcements", json!({}), self.inner.list_announcements())
    }

    fn create_announcement<'a>(
        &'a self,
        draft: &'a AnnouncementDraft,
    ) -> BackendFuture<'a, Announcement> {
        self.record("create_announcement", json!(draft), self.inner.create_announcement(draft))
    }

    fn tag_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        tag_ids: &'a [String],
    ) -> BackendFuture<'a, ()> {
        self.record(
            "tag_announcement",
            json!({ "announcement_id": announcement_id, "tags": tag_ids }),
            self.inner.tag_announcement(announcement_id, tag_ids),
        )
    }

    fn delete_announcement<'a>(&'a self, announcement_id: &'a str) -> BackendFuture<'a, ()> {
        self.record(
            "delete_announcement",
            json!({ "announcement_id": announcement_id }),
            self.inner.delete_announcement(announcement_id),
        )
    }

    fn answer_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, AnnouncementAnswer> {
        self.record(
            "answer_announcement",
            json!({ "announcement_id": announcement_id, "content": content }),
            self.inner.answer_announcement(announcement_id, content),
        )
    }

    fn delete_announcement_answer<'a>(
        &'a self,
        announcement_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        self.record(
            "delete_announcement_answer",
            json!({ "announcement_id": announcement_id, "answer_id": answer_id }),
            self.inner.delete_announcement_answer(announcement_id, answer_id),
        )
    }

    fn list_users(&self) -> BackendFuture<'_, Vec<CourseMember>> {
        self.record("list_users", json!({}), self.inner.list_users())
    }

    fn user<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, UserProfile> {
        self.record("user", json!({ "user_id": user_id }), self.inner.user(user_id))
    }

    fn create_user<'a>(&'a self, user: &'a NewUser) -> BackendFuture<'a, ()> {
        self.record("create_user", json!(user), self.inner.create_user(user))
    }
}

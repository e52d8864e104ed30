//! Live adapter for the `SchoolBackend` port using the backend's REST API.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::announcements::{Announcement, AnnouncementAnswer, AnnouncementDraft};
use crate::board::{Lane, Task};
use crate::courses::{null_as_empty, Course, CourseDraft, CourseMember, CourseUpdate};
use crate::grades::{CourseGrades, Grade, NewGrade};
use crate::ports::backend::{BackendError, BackendFuture, SchoolBackend};
use crate::questions::{Question, QuestionAnswer};
use crate::session::{Credentials, User};
use crate::tags::{Tag, TagDraft};
use crate::users::{NewUser, UserProfile};

/// Backend client talking HTTP to `{base_url}/api/...`.
pub struct LiveSchoolBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl LiveSchoolBackend {
    /// Creates a client for `base_url`, authenticating with `token` when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, token, timeout })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{path}", self.base_url)
    }

    /// A request to `/api/{path}` carrying the bearer token.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let token = self.token.as_deref().ok_or(BackendError::NotLoggedIn)?;
        Ok(self.client.request(method, self.url(path)).bearer_auth(token))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<String, BackendError> {
        let response = builder.send().await.map_err(|e| self.transport_error(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(&e))?;
        tracing::debug!(status = status.as_u16(), bytes = body.len(), "backend response");

        if status.is_success() {
            Ok(body)
        } else {
            Err(status_error(status.as_u16(), body))
        }
    }

    async fn fetch<T>(&self, builder: RequestBuilder) -> Result<T, BackendError>
    where
        T: DeserializeOwned,
    {
        let body = self.send(builder).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(), BackendError> {
        self.send(builder).await.map(|_| ())
    }

    fn transport_error(&self, err: &reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::TimedOut(self.timeout)
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

/// Error body returned by the backend.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Builds the error for a non-success response, preferring the `error` field.
fn status_error(status: u16, body: String) -> BackendError {
    let message = serde_json::from_str::<ErrorBody>(&body).map(|e| e.error).unwrap_or(body);
    BackendError::Status { status, message }
}

/// Body of a todo create.
#[derive(Serialize)]
struct TodoBody<'a> {
    text: &'a str,
    #[serde(rename = "type")]
    lane: Lane,
}

/// Body of a lane change.
#[derive(Serialize)]
struct LaneBody {
    #[serde(rename = "type")]
    lane: Lane,
}

/// Response of a todo create.
#[derive(Deserialize)]
struct CreatedId {
    id: String,
}

/// Body of a grade create. The backend stores the weight as a fraction.
#[derive(Serialize)]
struct GradeBody<'a> {
    course_id: &'a str,
    user_id: &'a str,
    grade: f64,
    out_of: f64,
    weight: f64,
}

impl<'a> From<&'a NewGrade> for GradeBody<'a> {
    fn from(grade: &'a NewGrade) -> Self {
        Self {
            course_id: &grade.course_id,
            user_id: &grade.user_id,
            grade: grade.grade,
            out_of: grade.out_of,
            weight: grade.weight_fraction(),
        }
    }
}

/// Body of a tag attachment.
#[derive(Serialize)]
struct TagsBody<'a> {
    tags: &'a [String],
}

/// Body of an announcement reply.
#[derive(Serialize)]
struct ContentBody<'a> {
    content: &'a str,
}

/// Body of a question or question answer.
#[derive(Serialize)]
struct TextBody<'a> {
    text: &'a str,
}

/// Body of a course membership change; the backend takes a batch.
#[derive(Serialize)]
struct UsersBody<'a> {
    users_id: [&'a str; 1],
}

/// Envelope of a course's grade list.
#[derive(Deserialize)]
struct GradeList {
    #[serde(default, deserialize_with = "null_as_empty")]
    grades: Vec<Grade>,
}

impl SchoolBackend for LiveSchoolBackend {
    fn login<'a>(&'a self, credentials: &'a Credentials) -> BackendFuture<'a, User> {
        Box::pin(async move {
            let request = self.client.post(self.url("login")).json(credentials);
            self.fetch(request).await
        })
    }

    fn logout(&self) -> BackendFuture<'_, ()> {
        Box::pin(async move { self.execute(self.request(Method::POST, "logout")?).await })
    }

    fn list_todos(&self) -> BackendFuture<'_, Vec<Task>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "todos")?).await })
    }

    fn create_todo<'a>(&'a self, text: &'a str, lane: Lane) -> BackendFuture<'a, String> {
        Box::pin(async move {
            let request = self.request(Method::POST, "todos")?.json(&TodoBody { text, lane });
            let created: CreatedId = self.fetch(request).await?;
            Ok(created.id)
        })
    }

    fn update_todo_lane<'a>(&'a self, task_id: &'a str, lane: Lane) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::PUT, &format!("todos/{task_id}"))?;
            self.execute(request.json(&LaneBody { lane })).await
        })
    }

    fn delete_todo<'a>(&'a self, task_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.execute(self.request(Method::DELETE, &format!("todos/{task_id}"))?).await
        })
    }

    fn my_grades(&self) -> BackendFuture<'_, Vec<CourseGrades>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "grades")?).await })
    }

    fn course_grades<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Grade>> {
        Box::pin(async move {
            let request = self.request(Method::GET, &format!("course/{course_id}/grades"))?;
            let list: GradeList = self.fetch(request).await?;
            Ok(list.grades)
        })
    }

    fn create_grade<'a>(&'a self, grade: &'a NewGrade) -> BackendFuture<'a, Grade> {
        Box::pin(async move {
            let request = self.request(Method::POST, "grades")?;
            self.fetch(request.json(&GradeBody::from(grade))).await
        })
    }

    fn delete_grade<'a>(&'a self, grade_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.execute(self.request(Method::DELETE, &format!("grades/{grade_id}"))?).await
        })
    }

    fn list_courses(&self) -> BackendFuture<'_, Vec<Course>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "user_courses")?).await })
    }

    fn course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Course> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &format!("course/{course_id}"))?).await
        })
    }

    fn create_course<'a>(&'a self, draft: &'a CourseDraft) -> BackendFuture<'a, Course> {
        Box::pin(async move {
            self.fetch(self.request(Method::POST, "courses")?.json(draft)).await
        })
    }

    fn update_course<'a>(
        &'a self,
        course_id: &'a str,
        update: &'a CourseUpdate,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::PUT, &format!("course/{course_id}"))?;
            self.execute(request.json(update)).await
        })
    }

    fn delete_course<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.execute(self.request(Method::DELETE, &format!("course/{course_id}"))?).await
        })
    }

    fn course_members<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<CourseMember>> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &format!("course/{course_id}/users"))?).await
        })
    }

    fn add_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::POST, &format!("course/{course_id}/users"))?;
            self.execute(request.json(&UsersBody { users_id: [user_id] })).await
        })
    }

    fn remove_course_member<'a>(
        &'a self,
        course_id: &'a str,
        user_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, &format!("course/{course_id}/users"))?;
            self.execute(request.json(&UsersBody { users_id: [user_id] })).await
        })
    }

    fn course_questions<'a>(&'a self, course_id: &'a str) -> BackendFuture<'a, Vec<Question>> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &format!("course/{course_id}/questions"))?).await
        })
    }

    fn ask_question<'a>(
        &'a self,
        course_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, Question> {
        Box::pin(async move {
            let request = self.request(Method::POST, &format!("course/{course_id}/questions"))?;
            self.fetch(request.json(&TextBody { text: content })).await
        })
    }

    fn delete_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("course/{course_id}/questions/{question_id}");
            self.execute(self.request(Method::DELETE, &path)?).await
        })
    }

    fn answer_question<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, QuestionAnswer> {
        Box::pin(async move {
            let path = format!("course/{course_id}/questions/{question_id}/answers");
            self.fetch(self.request(Method::POST, &path)?.json(&TextBody { text: content })).await
        })
    }

    fn delete_question_answer<'a>(
        &'a self,
        course_id: &'a str,
        question_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("course/{course_id}/questions/{question_id}/answers/{answer_id}");
            self.execute(self.request(Method::DELETE, &path)?).await
        })
    }

    fn list_tags(&self) -> BackendFuture<'_, Vec<Tag>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "tags")?).await })
    }

    fn create_tag<'a>(&'a self, draft: &'a TagDraft) -> BackendFuture<'a, Tag> {
        Box::pin(async move { self.fetch(self.request(Method::POST, "tags")?.json(draft)).await })
    }

    fn update_tag<'a>(&'a self, tag_id: &'a str, draft: &'a TagDraft) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::PUT, &format!("tags/{tag_id}"))?;
            self.execute(request.json(draft)).await
        })
    }

    fn delete_tag<'a>(&'a self, tag_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            self.execute(self.request(Method::DELETE, &format!("tags/{tag_id}"))?).await
        })
    }

    fn personal_tags<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, Vec<Tag>> {
        Box::pin(async move {
            let request = self.request(Method::GET, "tags/personal_tags")?;
            self.fetch(request.query(&[("user_id", user_id)])).await
        })
    }

    fn add_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::POST, &format!("tags/{tag_id}/add_user"))?;
            self.execute(request.query(&[("user_id", user_id)])).await
        })
    }

    fn remove_user_tag<'a>(&'a self, tag_id: &'a str, user_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let request = self.request(Method::DELETE, &format!("tags/{tag_id}/remove_user"))?;
            self.execute(request.query(&[("user_id", user_id)])).await
        })
    }

    fn list_announcements(&self) -> BackendFuture<'_, Vec<Announcement>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "user_announcements")?).await })
    }

    fn create_announcement<'a>(
        &'a self,
        draft: &'a AnnouncementDraft,
    ) -> BackendFuture<'a, Announcement> {
        Box::pin(async move {
            self.fetch(self.request(Method::POST, "announcements")?.json(draft)).await
        })
    }

    fn tag_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        tag_ids: &'a [String],
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("announcement/{announcement_id}/tags");
            self.execute(self.request(Method::POST, &path)?.json(&TagsBody { tags: tag_ids })).await
        })
    }

    fn delete_announcement<'a>(&'a self, announcement_id: &'a str) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("announcement/{announcement_id}");
            self.execute(self.request(Method::DELETE, &path)?).await
        })
    }

    fn answer_announcement<'a>(
        &'a self,
        announcement_id: &'a str,
        content: &'a str,
    ) -> BackendFuture<'a, AnnouncementAnswer> {
        Box::pin(async move {
            let path = format!("announcement/{announcement_id}/answers");
            self.fetch(self.request(Method::POST, &path)?.json(&ContentBody { content })).await
        })
    }

    fn delete_announcement_answer<'a>(
        &'a self,
        announcement_id: &'a str,
        answer_id: &'a str,
    ) -> BackendFuture<'a, ()> {
        Box::pin(async move {
            let path = format!("announcement/{announcement_id}/answers");
            let request = self.request(Method::DELETE, &path)?;
            self.execute(request.query(&[("answer_id", answer_id)])).await
        })
    }

    fn list_users(&self) -> BackendFuture<'_, Vec<CourseMember>> {
        Box::pin(async move { self.fetch(self.request(Method::GET, "users")?).await })
    }

    fn user<'a>(&'a self, user_id: &'a str) -> BackendFuture<'a, UserProfile> {
        Box::pin(async move {
            self.fetch(self.request(Method::GET, &format!("users/{user_id}"))?).await
        })
    }

    fn create_user<'a>(&'a self, user: &'a NewUser) -> BackendFuture<'a, ()> {
        Box::pin(async move { self.execute(self.request(Method::POST, "users")?.json(user)).await })
    }
}

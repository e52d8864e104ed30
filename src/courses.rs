//! Course records.

use serde::{Deserialize, Deserializer, Serialize};

use crate::forms::{parse_date, require_text, FormError};
use crate::session::UserType;

/// A course the user takes or teaches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Backend identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Unix timestamp of the first day.
    #[serde(default)]
    pub start_date: i64,
    /// Unix timestamp of the last day.
    #[serde(default)]
    pub end_date: i64,
    /// Path of the thumbnail file, if any.
    #[serde(default)]
    pub course_thumbnail: String,
}

/// A user enrolled in a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseMember {
    /// Backend identity of the user.
    pub user_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Role of the member.
    #[serde(rename = "type")]
    pub member_type: UserType,
}

impl CourseMember {
    /// `first last`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A validated new course. Dates are Unix timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDraft {
    /// Display name.
    pub name: String,
    /// First day.
    pub start_date: i64,
    /// Last day.
    pub end_date: i64,
}

impl CourseDraft {
    /// Validates the name and the `YYYY-MM-DD` dates.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, a date does not parse, or the
    /// course would end before it starts.
    pub fn new(name: &str, start: &str, end: &str) -> Result<Self, FormError> {
        let name = require_text("name", name)?;
        let (start_date, end_date) = (parse_date(start)?, parse_date(end)?);
        if end_date < start_date {
            return Err(FormError::EndBeforeStart);
        }
        Ok(Self { name, start_date, end_date })
    }
}

/// Changes to an existing course. Fields left as `None` are sent as `null`
/// and keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New first day.
    pub start_date: Option<i64>,
    /// New last day.
    pub end_date: Option<i64>,
}

impl CourseUpdate {
    /// Blank inputs count as unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if every field is blank or a date does not parse.
    pub fn new(
        name: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, FormError> {
        fn given(v: Option<&str>) -> Option<&str> {
            v.map(str::trim).filter(|v| !v.is_empty())
        }
        let update = Self {
            name: given(name).map(str::to_string),
            start_date: given(start).map(parse_date).transpose()?,
            end_date: given(end).map(parse_date).transpose()?,
        };
        if update.name.is_none() && update.start_date.is_none() && update.end_date.is_none() {
            return Err(FormError::NothingToUpdate);
        }
        Ok(update)
    }
}

/// School users that can still join a course: not yet members and not admins.
#[must_use]
pub fn addable_members<'a>(
    school_users: &'a [CourseMember],
    members: &[CourseMember],
) -> Vec<&'a CourseMember> {
    school_users
        .iter()
        .filter(|u| u.member_type != UserType::Admin)
        .filter(|u| !members.iter().any(|m| m.user_id == u.user_id))
        .collect()
}

/// Deserializes a JSON array that the backend may send as `null`.
///
/// # Errors
///
/// Returns the deserializer's error when the value is neither `null` nor an array of `T`.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_role_uses_type_field() {
        let member: CourseMember = serde_json::from_str(
            r#"{"user_id": "s1", "first_name": "Alan", "last_name": "Turing", "type": 2}"#,
        )
        .unwrap();
        assert_eq!(member.member_type, UserType::Student);
        assert_eq!(member.full_name(), "Alan Turing");
    }

    fn member(id: &str, member_type: UserType) -> CourseMember {
        CourseMember {
            user_id: id.into(),
            first_name: "First".into(),
            last_name: id.into(),
            member_type,
        }
    }

    #[test]
    fn draft_checks_dates() {
        let draft = CourseDraft::new(" Physics ", "2024-09-01", "2025-06-30").unwrap();
        assert_eq!(draft.name, "Physics");
        assert_eq!(draft.start_date, 1_725_148_800);
        assert_eq!(
            CourseDraft::new("Physics", "2025-06-30", "2024-09-01"),
            Err(FormError::EndBeforeStart)
        );
        assert_eq!(
            CourseDraft::new("Physics", "soon", "2024-09-01"),
            Err(FormError::InvalidDate("soon".into()))
        );
    }

    #[test]
    fn update_sends_blank_fields_as_null() {
        let update = CourseUpdate::new(Some("Physics II"), Some(""), None).unwrap();
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"name": "Physics II", "start_date": null, "end_date": null})
        );
        assert_eq!(CourseUpdate::new(Some(" "), None, None), Err(FormError::NothingToUpdate));
    }

    #[test]
    fn admins_and_members_cannot_be_added() {
        let school = [
            member("a", UserType::Admin),
            member("t", UserType::Teacher),
            member("s1", UserType::Student),
            member("s2", UserType::Student),
        ];
        let enrolled = [member("s1", UserType::Student)];
        let ids: Vec<&str> =
            addable_members(&school, &enrolled).iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, ["t", "s2"]);
    }

    #[test]
    fn course_tolerates_missing_dates() {
        let course: Course = serde_json::from_str(r#"{"id": "c1", "name": "Physics"}"#).unwrap();
        assert_eq!(course.start_date, 0);
        assert!(course.course_thumbnail.is_empty());
    }
}

//! Grade entry form.

use serde::Serialize;

use crate::courses::CourseMember;
use crate::forms::FormError;
use crate::session::{User, UserType};

/// A validated grade ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGrade {
    /// Course the grade belongs to.
    pub course_id: String,
    /// Graded student.
    pub user_id: String,
    /// Points obtained.
    pub grade: f64,
    /// Points possible.
    pub out_of: f64,
    /// Weight as entered, in percent. `0` means auto-weighted.
    pub weight_percent: f64,
}

impl NewGrade {
    /// Weight as the fraction the backend stores.
    #[must_use]
    pub fn weight_fraction(&self) -> f64 {
        self.weight_percent / 100.0
    }
}

/// Raw grade form input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeForm {
    /// Points obtained.
    pub grade: f64,
    /// Points possible.
    pub out_of: f64,
    /// Weight in percent.
    pub weight_percent: f64,
    /// Selected student.
    pub student_id: Option<String>,
}

impl GradeForm {
    /// Validates the form for `course_id`.
    ///
    /// Grade and out-of must be non-zero and a student must be selected.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::Incomplete`] when a required field is unset.
    #[allow(clippy::float_cmp)]
    pub fn submit(self, course_id: &str) -> Result<NewGrade, FormError> {
        let student = self.student_id.filter(|s| !s.trim().is_empty());
        match student {
            Some(user_id) if self.grade != 0.0 && self.out_of != 0.0 => Ok(NewGrade {
                course_id: course_id.to_string(),
                user_id,
                grade: self.grade,
                out_of: self.out_of,
                weight_percent: self.weight_percent,
            }),
            _ => Err(FormError::Incomplete),
        }
    }
}

/// Course members the viewer may grade: students other than the viewer.
#[must_use]
pub fn eligible_students<'a>(members: &'a [CourseMember], viewer: &User) -> Vec<&'a CourseMember> {
    members
        .iter()
        .filter(|m| m.member_type == UserType::Student && m.user_id != viewer.user_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::sample_user;

    fn member(id: &str, member_type: UserType) -> CourseMember {
        CourseMember {
            user_id: id.into(),
            first_name: id.into(),
            last_name: "X".into(),
            member_type,
        }
    }

    #[test]
    fn submit_requires_every_field() {
        let missing_student = GradeForm { grade: 8.0, out_of: 10.0, ..GradeForm::default() };
        assert_eq!(missing_student.submit("c1"), Err(FormError::Incomplete));

        let zero_grade =
            GradeForm { out_of: 10.0, student_id: Some("s1".into()), ..GradeForm::default() };
        assert_eq!(zero_grade.submit("c1"), Err(FormError::Incomplete));
    }

    #[test]
    fn submit_converts_percent_weight() {
        let form = GradeForm {
            grade: 8.0,
            out_of: 10.0,
            weight_percent: 25.0,
            student_id: Some("s1".into()),
        };
        let grade = form.submit("c1").unwrap();
        assert_eq!(grade.course_id, "c1");
        assert_eq!(grade.user_id, "s1");
        assert!((grade.weight_fraction() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn eligible_students_skip_staff_and_viewer() {
        let viewer = sample_user(UserType::Teacher);
        let members = vec![
            member("s1", UserType::Student),
            member("t2", UserType::Teacher),
            member(&viewer.user_id, UserType::Student),
            member("s3", UserType::Student),
        ];
        let ids: Vec<&str> =
            eligible_students(&members, &viewer).iter().map(|m| m.user_id.as_str()).collect();
        assert_eq!(ids, ["s1", "s3"]);
    }
}

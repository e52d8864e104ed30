//! Grade records and their groupings.

use serde::{Deserialize, Serialize};

use super::aggregate::{compute_final_grade, FinalGrade, GradedAssessment, AUTO_WEIGHT};
use crate::courses::null_as_empty;
use crate::session::{User, UserType};

/// One grade as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    /// Backend identity.
    pub id: String,
    /// Course the grade belongs to.
    pub course_id: String,
    /// Unix timestamp of creation.
    #[serde(default)]
    pub created_at: i64,
    /// Graded user.
    pub evaluated_id: String,
    /// Graded user's display name.
    #[serde(default)]
    pub evaluated_name: String,
    /// Grading user.
    pub evaluator_id: String,
    /// Grading user's display name.
    #[serde(default)]
    pub evaluator_name: String,
    /// Points obtained.
    pub grade: f64,
    /// Points possible.
    pub out_of: f64,
    /// Weight fraction or sentinel.
    pub weight: f64,
}

impl GradedAssessment for Grade {
    fn score(&self) -> f64 {
        self.grade
    }

    fn max_score(&self) -> f64 {
        self.out_of
    }

    fn weight(&self) -> f64 {
        self.weight
    }
}

impl Grade {
    /// Weight as a percentage, or `None` for auto-weighted grades.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn weight_percent(&self) -> Option<f64> {
        (self.weight != AUTO_WEIGHT).then_some(self.weight * 100.0)
    }

    /// Whether `viewer` may delete this grade.
    ///
    /// Admins may delete any grade; otherwise only self-assigned grades can go.
    #[must_use]
    pub fn can_delete(&self, viewer: &User) -> bool {
        self.evaluator_id == self.evaluated_id || viewer.user_type == UserType::Admin
    }
}

/// A course with the logged-in student's grades in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseGrades {
    /// Course identity.
    pub id: String,
    /// Course name.
    pub name: String,
    /// Thumbnail path.
    #[serde(default)]
    pub course_thumbnail: String,
    /// Grades of the student in this course.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub grades: Vec<Grade>,
}

impl CourseGrades {
    /// Final grade over this course's grades.
    #[must_use]
    pub fn final_grade(&self) -> FinalGrade {
        compute_final_grade(&self.grades)
    }
}

/// All grades of one student within a course.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentGrades {
    /// Student identity.
    pub student_id: String,
    /// Student display name.
    pub student_name: String,
    /// Grades in arrival order.
    pub grades: Vec<Grade>,
}

impl StudentGrades {
    /// Final grade over this student's grades.
    #[must_use]
    pub fn final_grade(&self) -> FinalGrade {
        compute_final_grade(&self.grades)
    }
}

/// Groups a course's grades by graded student, keeping first-seen order.
#[must_use]
pub fn group_by_student(grades: Vec<Grade>) -> Vec<StudentGrades> {
    let mut groups: Vec<StudentGrades> = Vec::new();
    for grade in grades {
        match groups.iter_mut().find(|g| g.student_id == grade.evaluated_id) {
            Some(group) => group.grades.push(grade),
            None => groups.push(StudentGrades {
                student_id: grade.evaluated_id.clone(),
                student_name: grade.evaluated_name.clone(),
                grades: vec![grade],
            }),
        }
    }
    groups
}

#[cfg(test)]
pub(crate) fn sample_grade(id: &str, student: &str, grade: f64, out_of: f64, weight: f64) -> Grade {
    Grade {
        id: id.into(),
        course_id: "c1".into(),
        created_at: 0,
        evaluated_id: student.into(),
        evaluated_name: format!("Student {student}"),
        evaluator_id: "teacher".into(),
        evaluator_name: "Teacher".into(),
        grade,
        out_of,
        weight,
    }
}

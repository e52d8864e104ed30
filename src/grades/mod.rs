//! Grades: weighted aggregation, grouping and entry.

pub mod aggregate;
pub mod form;
pub mod roster;

pub use aggregate::{
    compute_final_grade, Assessment, FinalGrade, GradedAssessment, AUTO_WEIGHT, EXCLUDED_WEIGHT,
};
pub use form::{eligible_students, GradeForm, NewGrade};
pub use roster::{group_by_student, CourseGrades, Grade, StudentGrades};

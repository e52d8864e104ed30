//! `school grades` command.

use super::table::{format_date, format_final, format_points, render_table};
use crate::cli::{AddGradeArgs, GradesCommand};
use crate::context::ServiceContext;
use crate::grades::{eligible_students, group_by_student, Grade, GradeForm, EXCLUDED_WEIGHT};
use crate::session::User;

/// Execute a `grades` subcommand.
///
/// # Errors
///
/// Returns an error string if the session is missing, the viewer lacks the
/// role for the view, the form is incomplete, or the backend call fails.
pub async fn run(ctx: &ServiceContext, command: &GradesCommand) -> Result<(), String> {
    match command {
        GradesCommand::Mine => mine(ctx).await,
        GradesCommand::Course { course_id } => course(ctx, course_id).await,
        GradesCommand::Add(args) => add(ctx, args).await,
        GradesCommand::Delete { grade_id, course_id } => delete(ctx, course_id, grade_id).await,
    }
}

async fn mine(ctx: &ServiceContext) -> Result<(), String> {
    let courses = ctx.backend.my_grades().await.map_err(|e| format!("Failed to load grades: {e}"))?;
    if courses.is_empty() {
        println!("No courses found.");
        return Ok(());
    }

    for course in &courses {
        println!("{}", course.name);
        if course.grades.is_empty() {
            println!("  No grades yet.\n");
            continue;
        }
        println!("{}", grades_table(&course.grades, false));
        println!("Final: {}\n", format_final(&course.final_grade()));
    }
    Ok(())
}

async fn course(ctx: &ServiceContext, course_id: &str) -> Result<(), String> {
    let state = ctx.session_state();
    require_staff(state.require()?)?;

    let grades = ctx
        .backend
        .course_grades(course_id)
        .await
        .map_err(|e| format!("Failed to load grades for course {course_id}: {e}"))?;
    let students = group_by_student(grades);
    if students.is_empty() {
        println!("No grades recorded in course {course_id}.");
        return Ok(());
    }

    for student in &students {
        println!("{} ({})", student.student_name, student.student_id);
        println!("{}", grades_table(&student.grades, true));
        println!("Final: {}\n", format_final(&student.final_grade()));
    }
    Ok(())
}

async fn add(ctx: &ServiceContext, args: &AddGradeArgs) -> Result<(), String> {
    let state = ctx.session_state();
    let viewer = require_staff(state.require()?)?;

    if let Some(student_id) = &args.student_id {
        let members = ctx
            .backend
            .course_members(&args.course_id)
            .await
            .map_err(|e| format!("Failed to load course members: {e}"))?;
        if !eligible_students(&members, viewer).iter().any(|m| &m.user_id == student_id) {
            let course_id = &args.course_id;
            return Err(format!("{student_id} is not a student you can grade in {course_id}"));
        }
    }

    let form = GradeForm {
        grade: args.grade,
        out_of: args.out_of,
        weight_percent: if args.excluded { EXCLUDED_WEIGHT * 100.0 } else { args.weight },
        student_id: args.student_id.clone(),
    };
    let new_grade = form.submit(&args.course_id).map_err(|e| e.to_string())?;

    let created = ctx
        .backend
        .create_grade(&new_grade)
        .await
        .map_err(|e| format!("Failed to add grade: {e}"))?;
    tracing::info!(grade_id = %created.id, course_id = %created.course_id, "grade recorded");
    println!(
        "Recorded grade {}: {}/{} ({})",
        created.id,
        format_points(created.grade),
        format_points(created.out_of),
        weight_label(&created)
    );
    Ok(())
}

async fn delete(ctx: &ServiceContext, course_id: &str, grade_id: &str) -> Result<(), String> {
    let state = ctx.session_state();
    let viewer = state.require()?;

    let grades = ctx
        .backend
        .course_grades(course_id)
        .await
        .map_err(|e| format!("Failed to load grades for course {course_id}: {e}"))?;
    let grade = grades
        .iter()
        .find(|g| g.id == grade_id)
        .ok_or_else(|| format!("No grade {grade_id} in course {course_id}"))?;
    if !grade.can_delete(viewer) {
        return Err("Only admins can delete grades given by someone else".to_string());
    }

    ctx.backend.delete_grade(grade_id).await.map_err(|e| format!("Failed to delete grade: {e}"))?;
    println!("Deleted grade {grade_id}.");
    Ok(())
}

fn require_staff(user: &User) -> Result<&User, String> {
    if user.user_type.is_staff() {
        Ok(user)
    } else {
        Err("Only teachers and admins can manage course grades".to_string())
    }
}

/// `excluded`, `auto`, or the weight as a percentage.
#[allow(clippy::float_cmp)]
pub(crate) fn weight_label(grade: &Grade) -> String {
    if grade.weight == EXCLUDED_WEIGHT {
        return "excluded".to_string();
    }
    grade
        .weight_percent()
        .map_or_else(|| "auto".to_string(), |pct| format!("{}%", format_points(pct)))
}

fn grades_table(grades: &[Grade], with_ids: bool) -> String {
    let mut headers = vec!["DATE", "GRADE", "WEIGHT", "EVALUATOR"];
    if with_ids {
        headers.insert(0, "ID");
    }
    let rows: Vec<Vec<String>> = grades
        .iter()
        .map(|g| {
            let mut row = vec![
                format_date(g.created_at),
                format!("{}/{}", format_points(g.grade), format_points(g.out_of)),
                weight_label(g),
                g.evaluator_name.clone(),
            ];
            if with_ids {
                row.insert(0, g.id.clone());
            }
            row
        })
        .collect();
    render_table(&headers, &rows)
}

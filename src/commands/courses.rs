//! `school courses` command.

use super::table::{format_date, render_table};
use crate::cli::CoursesCommand;
use crate::context::ServiceContext;
use crate::courses::{addable_members, CourseDraft, CourseMember, CourseUpdate};

/// Execute a `courses` subcommand.
///
/// Creating, changing and deleting courses and managing their members
/// requires a teacher or admin session.
///
/// # Errors
///
/// Returns an error string if the input is invalid, the viewer lacks the
/// role, or a backend call fails.
pub async fn run(ctx: &ServiceContext, command: &CoursesCommand) -> Result<(), String> {
    match command {
        CoursesCommand::List => {
            let courses = ctx
                .backend
                .list_courses()
                .await
                .map_err(|e| format!("Failed to load courses: {e}"))?;
            if courses.is_empty() {
                println!("No courses found.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = courses
                .iter()
                .map(|c| {
                    let (start, end) = (format_date(c.start_date), format_date(c.end_date));
                    vec![c.id.clone(), c.name.clone(), start, end]
                })
                .collect();
            println!("{}", render_table(&["ID", "NAME", "START", "END"], &rows));
            println!("\n{} course(s) total.", rows.len());
        }
        CoursesCommand::Show { course_id } => {
            let course = ctx
                .backend
                .course(course_id)
                .await
                .map_err(|e| format!("Failed to load course {course_id}: {e}"))?;
            println!("Course: {}", course.id);
            println!("Name: {}", course.name);
            println!("Start: {}", format_date(course.start_date));
            println!("End: {}", format_date(course.end_date));
            if !course.course_thumbnail.is_empty() {
                println!("Thumbnail: {}", course.course_thumbnail);
            }
        }
        CoursesCommand::Members { course_id } => {
            let members = members(ctx, course_id).await?;
            if members.is_empty() {
                println!("No members in course {course_id}.");
                return Ok(());
            }
            println!("{}", member_table(members.iter()));
        }
        CoursesCommand::Create { name, start, end } => {
            require_staff(ctx)?;
            let draft = CourseDraft::new(name, start, end).map_err(|e| e.to_string())?;
            let course = ctx
                .backend
                .create_course(&draft)
                .await
                .map_err(|e| format!("Failed to create course: {e}"))?;
            println!("Created course {} ({}).", course.name, course.id);
        }
        CoursesCommand::Update { course_id, name, start, end } => {
            require_staff(ctx)?;
            let update = CourseUpdate::new(name.as_deref(), start.as_deref(), end.as_deref())
                .map_err(|e| e.to_string())?;
            ctx.backend
                .update_course(course_id, &update)
                .await
                .map_err(|e| format!("Failed to update course {course_id}: {e}"))?;
            println!("Updated course {course_id}.");
        }
        CoursesCommand::Delete { course_id } => {
            require_staff(ctx)?;
            ctx.backend
                .delete_course(course_id)
                .await
                .map_err(|e| format!("Failed to delete course {course_id}: {e}"))?;
            println!("Deleted course {course_id}.");
        }
        CoursesCommand::Candidates { course_id } => {
            require_staff(ctx)?;
            let members = members(ctx, course_id).await?;
            let users = ctx
                .backend
                .list_users()
                .await
                .map_err(|e| format!("Failed to load users: {e}"))?;
            let candidates = addable_members(&users, &members);
            if candidates.is_empty() {
                println!("Everyone is already in course {course_id}.");
                return Ok(());
            }
            println!("{}", member_table(candidates.into_iter()));
        }
        CoursesCommand::AddMember { course_id, user_id } => {
            require_staff(ctx)?;
            let users = ctx
                .backend
                .list_users()
                .await
                .map_err(|e| format!("Failed to load users: {e}"))?;
            let members = members(ctx, course_id).await?;
            if !addable_members(&users, &members).iter().any(|u| u.user_id == *user_id) {
                return Err(format!("{user_id} cannot be added to course {course_id}"));
            }
            ctx.backend
                .add_course_member(course_id, user_id)
                .await
                .map_err(|e| format!("Failed to add {user_id}: {e}"))?;
            println!("Added {user_id} to course {course_id}.");
        }
        CoursesCommand::RemoveMember { course_id, user_id } => {
            require_staff(ctx)?;
            ctx.backend
                .remove_course_member(course_id, user_id)
                .await
                .map_err(|e| format!("Failed to remove {user_id}: {e}"))?;
            println!("Removed {user_id} from course {course_id}.");
        }
    }
    Ok(())
}

async fn members(ctx: &ServiceContext, course_id: &str) -> Result<Vec<CourseMember>, String> {
    ctx.backend
        .course_members(course_id)
        .await
        .map_err(|e| format!("Failed to load members of {course_id}: {e}"))
}

fn member_table<'a>(members: impl Iterator<Item = &'a CourseMember>) -> String {
    let rows: Vec<Vec<String>> = members
        .map(|m| vec![m.user_id.clone(), m.full_name(), m.member_type.label().to_string()])
        .collect();
    render_table(&["ID", "NAME", "ROLE"], &rows)
}

fn require_staff(ctx: &ServiceContext) -> Result<(), String> {
    if ctx.session_state().require()?.user_type.is_staff() {
        Ok(())
    } else {
        Err("Only teachers and admins can manage courses".to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::Settings;
    use crate::ports::backend::testing::FakeBackend;
    use crate::session::{sample_user, UserType};

    fn context_as(fake: FakeBackend, user_type: UserType, name: &str) -> ServiceContext {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let settings = Settings { session_path: dir.join("session.json"), ..Settings::default() };
        let ctx = ServiceContext::with_backend(Box::new(fake), settings);
        ctx.session.save(&sample_user(user_type)).unwrap();
        ctx
    }

    fn member(user_id: &str, member_type: UserType) -> CourseMember {
        CourseMember {
            user_id: user_id.into(),
            first_name: "First".into(),
            last_name: "Last".into(),
            member_type,
        }
    }

    #[tokio::test]
    async fn missing_course_reports_backend_message() {
        let ctx =
            ServiceContext::with_backend(Box::new(FakeBackend::default()), Settings::default());
        let err = run(&ctx, &CoursesCommand::Show { course_id: "c404".into() }).await.unwrap_err();
        assert_eq!(err, "Failed to load course c404: no course c404");
    }

    #[tokio::test]
    async fn empty_course_list_is_not_an_error() {
        let ctx =
            ServiceContext::with_backend(Box::new(FakeBackend::default()), Settings::default());
        assert!(run(&ctx, &CoursesCommand::List).await.is_ok());
    }

    #[tokio::test]
    async fn students_cannot_create_courses() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Student, "school_courses_student_test");
        let command = CoursesCommand::Create {
            name: "Physics".into(),
            start: "2024-09-01".into(),
            end: "2025-06-30".into(),
        };

        let err = run(&ctx, &command).await.unwrap_err();

        assert_eq!(err, "Only teachers and admins can manage courses");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn teacher_creates_course_from_dates() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Teacher, "school_courses_create_test");
        let command = CoursesCommand::Create {
            name: " Physics ".into(),
            start: "2024-09-01".into(),
            end: "2024-08-01".into(),
        };
        let err = run(&ctx, &command).await.unwrap_err();
        assert_eq!(err, "end date must not be before start date");

        let command = CoursesCommand::Create {
            name: " Physics ".into(),
            start: "2024-09-01".into(),
            end: "2025-06-30".into(),
        };
        run(&ctx, &command).await.unwrap();
        assert_eq!(*calls.lock().unwrap(), ["create_course Physics"]);
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Admin, "school_courses_update_test");
        let command =
            CoursesCommand::Update { course_id: "c1".into(), name: None, start: None, end: None };

        let err = run(&ctx, &command).await.unwrap_err();

        assert_eq!(err, "No data to update!");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_member_only_takes_candidates() {
        let fake = FakeBackend::default();
        fake.school_users.lock().unwrap().extend([
            member("s1", UserType::Student),
            member("s2", UserType::Student),
            member("boss", UserType::Admin),
        ]);
        fake.members.lock().unwrap().push(member("s1", UserType::Student));
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Teacher, "school_courses_add_member_test");

        for taken in ["s1", "boss"] {
            let command =
                CoursesCommand::AddMember { course_id: "c1".into(), user_id: taken.into() };
            let err = run(&ctx, &command).await.unwrap_err();
            assert_eq!(err, format!("{taken} cannot be added to course c1"));
        }

        let command = CoursesCommand::AddMember { course_id: "c1".into(), user_id: "s2".into() };
        run(&ctx, &command).await.unwrap();
        assert_eq!(calls.lock().unwrap().last().unwrap(), "add_course_member c1 s2");
    }

    #[tokio::test]
    async fn remove_member_calls_backend() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Admin, "school_courses_remove_member_test");
        let command =
            CoursesCommand::RemoveMember { course_id: "c1".into(), user_id: "s1".into() };

        run(&ctx, &command).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), ["remove_course_member c1 s1"]);
    }
}

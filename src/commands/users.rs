//! `school users` command.

use crate::cli::UsersCommand;
use crate::context::ServiceContext;
use crate::session::UserType;
use crate::users::NewUser;

/// Execute a `users` subcommand. Creating accounts requires an admin session.
///
/// # Errors
///
/// Returns an error string if the input is invalid, the viewer is not an
/// admin, or a backend call fails.
pub async fn run(ctx: &ServiceContext, command: &UsersCommand) -> Result<(), String> {
    match command {
        UsersCommand::Show { user_id } => {
            let profile = ctx
                .backend
                .user(user_id)
                .await
                .map_err(|e| format!("Failed to load user {user_id}: {e}"))?;
            println!("User: {}", profile.user_id);
            println!("Name: {} {}", profile.first_name, profile.last_name);
            println!("Email: {}", profile.email);
            if !profile.phone_number.is_empty() {
                println!("Phone: {}", profile.phone_number);
            }
            println!("Role: {}", profile.user_type.label());
        }
        UsersCommand::Create { first_name, last_name, email, phone, user_type } => {
            let state = ctx.session_state();
            if state.require()?.user_type != UserType::Admin {
                return Err("Only admins can create users".to_string());
            }
            let user = NewUser::new(first_name, last_name, email, phone, *user_type)
                .map_err(|e| e.to_string())?;
            ctx.backend
                .create_user(&user)
                .await
                .map_err(|e| format!("Failed to create user: {e}"))?;
            println!("Created {} account for {}.", user.user_type.label(), user.email);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::ports::backend::testing::FakeBackend;
    use crate::session::sample_user;

    #[tokio::test]
    async fn teachers_cannot_create_users() {
        let dir = std::env::temp_dir().join("school_users_teacher_test");
        let _ = std::fs::remove_dir_all(&dir);
        let settings = Settings { session_path: dir.join("session.json"), ..Settings::default() };
        let ctx = ServiceContext::with_backend(Box::new(FakeBackend::default()), settings);
        ctx.session.save(&sample_user(UserType::Teacher)).unwrap();

        let command = UsersCommand::Create {
            first_name: "Sam".into(),
            last_name: "Student".into(),
            email: "sam@school.test".into(),
            phone: String::new(),
            user_type: UserType::Student,
        };
        assert_eq!(run(&ctx, &command).await.unwrap_err(), "Only admins can create users");
        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Command dispatch and handlers.

pub mod announcements;
pub mod courses;
pub mod grades;
pub mod questions;
pub mod session;
pub mod tags;
pub mod todo;
pub mod users;

mod table;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::session::Credentials;

/// Dispatch a parsed command to its handler.
///
/// Settings come from the environment. When `SCHOOL_RECORD` is set to a
/// directory, every backend interaction is recorded to a cassette there;
/// when `SCHOOL_REPLAY` names a cassette, the backend is served from it.
///
/// # Errors
///
/// Returns an error string if the settings are invalid, the context cannot
/// be built, or the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let settings = Settings::from_env().map_err(|e| e.to_string())?;
    let (ctx, recording) = ServiceContext::from_settings(settings)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let result = runtime.block_on(dispatch_with_context(command, &ctx));

    // Finish recording after the command completes, even on error.
    if let Some(recording) = recording {
        // Drop the context first to release the recorder handle.
        drop(ctx);
        finish_recording(recording)?;
    }

    result
}

/// Dispatch a command with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub async fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
) -> Result<(), String> {
    match command {
        Command::Login { email, password, school_id } => {
            let credentials = Credentials {
                email: email.clone(),
                password: password.clone(),
                school_id: school_id.clone(),
            };
            session::login(ctx, &credentials).await
        }
        Command::Logout => session::logout(ctx).await,
        Command::Whoami => session::whoami(ctx),
        Command::Todo(cmd) => todo::run(ctx, cmd).await,
        Command::Grades(cmd) => grades::run(ctx, cmd).await,
        Command::Tags(cmd) => tags::run(ctx, cmd).await,
        Command::Courses(cmd) => courses::run(ctx, cmd).await,
        Command::Questions(cmd) => questions::run(ctx, cmd).await,
        Command::Announcements(cmd) => announcements::run(ctx, cmd).await,
        Command::Users(cmd) => users::run(ctx, cmd).await,
    }
}

/// Finish a recording session and print the cassette path.
fn finish_recording(recording: RecordingSession) -> Result<(), String> {
    let path = recording.finish()?;
    eprintln!("Recording saved to: {}", path.display());
    Ok(())
}

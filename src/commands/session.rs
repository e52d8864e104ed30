//! `school login`, `school logout` and `school whoami`.

use crate::context::ServiceContext;
use crate::session::Credentials;

/// Log in and save the returned user to the session file.
///
/// # Errors
///
/// Returns an error string if the backend rejects the credentials or the
/// session cannot be saved.
pub async fn login(ctx: &ServiceContext, credentials: &Credentials) -> Result<(), String> {
    let user = ctx.backend.login(credentials).await.map_err(|e| format!("Login failed: {e}"))?;
    ctx.session.save(&user)?;
    tracing::info!(user_id = %user.user_id, "logged in");

    println!("Logged in as {} ({}).", user.full_name(), user.user_type.label());
    if !user.changed_password {
        println!("You are still using your initial password; please change it.");
    }
    Ok(())
}

/// End the session. The local session is cleared even if the backend call fails.
///
/// # Errors
///
/// Returns an error string if the session file cannot be removed.
pub async fn logout(ctx: &ServiceContext) -> Result<(), String> {
    if let Err(err) = ctx.backend.logout().await {
        tracing::warn!(error = %err, "backend logout failed");
    }
    ctx.session.clear()?;
    println!("Logged out.");
    Ok(())
}

/// Print the logged-in user.
///
/// # Errors
///
/// Returns an error string when nobody is logged in.
pub fn whoami(ctx: &ServiceContext) -> Result<(), String> {
    let state = ctx.session_state();
    let user = state.require()?;
    println!("{} <{}>", user.full_name(), user.email);
    println!("Role: {}", user.user_type.label());
    println!("User id: {}", user.user_id);
    Ok(())
}

//! `school announcements` command.

use tracing::warn;

use super::table::format_date;
use crate::announcements::{Announcement, AnnouncementDraft};
use crate::cli::AnnouncementsCommand;
use crate::context::ServiceContext;

/// Execute an `announcements` subcommand.
///
/// Publishing requires a teacher or admin session.
///
/// # Errors
///
/// Returns an error string if the input is invalid, the viewer may not
/// publish, or a backend call fails.
pub async fn run(ctx: &ServiceContext, command: &AnnouncementsCommand) -> Result<(), String> {
    match command {
        AnnouncementsCommand::List => list(ctx).await?,
        AnnouncementsCommand::Create { title, content, allow_answers, tags } => {
            let state = ctx.session_state();
            if !state.require()?.user_type.is_staff() {
                return Err("Only teachers and admins can publish announcements".to_string());
            }
            let draft = AnnouncementDraft::new(title, content, *allow_answers, tags)
                .map_err(|e| e.to_string())?;
            publish(ctx, &draft).await?;
        }
        AnnouncementsCommand::Delete { id } => {
            ctx.backend
                .delete_announcement(id)
                .await
                .map_err(|e| format!("Failed to delete announcement: {e}"))?;
            println!("Deleted announcement {id}.");
        }
        AnnouncementsCommand::Answer { id, content } => {
            ctx.session_state().require()?;
            let announcement = find(ctx, id).await?;
            let content = announcement.answer(content).map_err(|e| e.to_string())?;
            let answer = ctx
                .backend
                .answer_announcement(id, &content)
                .await
                .map_err(|e| format!("Failed to post answer: {e}"))?;
            println!("Posted answer {} to \"{}\".", answer.id, announcement.title);
        }
        AnnouncementsCommand::DeleteAnswer { id, answer_id } => {
            let state = ctx.session_state();
            let viewer = state.require()?;
            let announcement = find(ctx, id).await?;
            let answer = announcement
                .answers
                .iter()
                .find(|a| a.id == *answer_id)
                .ok_or_else(|| format!("No answer {answer_id} on announcement {id}"))?;
            if !answer.can_delete(viewer) {
                return Err("Only admins can delete someone else's answer".to_string());
            }
            ctx.backend
                .delete_announcement_answer(id, answer_id)
                .await
                .map_err(|e| format!("Failed to delete answer: {e}"))?;
            println!("Deleted answer {answer_id}.");
        }
    }
    Ok(())
}

async fn list(ctx: &ServiceContext) -> Result<(), String> {
    let announcements = ctx
        .backend
        .list_announcements()
        .await
        .map_err(|e| format!("Failed to load announcements: {e}"))?;
    if announcements.is_empty() {
        println!("No announcements.");
    }
    for a in &announcements {
        println!("[{}] {}", a.id, a.title);
        println!("  by {} on {}", a.created_by_user_name, format_date(a.created_at));
        for line in a.content.lines() {
            println!("  {line}");
        }
        for answer in a.answers_newest_first() {
            println!("    > [{}] {}: {}", answer.id, answer.created_by_user_name, answer.content);
        }
        println!();
    }
    Ok(())
}

/// Creates the announcement, then attaches its tags. An announcement whose
/// tags could not be attached is deleted again.
async fn publish(ctx: &ServiceContext, draft: &AnnouncementDraft) -> Result<(), String> {
    let created = ctx
        .backend
        .create_announcement(draft)
        .await
        .map_err(|e| format!("Failed to publish announcement: {e}"))?;
    if let Err(err) = ctx.backend.tag_announcement(&created.id, &draft.tags).await {
        if let Err(cleanup) = ctx.backend.delete_announcement(&created.id).await {
            warn!(id = %created.id, error = %cleanup, "untagged announcement left behind");
        }
        return Err(format!("Failed to tag announcement: {err}"));
    }
    println!("Published \"{}\" as {}.", created.title, created.id);
    Ok(())
}

async fn find(ctx: &ServiceContext, id: &str) -> Result<Announcement, String> {
    ctx.backend
        .list_announcements()
        .await
        .map_err(|e| format!("Failed to load announcements: {e}"))?
        .into_iter()
        .find(|a| a.id == id)
        .ok_or_else(|| format!("No announcement {id}"))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::announcements::AnnouncementAnswer;
    use crate::config::Settings;
    use crate::ports::backend::testing::FakeBackend;
    use crate::ports::BackendError;
    use crate::session::{sample_user, UserType};

    fn context_as(fake: FakeBackend, user_type: UserType, name: &str) -> ServiceContext {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        let settings = Settings { session_path: dir.join("session.json"), ..Settings::default() };
        let ctx = ServiceContext::with_backend(Box::new(fake), settings);
        ctx.session.save(&sample_user(user_type)).unwrap();
        ctx
    }

    fn create(tags: &[&str]) -> AnnouncementsCommand {
        AnnouncementsCommand::Create {
            title: " Trip ".into(),
            content: "Friday".into(),
            allow_answers: false,
            tags: tags.iter().map(ToString::to_string).collect(),
        }
    }

    fn announcement(allow_answers: bool, answers: Vec<AnnouncementAnswer>) -> Announcement {
        Announcement {
            id: "a1".into(),
            title: "Trip".into(),
            content: "Friday".into(),
            created_at: 0,
            created_by_user_id: "teacher".into(),
            created_by_user_name: "T".into(),
            allow_answers,
            answers,
        }
    }

    #[tokio::test]
    async fn teacher_publishes_under_tags() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Teacher, "school_announcements_test");

        run(&ctx, &create(&["t1", "t2"])).await.unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            ["create_announcement Trip", "tag_announcement ann-new t1,t2"]
        );
    }

    #[tokio::test]
    async fn failed_tagging_deletes_announcement() {
        let fake = FakeBackend::default();
        fake.fail_method
            .lock()
            .unwrap()
            .insert("tag_announcement", BackendError::Recorded("bad tag".into()));
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Admin, "school_announcements_rollback_test");

        let err = run(&ctx, &create(&["t1"])).await.unwrap_err();

        assert_eq!(err, "Failed to tag announcement: bad tag");
        assert_eq!(
            *calls.lock().unwrap(),
            [
                "create_announcement Trip",
                "tag_announcement ann-new t1",
                "delete_announcement ann-new",
            ]
        );
    }

    #[tokio::test]
    async fn publishing_without_tags_is_rejected() {
        let fake = FakeBackend::default();
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Teacher, "school_announcements_untagged_test");

        let err = run(&ctx, &create(&[])).await.unwrap_err();

        assert_eq!(err, "Select at least one tag");
        assert!(calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn answers_respect_allow_answers() {
        let fake = FakeBackend::default();
        fake.announcements.lock().unwrap().push(announcement(false, Vec::new()));
        let ctx = context_as(fake, UserType::Student, "school_announcements_closed_test");
        let command = AnnouncementsCommand::Answer { id: "a1".into(), content: "Me".into() };

        let err = run(&ctx, &command).await.unwrap_err();
        assert_eq!(err, "This announcement does not accept answers");

        let fake = FakeBackend::default();
        fake.announcements.lock().unwrap().push(announcement(true, Vec::new()));
        let calls = Arc::clone(&fake.calls);
        let ctx = context_as(fake, UserType::Student, "school_announcements_open_test");

        run(&ctx, &command).await.unwrap();
        assert_eq!(calls.lock().unwrap().last().unwrap(), "answer_announcement a1");
    }

    #[tokio::test]
    async fn students_cannot_delete_others_answers() {
        let answer = AnnouncementAnswer {
            id: "x".into(),
            content: "hi".into(),
            created_at: 0,
            created_by_user_id: "someone".into(),
            created_by_user_name: "Someone".into(),
        };
        let fake = FakeBackend::default();
        fake.announcements.lock().unwrap().push(announcement(true, vec![answer]));
        let ctx = context_as(fake, UserType::Student, "school_announcements_delete_answer_test");
        let command = AnnouncementsCommand::DeleteAnswer { id: "a1".into(), answer_id: "x".into() };

        let err = run(&ctx, &command).await.unwrap_err();
        assert!(err.contains("Only admins"));
    }
}

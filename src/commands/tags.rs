//! `school tags` command.

use super::table::render_table;
use crate::cli::TagsCommand;
use crate::context::ServiceContext;
use crate::tags::{Tag, TagAssignment, TagDraft};

/// Execute a `tags` subcommand.
///
/// # Errors
///
/// Returns an error string if the input is invalid, the tag does not exist,
/// or a backend call fails.
pub async fn run(ctx: &ServiceContext, command: &TagsCommand) -> Result<(), String> {
    match command {
        TagsCommand::List => {
            let tags = all_tags(ctx).await?;
            print_tags(&tags, "No tags defined.");
        }
        TagsCommand::Create { name, colour } => {
            let draft = TagDraft::new(name, colour).map_err(|e| e.to_string())?;
            let tag = ctx
                .backend
                .create_tag(&draft)
                .await
                .map_err(|e| format!("Failed to create tag: {e}"))?;
            println!("Created tag {} ({}).", tag.id, tag.name);
        }
        TagsCommand::Update { id, name, colour } => {
            let tags = all_tags(ctx).await?;
            let existing = tags
                .iter()
                .find(|t| &t.id == id)
                .ok_or_else(|| format!("No tag with id {id}"))?;
            let draft = TagDraft::edit(existing, name.as_deref(), colour.as_deref())
                .map_err(|e| e.to_string())?;
            ctx.backend
                .update_tag(id, &draft)
                .await
                .map_err(|e| format!("Failed to update tag: {e}"))?;
            println!("Updated tag {id}: {} ({}).", draft.name, draft.colour);
        }
        TagsCommand::Delete { id } => {
            ctx.backend.delete_tag(id).await.map_err(|e| format!("Failed to delete tag: {e}"))?;
            println!("Deleted tag {id}.");
        }
        TagsCommand::User { user_id } => {
            let tags = personal_tags(ctx, user_id).await?;
            print_tags(&tags, "No tags assigned.");
        }
        TagsCommand::Assign { user_id, tag_ids } => {
            let current = personal_tags(ctx, user_id).await?;
            let assignment = TagAssignment::diff(&current, tag_ids);
            apply_assignment(ctx, user_id, &assignment).await?;
            println!(
                "Updated tags of {user_id}: {} added, {} removed.",
                assignment.add.len(),
                assignment.remove.len()
            );
        }
    }
    Ok(())
}

async fn all_tags(ctx: &ServiceContext) -> Result<Vec<Tag>, String> {
    ctx.backend.list_tags().await.map_err(|e| format!("Failed to load tags: {e}"))
}

async fn personal_tags(ctx: &ServiceContext, user_id: &str) -> Result<Vec<Tag>, String> {
    ctx.backend
        .personal_tags(user_id)
        .await
        .map_err(|e| format!("Failed to load tags of {user_id}: {e}"))
}

/// Attaches, then detaches, stopping at the first failure.
async fn apply_assignment(
    ctx: &ServiceContext,
    user_id: &str,
    assignment: &TagAssignment,
) -> Result<(), String> {
    if assignment.is_empty() {
        tracing::debug!(%user_id, "tag assignment unchanged");
        return Ok(());
    }
    for tag_id in &assignment.add {
        ctx.backend
            .add_user_tag(tag_id, user_id)
            .await
            .map_err(|e| format!("Failed to add tag {tag_id}: {e}"))?;
    }
    for tag_id in &assignment.remove {
        ctx.backend
            .remove_user_tag(tag_id, user_id)
            .await
            .map_err(|e| format!("Failed to remove tag {tag_id}: {e}"))?;
    }
    Ok(())
}

fn print_tags(tags: &[Tag], empty: &str) {
    if tags.is_empty() {
        println!("{empty}");
        return;
    }
    let rows: Vec<Vec<String>> =
        tags.iter().map(|t| vec![t.id.clone(), t.name.clone(), t.colour.clone()]).collect();
    println!("{}", render_table(&["ID", "NAME", "COLOUR"], &rows));
}

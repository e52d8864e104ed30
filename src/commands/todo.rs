//! `school todo` command.

use crate::board::{BoardCommand, BoardDriver, DropEvent, Lane, TodoBoard};
use crate::cli::TodoCommand;
use crate::context::ServiceContext;
use crate::forms::require_text;

/// Execute a `todo` subcommand.
///
/// Loads the board once, applies the requested change through the board
/// driver, and prints the board as it stands afterwards. Remote failures of
/// the change itself are logged, not returned: the printed board reflects
/// the local state.
///
/// # Errors
///
/// Returns an error string if the board cannot be loaded, the task does not
/// exist, or the input is empty.
pub async fn run(ctx: &ServiceContext, command: &TodoCommand) -> Result<(), String> {
    let seed = ctx.backend.list_todos().await.map_err(|e| format!("Failed to load todos: {e}"))?;
    let mut driver =
        BoardDriver::new(TodoBoard::new(seed), ctx.backend.as_ref(), ctx.settings.timeout);

    if let Some(board_command) = to_board_command(driver.board(), command)? {
        driver.dispatch(board_command).await;
    }

    println!("{}", render_board(driver.board()));
    Ok(())
}

fn to_board_command(
    board: &TodoBoard,
    command: &TodoCommand,
) -> Result<Option<BoardCommand>, String> {
    let require_task = |id: &str| {
        board.get(id).map(|_| ()).ok_or_else(|| format!("No task with id {id}"))
    };

    match command {
        TodoCommand::List => Ok(None),
        TodoCommand::Add { text } => {
            let text = require_text("text", text).map_err(|e| e.to_string())?;
            Ok(Some(BoardCommand::Create { text }))
        }
        TodoCommand::Move { id, lane } => {
            require_task(id)?;
            Ok(Some(BoardCommand::Move(DropEvent { task_id: id.clone(), target_lane: *lane })))
        }
        TodoCommand::Delete { id } => {
            require_task(id)?;
            Ok(Some(BoardCommand::Delete { task_id: id.clone() }))
        }
    }
}

/// One section per lane, tasks in board order.
pub(crate) fn render_board(board: &TodoBoard) -> String {
    let mut out = Vec::new();
    for lane in Lane::ALL {
        let tasks: Vec<_> = board.lane_view(lane).collect();
        out.push(format!("{} ({})", lane.title(), tasks.len()));
        if tasks.is_empty() {
            out.push("  -".to_string());
        }
        for task in tasks {
            out.push(format!("  [{}] {}", task.id, task.text));
        }
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Task;
    use crate::config::Settings;
    use crate::ports::backend::testing::FakeBackend;

    fn board() -> TodoBoard {
        TodoBoard::new(vec![
            Task { id: "t1".into(), text: "Essay".into(), lane: Lane::NotStarted },
            Task { id: "t2".into(), text: "Slides".into(), lane: Lane::Done },
        ])
    }

    #[test]
    fn board_renders_every_lane() {
        let rendered = render_board(&board());
        let expected = format!(
            "{} (1)\n  [t1] Essay\n{} (0)\n  -\n{} (1)\n  [t2] Slides",
            Lane::NotStarted.title(),
            Lane::InProgress.title(),
            Lane::Done.title()
        );
        assert_eq!(rendered, expected);
    }

    #[test]
    fn unknown_task_is_rejected_before_dispatch() {
        let err = to_board_command(&board(), &TodoCommand::Delete { id: "t9".into() }).unwrap_err();
        assert_eq!(err, "No task with id t9");
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = to_board_command(&board(), &TodoCommand::Add { text: "  ".into() }).unwrap_err();
        assert_eq!(err, "text must not be empty");
    }

    #[tokio::test]
    async fn move_issues_lane_update() {
        let fake = FakeBackend::default();
        fake.todos.lock().unwrap().extend(board().tasks().iter().cloned());
        let calls = std::sync::Arc::clone(&fake.calls);
        let ctx = ServiceContext::with_backend(Box::new(fake), Settings::default());

        run(&ctx, &TodoCommand::Move { id: "t1".into(), lane: Lane::InProgress }).await.unwrap();

        assert_eq!(*calls.lock().unwrap(), ["list_todos", "update_todo_lane t1 IN_PROGRESS"]);
    }
}

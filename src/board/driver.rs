//! Serialized execution of board commands against the backend.

use std::collections::VecDeque;
use std::time::Duration;

use tokio::time::timeout;

use super::engine::{BoardCommand, Mutation, MutationOutcome, TodoBoard};
use crate::ports::backend::{BackendError, SchoolBackend};

/// Runs queued [`BoardCommand`]s one at a time.
///
/// Each command is applied to the board once, its remote mutation is awaited
/// under `timeout`, and the outcome is settled before the next command
/// starts. This keeps at most one mutation in flight per board.
pub struct BoardDriver<'a> {
    board: TodoBoard,
    backend: &'a dyn SchoolBackend,
    timeout: Duration,
    queue: VecDeque<BoardCommand>,
}

impl<'a> BoardDriver<'a> {
    /// Creates a driver owning `board`.
    #[must_use]
    pub fn new(board: TodoBoard, backend: &'a dyn SchoolBackend, timeout: Duration) -> Self {
        Self { board, backend, timeout, queue: VecDeque::new() }
    }

    /// The current board state.
    #[must_use]
    pub fn board(&self) -> &TodoBoard {
        &self.board
    }

    /// Gives the board back.
    #[must_use]
    pub fn into_board(self) -> TodoBoard {
        self.board
    }

    /// Queues a command for the next [`run_pending`](Self::run_pending).
    pub fn submit(&mut self, command: BoardCommand) {
        self.queue.push_back(command);
    }

    /// Number of commands waiting to run.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Processes every queued command in submission order.
    ///
    /// Returns how many remote mutations were issued.
    pub async fn run_pending(&mut self) -> usize {
        let mut issued = 0;
        while let Some(command) = self.queue.pop_front() {
            if let Some(mutation) = self.board.apply(command) {
                issued += 1;
                let outcome = self.execute(&mutation).await;
                self.board.settle(outcome);
            }
        }
        issued
    }

    /// Submits one command and runs the queue.
    pub async fn dispatch(&mut self, command: BoardCommand) -> usize {
        self.submit(command);
        self.run_pending().await
    }

    async fn execute(&self, mutation: &Mutation) -> MutationOutcome {
        tracing::debug!(?mutation, "issuing todo mutation");
        let backend = self.backend;
        let result = match mutation {
            Mutation::Create { text, lane } => {
                timeout(self.timeout, backend.create_todo(text, *lane))
                    .await
                    .map(|r| r.map(MutationOutcome::Created))
            }
            Mutation::UpdateLane { task_id, lane } => {
                timeout(self.timeout, backend.update_todo_lane(task_id, *lane))
                    .await
                    .map(|r| r.map(|()| MutationOutcome::Applied))
            }
            Mutation::Delete { task_id } => timeout(self.timeout, backend.delete_todo(task_id))
                .await
                .map(|r| r.map(|()| MutationOutcome::Applied)),
        };

        // The HTTP client's own timeout counts the same as ours.
        match result {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(BackendError::TimedOut(_))) | Err(_) => MutationOutcome::TimedOut,
            Ok(Err(err)) => MutationOutcome::Failed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::board::engine::DropEvent;
    use crate::board::lane::{Lane, Task};
    use crate::ports::backend::testing::FakeBackend;

    fn task(id: &str, lane: Lane) -> Task {
        Task { id: id.into(), text: format!("task {id}"), lane }
    }

    fn move_to(task_id: &str, target_lane: Lane) -> BoardCommand {
        BoardCommand::Move(DropEvent { task_id: task_id.into(), target_lane })
    }

    #[tokio::test]
    async fn create_reconciles_server_identity() {
        let backend = FakeBackend::default();
        backend.created_ids.lock().unwrap().push_back("srv-1".into());

        let mut driver = BoardDriver::new(TodoBoard::default(), &backend, Duration::from_secs(1));
        let issued = driver.dispatch(BoardCommand::Create { text: "buy milk".into() }).await;

        assert_eq!(issued, 1);
        let board = driver.into_board();
        let expected = Task { id: "srv-1".into(), text: "buy milk".into(), lane: Lane::NotStarted };
        assert_eq!(board.tasks(), &[expected]);
        assert_eq!(board.pending(), None);
        assert_eq!(
            *backend.calls.lock().unwrap(),
            vec!["create_todo buy milk NOT_STARTED".to_string()]
        );
    }

    #[tokio::test]
    async fn queued_commands_run_in_order_and_skip_no_ops() {
        let backend = FakeBackend::default();
        backend.created_ids.lock().unwrap().push_back("srv-9".into());
        let board = TodoBoard::new(vec![task("a", Lane::NotStarted), task("b", Lane::Done)]);

        let mut driver = BoardDriver::new(board, &backend, Duration::from_secs(1));
        driver.submit(move_to("a", Lane::NotStarted));
        driver.submit(BoardCommand::Create { text: "new".into() });
        driver.submit(move_to("srv-9", Lane::Done));
        driver.submit(BoardCommand::Delete { task_id: "b".into() });
        assert_eq!(driver.queued(), 4);

        let issued = driver.run_pending().await;

        assert_eq!(issued, 3);
        assert_eq!(
            *backend.calls.lock().unwrap(),
            vec![
                "create_todo new NOT_STARTED".to_string(),
                "update_todo_lane srv-9 DONE".to_string(),
                "delete_todo b".to_string(),
            ]
        );
        let ids: Vec<&str> = driver.board().tasks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "srv-9"]);
    }

    #[tokio::test]
    async fn remote_failures_are_swallowed() {
        let backend = FakeBackend {
            fail_with: Mutex::new(Some(BackendError::Status {
                status: 500,
                message: "database unavailable".into(),
            })),
            ..FakeBackend::default()
        };
        let board = TodoBoard::new(vec![task("a", Lane::NotStarted)]);
        let mut driver = BoardDriver::new(board, &backend, Duration::from_secs(1));

        driver.dispatch(move_to("a", Lane::Done)).await;

        assert_eq!(driver.board().get("a").unwrap().lane, Lane::Done);
        assert_eq!(driver.board().pending(), None);
    }

    #[tokio::test]
    async fn hung_create_times_out_and_rolls_back() {
        let backend = FakeBackend { hang: true, ..FakeBackend::default() };
        let board = TodoBoard::new(vec![task("a", Lane::Done)]);
        let mut driver = BoardDriver::new(board.clone(), &backend, Duration::from_millis(20));

        driver.dispatch(BoardCommand::Create { text: "stuck".into() }).await;

        assert_eq!(driver.into_board(), board);
    }

    #[tokio::test]
    async fn client_side_timeout_rolls_back_create() {
        let backend = FakeBackend {
            fail_with: Mutex::new(Some(BackendError::TimedOut(Duration::from_secs(10)))),
            ..FakeBackend::default()
        };
        let board = TodoBoard::new(vec![task("a", Lane::InProgress)]);
        let mut driver = BoardDriver::new(board.clone(), &backend, Duration::from_secs(1));

        driver.dispatch(BoardCommand::Create { text: "slow".into() }).await;

        assert_eq!(driver.board().pending(), None);
        assert_eq!(driver.into_board(), board);
    }
}

//! The in-memory to-do board.
//!
//! A [`TodoBoard`] owns one ordered sequence of [`Task`]s. Lanes are filters
//! over that sequence, so a task is always in exactly one lane. User actions
//! arrive as [`BoardCommand`] values; [`TodoBoard::apply`] performs the local
//! change and returns the remote [`Mutation`] to issue, and
//! [`TodoBoard::settle`] folds the remote outcome back in.

use super::lane::{Lane, Task};

/// A drop of a dragged card onto a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropEvent {
    /// Identity of the dragged task.
    pub task_id: String,
    /// Lane the card was dropped on.
    pub target_lane: Lane,
}

/// A user action on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCommand {
    /// Append a new task to Not Started.
    Create {
        /// Task text. Callers reject empty text before building the command.
        text: String,
    },
    /// Move a task to another lane.
    Move(DropEvent),
    /// Remove a task.
    Delete {
        /// Identity of the task to remove.
        task_id: String,
    },
}

/// Which remote operation is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Create task.
    Create,
    /// Update task lane.
    UpdateLane,
    /// Delete task.
    Delete,
}

impl MutationKind {
    fn label(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::UpdateLane => "update_lane",
            Self::Delete => "delete",
        }
    }
}

/// A remote operation the board wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Persist a new task; the backend answers with its identity.
    Create {
        /// Task text.
        text: String,
        /// Initial lane.
        lane: Lane,
    },
    /// Persist a lane change.
    UpdateLane {
        /// Task identity.
        task_id: String,
        /// New lane.
        lane: Lane,
    },
    /// Remove a task remotely.
    Delete {
        /// Task identity.
        task_id: String,
    },
}

impl Mutation {
    /// The kind of this mutation.
    #[must_use]
    pub fn kind(&self) -> MutationKind {
        match self {
            Self::Create { .. } => MutationKind::Create,
            Self::UpdateLane { .. } => MutationKind::UpdateLane,
            Self::Delete { .. } => MutationKind::Delete,
        }
    }
}

/// Result of a remote mutation as seen by the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend created the task with this identity.
    Created(String),
    /// The backend accepted an update or delete.
    Applied,
    /// The backend or the network reported an error.
    Failed(String),
    /// No answer arrived in time.
    TimedOut,
}

/// The outstanding mutation and the sequence position it concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending {
    /// Index into the task sequence at the time the mutation was issued.
    pub index: usize,
    /// Which operation is outstanding.
    pub kind: MutationKind,
}

/// Ordered task sequence plus the pending-operation marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoBoard {
    tasks: Vec<Task>,
    pending: Option<Pending>,
}

impl TodoBoard {
    /// Seeds a board with the tasks fetched at load time.
    #[must_use]
    pub fn new(tasks: Vec<Task>) -> Self {
        Self { tasks, pending: None }
    }

    /// The full sequence in order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// The outstanding mutation, if any.
    #[must_use]
    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Looks a task up by identity.
    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Tasks currently in `lane`, in sequence order.
    pub fn lane_view(&self, lane: Lane) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| t.lane == lane)
    }

    /// Applies a command locally and returns the remote mutation it requires.
    ///
    /// Returns `None` when the command is a no-op (drop onto the task's own
    /// lane, unknown identity) or when the task has no server identity yet.
    pub fn apply(&mut self, command: BoardCommand) -> Option<Mutation> {
        if let Some(pending) = self.pending {
            tracing::warn!(
                kind = pending.kind.label(),
                index = pending.index,
                "applying a command while a mutation is still pending"
            );
        }

        match command {
            BoardCommand::Create { text } => {
                self.tasks.push(Task::placeholder(text.clone()));
                let index = self.tasks.len() - 1;
                self.pending = Some(Pending { index, kind: MutationKind::Create });
                Some(Mutation::Create { text, lane: Lane::NotStarted })
            }
            BoardCommand::Move(DropEvent { task_id, target_lane }) => {
                let Some(index) = self.position(&task_id) else {
                    tracing::debug!(%task_id, "drop for unknown task ignored");
                    return None;
                };
                let task = &mut self.tasks[index];
                if task.lane == target_lane {
                    return None;
                }
                task.lane = target_lane;
                if task.is_placeholder() {
                    tracing::debug!(index, "moved unsaved task locally only");
                    return None;
                }
                self.pending = Some(Pending { index, kind: MutationKind::UpdateLane });
                Some(Mutation::UpdateLane { task_id, lane: target_lane })
            }
            BoardCommand::Delete { task_id } => {
                let Some(index) = self.position(&task_id) else {
                    tracing::debug!(%task_id, "delete for unknown task ignored");
                    return None;
                };
                let removed = self.tasks.remove(index);
                if removed.is_placeholder() {
                    tracing::debug!(index, "dropped unsaved task locally only");
                    return None;
                }
                self.pending = Some(Pending { index, kind: MutationKind::Delete });
                Some(Mutation::Delete { task_id })
            }
        }
    }

    /// Folds the outcome of the pending mutation back into the board.
    ///
    /// Failures are logged and otherwise swallowed: local changes stay as
    /// they are. A timed-out create removes its placeholder task.
    pub fn settle(&mut self, outcome: MutationOutcome) {
        let Some(Pending { index, kind }) = self.pending.take() else {
            tracing::debug!(?outcome, "outcome arrived with nothing pending");
            return;
        };

        match (kind, outcome) {
            (MutationKind::Create, MutationOutcome::Created(id)) => {
                match self.tasks.get_mut(index).filter(|t| t.is_placeholder()) {
                    Some(task) => {
                        tracing::debug!(index, %id, "task persisted");
                        task.id = id;
                    }
                    None => tracing::warn!(index, %id, "created task no longer at its position"),
                }
            }
            (MutationKind::Create, MutationOutcome::TimedOut) => {
                if self.tasks.get(index).is_some_and(Task::is_placeholder) {
                    self.tasks.remove(index);
                }
                tracing::warn!(index, "create timed out; unsaved task removed");
            }
            (_, MutationOutcome::Failed(error)) => {
                tracing::warn!(kind = kind.label(), index, %error, "todo mutation failed");
            }
            (_, MutationOutcome::TimedOut) => {
                tracing::warn!(kind = kind.label(), index, "todo mutation timed out");
            }
            (MutationKind::UpdateLane | MutationKind::Delete, MutationOutcome::Applied) => {}
            (kind, outcome) => {
                tracing::warn!(kind = kind.label(), ?outcome, "outcome does not match mutation");
            }
        }
    }

    fn position(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == task_id)
    }
}

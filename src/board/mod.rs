//! Kanban-style to-do board with optimistic local updates.

pub mod driver;
pub mod engine;
pub mod lane;

pub use driver::BoardDriver;
pub use engine::{
    BoardCommand, DropEvent, Mutation, MutationKind, MutationOutcome, Pending, TodoBoard,
};
pub use lane::{Lane, Task, PLACEHOLDER_ID};

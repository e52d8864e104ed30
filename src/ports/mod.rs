//! Port traits defining external boundaries.
//!
//! The school backend is the only external system the client talks to.
//! Implementations live in `src/adapters/`.

pub mod backend;

pub use backend::{BackendError, BackendFuture, SchoolBackend};

//! Cassette format for recording and replaying backend traffic.

pub mod format;
pub mod recorder;
pub mod replayer;
pub mod session;

/// Port name under which backend interactions are stored.
pub const BACKEND_PORT: &str = "backend";

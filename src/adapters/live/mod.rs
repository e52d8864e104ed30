//! Live adapters for real external interactions.

pub mod backend;

pub use backend::LiveSchoolBackend;

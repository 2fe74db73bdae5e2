//! Network services (feature-gated).
//!
//! The timing core never depends on these; they only observe it. Currently
//! one service exists: the HTTP status endpoint (`web` feature).

pub mod status;

pub use status::{serve_status, StatusCell, StatusProvider};

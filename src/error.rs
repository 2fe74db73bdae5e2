//! Crate error type.
//!
//! The timing core degrades rather than fails: no fix yet is a state, not
//! an error, so very few operations return `Result` at all.

use thiserror::Error;

/// Errors surfaced by the time source.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// A live instance is already wired to the interrupt entry points.
    ///
    /// Interrupt dispatch goes through process-wide state that is set once
    /// and never reassigned; one instance per process is a hard precondition
    /// of PPS operation.
    #[error("interrupt dispatch already wired to a live instance")]
    InterruptsAlreadyEnabled,
}

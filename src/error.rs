//! Startup error taxonomy.

use std::io;
use thiserror::Error;

/// Failures that abort the process before the dispatch loop starts.
///
/// Every variant maps to exit code 1. Conditions that occur once the loop is
/// running (would-block sentinels, peer closes, receive faults) are not
/// errors at this level and are handled inside the loop.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Blocking the signal set or creating the signalfd failed.
    #[error("signal interception failed")]
    Signals(#[source] io::Error),

    /// Socket creation, bind, or listen failed.
    #[error("listener setup failed")]
    Listener(#[source] io::Error),

    /// Creating the epoll instance failed.
    #[error("reactor creation failed")]
    Reactor(#[source] io::Error),
}

//! Single-client TCP server built on a minimal epoll reactor.
//!
//! This crate provides a single-threaded server that multiplexes OS signals,
//! a listening socket, and at most one live client connection over a single
//! epoll instance. Each readiness source is drained without blocking, and the
//! loop runs until a termination signal is observed.
//!
//! # Architecture
//!
//! - **Server**: Owns every component and runs the event dispatch loop
//! - **Reactor**: epoll wrapper exposing register / deregister / wait
//! - **SignalChannel**: signalfd-backed pollable stream of signal events
//! - **Listener**: Bound non-blocking TCP listener
//! - **Connection**: Non-blocking client socket, at most one at a time
//! - **Fd**: Move-only owning descriptor wrapper, released on drop

pub mod error;
pub mod handle;
pub mod net;
pub mod reactor;
pub mod server;
pub mod signal;

pub use error::StartupError;
pub use server::{DEFAULT_PORT, Server, resolve_port};

//! Readiness polling over epoll.
//!
//! This module provides the readiness-polling core of the server:
//! - [`core`]: The [`Reactor`](core::Reactor) wrapping one epoll instance
//! - [`event`]: epoll event wrappers and descriptor helpers

pub mod core;
pub mod event;

//! Event dispatch loop tying the reactor, signals, and sockets together.

use crate::error::StartupError;
use crate::net::connection::Connection;
use crate::net::listener::Listener;
use crate::reactor::core::Reactor;
use crate::reactor::event::Event;
use crate::signal::SignalChannel;

use libc::{SIGHUP, SIGTERM};
use std::io;
use tracing::{debug, info, warn};

/// Port used when no valid port argument is supplied.
pub const DEFAULT_PORT: u16 = 12345;

/// Size of the per-wait readiness buffer.
const WAIT_EVENTS: usize = 64;

/// Size of the receive buffer for one `recv` call.
const RECV_BUF_BYTES: usize = 4096;

/// Resolves an optional port argument.
///
/// A value that is absent, unparseable, or zero falls back to
/// [`DEFAULT_PORT`] instead of aborting.
pub fn resolve_port(arg: Option<&str>) -> u16 {
    arg.and_then(|raw| raw.parse::<u16>().ok())
        .filter(|&port| port > 0)
        .unwrap_or(DEFAULT_PORT)
}

/// Single-threaded server multiplexing signals, the listener, and at most
/// one client connection over one [`Reactor`].
///
/// The admission policy is strict: while a client occupies the slot, every
/// further accepted connection is closed immediately without registration.
/// Once the slot empties (orderly close or receive fault), the next
/// connection attempt is admitted again.
pub struct Server {
    signals: SignalChannel,
    listener: Listener,
    reactor: Reactor,
    client: Option<Connection>,
    port: u16,
}

impl Server {
    /// Builds the signal channel, listener, and reactor, in that order.
    /// Signals must be intercepted before anything else runs; a signal
    /// arriving earlier would still hit its default disposition.
    ///
    /// Each failure is mapped to its [`StartupError`] variant; the caller
    /// exits non-zero without entering the loop.
    pub fn bind(port: u16) -> Result<Self, StartupError> {
        let signals = SignalChannel::new(&[SIGHUP, SIGTERM]).map_err(StartupError::Signals)?;
        let listener = Listener::bind(port).map_err(StartupError::Listener)?;
        let port = listener
            .local_addr()
            .map(|address| address.port())
            .unwrap_or(port);
        let reactor = Reactor::new().map_err(StartupError::Reactor)?;

        Ok(Self {
            signals,
            listener,
            reactor,
            client: None,
            port,
        })
    }

    /// The port the listener is actually bound to.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Runs the dispatch loop until a termination signal is observed.
    ///
    /// Registers the signal and listener descriptors, then blocks on the
    /// reactor with no timeout. Every ready descriptor is drained fully
    /// before the next wait; readiness is level-triggered, so a partial
    /// drain would only repeat the event, never lose it. A batch that
    /// requests termination is still dispatched to the end; the outer
    /// loop condition governs continuation.
    pub fn run(&mut self) -> io::Result<()> {
        self.reactor.register(self.signals.raw())?;
        self.reactor.register(self.listener.raw())?;

        info!(port = self.port, "listening");

        let mut events = [Event::EMPTY; WAIT_EVENTS];
        let mut stop = false;

        while !stop {
            let ready = self.reactor.wait(&mut events, None)?;

            for event in &events[..ready] {
                let fd = event.fd();

                if fd == self.signals.raw() {
                    stop |= self.signals.drain();
                } else if fd == self.listener.raw() {
                    self.accept_pending()?;
                } else if self.client.as_ref().is_some_and(|client| client.raw() == fd) {
                    self.drain_client();
                }
            }
        }

        info!("server stopped");

        Ok(())
    }

    /// Accepts queued connections until the no-pending sentinel.
    ///
    /// An accept error also stops the drain; the listener stays registered
    /// and the next readiness report retries naturally.
    fn accept_pending(&mut self) -> io::Result<()> {
        loop {
            let accepted = match self.listener.accept_one() {
                Ok(Some(fd)) => fd,
                Ok(None) => break,
                Err(error) => {
                    debug!(%error, "accept failed");
                    break;
                }
            };

            info!("new connection");

            if self.client.is_none() {
                let connection = Connection::new(accepted);
                self.reactor.register(connection.raw())?;
                info!("connection is now the active client");
                self.client = Some(connection);
            } else {
                info!("already serving a client, closing new connection");
                // `accepted` drops here and the socket closes unregistered.
            }
        }

        Ok(())
    }

    /// Reads from the active client until the would-block sentinel.
    ///
    /// Payload bytes are counted, never interpreted. An orderly close or a
    /// hard receive fault both release the client: deregister first, then
    /// close by dropping, freeing the slot for the next connection.
    fn drain_client(&mut self) {
        let mut buf = [0u8; RECV_BUF_BYTES];

        loop {
            let Some(client) = &self.client else { break };
            let result = client.recv_some(&mut buf);

            match result {
                Ok(0) => {
                    info!("client closed connection");
                    self.release_client();
                    break;
                }
                Ok(count) => info!(count, "received bytes"),
                Err(error) if error.kind() == io::ErrorKind::WouldBlock => break,
                Err(error) => {
                    warn!(%error, "client recv error");
                    self.release_client();
                    break;
                }
            }
        }
    }

    fn release_client(&mut self) {
        if let Some(client) = self.client.take() {
            self.reactor.deregister(client.raw());
        }
    }
}

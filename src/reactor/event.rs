use libc::{F_GETFL, F_SETFL, O_NONBLOCK, epoll_event, fcntl};
use std::os::unix::io::RawFd;

/// A single readiness report returned by [`Reactor::wait`].
///
/// Wraps the kernel's `epoll_event` so callers never touch the raw union
/// payload. The identifier stored at registration time is the descriptor
/// itself.
///
/// [`Reactor::wait`]: crate::reactor::core::Reactor::wait
#[repr(transparent)]
pub struct Event(pub(crate) epoll_event);

impl Event {
    /// Zeroed event, used to initialize wait buffers.
    pub const EMPTY: Self = Self(epoll_event { events: 0, u64: 0 });

    /// The descriptor this readiness report refers to.
    pub fn fd(&self) -> RawFd {
        // Direct field copy: epoll_event is packed on some targets, so no
        // reference to the field may be taken.
        let ident = self.0.u64;
        ident as RawFd
    }
}

/// Switches a descriptor to non-blocking mode. Failures are ignored.
pub(crate) fn set_nonblocking(fd: RawFd) {
    let flags = unsafe { fcntl(fd, F_GETFL) };

    unsafe {
        fcntl(fd, F_SETFL, flags | O_NONBLOCK);
    }
}

pub(crate) fn errno() -> i32 {
    unsafe { *libc::__errno_location() }
}

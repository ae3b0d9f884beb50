use crate::handle::Fd;
use crate::reactor::event::{Event, errno};

use libc::{
    EINTR, EPOLL_CLOEXEC, EPOLL_CTL_ADD, EPOLL_CTL_DEL, EPOLLIN, epoll_create1, epoll_ctl,
    epoll_event, epoll_wait,
};
use std::io;
use std::os::unix::io::RawFd;
use std::ptr;
use std::time::Duration;

/// Readiness-polling core wrapping one epoll instance.
///
/// The reactor tracks descriptors for read readiness only and never owns
/// them: registering a descriptor stores a back-reference inside the kernel,
/// and the caller remains responsible for deregistering it before the
/// descriptor is closed.
///
/// Readiness is level-triggered: a descriptor with unread data is reported
/// on every [`wait`](Self::wait) until the caller drains it.
pub struct Reactor {
    epoll: Fd,
}

impl Reactor {
    /// Creates a new epoll instance.
    pub fn new() -> io::Result<Self> {
        let raw = unsafe { epoll_create1(EPOLL_CLOEXEC) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { epoll: Fd::new(raw) })
    }

    /// Starts tracking a descriptor for read readiness.
    ///
    /// The descriptor must refer to a live resource. Failure here is not
    /// expected in normal operation; callers treat it as fatal.
    pub fn register(&self, fd: RawFd) -> io::Result<()> {
        let mut event = epoll_event {
            events: EPOLLIN as u32,
            u64: fd as u64,
        };

        let ret = unsafe { epoll_ctl(self.epoll.raw(), EPOLL_CTL_ADD, fd, &mut event) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(())
    }

    /// Stops tracking a descriptor.
    ///
    /// Safe to call for a descriptor that was never registered or was
    /// already removed; the kernel's ENOENT is ignored.
    pub fn deregister(&self, fd: RawFd) {
        unsafe {
            epoll_ctl(self.epoll.raw(), EPOLL_CTL_DEL, fd, ptr::null_mut());
        }
    }

    /// Blocks until at least one tracked descriptor is ready for reading.
    ///
    /// Fills `events` with the ready set and returns how many entries are
    /// valid. A timeout of `None` blocks indefinitely. An interrupted wait
    /// returns `Ok(0)`; callers must tolerate an empty result and wait
    /// again. Ordering within one result is unspecified.
    pub fn wait(&self, events: &mut [Event], timeout: Option<Duration>) -> io::Result<usize> {
        let timeout_ms = match timeout {
            Some(duration) => duration.as_millis().min(i32::MAX as u128) as i32,
            None => -1,
        };

        let ret = unsafe {
            epoll_wait(
                self.epoll.raw(),
                events.as_mut_ptr() as *mut epoll_event,
                events.len() as i32,
                timeout_ms,
            )
        };

        if ret < 0 {
            if errno() == EINTR {
                return Ok(0);
            }
            return Err(io::Error::last_os_error());
        }

        Ok(ret as usize)
    }
}

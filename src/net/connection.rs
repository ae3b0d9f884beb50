//! Non-blocking client connection.

use crate::handle::Fd;
use crate::reactor::event::set_nonblocking;

use libc::{c_void, recv};
use std::io;
use std::os::unix::io::RawFd;

/// A single accepted client socket.
///
/// At most one `Connection` exists at a time; the server holds it in an
/// `Option` slot and this type never appears in a collection. Dropping the
/// connection closes the socket through the owned [`Fd`].
pub struct Connection {
    fd: Fd,
}

impl Connection {
    /// Wraps an accepted descriptor and marks it non-blocking.
    pub fn new(fd: Fd) -> Self {
        set_nonblocking(fd.raw());

        Self { fd }
    }

    /// The underlying descriptor, for reactor registration and dispatch.
    pub fn raw(&self) -> RawFd {
        self.fd.raw()
    }

    /// Reads the next available bytes without blocking.
    ///
    /// One call performs one `recv`. `Ok(n)` with `n > 0` means data
    /// arrived and more may still be buffered, so callers keep draining.
    /// `Ok(0)` means the peer performed an orderly close. An error of kind
    /// [`WouldBlock`](io::ErrorKind::WouldBlock) is the drain sentinel; any
    /// other error is a hard receive fault.
    pub fn recv_some(&self, buf: &mut [u8]) -> io::Result<usize> {
        let res = unsafe { recv(self.fd.raw(), buf.as_mut_ptr() as *mut c_void, buf.len(), 0) };
        if res < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(res as usize)
    }
}

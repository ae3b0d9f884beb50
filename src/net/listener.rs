//! Non-blocking TCP listener.

use crate::handle::Fd;
use crate::reactor::event::{errno, set_nonblocking};

use libc::{
    AF_INET, EAGAIN, EWOULDBLOCK, INADDR_ANY, SO_REUSEADDR, SOCK_STREAM, SOL_SOCKET, SOMAXCONN,
    accept, bind, c_int, c_void, getsockname, listen, sa_family_t, setsockopt, sockaddr,
    sockaddr_in, socket, socklen_t,
};
use std::io;
use std::mem;
use std::net::SocketAddr;
use std::os::unix::io::RawFd;
use std::ptr;

/// A bound, listening, non-blocking TCP socket.
///
/// Binding performs socket creation, address reuse, bind to the wildcard
/// address, listen, and the switch to non-blocking mode in one step; if any
/// of those fails the partially constructed socket is closed and startup
/// aborts.
pub struct Listener {
    fd: Fd,
}

impl Listener {
    /// Binds a listener to the given port on the wildcard address.
    ///
    /// Port 0 asks the kernel for a free port; [`local_addr`](Self::local_addr)
    /// reports the one that was assigned.
    pub fn bind(port: u16) -> io::Result<Self> {
        let raw = unsafe { socket(AF_INET, SOCK_STREAM, 0) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }

        // Owned from here on: every early return below closes the socket.
        let fd = Fd::new(raw);

        let opt: c_int = 1;
        let ret = unsafe {
            setsockopt(
                fd.raw(),
                SOL_SOCKET,
                SO_REUSEADDR,
                &opt as *const _ as *const c_void,
                mem::size_of::<c_int>() as socklen_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        let mut address: sockaddr_in = unsafe { mem::zeroed() };
        address.sin_family = AF_INET as sa_family_t;
        address.sin_addr.s_addr = INADDR_ANY.to_be();
        address.sin_port = port.to_be();

        let ret = unsafe {
            bind(
                fd.raw(),
                &address as *const _ as *const sockaddr,
                mem::size_of::<sockaddr_in>() as socklen_t,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        let ret = unsafe { listen(fd.raw(), SOMAXCONN) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        set_nonblocking(fd.raw());

        Ok(Self { fd })
    }

    /// The underlying descriptor, for reactor registration and dispatch.
    pub fn raw(&self) -> RawFd {
        self.fd.raw()
    }

    /// Accepts the next pending connection, if one is queued.
    ///
    /// Returns `Ok(None)` when no connection is pending; that is the drain
    /// sentinel, not an error. The accepted descriptor is returned owned, so
    /// dropping it without further handling closes the connection.
    pub fn accept_one(&self) -> io::Result<Option<Fd>> {
        let raw = unsafe { accept(self.fd.raw(), ptr::null_mut(), ptr::null_mut()) };
        if raw >= 0 {
            return Ok(Some(Fd::new(raw)));
        }

        let err = errno();
        if err == EAGAIN || err == EWOULDBLOCK {
            return Ok(None);
        }

        Err(io::Error::last_os_error())
    }

    /// Returns the local address this listener is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        let mut address: sockaddr_in = unsafe { mem::zeroed() };
        let mut length = mem::size_of::<sockaddr_in>() as socklen_t;

        let ret = unsafe {
            getsockname(
                self.fd.raw(),
                &mut address as *mut _ as *mut sockaddr,
                &mut length,
            )
        };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        let octets = u32::from_be(address.sin_addr.s_addr).to_be_bytes();
        let port = u16::from_be(address.sin_port);

        Ok(SocketAddr::from((octets, port)))
    }
}

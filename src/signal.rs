//! Signal interception as a pollable descriptor.

use crate::handle::Fd;

use libc::{
    SFD_CLOEXEC, SFD_NONBLOCK, SIG_BLOCK, SIGHUP, SIGTERM, c_int, c_void, read, sigaddset,
    sigemptyset, signalfd, signalfd_siginfo, sigprocmask, sigset_t,
};
use std::io;
use std::mem;
use std::os::unix::io::RawFd;
use std::ptr;
use tracing::info;

/// Converts asynchronous process signals into a readable stream of events.
///
/// Construction blocks the watched signals for the calling thread *before*
/// creating the signalfd, so none of them can reach its default disposition
/// once the channel exists. The descriptor becomes readable whenever a
/// watched signal is pending and is registered with the reactor like any
/// other descriptor.
pub struct SignalChannel {
    fd: Fd,
}

impl SignalChannel {
    /// Intercepts the given signal numbers and opens the signal descriptor.
    pub fn new(signals: &[c_int]) -> io::Result<Self> {
        let mut mask: sigset_t = unsafe { mem::zeroed() };
        unsafe {
            sigemptyset(&mut mask);
        }
        for &signal in signals {
            unsafe {
                sigaddset(&mut mask, signal);
            }
        }

        let ret = unsafe { sigprocmask(SIG_BLOCK, &mask, ptr::null_mut()) };
        if ret < 0 {
            return Err(io::Error::last_os_error());
        }

        let raw = unsafe { signalfd(-1, &mask, SFD_CLOEXEC | SFD_NONBLOCK) };
        if raw < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Self { fd: Fd::new(raw) })
    }

    /// The underlying descriptor, for reactor registration and dispatch.
    pub fn raw(&self) -> RawFd {
        self.fd.raw()
    }

    /// Consumes every pending signal event and reports whether termination
    /// was requested.
    ///
    /// Reads siginfo records until the descriptor would block. Readiness is
    /// level-triggered and reported once per wait, so the queue must be
    /// fully exhausted here; queued signals would otherwise be starved.
    /// SIGHUP is a reload notification, SIGTERM requests shutdown, and any
    /// other intercepted signal is logged by number.
    pub fn drain(&self) -> bool {
        let mut stop = false;
        let mut info: signalfd_siginfo = unsafe { mem::zeroed() };
        let record = mem::size_of::<signalfd_siginfo>();

        loop {
            let res = unsafe { read(self.fd.raw(), &mut info as *mut _ as *mut c_void, record) };
            if res != record as isize {
                break;
            }

            match info.ssi_signo as c_int {
                SIGHUP => info!("received SIGHUP"),
                SIGTERM => {
                    info!("received SIGTERM, shutting down");
                    stop = true;
                }
                other => info!(signal = other, "received signal"),
            }
        }

        stop
    }
}

use std::time::Duration;
use turnstile::handle::Fd;
use turnstile::reactor::core::Reactor;
use turnstile::reactor::event::Event;

fn pipe_pair() -> (Fd, Fd) {
    let mut fds = [0i32; 2];
    let res = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(res, 0, "pipe() failed");
    (Fd::new(fds[0]), Fd::new(fds[1]))
}

fn write_byte(fd: &Fd) {
    let buf = [1u8; 1];
    let wrote = unsafe { libc::write(fd.raw(), buf.as_ptr() as *const _, 1) };
    assert_eq!(wrote, 1);
}

fn read_byte(fd: &Fd) {
    let mut buf = [0u8; 1];
    let got = unsafe { libc::read(fd.raw(), buf.as_mut_ptr() as *mut _, 1) };
    assert_eq!(got, 1);
}

#[test]
fn wait_reports_readable_descriptor() {
    let reactor = Reactor::new().expect("reactor");
    let (rfd, wfd) = pipe_pair();
    reactor.register(rfd.raw()).expect("register");

    let mut events = [Event::EMPTY; 8];

    // Nothing written yet: a short wait must come back empty.
    let ready = reactor
        .wait(&mut events, Some(Duration::from_millis(50)))
        .expect("wait");
    assert_eq!(ready, 0);

    write_byte(&wfd);

    let ready = reactor
        .wait(&mut events, Some(Duration::from_secs(1)))
        .expect("wait");
    assert_eq!(ready, 1);
    assert_eq!(events[0].fd(), rfd.raw());
}

#[test]
fn readiness_repeats_until_drained() {
    let reactor = Reactor::new().expect("reactor");
    let (rfd, wfd) = pipe_pair();
    reactor.register(rfd.raw()).expect("register");

    write_byte(&wfd);

    let mut events = [Event::EMPTY; 8];

    // Level-triggered: unread data keeps the descriptor ready.
    for _ in 0..2 {
        let ready = reactor
            .wait(&mut events, Some(Duration::from_secs(1)))
            .expect("wait");
        assert_eq!(ready, 1);
        assert_eq!(events[0].fd(), rfd.raw());
    }

    read_byte(&rfd);

    let ready = reactor
        .wait(&mut events, Some(Duration::from_millis(50)))
        .expect("wait");
    assert_eq!(ready, 0);
}

#[test]
fn deregister_stops_reports_and_is_idempotent() {
    let reactor = Reactor::new().expect("reactor");
    let (rfd, wfd) = pipe_pair();
    reactor.register(rfd.raw()).expect("register");

    write_byte(&wfd);
    reactor.deregister(rfd.raw());

    let mut events = [Event::EMPTY; 8];
    let ready = reactor
        .wait(&mut events, Some(Duration::from_millis(50)))
        .expect("wait");
    assert_eq!(ready, 0);

    // Removing an already-removed descriptor must be harmless.
    reactor.deregister(rfd.raw());
}

#[test]
fn register_reports_bad_descriptor() {
    let reactor = Reactor::new().expect("reactor");
    assert!(reactor.register(-1).is_err());
}

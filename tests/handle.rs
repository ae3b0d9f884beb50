use turnstile::handle::Fd;

fn pipe_pair() -> (i32, i32) {
    let mut fds = [0i32; 2];
    let res = unsafe { libc::pipe(fds.as_mut_ptr()) };
    assert_eq!(res, 0, "pipe() failed");
    (fds[0], fds[1])
}

fn descriptor_is_open(fd: i32) -> bool {
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

#[test]
fn drop_closes_descriptor() {
    let (rfd, wfd) = pipe_pair();

    {
        let owned = Fd::new(rfd);
        assert!(owned.is_valid());
        assert!(descriptor_is_open(rfd));
    }

    assert!(!descriptor_is_open(rfd));
    unsafe { libc::close(wfd) };
}

#[test]
fn reset_is_idempotent() {
    let (rfd, wfd) = pipe_pair();

    let mut owned = Fd::new(rfd);
    owned.reset();
    assert!(!owned.is_valid());
    assert!(!descriptor_is_open(rfd));

    // A second reset must not touch any descriptor.
    owned.reset();
    assert!(!owned.is_valid());

    unsafe { libc::close(wfd) };
}

#[test]
fn move_transfers_ownership() {
    let (rfd, wfd) = pipe_pair();

    let owned = Fd::new(rfd);
    let moved = owned;
    assert_eq!(moved.raw(), rfd);
    assert!(descriptor_is_open(rfd));

    drop(moved);
    assert!(!descriptor_is_open(rfd));
    unsafe { libc::close(wfd) };
}

#[test]
fn default_is_empty() {
    let empty = Fd::default();
    assert!(!empty.is_valid());
}

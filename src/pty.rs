//! Real PTY spawn and resize (spec.md §6/§8's external PTY spawn
//! mechanism), grounded in the same `libc` APIs wezterm's `pty` crate
//! uses for its Unix backend — `openpty`, a `setsid`/`TIOCSCTTY`
//! `pre_exec` hook, `TIOCSWINSZ` for resize — but built directly on
//! `libc` + `failure` rather than that crate's own
//! `filedescriptor`/`anyhow`/async stack, to match this crate's
//! dependency set.

use libc::winsize;
use std::io::{self, Read, Write};
use std::os::unix::io::{AsRawFd, FromRawFd, RawFd};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, Stdio};
use std::ptr;

use failure::Error;

/// A `Read + Write` handle onto a raw pty fd. Closes the fd when the
/// last clone is dropped.
pub struct PtyFd(RawFd);

impl PtyFd {
    fn cloexec(&self) -> Result<(), Error> {
        let flags = unsafe { libc::fcntl(self.0, libc::F_GETFD) };
        if flags == -1 {
            bail!("fcntl(F_GETFD) failed: {:?}", io::Error::last_os_error());
        }
        if unsafe { libc::fcntl(self.0, libc::F_SETFD, flags | libc::FD_CLOEXEC) } == -1 {
            bail!("fcntl(F_SETFD) failed: {:?}", io::Error::last_os_error());
        }
        Ok(())
    }

    /// A `dup()`'d handle onto the same underlying fd, for splitting
    /// the interpreter's reader from the dispatcher's/answerback's
    /// writer (spec.md §7: they run on different threads).
    pub fn try_clone(&self) -> Result<PtyFd, Error> {
        let fd = unsafe { libc::dup(self.0) };
        if fd == -1 {
            bail!("dup failed: {:?}", io::Error::last_os_error());
        }
        Ok(PtyFd(fd))
    }

    pub fn resize(&self, rows: u16, cols: u16) -> Result<(), Error> {
        let size = winsize { ws_row: rows, ws_col: cols, ws_xpixel: 0, ws_ypixel: 0 };
        if unsafe { libc::ioctl(self.0, libc::TIOCSWINSZ, &size as *const _) } != 0 {
            bail!("ioctl(TIOCSWINSZ) failed: {:?}", io::Error::last_os_error());
        }
        Ok(())
    }
}

impl Read for PtyFd {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match unsafe { libc::read(self.0, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) } {
            n if n >= 0 => Ok(n as usize),
            _ => {
                let err = io::Error::last_os_error();
                if err.raw_os_error() == Some(libc::EIO) {
                    // The slave side closed; treat like EOF rather
                    // than a hard error.
                    Ok(0)
                } else {
                    Err(err)
                }
            }
        }
    }
}

impl Write for PtyFd {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match unsafe { libc::write(self.0, buf.as_ptr() as *const libc::c_void, buf.len()) } {
            n if n >= 0 => Ok(n as usize),
            _ => Err(io::Error::last_os_error()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for PtyFd {
    fn drop(&mut self) {
        unsafe {
            libc::close(self.0);
        }
    }
}

impl AsRawFd for PtyFd {
    fn as_raw_fd(&self) -> RawFd {
        self.0
    }
}

/// Open a PTY pair and fork `$SHELL -i` onto the slave side. Returns
/// the master fd and the spawned `Child`.
pub fn spawn_shell(shell: &str, rows: u16, cols: u16) -> Result<(PtyFd, Child), Error> {
    let mut master: RawFd = -1;
    let mut slave: RawFd = -1;
    let mut size = winsize { ws_row: rows, ws_col: cols, ws_xpixel: 0, ws_ypixel: 0 };

    let result = unsafe {
        libc::openpty(&mut master, &mut slave, ptr::null_mut(), ptr::null_mut(), &mut size)
    };
    if result != 0 {
        bail!("openpty failed: {:?}", io::Error::last_os_error());
    }

    let master = PtyFd(master);
    let slave_fd = PtyFd(slave);
    master.cloexec()?;
    slave_fd.cloexec()?;

    let slave_raw = slave_fd.as_raw_fd();
    let mut cmd = Command::new(shell);
    cmd.arg("-i");
    unsafe {
        cmd.stdin(Stdio::from_raw_fd(libc::dup(slave_raw)))
            .stdout(Stdio::from_raw_fd(libc::dup(slave_raw)))
            .stderr(Stdio::from_raw_fd(libc::dup(slave_raw)))
            .pre_exec(move || {
                for signo in &[
                    libc::SIGCHLD,
                    libc::SIGHUP,
                    libc::SIGINT,
                    libc::SIGQUIT,
                    libc::SIGTERM,
                    libc::SIGALRM,
                ] {
                    libc::signal(*signo, libc::SIG_DFL);
                }
                if libc::setsid() == -1 {
                    return Err(io::Error::last_os_error());
                }
                if libc::ioctl(0, libc::TIOCSCTTY as _, 0) == -1 {
                    return Err(io::Error::last_os_error());
                }
                Ok(())
            });
    }

    let child = cmd.spawn()?;
    drop(slave_fd);

    Ok((master, child))
}

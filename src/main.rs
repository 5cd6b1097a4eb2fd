//! `vtty`: a thin PTY host for the `term` crate. Spawns `$SHELL` on a
//! real PTY, feeds its output through `term::spawn_interpreter`, and
//! relays stdin back in. Rendering here is a bare line-oriented stdout
//! dump — a real display backend (font metrics, pixel layout, a GUI
//! window) is out of scope for this crate.

#[macro_use]
extern crate failure;

mod pty;

use std::env;
use std::io::Read;
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use failure::Error;
use mio::unix::EventedFd;
use mio::{Events, Poll, PollOpt, Ready, Token};

use term::{Config, CursorPos, InputEvent, RenderSink, Term};

const STDIN: Token = Token(0);

static WINCH_RECEIVED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_winch(_signo: libc::c_int) {
    WINCH_RECEIVED.store(true, Ordering::SeqCst);
}

/// Read our own controlling terminal's current cell size via
/// `TIOCGWINSZ`, translated to the pixel dims `Dispatcher::dispatch`
/// expects for a `Resize` event (spec.md §4.6).
fn stdin_window_size(config: &Config) -> Option<(u32, u32)> {
    let mut size: libc::winsize = unsafe { std::mem::zeroed() };
    if unsafe { libc::ioctl(0, libc::TIOCGWINSZ, &mut size as *mut _) } != 0 {
        return None;
    }
    if size.ws_row == 0 || size.ws_col == 0 {
        return None;
    }
    Some((
        u32::from(size.ws_col) * config.cell_width_px,
        u32::from(size.ws_row) * config.cell_height_px,
    ))
}

struct StdoutSink;

impl RenderSink for StdoutSink {
    fn paint(&mut self, dirty: &[(usize, &str)], cursor: CursorPos, cursor_visible: bool) {
        for (row, text) in dirty {
            println!("{:3}: {}", row, text);
        }
        if cursor_visible {
            log::debug!("cursor at ({}, {})", cursor.row, cursor.col);
        }
    }
}

fn main() -> Result<(), Error> {
    env_logger::init();

    let mut config = Config::default();
    if let Ok(shell) = env::var("SHELL") {
        config.shell = shell;
    }

    let (master, mut child) =
        pty::spawn_shell(&config.shell, config.height as u16, config.width as u16)?;
    let reader = master.try_clone()?;
    let writer = Arc::new(Mutex::new(master));

    unsafe {
        libc::signal(libc::SIGWINCH, on_winch as libc::sighandler_t);
    }

    let term = Term::new(&config);
    let state = term.state_handle();

    let _interpreter = term::spawn_interpreter(state, reader, Arc::clone(&writer), |title| {
        log::info!("title changed: {}", title);
    });

    let poll = Poll::new()?;
    let stdin = std::io::stdin();
    let stdin_fd = stdin.as_raw_fd();
    poll.register(&EventedFd(&stdin_fd), STDIN, Ready::readable(), PollOpt::edge())?;
    let mut events = Events::with_capacity(16);
    let tick = Duration::from_millis(16);

    loop {
        poll.poll(&mut events, Some(tick))?;
        for event in events.iter() {
            if event.token() == STDIN {
                let mut buf = [0u8; 4096];
                let n = stdin.lock().read(&mut buf)?;
                if n == 0 {
                    return Ok(());
                }
                if let Ok(text) = std::str::from_utf8(&buf[..n]) {
                    let mut w = writer.lock().unwrap();
                    term.dispatch_input(InputEvent::Text(text.to_string()), &mut *w)?;
                }
            }
        }

        if WINCH_RECEIVED.swap(false, Ordering::SeqCst) {
            if let Some((width_px, height_px)) = stdin_window_size(&config) {
                let mut w = writer.lock().unwrap();
                let dims = term.dispatch_input(InputEvent::Resize { width_px, height_px }, &mut *w)?;
                if let Some(dims) = dims {
                    w.resize(dims.rows as u16, dims.cols as u16)?;
                    log::info!("resized to {}x{}", dims.cols, dims.rows);
                }
            }
        }

        term.render_tick(&mut StdoutSink);

        if let Ok(Some(status)) = child.try_wait() {
            log::info!("child exited: {:?}", status);
            return Ok(());
        }
    }
}

//! A small VT100-flavored terminal core: byte-stream parsing, the
//! screen/cursor/margin model, and the glue that lets a host drive it
//! from a PTY and a display backend.

#[allow(unused_imports)]
#[macro_use]
extern crate failure;
#[macro_use]
extern crate bitflags;

#[macro_use]
mod debug;

mod bounded;
mod byte_source;
mod cursor;
mod dispatcher;
mod interpreter;
mod key;
mod modes;
mod screen;
mod terminal;

#[cfg(test)]
mod test;

pub use byte_source::ByteSource;
pub use cursor::CursorPos;
pub use dispatcher::{CellDims, Dispatcher, InputEvent};
pub use interpreter::Interpreter;
pub use key::{KeyCode, KeyModifiers};
pub use modes::ModeRegistry;
pub use screen::{Line, ScreenBuffer};
pub use terminal::{AnswerBack, TerminalState};

use std::io::{Read, Write};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

/// Constructor bundle for a `Term`. `shell`/`font_name` are strings
/// rather than enums, matching the teacher's own loosely-typed config
/// struct; there is no persisted configuration file layer.
#[derive(Debug, Clone)]
pub struct Config {
    pub width: usize,
    pub height: usize,
    pub font_size: f32,
    pub shell: String,
    pub font_name: String,
    /// Placeholder cell pixel metrics until a real font-metrics
    /// backend is wired in (font metrics/pixel layout are out of
    /// scope for this crate).
    pub cell_width_px: u32,
    pub cell_height_px: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: 80,
            height: 24,
            font_size: 12.0,
            shell: "/bin/bash".to_string(),
            font_name: "monospace".to_string(),
            cell_width_px: 8,
            cell_height_px: 16,
        }
    }
}

/// What a display backend implements to receive `RenderTick` output
/// (spec.md §4.7): the dirty rows since the last tick, plus where the
/// cursor is and whether it should be drawn at all.
pub trait RenderSink {
    fn paint(&mut self, dirty: &[(usize, &str)], cursor: CursorPos, cursor_visible: bool);
}

/// The library's top-level façade: owns the shared `TerminalState`
/// and the `Dispatcher`. `spawn_interpreter` puts the parser on its
/// own thread; `dispatch_input`/`render_tick` are meant to be called
/// from the display thread.
pub struct Term {
    state: Arc<Mutex<TerminalState>>,
    dispatcher: Dispatcher,
}

impl Term {
    pub fn new(config: &Config) -> Self {
        Term {
            state: Arc::new(Mutex::new(TerminalState::new(config.height, config.width))),
            dispatcher: Dispatcher::new(config.cell_width_px, config.cell_height_px),
        }
    }

    /// A clone of the shared lock, for handing to `spawn_interpreter`
    /// or a custom render loop.
    pub fn state_handle(&self) -> Arc<Mutex<TerminalState>> {
        Arc::clone(&self.state)
    }

    /// Translate one input event and, for text/key/scroll, write the
    /// resulting bytes to `pty`. A resize event instead resizes the
    /// shared state directly and returns the new cell dimensions so
    /// the caller can issue the window-size ioctl.
    pub fn dispatch_input<W: Write>(
        &self,
        event: InputEvent,
        pty: &mut W,
    ) -> Result<Option<CellDims>, failure::Error> {
        let modes = self.state.lock().unwrap().modes;
        let dims = self.dispatcher.dispatch(event, &modes, pty)?;
        if let Some(dims) = dims {
            let mut state = self.state.lock().unwrap();
            state.resize(dims.rows as usize, dims.cols as usize);
        }
        Ok(dims)
    }

    /// Snapshot the dirty rows and cursor, hand them to `sink`, then
    /// clear the dirty set (spec.md §4.7).
    pub fn render_tick<S: RenderSink>(&self, sink: &mut S) {
        let mut state = self.state.lock().unwrap();
        let dirty = state.screen.dirty_rows();
        let refs: Vec<(usize, &str)> = dirty.iter().map(|(i, s)| (*i, s.as_str())).collect();
        let cursor = CursorPos { row: state.cursor.row(), col: state.cursor.col() };
        sink.paint(&refs, cursor, state.modes.cursor);
        state.screen.clear_dirty();
    }
}

/// Spawn the interpreter thread: reads scalars from `reader` via a
/// `ByteSource`, feeds each one to an `Interpreter` while holding the
/// shared lock for just that scalar (spec.md §5), and forwards any
/// resulting `AnswerBack` outside the lock — `WriteToPty` goes to
/// `pty_write`, `TitleChanged` goes to `on_title`. Exits when `reader`
/// hits EOF or an error (the PTY closed).
pub fn spawn_interpreter<R, W, F>(
    state: Arc<Mutex<TerminalState>>,
    reader: R,
    pty_write: Arc<Mutex<W>>,
    mut on_title: F,
) -> JoinHandle<()>
where
    R: Read + Send + 'static,
    W: Write + Send + 'static,
    F: FnMut(String) + Send + 'static,
{
    std::thread::spawn(move || {
        let source = ByteSource::new(reader);
        let mut interp = Interpreter::new();
        for c in source {
            let answers = {
                let mut state = state.lock().unwrap();
                interp.feed(&mut state, c);
                state.drain_answerback()
            };
            for answer in answers {
                match answer {
                    AnswerBack::WriteToPty(bytes) => {
                        if let Ok(mut w) = pty_write.lock() {
                            if let Err(e) = w.write_all(&bytes) {
                                log::warn!("interpreter: pty write failed: {}", e);
                            }
                        }
                    }
                    AnswerBack::TitleChanged(title) => on_title(title),
                }
            }
        }
        log::info!("interpreter thread exiting: pty closed");
    })
}

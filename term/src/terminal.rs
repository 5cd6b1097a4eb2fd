//! `TerminalState`: the screen/cursor/modes bundle the `Interpreter`
//! mutates, plus the `Perform`-shaped dispatch methods it calls into
//! (spec.md §4.4-§4.7). `AnswerBack` carries anything the interpreter
//! produces that must leave the terminal again (a DSR report, a title
//! change) rather than just mutating local state.

use crate::cursor::CursorState;
use crate::modes::ModeRegistry;
use crate::screen::ScreenBuffer;

/// Something the interpreter produced that the host must act on
/// outside the shared lock: bytes to write back to the PTY, or a
/// window-title change to hand to the display backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerBack {
    WriteToPty(Vec<u8>),
    TitleChanged(String),
}

pub struct TerminalState {
    pub screen: ScreenBuffer,
    pub cursor: CursorState,
    pub modes: ModeRegistry,
    width: usize,
    answerback: Vec<AnswerBack>,
}

impl TerminalState {
    pub fn new(height: usize, width: usize) -> Self {
        TerminalState {
            screen: ScreenBuffer::new(height),
            cursor: CursorState::new(height),
            modes: ModeRegistry::default(),
            width,
            answerback: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.screen.height()
    }

    fn row_usize(&self) -> usize {
        self.cursor.row().max(0) as usize
    }

    fn col_usize(&self) -> usize {
        self.cursor.col().max(0) as usize
    }

    /// Drains everything the interpreter queued since the last drain.
    /// Called by the interpreter thread outside the per-scalar lock
    /// hold (spec.md §5).
    pub fn drain_answerback(&mut self) -> Vec<AnswerBack> {
        self.answerback.drain(..).collect()
    }

    fn push_pty(&mut self, bytes: Vec<u8>) {
        self.answerback.push(AnswerBack::WriteToPty(bytes));
    }

    /// Resize the screen and re-clamp the cursor/margins against the
    /// new height (spec.md §3's lifecycle).
    pub fn resize(&mut self, height: usize, width: usize) {
        self.screen.resize(height);
        self.cursor.on_resize(height);
        self.width = width;
    }

    // -- single-scalar table (spec.md §4.4) --------------------------

    pub fn insert_text(&mut self, text: &str) {
        let row = self.row_usize();
        let col = self.col_usize();
        let new_col =
            self.screen.write_at(row, col, text, self.modes.insert, self.modes.autowrap, self.width);
        self.cursor.set_col(new_col as i64);
    }

    pub fn insert_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.insert_text(c.encode_utf8(&mut buf));
    }

    pub fn newline(&mut self) {
        let row = self.cursor.row();
        if row == self.cursor.margin_bottom() {
            self.screen.insert_line(row as usize, "");
        } else {
            self.cursor.set_row(row - 1);
        }
        self.cursor.set_col(0);
    }

    pub fn carriage_return(&mut self) {
        self.cursor.set_col(0);
    }

    pub fn backspace(&mut self) {
        self.cursor.set_col(self.cursor.col() - 1);
    }

    pub fn bell(&mut self) {
        log::debug!("bell");
    }

    pub fn tab(&mut self) {
        let col = self.cursor.col();
        let n = 8 - (col % 8);
        let spaces: String = std::iter::repeat(' ').take(n as usize).collect();
        self.insert_text(&spaces);
    }

    // -- ESC table (spec.md §4.5) ------------------------------------

    pub fn set_application_mode(&mut self, on: bool) {
        self.modes.application = on;
    }

    pub fn save_cursor(&mut self) {
        self.cursor.save_cursor();
    }

    pub fn restore_cursor(&mut self) {
        self.cursor.restore_cursor();
    }

    /// `ESC M`, reverse line feed: matches the source's own "just like
    /// IL" comment — removes the bottom-margin row and relies on the
    /// caller already having moved the cursor (it hasn't; this mirrors
    /// the source exactly, see DESIGN.md).
    pub fn reverse_line_feed(&mut self) {
        let row = self.cursor.margin_bottom() as usize;
        self.screen.remove(row);
    }

    // -- CSI table (spec.md §4.5) -------------------------------------

    pub fn dispatch_csi(&mut self, query: &str, params: &[i64], final_byte: char) {
        let n = first_or_default(params, 1);
        let height = self.height() as i64;
        match final_byte {
            'A' => self.cursor.set_row(self.cursor.row() - n),
            'B' => self.cursor.set_row(self.cursor.row() + n),
            'C' => self.cursor.set_col(self.cursor.col() + n),
            'D' => self.cursor.set_col(self.cursor.col() - n),
            'G' => {
                let col = (raw(params, 0) - 1).max(0);
                self.cursor.set_col(col);
            }
            'H' => {
                self.cursor.set_row(height - n);
                let col = if params.len() > 1 { params[1] - 1 } else { 0 };
                self.cursor.set_col(col);
            }
            'J' => self.erase_display(raw(params, 0)),
            'K' => self.erase_line(raw(params, 0)),
            'L' => {
                let bottom = self.cursor.margin_bottom() as usize;
                self.screen.remove(bottom);
                let row = self.row_usize();
                self.screen.insert_line(row + 1, "");
            }
            'M' => {
                for _ in 0..n {
                    let row = self.row_usize();
                    self.screen.remove(row);
                    let bottom = self.cursor.margin_bottom() as usize;
                    self.screen.insert_line(bottom, "");
                }
            }
            'P' => {
                let count = raw(params, 0);
                let row = self.row_usize();
                let col = self.col_usize();
                if count > 0 {
                    self.screen.splice(row, col, Some(col + count as usize));
                } else {
                    self.screen.splice(row, col, None);
                }
            }
            'S' => {
                let bottom = self.cursor.margin_bottom() as usize;
                for _ in 0..n {
                    self.screen.insert_line(bottom, "");
                }
            }
            'T' => {
                for _ in 0..n {
                    let bottom = self.cursor.margin_bottom() as usize;
                    self.screen.remove(bottom);
                    let top = self.cursor.margin_top() as usize;
                    self.screen.insert_line(top, "");
                }
            }
            'X' => {
                let amount = n.max(0) as usize;
                let row = self.row_usize();
                let col = self.col_usize();
                self.screen.splice(row, col, Some(col + amount));
                let spaces: String = std::iter::repeat(' ').take(amount).collect();
                self.insert_text(&spaces);
            }
            'Z' => {
                let back = raw(params, 0);
                let new_col = (self.cursor.col() / 8 - back) * 8;
                self.cursor.set_col(new_col);
            }
            'd' => {
                self.cursor.set_row(height - raw(params, 0));
            }
            'c' if query == ">" => {
                log::debug!("csi: secondary device attributes ignored");
            }
            'm' => {}
            'n' if raw(params, 0) == 6 => {
                let report =
                    format!("\x1b[{};{}R", height - self.cursor.row(), self.cursor.col() + 1);
                self.push_pty(report.into_bytes());
            }
            'r' => {
                if params.len() > 1 {
                    let bottom = height - params[1];
                    let top = height - params[0];
                    self.cursor.set_margin_bottom(bottom);
                    self.cursor.set_margin_top(top);
                }
            }
            'l' | 'h' => self.set_mode(raw(params, 0), query, final_byte == 'h'),
            other => {
                log::debug!(
                    "csi: unknown final byte {:?} params={:?} query={:?}",
                    other,
                    params,
                    query
                );
            }
        }
    }

    fn set_mode(&mut self, code: i64, query: &str, on: bool) {
        match (code, query) {
            (4, "") => self.modes.insert = on,
            (7, "") => self.modes.vertical = on,
            (7, "?") => self.modes.autowrap = on,
            (25, "?") | (25, "") => self.modes.cursor = on,
            (1000, "?") | (1000, "") => self.modes.mouse = on,
            (1049, "?") | (1049, "") => self.modes.edit = on,
            _ => log::debug!("csi: unknown mode pair {} {:?}", code, query),
        }
    }

    /// `CSI n J`. Mode `2` runs *both* the "from cursor to end" and
    /// "from start to cursor" branches in sequence on the current row,
    /// reusing the partial-erase splice calls rather than a single
    /// whole-row clear (spec.md §9.4 — preserved, not simplified).
    fn erase_display(&mut self, mode: i64) {
        let row = self.row_usize();
        let col = self.col_usize();
        let height = self.height();
        if mode == 0 || mode == 2 {
            self.screen.splice(row, col, None);
            for i in (0..row).rev() {
                self.screen.splice(i, 0, None);
            }
        }
        if mode == 1 || mode == 2 {
            self.screen.splice(row, 0, Some(col));
            for i in (row + 1)..height {
                self.screen.splice(i, 0, None);
            }
        }
    }

    fn erase_line(&mut self, mode: i64) {
        let row = self.row_usize();
        let col = self.col_usize();
        match mode {
            0 => self.screen.splice(row, col, None),
            1 => self.screen.splice(row, 0, Some(col)),
            2 => self.screen.splice(row, 0, None),
            _ => {}
        }
    }

    // -- OSC table (spec.md §4.5) --------------------------------------

    pub fn dispatch_osc(&mut self, params: &[String]) {
        match params.first().map(String::as_str) {
            Some("0") => {
                let title = params.get(1).cloned().unwrap_or_default();
                self.answerback.push(AnswerBack::TitleChanged(title));
            }
            _ => log::debug!("osc: unhandled command {:?}", params),
        }
    }
}

/// `coms[i] or 1`: zero (the "not given" sentinel) maps to `default`.
fn first_or_default(params: &[i64], default: i64) -> i64 {
    match params.first().copied().unwrap_or(0) {
        0 => default,
        v => v,
    }
}

/// `coms[i]` with no `or 1` fallback, defaulting only the missing case.
fn raw(params: &[i64], index: usize) -> i64 {
    params.get(index).copied().unwrap_or(0)
}

//! Test harness shared by the files in this directory: `TestTerm`
//! wraps a `TerminalState` + `Interpreter` pair the way the teacher's
//! own test harness wraps `Terminal` + `TestHost`, with helpers that
//! build escape sequences instead of hand-writing bytes per test.

mod dispatcher;
mod resize;

use crate::interpreter::Interpreter;
use crate::terminal::TerminalState;

pub struct TestTerm {
    pub state: TerminalState,
    interp: Interpreter,
}

impl TestTerm {
    pub fn new(height: usize, width: usize) -> Self {
        TestTerm { state: TerminalState::new(height, width), interp: Interpreter::new() }
    }

    pub fn send(&mut self, s: &str) {
        for c in s.chars() {
            self.interp.feed(&mut self.state, c);
        }
    }

    pub fn cup(&mut self, row: i64, col: i64) {
        self.send(&format!("\x1b[{};{}H", row, col));
    }

    pub fn set_scroll_region(&mut self, top: i64, bottom: i64) {
        self.send(&format!("\x1b[{};{}r", top, bottom));
    }

    pub fn delete_lines(&mut self, n: i64) {
        self.send(&format!("\x1b[{}M", n));
    }

    pub fn insert_lines(&mut self, n: i64) {
        self.send(&format!("\x1b[{}L", n));
    }

    /// Top row first, bottom row last — the natural reading order,
    /// inverted from the bottom-up internal index.
    pub fn visible_contents(&self) -> Vec<String> {
        (0..self.state.height())
            .rev()
            .map(|r| self.state.screen.line(r).text().to_string())
            .collect()
    }

    pub fn assert_cursor_pos(&self, row: i64, col: i64) {
        assert_eq!(self.state.cursor.row(), row, "cursor row");
        assert_eq!(self.state.cursor.col(), col, "cursor col");
    }

    pub fn assert_visible_contents(&self, expected: &[&str]) {
        let actual = self.visible_contents();
        assert_eq!(actual, expected);
    }
}

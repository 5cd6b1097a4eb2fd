//! The byte-stream parser: an explicit state machine that turns a
//! `char` sequence into calls against `TerminalState` (spec.md §4.4,
//! §4.5). Hand-rolled rather than built on `vte` — see DESIGN.md.

use crate::terminal::TerminalState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Ground,
    Escape,
    Csi,
    Osc,
}

/// Drives one `char` at a time through the grammar. Holds only parse
/// state; all terminal state lives in `TerminalState`.
pub struct Interpreter {
    state: ParserState,
    /// Set after consuming `(` or `)` in `Escape`: the *next* scalar is
    /// a charset designator to discard, whatever it is.
    awaiting_charset_designator: bool,
    csi_first: bool,
    csi_query: String,
    csi_params: Vec<i64>,
    osc_params: Vec<String>,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            state: ParserState::Ground,
            awaiting_charset_designator: false,
            csi_first: true,
            csi_query: String::new(),
            csi_params: vec![0],
            osc_params: vec![String::new()],
        }
    }

    pub fn feed(&mut self, term: &mut TerminalState, c: char) {
        debug!("interpreter: state={:?} char={:?}", self.state, c);
        match self.state {
            ParserState::Ground => self.feed_ground(term, c),
            ParserState::Escape => self.feed_escape(term, c),
            ParserState::Csi => self.feed_csi(term, c),
            ParserState::Osc => self.feed_osc(term, c),
        }
    }

    fn feed_ground(&mut self, term: &mut TerminalState, c: char) {
        match c {
            '\n' => term.newline(),
            '\r' => term.carriage_return(),
            '\u{8}' => term.backspace(),
            '\u{7}' => term.bell(),
            '\t' => term.tab(),
            '\u{1b}' => self.state = ParserState::Escape,
            other => term.insert_char(other),
        }
    }

    fn feed_escape(&mut self, term: &mut TerminalState, c: char) {
        if self.awaiting_charset_designator {
            self.awaiting_charset_designator = false;
            self.state = ParserState::Ground;
            return;
        }
        match c {
            '[' => {
                self.csi_first = true;
                self.csi_query.clear();
                self.csi_params = vec![0];
                self.state = ParserState::Csi;
            }
            '(' | ')' => {
                self.awaiting_charset_designator = true;
            }
            ']' => {
                self.osc_params = vec![String::new()];
                self.state = ParserState::Osc;
            }
            '=' => {
                term.set_application_mode(true);
                self.state = ParserState::Ground;
            }
            '>' => {
                term.set_application_mode(false);
                self.state = ParserState::Ground;
            }
            'M' => {
                term.reverse_line_feed();
                self.state = ParserState::Ground;
            }
            '7' => {
                term.save_cursor();
                self.state = ParserState::Ground;
            }
            '8' => {
                term.restore_cursor();
                self.state = ParserState::Ground;
            }
            other => {
                log::debug!("esc: unknown final byte {:?}", other);
                term.insert_text(&format!("\u{1b}{}", other));
                self.state = ParserState::Ground;
            }
        }
    }

    fn feed_csi(&mut self, term: &mut TerminalState, c: char) {
        if self.csi_first {
            self.csi_first = false;
            if matches!(c, '<' | '=' | '>' | '?') {
                self.csi_query.push(c);
                return;
            }
        }
        match c {
            '0'..='9' => {
                let d = i64::from(c.to_digit(10).unwrap());
                if let Some(last) = self.csi_params.last_mut() {
                    *last = *last * 10 + d;
                }
            }
            ';' => self.csi_params.push(0),
            final_byte => {
                term.dispatch_csi(&self.csi_query, &self.csi_params, final_byte);
                self.state = ParserState::Ground;
            }
        }
    }

    fn feed_osc(&mut self, term: &mut TerminalState, c: char) {
        if c == '\u{7}' {
            term.dispatch_osc(&self.osc_params);
            self.state = ParserState::Ground;
            return;
        }
        if c == ';' {
            self.osc_params.push(String::new());
        } else if let Some(last) = self.osc_params.last_mut() {
            last.push(c);
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

//! Key symbols and modifier flags used by the `Dispatcher`
//! (spec.md §4.6).

bitflags! {
    pub struct KeyModifiers: u8 {
        const CTRL  = 1;
        const ALT   = 2;
        const META  = 4;
        const SUPER = 8;
        const SHIFT = 16;
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Escape,
    Tab,
    Function(u8),
    /// Numeric keypad digit 0-9, only meaningful in application mode.
    KeypadDigit(u8),
    KeypadEnter,
    Unknown,
}

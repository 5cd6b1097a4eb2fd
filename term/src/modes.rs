//! The fixed mapping of named boolean terminal modes. Deliberately a
//! plain record rather than a dynamic string-keyed lookup (see
//! DESIGN.md / spec.md §9's design notes).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeRegistry {
    /// DECCKM/application cursor+keypad mode.
    pub application: bool,
    /// Local-edit / alternate-screen-ish mode (DEC private 1049).
    pub edit: bool,
    /// DECTCEM cursor visibility.
    pub cursor: bool,
    /// VEN vertical mode (DEC private 7 without `?`).
    pub vertical: bool,
    /// IRM insert/replace mode.
    pub insert: bool,
    /// DECAWM autowrap (DEC private 7).
    pub autowrap: bool,
    /// xterm X10 mouse reporting.
    pub mouse: bool,
}

impl Default for ModeRegistry {
    fn default() -> Self {
        ModeRegistry {
            application: false,
            edit: false,
            cursor: true,
            vertical: false,
            insert: false,
            autowrap: false,
            mouse: false,
        }
    }
}

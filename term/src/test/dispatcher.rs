//! Integration between `ModeRegistry` state built up by the
//! interpreter and `Dispatcher`'s mode-dependent behavior (the
//! application-keypad table, mouse-scroll reporting).

use super::TestTerm;
use crate::dispatcher::{Dispatcher, InputEvent};
use crate::key::{KeyCode, KeyModifiers};

#[test]
fn keypad_digit_only_honored_after_csi_equals_enables_application_mode() {
    let mut term = TestTerm::new(5, 20);
    let d = Dispatcher::new(8, 16);
    let mut out = Vec::new();
    d.dispatch(
        InputEvent::Key { code: KeyCode::KeypadDigit(3), mods: KeyModifiers::empty() },
        &term.state.modes,
        &mut out,
    )
    .unwrap();
    assert!(out.is_empty());

    term.send("\x1b=");
    out.clear();
    d.dispatch(
        InputEvent::Key { code: KeyCode::KeypadDigit(3), mods: KeyModifiers::empty() },
        &term.state.modes,
        &mut out,
    )
    .unwrap();
    assert_eq!(out, b"Or");
}

#[test]
fn scroll_reporting_switches_to_x10_once_mouse_mode_is_set() {
    let mut term = TestTerm::new(5, 20);
    let d = Dispatcher::new(10, 20);
    let mut out = Vec::new();
    d.dispatch(InputEvent::Scroll { x: 0, y: 0, dx: 0, dy: 1 }, &term.state.modes, &mut out)
        .unwrap();
    assert_eq!(out, b"\x1b[A");

    term.send("\x1b[?1000h");
    out.clear();
    d.dispatch(InputEvent::Scroll { x: 20, y: 40, dx: 0, dy: 1 }, &term.state.modes, &mut out)
        .unwrap();
    assert_eq!(out, vec![0x1b, b'M', b'`', 32 + 2, 32 + 2]);
}

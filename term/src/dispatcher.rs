//! Translates display-layer input events into bytes written back to the
//! PTY (spec.md §4.6). Never touches the shared screen lock — callers
//! pass in a read-only snapshot of the modes that matter.

use std::io::Write;

use crate::key::{KeyCode, KeyModifiers};
use crate::modes::ModeRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Text(String),
    Key { code: KeyCode, mods: KeyModifiers },
    Scroll { x: i64, y: i64, dx: i64, dy: i64 },
    Resize { width_px: u32, height_px: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellDims {
    pub rows: u32,
    pub cols: u32,
}

pub struct Dispatcher {
    font_width: u32,
    font_height: u32,
}

impl Dispatcher {
    pub fn new(font_width: u32, font_height: u32) -> Self {
        Dispatcher { font_width: font_width.max(1), font_height: font_height.max(1) }
    }

    /// Returns `Some(dims)` only for a resize event; a `vtty` host is
    /// expected to rebuild its line store and issue the PTY window-size
    /// ioctl with the result.
    pub fn dispatch<W: Write>(
        &self,
        event: InputEvent,
        modes: &ModeRegistry,
        pty: &mut W,
    ) -> Result<Option<CellDims>, failure::Error> {
        match event {
            InputEvent::Text(s) => {
                pty.write_all(s.as_bytes())?;
                Ok(None)
            }
            InputEvent::Key { code, mods } => {
                self.dispatch_key(code, mods, modes, pty)?;
                Ok(None)
            }
            InputEvent::Scroll { x, y, dx: _, dy } => {
                self.dispatch_scroll(x, y, dy, modes, pty)?;
                Ok(None)
            }
            InputEvent::Resize { width_px, height_px } => Ok(Some(CellDims {
                rows: height_px / self.font_height,
                cols: width_px / self.font_width,
            })),
        }
    }

    fn dispatch_key<W: Write>(
        &self,
        code: KeyCode,
        mods: KeyModifiers,
        modes: &ModeRegistry,
        pty: &mut W,
    ) -> Result<(), failure::Error> {
        if mods.contains(KeyModifiers::CTRL) {
            if let KeyCode::Char(c) = code {
                if ('a'..='z').contains(&c) {
                    pty.write_all(&[c as u8 - 96])?;
                    return Ok(());
                }
            }
        }
        if let Some(seq) = core_key_sequence(code) {
            pty.write_all(seq)?;
            return Ok(());
        }
        if modes.application {
            if let Some(seq) = application_keypad_sequence(code) {
                pty.write_all(seq)?;
                return Ok(());
            }
        }
        log::debug!("dispatcher: unknown key {:?} mods {:?}", code, mods);
        Ok(())
    }

    fn dispatch_scroll<W: Write>(
        &self,
        x: i64,
        y: i64,
        dy: i64,
        modes: &ModeRegistry,
        pty: &mut W,
    ) -> Result<(), failure::Error> {
        if dy == 0 {
            return Ok(());
        }
        let count = dy.abs();
        if !modes.mouse {
            let seq: &[u8] = if dy > 0 { b"\x1b[A" } else { b"\x1b[B" };
            for _ in 0..count {
                pty.write_all(seq)?;
            }
        } else {
            let btn = if dy < 0 { b'a' } else { b'`' };
            let col = (32 + x / i64::from(self.font_width)) as u8;
            let row = (32 + y / i64::from(self.font_height)) as u8;
            let seq = [0x1b, b'M', btn, col, row];
            for _ in 0..count {
                pty.write_all(&seq)?;
            }
        }
        Ok(())
    }
}

/// The canonical key sequence table (spec.md §4.6). These are the
/// source's `O`-prefixed forms with no leading `ESC` — real terminals
/// send `ESC O ...`. Preserved as specified (spec.md §9.2).
fn core_key_sequence(code: KeyCode) -> Option<&'static [u8]> {
    Some(match code {
        KeyCode::Up => b"OA",
        KeyCode::Down => b"OB",
        KeyCode::Right => b"OC",
        KeyCode::Left => b"OD",
        KeyCode::Home => b"OH",
        KeyCode::End => b"OF",
        KeyCode::PageUp => b"[5~",
        KeyCode::PageDown => b"[6~",
        KeyCode::Function(1) => b"OP",
        KeyCode::Function(2) => b"OQ",
        KeyCode::Function(3) => b"OR",
        KeyCode::Function(4) => b"OS",
        KeyCode::Function(5) => b"OT",
        KeyCode::Function(6) => b"OU",
        KeyCode::Function(7) => b"OV",
        KeyCode::Function(8) => b"OW",
        KeyCode::Function(9) => b"OX",
        KeyCode::Function(10) => b"OY",
        KeyCode::Function(11) => b"OZ",
        KeyCode::Function(12) => b"[24~",
        KeyCode::Backspace => b"\x7f",
        KeyCode::Escape => b"\x1b",
        KeyCode::Tab => b"\t",
        _ => return None,
    })
}

/// Application-mode keypad table. `KeypadDigit(5)` is assigned twice in
/// the source (`Ot` then `Ou`); the later entry wins, so only `Ou`
/// appears here (spec.md §9.3).
fn application_keypad_sequence(code: KeyCode) -> Option<&'static [u8]> {
    Some(match code {
        KeyCode::KeypadEnter => b"OM",
        KeyCode::KeypadDigit(1) => b"Op",
        KeyCode::KeypadDigit(2) => b"Oq",
        KeyCode::KeypadDigit(3) => b"Or",
        KeyCode::KeypadDigit(4) => b"Os",
        KeyCode::KeypadDigit(5) => b"Ou",
        KeyCode::KeypadDigit(6) => b"Ov",
        KeyCode::KeypadDigit(7) => b"Ow",
        KeyCode::KeypadDigit(8) => b"Ox",
        KeyCode::KeypadDigit(9) => b"Oy",
        _ => return None,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn written<F: FnOnce(&mut Vec<u8>)>(f: F) -> Vec<u8> {
        let mut buf = Vec::new();
        f(&mut buf);
        buf
    }

    #[test]
    fn text_event_writes_verbatim_utf8() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(InputEvent::Text("héllo".into()), &modes, buf).unwrap();
        });
        assert_eq!(out, "héllo".as_bytes());
    }

    #[test]
    fn ctrl_letter_maps_to_control_byte() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key { code: KeyCode::Char('c'), mods: KeyModifiers::CTRL },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert_eq!(out, vec![3]);
    }

    #[test]
    fn arrow_keys_use_o_prefixed_forms_without_esc() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key { code: KeyCode::Up, mods: KeyModifiers::empty() },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert_eq!(out, b"OA");
    }

    #[test]
    fn function_keys_and_f12() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key { code: KeyCode::Function(12), mods: KeyModifiers::empty() },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert_eq!(out, b"[24~");
    }

    #[test]
    fn keypad_only_honored_in_application_mode() {
        let d = Dispatcher::new(8, 16);
        let mut modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key {
                    code: KeyCode::KeypadDigit(1),
                    mods: KeyModifiers::empty(),
                },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert!(out.is_empty());

        modes.application = true;
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key {
                    code: KeyCode::KeypadDigit(1),
                    mods: KeyModifiers::empty(),
                },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert_eq!(out, b"Op");
    }

    #[test]
    fn duplicate_num_5_resolves_to_second_entry() {
        let d = Dispatcher::new(8, 16);
        let mut modes = ModeRegistry::default();
        modes.application = true;
        let out = written(|buf| {
            d.dispatch(
                InputEvent::Key {
                    code: KeyCode::KeypadDigit(5),
                    mods: KeyModifiers::empty(),
                },
                &modes,
                buf,
            )
            .unwrap();
        });
        assert_eq!(out, b"Ou");
    }

    #[test]
    fn scroll_without_mouse_mode_sends_arrow_sequences() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let out = written(|buf| {
            d.dispatch(InputEvent::Scroll { x: 0, y: 0, dx: 0, dy: 3 }, &modes, buf).unwrap();
        });
        assert_eq!(out, b"\x1b[A\x1b[A\x1b[A");
    }

    #[test]
    fn scroll_with_mouse_mode_sends_x10_reports() {
        let d = Dispatcher::new(10, 20);
        let mut modes = ModeRegistry::default();
        modes.mouse = true;
        let out = written(|buf| {
            d.dispatch(InputEvent::Scroll { x: 20, y: 40, dx: 0, dy: -1 }, &modes, buf).unwrap();
        });
        assert_eq!(out, vec![0x1b, b'M', b'a', 32 + 2, 32 + 2]);
    }

    #[test]
    fn resize_computes_cell_dims() {
        let d = Dispatcher::new(8, 16);
        let modes = ModeRegistry::default();
        let mut sink = Vec::new();
        let dims = d
            .dispatch(InputEvent::Resize { width_px: 800, height_px: 480 }, &modes, &mut sink)
            .unwrap();
        assert_eq!(dims, Some(CellDims { rows: 30, cols: 100 }));
    }
}

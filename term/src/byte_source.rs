//! Wraps the child PTY file descriptor (or, in tests, any `Read`) and
//! yields a restartable, lazy, single-pass sequence of Unicode scalar
//! values, buffering partial multi-byte sequences across reads
//! (spec.md §4.1).

use std::io::Read;

const READ_CHUNK: usize = 10_000;

pub struct ByteSource<R> {
    reader: R,
    buf: Vec<u8>,
    pending: std::vec::IntoIter<char>,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        ByteSource { reader, buf: Vec::new(), pending: Vec::new().into_iter() }
    }

    /// Reads until either more scalars are ready to yield or the
    /// underlying fd reports a terminal error. Returns `false` when the
    /// sequence is over.
    fn refill(&mut self) -> bool {
        loop {
            let mut chunk = [0u8; READ_CHUNK];
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    log::info!("byte source: pty closed");
                    return false;
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    match std::str::from_utf8(&self.buf) {
                        Ok(s) => {
                            let chars: Vec<char> = s.chars().collect();
                            self.buf.clear();
                            if chars.is_empty() {
                                continue;
                            }
                            self.pending = chars.into_iter();
                            return true;
                        }
                        Err(e) => {
                            if e.error_len().is_none() {
                                // Truncated multi-byte sequence at the
                                // tail of the buffer; keep it and read
                                // more.
                                continue;
                            }
                            // Genuinely invalid UTF-8 mid-stream: drop
                            // the whole buffer and keep reading
                            // (spec.md §7 / §9.5 — up to READ_CHUNK
                            // bytes can be dropped this way).
                            log::warn!(
                                "byte source: dropping {} bytes of invalid utf-8",
                                self.buf.len()
                            );
                            self.buf.clear();
                            continue;
                        }
                    }
                }
                Err(err) => {
                    log::info!("byte source: read error, terminating: {}", err);
                    return false;
                }
            }
        }
    }
}

impl<R: Read> Iterator for ByteSource<R> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        loop {
            if let Some(c) = self.pending.next() {
                return Some(c);
            }
            if !self.refill() {
                return None;
            }
        }
    }
}

//! Character-by-character reveal of report text.

use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Reveals `text` one character per step.
///
/// Dropping the iterator or calling [`Reveal::cancel`] stops the reveal.
#[derive(Debug, Clone)]
pub struct Reveal {
    text: String,
    pos: usize,
}

impl Reveal {
    pub fn new(text: impl Into<String>) -> Self {
        Reveal {
            text: text.into(),
            pos: 0,
        }
    }

    /// The prefix revealed so far.
    pub fn revealed(&self) -> &str {
        &self.text[..self.pos]
    }

    pub fn is_done(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Stop revealing, leaving the current prefix in place.
    pub fn cancel(&mut self) {
        self.text.truncate(self.pos);
    }
}

impl Iterator for Reveal {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let c = self.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }
}

/// Write `text` to `out`, pausing `delay` after every character.
///
/// A closed reader (for example `| head`) cancels the reveal instead of
/// failing. Returns the text actually written.
pub fn type_out<W: Write>(out: &mut W, text: &str, delay: Duration) -> io::Result<String> {
    let mut reveal = Reveal::new(text);
    while let Some(c) = reveal.next() {
        let written = write!(out, "{c}").and_then(|_| out.flush());
        match written {
            Ok(()) => thread::sleep(delay),
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                log::debug!("Output closed after {} bytes", reveal.revealed().len());
                reveal.cancel();
                // The last character never reached the reader
                let shown = reveal.revealed();
                return Ok(shown[..shown.len() - c.len_utf8()].to_string());
            }
            Err(e) => return Err(e),
        }
    }
    debug_assert!(reveal.is_done());
    writeln!(out)?;
    Ok(reveal.revealed().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts `limit` bytes, then reports a closed pipe.
    struct ClosedAfter {
        buf: Vec<u8>,
        limit: usize,
    }

    impl Write for ClosedAfter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            if self.buf.len() + data.len() > self.limit {
                return Err(io::ErrorKind::BrokenPipe.into());
            }
            self.buf.extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn reveals_one_char_at_a_time() {
        let mut reveal = Reveal::new("P/L $5");
        assert_eq!(reveal.revealed(), "");
        assert_eq!(reveal.next(), Some('P'));
        assert_eq!(reveal.next(), Some('/'));
        assert_eq!(reveal.revealed(), "P/");
        assert_eq!(reveal.by_ref().collect::<String>(), "L $5");
        assert!(reveal.is_done());
        assert_eq!(reveal.next(), None);
    }

    #[test]
    fn handles_multibyte_chars() {
        let reveal = Reveal::new("£1→2");
        assert_eq!(reveal.collect::<Vec<_>>(), vec!['£', '1', '→', '2']);
    }

    #[test]
    fn cancel_keeps_prefix_and_stops() {
        let mut reveal = Reveal::new("Shares Held: 100");
        reveal.nth(5);
        reveal.cancel();
        assert_eq!(reveal.revealed(), "Shares");
        assert!(reveal.is_done());
        assert_eq!(reveal.next(), None);
    }

    #[test]
    fn type_out_writes_whole_text() {
        let mut out = Vec::new();
        let shown = type_out(&mut out, "Results for IBIT", Duration::ZERO).unwrap();
        assert_eq!(shown, "Results for IBIT");
        assert_eq!(String::from_utf8(out).unwrap(), "Results for IBIT\n");
    }

    #[test]
    fn closed_output_cancels_reveal() {
        let mut out = ClosedAfter {
            buf: Vec::new(),
            limit: 7,
        };
        let shown = type_out(&mut out, "Results for IBIT", Duration::ZERO).unwrap();
        assert_eq!(shown, "Results");
        assert_eq!(out.buf, b"Results");
    }
}

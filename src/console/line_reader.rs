/// Longest console line accepted, terminator excluded.
pub const CONSOLE_LINE_MAX: usize = 128;

pub enum LineReadEvent<'a> {
    None,
    Complete(&'a [u8]),
    Overflow,
}

/// Frames UART bytes into command lines.
///
/// CR and LF both terminate, so a CR LF pair yields one line and one blank
/// that is skipped along with whitespace-only lines. Bytes outside printable
/// ASCII and TAB are dropped. A line that outgrows [`CONSOLE_LINE_MAX`] is
/// reported once and discarded up to its terminator.
pub struct SerialLineReader {
    pending: [u8; CONSOLE_LINE_MAX],
    pending_len: usize,
    discarding: bool,
}

impl Default for SerialLineReader {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialLineReader {
    pub const fn new() -> Self {
        Self {
            pending: [0; CONSOLE_LINE_MAX],
            pending_len: 0,
            discarding: false,
        }
    }

    pub fn push_byte(&mut self, byte: u8) -> LineReadEvent<'_> {
        match byte {
            b'\r' | b'\n' => self.terminate(),
            _ if self.discarding => LineReadEvent::None,
            b'\t' | b' '..=b'~' => self.append(byte),
            _ => LineReadEvent::None,
        }
    }

    fn append(&mut self, byte: u8) -> LineReadEvent<'_> {
        if self.pending_len == self.pending.len() {
            self.pending_len = 0;
            self.discarding = true;
            return LineReadEvent::Overflow;
        }
        self.pending[self.pending_len] = byte;
        self.pending_len += 1;
        LineReadEvent::None
    }

    fn terminate(&mut self) -> LineReadEvent<'_> {
        let len = core::mem::take(&mut self.pending_len);
        if core::mem::take(&mut self.discarding) {
            return LineReadEvent::None;
        }
        let line = &self.pending[..len];
        if line.iter().all(u8::is_ascii_whitespace) {
            return LineReadEvent::None;
        }
        LineReadEvent::Complete(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_from(reader: &mut SerialLineReader, bytes: &[u8]) -> Vec<Vec<u8>> {
        bytes
            .iter()
            .filter_map(|&byte| match reader.push_byte(byte) {
                LineReadEvent::Complete(line) => Some(line.to_vec()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn crlf_and_blank_lines_yield_one_command_each() {
        let mut reader = SerialLineReader::new();
        let lines = lines_from(&mut reader, b"PING\r\nstatus\n\n  \t\r\nRESET\r");
        assert_eq!(
            lines,
            vec![b"PING".to_vec(), b"status".to_vec(), b"RESET".to_vec()]
        );
    }

    #[test]
    fn control_bytes_are_dropped() {
        let mut reader = SerialLineReader::new();
        let lines = lines_from(&mut reader, b"\x1bTH\x00RE\x7fSH\x07\n");
        assert_eq!(lines, vec![b"THRESH".to_vec()]);
    }

    #[test]
    fn overlong_line_is_reported_once_then_dropped() {
        let mut reader = SerialLineReader::new();
        let overflows = (0..CONSOLE_LINE_MAX + 40)
            .filter(|_| matches!(reader.push_byte(b'x'), LineReadEvent::Overflow))
            .count();
        assert_eq!(overflows, 1);
        assert!(matches!(reader.push_byte(b'y'), LineReadEvent::None));
        assert!(matches!(reader.push_byte(b'\n'), LineReadEvent::None));

        assert_eq!(lines_from(&mut reader, b"PING\n"), vec![b"PING".to_vec()]);
    }

    #[test]
    fn full_line_without_overflow_is_kept() {
        let mut reader = SerialLineReader::new();
        let mut bytes = vec![b'a'; CONSOLE_LINE_MAX];
        bytes.push(b'\n');
        let lines = lines_from(&mut reader, &bytes);
        assert_eq!(lines, vec![vec![b'a'; CONSOLE_LINE_MAX]]);
    }
}

//! Streaming line framing
//!
//! Replies are newline-terminated ASCII lines. [`LineCodec`] buffers raw bytes
//! as they arrive and hands out complete lines, so it is independent of how
//! the transport chunks the stream.

/// Line terminator
pub const TERMINATOR: u8 = b'\n';

/// Streaming line codec
#[derive(Debug, Default)]
pub struct LineCodec {
    buffer: Vec<u8>,
}

impl LineCodec {
    /// Create a new line codec
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(256),
        }
    }

    /// Push raw bytes into the codec's buffer
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Try to extract the next complete line (without terminator)
    ///
    /// A trailing carriage return is stripped. Invalid UTF-8 is replaced
    /// rather than rejected.
    pub fn next_line(&mut self) -> Option<String> {
        let term_pos = self.buffer.iter().position(|&b| b == TERMINATOR)?;
        let line_bytes: Vec<u8> = self.buffer.drain(..=term_pos).collect();
        let mut line = &line_bytes[..line_bytes.len() - 1];
        if let Some(stripped) = line.strip_suffix(b"\r") {
            line = stripped;
        }
        Some(String::from_utf8_lossy(line).into_owned())
    }

    /// Drain every complete line currently buffered
    pub fn drain_lines(&mut self) -> Vec<String> {
        std::iter::from_fn(|| self.next_line()).collect()
    }

    /// Take a trailing line that was never terminated
    ///
    /// Used when the stream ends: the last line of a reply may arrive
    /// without its newline. Returns `None` when nothing is buffered.
    pub fn take_partial(&mut self) -> Option<String> {
        if let Some(line) = self.next_line() {
            return Some(line);
        }
        if self.buffer.is_empty() {
            return None;
        }
        let mut line = std::mem::take(&mut self.buffer);
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whether any bytes (complete line or not) are buffered
    pub fn has_pending(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Clear the internal buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Encode a request line with its terminator
pub fn encode_line(line: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(line.len() + 1);
    out.extend_from_slice(line.as_bytes());
    out.push(TERMINATOR);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut codec = LineCodec::new();
        codec.push_bytes(b"14074000\n");
        assert_eq!(codec.next_line().as_deref(), Some("14074000"));
        assert!(codec.next_line().is_none());
        assert!(!codec.has_pending());
    }

    #[test]
    fn test_streaming_parse() {
        let mut codec = LineCodec::new();

        codec.push_bytes(b"Model na");
        assert!(codec.next_line().is_none());
        assert!(codec.has_pending());

        codec.push_bytes(b"me: IC-7300\r\nRPRT 0\n");
        assert_eq!(codec.next_line().as_deref(), Some("Model name: IC-7300"));
        assert_eq!(codec.next_line().as_deref(), Some("RPRT 0"));
        assert!(codec.next_line().is_none());
    }

    #[test]
    fn test_empty_lines_are_lines() {
        let mut codec = LineCodec::new();
        codec.push_bytes(b"\n\nUSB\n");
        assert_eq!(codec.drain_lines(), vec!["", "", "USB"]);
    }

    #[test]
    fn test_take_partial() {
        let mut codec = LineCodec::new();
        codec.push_bytes(b"RPRT 0");
        assert!(codec.next_line().is_none());
        assert_eq!(codec.take_partial().as_deref(), Some("RPRT 0"));
        assert_eq!(codec.take_partial(), None);
    }

    #[test]
    fn test_clear() {
        let mut codec = LineCodec::new();
        codec.push_bytes(b"2400\nstale");
        codec.clear();
        assert!(!codec.has_pending());
        assert!(codec.next_line().is_none());
    }

    #[test]
    fn test_encode_line() {
        assert_eq!(encode_line("\\get_freq"), b"\\get_freq\n");
    }
}

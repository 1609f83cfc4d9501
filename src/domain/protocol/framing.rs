//! Stream framing for encoded messages.
//!
//! The controller link speaks newline-delimited JSON. That rule is kept behind
//! the [`Framing`] trait so a length-prefixed framing can replace it without
//! touching the codec or the link state machine.

/// Splits a byte stream into frames and wraps outbound payloads.
pub trait Framing: Send {
    /// Append the framed form of `payload` to `out`.
    fn encode_frame(&self, payload: &str, out: &mut Vec<u8>);

    /// Feed received bytes, returning every frame now complete.
    ///
    /// Incomplete trailing data stays buffered for the next call.
    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>>;

    /// Bytes buffered but not yet forming a complete frame.
    fn residual(&self) -> &[u8];

    /// Drop any buffered bytes.
    fn reset(&mut self);
}

/// `\n`-terminated frames. Blank lines are skipped.
#[derive(Debug, Default)]
pub struct LineFraming {
    buffer: Vec<u8>,
}

impl LineFraming {
    pub const DELIMITER: u8 = b'\n';

    pub fn new() -> Self {
        Self::default()
    }
}

impl Framing for LineFraming {
    fn encode_frame(&self, payload: &str, out: &mut Vec<u8>) {
        out.extend_from_slice(payload.as_bytes());
        out.push(Self::DELIMITER);
    }

    fn push(&mut self, bytes: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(bytes);

        let Some(last) = self.buffer.iter().rposition(|b| *b == Self::DELIMITER) else {
            return Vec::new();
        };

        let rest = self.buffer.split_off(last + 1);
        let complete = std::mem::replace(&mut self.buffer, rest);

        complete
            .split(|b| *b == Self::DELIMITER)
            .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
            .map(<[u8]>::to_vec)
            .collect()
    }

    fn residual(&self) -> &[u8] {
        &self.buffer
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }
}

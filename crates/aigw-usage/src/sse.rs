//! Minimal Server-Sent Events framing.
//!
//! Only `data:` lines matter to the usage parsers; everything else on the
//! wire is discarded. Partial lines are retained across pushes until
//! completed by later bytes, and one terminal partial `data:` line is
//! surfaced by [`SseFraming::finish`] when the stream closes mid-frame.

#[derive(Debug, Default)]
pub struct SseFraming {
    buffer: Vec<u8>,
}

impl SseFraming {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes and returns the payload of every completed `data:` line.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);
        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(payload) = data_payload(&line[..line.len() - 1]) {
                payloads.push(payload);
            }
        }
        payloads
    }

    /// Consumes a terminal partial line, if it is a `data:` line.
    pub fn finish(&mut self) -> Option<String> {
        let line = std::mem::take(&mut self.buffer);
        data_payload(&line)
    }
}

fn data_payload(line: &[u8]) -> Option<String> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    let value = line.strip_prefix(b"data:")?;
    // Working on whole lines keeps multi-byte characters intact even when
    // the wire chunks split them.
    let value = std::str::from_utf8(value).ok()?;
    Some(value.trim_start().to_string())
}

//! Upstream SSE line reassembly
//!
//! Provider responses arrive as byte chunks that need not align with line
//! boundaries. [`LineBuffer`] accumulates partial data and hands back only
//! complete lines, so the raw-parsing adapter path never interprets a
//! half-received `data:` payload.

/// Buffer for reassembling SSE lines across network chunk boundaries.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: String,
}

impl LineBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return the complete lines they close off.
    ///
    /// Lines are terminated by `\n`; the terminator is stripped and empty
    /// lines (SSE event separators) are dropped. Trailing data without a
    /// newline stays buffered for the next call. Invalid UTF-8 is replaced
    /// rather than rejected, matching how upstream SSE bodies are decoded
    /// elsewhere in the ecosystem.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        self.pending.push_str(&String::from_utf8_lossy(bytes));

        let mut lines = Vec::new();
        while let Some(pos) = self.pending.find('\n') {
            let rest = self.pending.split_off(pos + 1);
            let mut line = std::mem::replace(&mut self.pending, rest);
            line.truncate(pos);
            if !line.is_empty() {
                lines.push(line);
            }
        }
        lines
    }
}

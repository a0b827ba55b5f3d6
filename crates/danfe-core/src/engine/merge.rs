//! Description merging across wrapped lines.
//!
//! Two real-world layouts feed this buffer: single-line templates where the
//! description sits inline with the technical tokens, and multi-line
//! templates where the description occupies its own line(s) next to a bare
//! technical line. Continuation text accumulates here until the next product
//! line claims it.

/// Merger state, exposed for assertions and tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// No pending description text.
    Idle,
    /// Accumulating continuation text for the next record.
    Buffering,
}

/// Buffering state machine for wrapped descriptions.
#[derive(Debug, Default)]
pub struct DescriptionMerger {
    buffer: String,
}

impl DescriptionMerger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MergeState {
        if self.buffer.is_empty() {
            MergeState::Idle
        } else {
            MergeState::Buffering
        }
    }

    /// Append a continuation line to the pending buffer (space-joined).
    pub fn push(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(line);
    }

    /// Resolve the description for a freshly assigned record.
    ///
    /// In the description-then-data layout the buffer IS the description; in
    /// the inline layout the buffer is prepended to what field assignment
    /// recovered from the line itself. Either way the buffer drains.
    pub fn claim(&mut self, inline: &str) -> String {
        let buffered = std::mem::take(&mut self.buffer);
        match (buffered.is_empty(), inline.is_empty()) {
            (true, _) => inline.to_string(),
            (false, true) => buffered,
            (false, false) => format!("{buffered} {inline}"),
        }
    }

    /// Drain whatever is left at end of document. The caller decides whether
    /// a trailing record owns it or it gets discarded.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }
}

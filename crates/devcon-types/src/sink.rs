//! Output sink contract.

/// Destination for text produced by the interpreter.
///
/// The scrollback buffer is the usual implementation; `Vec<String>` is
/// provided for hosts that post-process output (and for tests).
pub trait OutputSink {
    /// Append one message. Multi-line messages are split by the sink.
    fn append(&mut self, message: &str);

    /// Drop everything appended so far.
    fn clear(&mut self);
}

impl OutputSink for Vec<String> {
    fn append(&mut self, message: &str) {
        self.push(message.to_string());
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

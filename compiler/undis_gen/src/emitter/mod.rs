//! Output emitter.
//!
//! Builds the generated text and keeps the current output line, which the
//! line map records against each statement's source line.

/// String-based emitter.
#[derive(Default)]
pub(crate) struct StringEmitter {
    buffer: String,
    newlines: usize,
}

impl StringEmitter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        StringEmitter {
            buffer: String::with_capacity(capacity),
            newlines: 0,
        }
    }

    /// Emit a text fragment.
    pub(crate) fn emit(&mut self, text: &str) {
        self.newlines += text.bytes().filter(|&b| b == b'\n').count();
        self.buffer.push_str(text);
    }

    pub(crate) fn emit_newline(&mut self) {
        self.newlines += 1;
        self.buffer.push('\n');
    }

    /// Emit indentation as the given number of spaces.
    pub(crate) fn emit_indent(&mut self, spaces: usize) {
        self.buffer.extend(std::iter::repeat(' ').take(spaces));
    }

    pub(crate) fn ends_with(&self, suffix: &str) -> bool {
        self.buffer.ends_with(suffix)
    }

    pub(crate) fn len(&self) -> usize {
        self.buffer.len()
    }

    /// 1-based line the next fragment lands on.
    pub(crate) fn line(&self) -> usize {
        self.newlines + 1
    }

    pub(crate) fn output(self) -> String {
        self.buffer
    }
}

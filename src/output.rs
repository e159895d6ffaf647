/// Growable text buffer the HTML renderer appends to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    buffer: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: String::with_capacity(capacity),
        }
    }

    /// Appends the character with that code point.
    /// Surrogates and values past U+10FFFF become U+FFFD.
    pub fn append_code_point(&mut self, code_point: u32) {
        self.buffer
            .push(char::from_u32(code_point).unwrap_or(char::REPLACEMENT_CHARACTER));
    }

    pub fn append_char(&mut self, c: char) {
        self.buffer.push(c);
    }

    pub fn append_str(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The accumulated text, the buffer is left untouched
    pub fn build(&self) -> String {
        self.buffer.clone()
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl std::fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

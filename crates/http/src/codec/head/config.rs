//! Parser configuration.

/// Maximum number of headers allowed in a request
const MAX_HEADER_NUM: usize = 64;

/// Maximum size in bytes allowed for the request line plus the header block
const MAX_HEAD_BYTES: usize = 8 * 1024;

/// How strictly lines of the request head must be terminated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    /// Only `\r\n` ends a line.
    Strict,
    /// `\r\n` or a bare `\n` ends a line.
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    line_ending: LineEnding,
    max_head_size: usize,
    max_headers: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { line_ending: LineEnding::default(), max_head_size: MAX_HEAD_BYTES, max_headers: MAX_HEADER_NUM }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_max_head_size(mut self, max_head_size: usize) -> Self {
        self.max_head_size = max_head_size;
        self
    }

    pub fn with_max_headers(mut self, max_headers: usize) -> Self {
        self.max_headers = max_headers;
        self
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn max_head_size(&self) -> usize {
        self.max_head_size
    }

    pub fn max_headers(&self) -> usize {
        self.max_headers
    }
}

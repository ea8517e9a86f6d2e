/// Indentation unit for generated C/C++
pub const INDENT: &str = "\t";

/// Output buffer that accumulates generated lines for one region
pub struct Output {
    lines: Vec<String>,
    current_line: String,
}

impl Output {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            current_line: String::new(),
        }
    }

    /// Add text to the current line
    pub fn push(&mut self, text: &str) {
        self.current_line.push_str(text);
    }

    /// Indent the current line by `level` units
    pub fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.current_line.push_str(INDENT);
        }
    }

    /// End the current line
    pub fn newline(&mut self) {
        self.lines.push(std::mem::take(&mut self.current_line));
    }

    /// Emit a complete line at the given indentation level
    pub fn line(&mut self, level: usize, text: &str) {
        self.indent(level);
        self.push(text);
        self.newline();
    }

    /// Emit an empty line
    pub fn blank(&mut self) {
        self.newline();
    }

    /// Append already-formatted lines (e.g. preprocessor directives)
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, lines: I) {
        debug_assert!(self.current_line.is_empty());
        self.lines.extend(lines);
    }

    /// Finish and return the generated lines
    pub fn finish(mut self) -> Vec<String> {
        if !self.current_line.is_empty() {
            self.lines.push(std::mem::take(&mut self.current_line));
        }
        self.lines
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

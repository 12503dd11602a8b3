//! Indented text builder.

/// One indentation step.
const INDENT: &str = "    ";

/// Accumulates generated source line by line with an indentation level.
#[derive(Debug, Clone, Default)]
pub struct CodeWriter {
    output: String,
    level: usize,
}

impl CodeWriter {
    /// Creates an empty writer indenting with four spaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.output.push_str(INDENT);
            }
            self.output.push_str(text);
        }
        self.output.push('\n');
        self
    }

    /// Writes an empty line.
    pub fn blank(&mut self) -> &mut Self {
        self.output.push('\n');
        self
    }

    /// Increases the indentation level.
    pub fn indent(&mut self) -> &mut Self {
        self.level += 1;
        self
    }

    /// Decreases the indentation level.
    pub fn dedent(&mut self) -> &mut Self {
        self.level = self.level.saturating_sub(1);
        self
    }

    /// Writes `open`, the indented body, then `close`.
    pub fn block(
        &mut self,
        open: impl AsRef<str>,
        close: impl AsRef<str>,
        body: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.line(open);
        self.indent();
        body(self);
        self.dedent();
        self.line(close)
    }

    /// Consumes the writer, returning the text.
    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

/// Default indentation width in spaces.
pub const DEFAULT_INDENT: usize = 4;

/// Default maximum line length.
pub const DEFAULT_LINE_LENGTH: usize = 120;

/// Layout settings for the formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces added per nesting level.
    pub indent_width: usize,
    /// Column limit used for inline/multiline decisions and packing.
    pub max_line_length: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT,
            max_line_length: DEFAULT_LINE_LENGTH,
        }
    }
}

impl FormatOptions {
    /// Create options with the default layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }

    /// Set the maximum line length.
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = FormatOptions::new();
        assert_eq!(options.indent_width, 4);
        assert_eq!(options.max_line_length, 120);
    }

    #[test]
    fn builder_overrides() {
        let options = FormatOptions::new()
            .with_indent_width(2)
            .with_max_line_length(80);
        assert_eq!(
            options,
            FormatOptions {
                indent_width: 2,
                max_line_length: 80
            }
        );
    }
}

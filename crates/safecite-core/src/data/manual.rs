//! Flat-text regulatory manual, held as an ordered sequence of lines.

/// Line-indexed full-text corpus. No structure beyond line splitting.
#[derive(Debug, Clone, Default)]
pub struct ManualText {
    lines: Vec<String>,
}

impl ManualText {
    /// An empty manual; every search reports no match.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Split text into lines (`\n` or `\r\n`).
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }

    /// All lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_lines() {
        let manual = ManualText::from_text("first\r\nsecond\nthird\n");
        assert_eq!(manual.len(), 3);
        assert_eq!(manual.lines()[1], "second");
    }

    #[test]
    fn test_empty_text() {
        assert!(ManualText::from_text("").is_empty());
        assert!(ManualText::empty().is_empty());
    }

    #[test]
    fn test_blank_lines_kept() {
        let manual = ManualText::from_text("a\n\nb");
        assert_eq!(manual.len(), 3);
        assert_eq!(manual.lines()[1], "");
    }
}

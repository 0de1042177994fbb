//! Full-text search over the manual, returning context windows.
//!
//! The manual is an unindexed corpus: every search is a linear scan. A line
//! matches when it contains any query token (case-insensitive substring). Each
//! matching line yields its own window, even when windows overlap.

use crate::data::ManualText;

/// Lines included on each side of a matching line by default.
pub const DEFAULT_CONTEXT_LINES: usize = 5;

/// Maximum windows collected per search by default.
pub const DEFAULT_MAX_WINDOWS: usize = 3;

/// Separator placed between rendered windows.
pub const WINDOW_SEPARATOR: &str = "\n\n---\n\n";

/// A slice of manual lines surrounding a matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// Index of the line that matched (0-based).
    pub hit_line: usize,
    /// First line of the window (0-based, inclusive).
    pub start: usize,
    /// Last line of the window (0-based, inclusive).
    pub end: usize,
    /// The window's lines joined with `\n`.
    pub text: String,
}

impl ContextWindow {
    /// Number of lines in the window.
    pub fn line_count(&self) -> usize {
        self.end - self.start + 1
    }
}

/// Linear scanner over a [`ManualText`].
#[derive(Debug, Clone, Copy)]
pub struct TextSearch<'a> {
    manual: &'a ManualText,
    context_lines: usize,
    max_windows: usize,
}

impl<'a> TextSearch<'a> {
    pub fn new(manual: &'a ManualText) -> Self {
        Self {
            manual,
            context_lines: DEFAULT_CONTEXT_LINES,
            max_windows: DEFAULT_MAX_WINDOWS,
        }
    }

    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    pub fn with_max_windows(mut self, windows: usize) -> Self {
        self.max_windows = windows;
        self
    }

    /// Collect up to `max_windows` windows, in manual order.
    pub fn search(&self, query: &str) -> Vec<ContextWindow> {
        let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
        if tokens.is_empty() {
            return Vec::new();
        }

        let lines = self.manual.lines();
        let mut windows = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            if windows.len() >= self.max_windows {
                break;
            }
            let lowered = line.to_lowercase();
            if !tokens.iter().any(|t| lowered.contains(t.as_str())) {
                continue;
            }

            let start = idx.saturating_sub(self.context_lines);
            let end = (idx + self.context_lines).min(lines.len() - 1);
            windows.push(ContextWindow {
                hit_line: idx,
                start,
                end,
                text: lines[start..=end].join("\n"),
            });
        }
        windows
    }

    /// Search and join the windows for presentation.
    ///
    /// Returns `None` when nothing matched; callers substitute their own
    /// fallback message.
    pub fn render(&self, query: &str) -> Option<String> {
        let windows = self.search(query);
        if windows.is_empty() {
            return None;
        }
        Some(
            windows
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(WINDOW_SEPARATOR),
        )
    }
}

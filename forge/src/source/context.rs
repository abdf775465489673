//! Source context: registry of open sources by path (`spec.md` §4.D).

use std::collections::HashMap;
use std::sync::Arc;

use super::Source;
use crate::location::Range;

/// Registry of `Source` instances keyed by path, used to render
/// diagnostic excerpts.
#[derive(Debug, Default)]
pub struct SourceContext {
    sources: HashMap<Arc<str>, Source>,
}

impl SourceContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source, keyed by its path. Paths are unique; adding a
    /// source under a path that is already registered replaces it.
    pub fn insert(&mut self, source: Source) {
        self.sources.insert(source.path().clone(), source);
    }

    pub fn get(&self, path: &str) -> Option<&Source> {
        self.sources.get(path)
    }

    /// Renders a `Range` into the excerpt text the diagnostic renderer
    /// needs: the full text of the range's start line, so the caller can
    /// underline `column..column + length - 1` beneath it.
    ///
    /// Returns `None` if the range is synthetic or its path is not
    /// registered.
    pub fn render_line(&self, range: &Range) -> Option<String> {
        if range.is_synthetic() {
            return None;
        }

        let source = self.get(&range.start.path)?;
        let text = source.text();
        let target_line = range.start.line;

        let mut line_start = 0usize;
        let mut current_line = 1u32;
        for (idx, byte) in text.bytes().enumerate() {
            if current_line == target_line {
                line_start = idx;
                break;
            }
            if byte == b'\n' {
                current_line += 1;
            }
            line_start = idx + 1;
        }

        if current_line != target_line && target_line != 1 {
            return None;
        }

        let rest = &text[line_start..];
        let line_end = rest.find('\n').map(|i| line_start + i).unwrap_or(text.len());

        Some(text[line_start..line_end].to_string())
    }
}

//! Source locations and ranges (`spec.md` §3 "Source location and range").

use std::sync::Arc;

/// A single point in a source file.
///
/// `path` is reference-counted rather than borrowed so that a `Location`
/// can be cloned freely into a `Message` without threading a lifetime
/// through the diagnostics machinery; `spec.md` §5 only requires that the
/// path string outlive the range's use, which `Arc<str>` guarantees
/// without forcing the AST to carry a lifetime parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Location {
    pub path: Arc<str>,
    pub byte_offset: usize,
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(path: Arc<str>, byte_offset: usize, line: u32, column: u32) -> Self {
        debug_assert!(line >= 1, "line numbers are 1-based");
        debug_assert!(column >= 1, "column numbers are 1-based");
        Self {
            path,
            byte_offset,
            line,
            column,
        }
    }

    fn synthetic() -> Self {
        Self {
            path: Arc::from(""),
            byte_offset: 0,
            line: 0,
            column: 0,
        }
    }
}

/// A contiguous span of source text, `{ start, length_in_columns }`.
///
/// `length_in_columns` deliberately does not model multi-line ranges
/// directly: per `spec.md` §4.D the source-context renderer only ever
/// needs "start of line through column + length - 1", and multi-line
/// diagnostic spans are represented by the caller attaching a range per
/// line via message children rather than by this type growing a second
/// dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Range {
    pub start: Location,
    pub length_in_columns: u32,
}

impl Range {
    pub fn new(start: Location, length_in_columns: u32) -> Self {
        Self {
            start,
            length_in_columns,
        }
    }

    /// The sentinel "null range" used by synthesized nodes that are not
    /// tied to any source text (`spec.md` §3 AST invariants).
    pub fn synthetic() -> Self {
        Self {
            start: Location::synthetic(),
            length_in_columns: 0,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.start.line == 0
    }

    /// The exclusive end column of this range on its start line.
    pub fn end_column(&self) -> u32 {
        self.start.column + self.length_in_columns
    }

    /// Extends from `self`'s start to cover `other`'s end, per `spec.md`
    /// §8 "Range span linearity": `span(a, b)` for two ranges on the same
    /// source path. Panics (an internal-error condition, §7) if the two
    /// ranges come from different source paths.
    pub fn span(&self, other: &Range) -> Range {
        assert_eq!(
            self.start.path, other.start.path,
            "cannot span ranges from different source paths"
        );

        let (first, second) = if self.start.byte_offset <= other.start.byte_offset {
            (self, other)
        } else {
            (other, self)
        };

        if first.start.line == second.start.line {
            let length = second.end_column().saturating_sub(first.start.column);
            Range::new(first.start.clone(), length.max(first.length_in_columns))
        } else {
            // Spans crossing lines cannot be expressed as a single
            // column length; keep the first line's length as a
            // best-effort anchor for excerpt rendering.
            Range::new(first.start.clone(), first.length_in_columns)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(offset: usize, line: u32, column: u32) -> Location {
        Location::new(Arc::from("a.forge"), offset, line, column)
    }

    #[test]
    fn span_linearity() {
        let a = Range::new(loc(0, 1, 1), 1);
        let b = Range::new(loc(5, 1, 6), 1);
        let c = Range::new(loc(10, 1, 11), 1);

        let ab = a.span(&b);
        let abc = ab.span(&c);
        let ac = a.span(&c);

        assert_eq!(abc, ac);
    }

    #[test]
    fn synthetic_range_is_recognized() {
        assert!(Range::synthetic().is_synthetic());
        assert!(!Range::new(loc(0, 1, 1), 1).is_synthetic());
    }
}

//! Diagnostic machinery: severities, messages, the message buffer and its
//! query API (`spec.md` §3 "Diagnostics", §4.C).

pub mod codes;
mod query;

pub use query::MessageQuery;

use crate::location::Range;

/// Severity taxonomy, ordered ascending in "badness" (`spec.md` §4.C).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Debug,
    Note,
    Warning,
    Error,
    Fatal,
    Internal,
}

impl Severity {
    /// Whether this severity sets the pipeline's "had errors" flag.
    pub fn is_error_like(self) -> bool {
        self >= Severity::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug => "debug",
            Severity::Note => "note",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Internal => "internal",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One diagnostic entity. `children` lets a message group related
/// sub-messages (e.g. "note: previous declaration here").
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub log_path: Option<String>,
    pub log_line: Option<u32>,
    pub source_range: Option<Range>,
    pub severity: Severity,
    pub code: Option<&'static str>,
    pub text: String,
    pub children: Vec<Message>,
}

impl Message {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            log_path: None,
            log_line: None,
            source_range: None,
            severity,
            code: None,
            text: text.into(),
            children: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: &'static str) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_range(mut self, range: Range) -> Self {
        self.source_range = Some(range);
        self
    }

    pub fn with_child(mut self, child: Message) -> Self {
        self.children.push(child);
        self
    }

    /// Appends a child message after construction, growing the tree in
    /// place (`spec.md` §3 "Child attachment grows a tree").
    pub fn add_child(&mut self, child: Message) {
        self.children.push(child);
    }

    /// Renders `<severity>[<CODE>]: <text>` plus, if a source range and
    /// source context are available, an excerpt with a caret span
    /// underneath it; children render indented beneath, recursively
    /// (`spec.md` §6 "Message rendering").
    pub fn render(&self, ctx: &crate::source::SourceContext, out: &mut String) {
        self.render_indented(ctx, out, 0);
    }

    fn render_indented(&self, ctx: &crate::source::SourceContext, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self.code {
            Some(code) => out.push_str(&format!("{pad}{}[{code}]: {}\n", self.severity, self.text)),
            None => out.push_str(&format!("{pad}{}: {}\n", self.severity, self.text)),
        }

        if let Some(range) = &self.source_range {
            if let Some(line_text) = ctx.render_line(range) {
                out.push_str(&format!("{pad}  {:>4} | {}\n", range.start.line, line_text));
                let caret_pad = " ".repeat(range.start.column.saturating_sub(1) as usize);
                let carets = "^".repeat(range.length_in_columns.max(1) as usize);
                out.push_str(&format!("{pad}       | {caret_pad}{carets}\n"));
            }
        }

        for child in &self.children {
            child.render_indented(ctx, out, indent + 1);
        }
    }
}

/// An append-only collection of diagnostics with running counters.
///
/// Counters are incremented per-emission rather than recomputed by
/// iterating `messages`, matching `original_source/forge-compiler`'s flat
/// `frg_message_buffer_t` and the determinism `spec.md` §8 "Message
/// counting" requires.
#[derive(Debug, Default, Clone, serde::Serialize, serde::Deserialize)]
pub struct MessageBuffer {
    messages: Vec<Message>,
    total: usize,
    errors: usize,
    warnings: usize,
}

impl MessageBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message and updates the counters atomically.
    pub fn emit(&mut self, message: Message) {
        self.total += 1;
        match message.severity {
            Severity::Warning => self.warnings += 1,
            s if s.is_error_like() => self.errors += 1,
            _ => {}
        }
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    pub fn had_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn query(&self, query: &MessageQuery) -> Vec<&Message> {
        self.messages
            .iter()
            .filter(|message| query.matches(message))
            .collect()
    }

    /// Returns *none*, *single* or *multiple* — never an arbitrary
    /// choice among several matches (`spec.md` §4.C).
    pub fn query_single(&self, query: &MessageQuery) -> QuerySingleResult<'_> {
        let mut matches = self.query(query).into_iter();
        match (matches.next(), matches.next()) {
            (None, _) => QuerySingleResult::None,
            (Some(only), None) => QuerySingleResult::Single(only),
            (Some(_), Some(_)) => QuerySingleResult::Multiple,
        }
    }

    pub fn render_all(&self, ctx: &crate::source::SourceContext) -> String {
        let mut out = String::new();
        for message in &self.messages {
            message.render(ctx, &mut out);
        }
        out
    }
}

#[derive(Debug)]
pub enum QuerySingleResult<'a> {
    None,
    Single(&'a Message),
    Multiple,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_tracks_error_like_severities() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Message::new(Severity::Error, "a"));
        buffer.emit(Message::new(Severity::Warning, "b"));
        buffer.emit(Message::new(Severity::Note, "c"));
        buffer.emit(Message::new(Severity::Fatal, "d"));
        buffer.emit(Message::new(Severity::Internal, "e"));

        assert_eq!(buffer.total(), 5);
        assert_eq!(buffer.error_count(), 3);
        assert_eq!(buffer.warning_count(), 1);
        assert!(buffer.had_errors());
    }

    #[test]
    fn query_exactness() {
        let mut buffer = MessageBuffer::new();
        buffer.emit(Message::new(Severity::Error, "Hi"));
        buffer.emit(Message::new(Severity::Error, "Bye"));

        let single = buffer.query(&MessageQuery::default().with_severity(Severity::Error).with_text("Hi"));
        assert_eq!(single.len(), 1);

        let both = buffer.query(&MessageQuery::default().with_severity(Severity::Error));
        assert_eq!(both.len(), 2);

        let empty_query = buffer.query(&MessageQuery::default());
        assert!(empty_query.is_empty());
    }

    #[test]
    fn query_single_distinguishes_none_single_multiple() {
        let mut buffer = MessageBuffer::new();
        assert!(matches!(
            buffer.query_single(&MessageQuery::default().with_severity(Severity::Error)),
            QuerySingleResult::None
        ));

        buffer.emit(Message::new(Severity::Error, "only"));
        assert!(matches!(
            buffer.query_single(&MessageQuery::default().with_severity(Severity::Error)),
            QuerySingleResult::Single(_)
        ));

        buffer.emit(Message::new(Severity::Error, "another"));
        assert!(matches!(
            buffer.query_single(&MessageQuery::default().with_severity(Severity::Error)),
            QuerySingleResult::Multiple
        ));
    }
}

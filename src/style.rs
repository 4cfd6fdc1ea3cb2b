//! Lexical styles and the spans the lexers produce.

use std::fmt;

/// Lexical class of a run of pattern characters.
///
/// The pattern lexer's states are named after the style they paint, so the
/// same enum doubles as the state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    /// Nothing consumed yet; dispatch state.
    Default,
    /// Literal characters.
    Text,
    /// Standalone `. ^ $ |`, or `^`/`-` inside a charset.
    Special,
    /// `[` and `]`.
    CharsetOperator,
    /// `(` and `)`.
    Operator,
    /// Body of a `(?#...)` comment.
    Comment,
    /// Back-reference: `\1`, `(?P=name)`, `\k<name>`, `\g<name>`.
    GroupRef,
    /// `* + ?`, brace repetitions and their lazy forms.
    Quantifier,
    /// Everything between `(?` and the group body.
    GroupTag,
    /// `\d \D \s \S \w \W \b \B \A \Z`
    CharClass,
    /// Literal, octal and hex escapes.
    CharEscape,
}

impl Style {
    /// Numeric lexical-state code used by the editor's highlighter.
    pub fn code(self) -> u8 {
        match self {
            Style::Default => 0,
            Style::Comment => 1,
            Style::Text => 2,
            Style::Special => 3,
            Style::CharsetOperator => 4,
            Style::Operator => 5,
            Style::GroupRef => 6,
            Style::Quantifier => 7,
            Style::GroupTag => 8,
            Style::CharClass => 9,
            Style::CharEscape => 10,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Style::Default => "default",
            Style::Text => "text",
            Style::Special => "special",
            Style::CharsetOperator => "charset_operator",
            Style::Operator => "operator",
            Style::Comment => "comment",
            Style::GroupRef => "groupref",
            Style::Quantifier => "quantifier",
            Style::GroupTag => "grouptag",
            Style::CharClass => "charclass",
            Style::CharEscape => "charescape",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A styled run ending (inclusively) at character index `end`.
///
/// The run starts right after the previous span's `end`, or at 0 for the
/// first span of a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub style: Style,
    pub end: usize,
}

impl Span {
    pub fn new(style: Style, end: usize) -> Self {
        Span { style, end }
    }
}

impl From<(Style, usize)> for Span {
    fn from((style, end): (Style, usize)) -> Self {
        Span { style, end }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.style, self.end)
    }
}

/// Appends spans while keeping track of how far the input is covered.
#[derive(Debug, Default)]
pub(crate) struct SpanSink {
    spans: Vec<Span>,
    covered: usize,
}

impl SpanSink {
    /// Paints everything up to (exclusive) `pos` with `style`. Does nothing
    /// when `pos` has not moved past the last emitted span.
    pub(crate) fn emit(&mut self, style: Style, pos: usize) {
        if pos > self.covered {
            self.spans.push(Span::new(style, pos - 1));
            self.covered = pos;
        }
    }

    pub(crate) fn finish(self) -> Vec<Span> {
        self.spans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sink_skips_empty_runs() {
        let mut sink = SpanSink::default();
        sink.emit(Style::Default, 0);
        sink.emit(Style::Text, 3);
        sink.emit(Style::Operator, 3);
        sink.emit(Style::Operator, 4);
        assert_eq!(
            sink.finish(),
            vec![Span::new(Style::Text, 2), Span::new(Style::Operator, 3)]
        );
    }

    #[test]
    fn display_uses_snake_case_names() {
        assert_eq!(Span::new(Style::CharsetOperator, 4).to_string(), "(charset_operator, 4)");
        assert_eq!(Style::GroupRef.to_string(), "groupref");
        assert_eq!(Style::CharEscape.code(), 10);
    }
}

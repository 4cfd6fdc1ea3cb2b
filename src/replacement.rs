//! Replacement-template lexer (`\1`, `\g<name>`, `\xHH`, ...).
//!
//! Group references are only checked for shape here; the template lexer
//! never sees the pattern's groups.

use tracing::{debug, trace};

use crate::chars::{is_digit_char, is_hex_digit, is_ident_char};
use crate::dialect::Dialect;
use crate::error::{LexError, LexResult};
use crate::style::{Span, SpanSink, Style};

/// Lex the replacement `template` under `dialect`. Template syntax is the
/// same in every dialect; `dialect` is only logged.
pub fn lex_replacement(template: &str, dialect: Dialect) -> LexResult<Vec<Span>> {
    debug!(template, %dialect, "lexing replacement");
    ReplacementLexer::new(template).lex()
}

pub struct ReplacementLexer {
    chars: Vec<char>,
    pos: usize,
    sink: SpanSink,
}

impl ReplacementLexer {
    pub fn new(template: &str) -> Self {
        ReplacementLexer {
            chars: template.chars().collect(),
            pos: 0,
            sink: SpanSink::default(),
        }
    }

    pub fn lex(mut self) -> LexResult<Vec<Span>> {
        let mut state = Style::Default;
        loop {
            trace!(pos = self.pos, %state, "step");
            let next = match state {
                Style::Text => self.lex_text(),
                Style::GroupRef => self.lex_group_ref()?,
                Style::CharEscape => self.lex_char_escape()?,
                // Templates only ever reach the four states above.
                _ => self.lex_default()?,
            };
            self.sink.emit(state, self.pos);
            if self.pos >= self.chars.len() {
                break;
            }
            state = next;
        }
        Ok(self.sink.finish())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn lex_default(&mut self) -> LexResult<Style> {
        match self.peek() {
            None => Ok(Style::Default),
            Some('\\') => match self.chars.get(self.pos + 1) {
                None => Err(LexError::at("unexpected end of string in escape", self.pos)),
                Some(&c) if c == 'g' || is_digit_char(c) => Ok(Style::GroupRef),
                Some(_) => Ok(Style::CharEscape),
            },
            Some(_) => Ok(Style::Text),
        }
    }

    fn lex_text(&mut self) -> Style {
        while self.peek().is_some_and(|c| c != '\\') {
            self.pos += 1;
        }
        Style::Default
    }

    /// `\g<name>`, `\g<N>` or `\N...`.
    fn lex_group_ref(&mut self) -> LexResult<Style> {
        let ref_start = self.pos;
        self.pos += 1;
        if self.peek() != Some('g') {
            // Leading zeros are accepted: `\01` is group 1.
            while self.peek().is_some_and(is_digit_char) {
                self.pos += 1;
            }
            return Ok(Style::Default);
        }

        self.pos += 1;
        match self.peek() {
            None => {
                return Err(LexError::spanning(
                    "group reference is not terminated",
                    ref_start,
                    self.pos,
                ))
            }
            Some('<') => self.pos += 1,
            Some(_) => return Err(LexError::at("illegal start of group reference", self.pos)),
        }

        let numbered = match self.peek() {
            None => {
                return Err(LexError::spanning(
                    "group reference is not terminated",
                    ref_start,
                    self.pos,
                ))
            }
            Some('>') => return Err(LexError::at("group cannot be empty", self.pos)),
            Some(c) if is_ident_char(c) => false,
            Some(c) if is_digit_char(c) => true,
            Some(_) => return Err(LexError::at("illegal character in group name", self.pos)),
        };
        let label_start = self.pos;
        self.pos += 1;
        loop {
            match self.peek() {
                None => {
                    let what = if numbered { "number" } else { "name" };
                    return Err(LexError::spanning(
                        format!("group {what} is not terminated"),
                        label_start,
                        self.pos,
                    ));
                }
                Some('>') => {
                    self.pos += 1;
                    return Ok(Style::Default);
                }
                Some(c) if numbered && !is_digit_char(c) => {
                    return Err(LexError::at("illegal character in group number", self.pos))
                }
                Some(c) if !numbered && !is_ident_char(c) && !is_digit_char(c) => {
                    return Err(LexError::at("illegal character in group name", self.pos))
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// `\xHH` or any single escaped character other than `g` or a digit.
    fn lex_char_escape(&mut self) -> LexResult<Style> {
        let start = self.pos;
        self.pos += 1;
        match self.peek() {
            None => {
                return Err(LexError::spanning(
                    "unexpected end of string in escape",
                    start,
                    self.pos,
                ))
            }
            Some('x') => {
                self.pos += 1;
                for _ in 0..2 {
                    match self.peek() {
                        None => {
                            return Err(LexError::spanning(
                                "unexpected end of string in escape",
                                start,
                                self.pos,
                            ))
                        }
                        Some(h) if !is_hex_digit(h) => {
                            return Err(LexError::spanning(
                                "unexpected end of hex char escape",
                                start,
                                self.pos,
                            ))
                        }
                        Some(_) => self.pos += 1,
                    }
                }
            }
            Some(c) if c == 'g' || is_digit_char(c) => {
                return Err(LexError::at("unexpected character escape character", self.pos))
            }
            Some(_) => self.pos += 1,
        }
        Ok(Style::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Style::{CharEscape, GroupRef, Text};

    fn lexes_to(template: &str, expected: &[(Style, usize)]) {
        let spans = lex_replacement(template, Dialect::Python)
            .unwrap_or_else(|e| panic!("lexing {template:?} failed: {e}"));
        let expected: Vec<Span> = expected.iter().copied().map(Span::from).collect();
        assert_eq!(spans, expected, "lexing {template:?}");
    }

    fn error(template: &str) -> LexError {
        lex_replacement(template, Dialect::Python).unwrap_err()
    }

    #[test]
    fn group_references() {
        lexes_to("\\g<name>", &[(GroupRef, 7)]);
        lexes_to("\\g<0>", &[(GroupRef, 4)]);
        lexes_to("\\g<12>x", &[(GroupRef, 5), (Text, 6)]);
        lexes_to("\\1", &[(GroupRef, 1)]);
        lexes_to("\\001", &[(GroupRef, 3)]);
        lexes_to("a\\1b", &[(Text, 0), (GroupRef, 2), (Text, 3)]);
        lexes_to("\\1\\2", &[(GroupRef, 1), (GroupRef, 3)]);
    }

    #[test]
    fn escapes_and_text() {
        lexes_to("plain text", &[(Text, 9)]);
        lexes_to("\\n", &[(CharEscape, 1)]);
        lexes_to("\\x41-", &[(CharEscape, 3), (Text, 4)]);
        assert_eq!(lex_replacement("", Dialect::Perl), Ok(vec![]));
    }

    #[test]
    fn malformed_group_references() {
        let err = error("\\g<>");
        assert_eq!(err.message, "group cannot be empty");
        assert_eq!(err.start, Some(3));
        assert_eq!(error("\\g").message, "group reference is not terminated");
        assert_eq!(error("\\g<").message, "group reference is not terminated");
        assert_eq!(error("\\gx").start, Some(2));
        assert_eq!(error("\\g<na-me>").message, "illegal character in group name");
        assert_eq!(error("\\g<1a>").message, "illegal character in group number");
        assert_eq!(error("\\g<-1>").message, "illegal character in group name");
        let err = error("\\g<name");
        assert_eq!((err.start, err.end), (Some(3), Some(7)));
        assert_eq!(err.message, "group name is not terminated");
    }

    #[test]
    fn malformed_escapes() {
        assert_eq!(error("abc\\").start, Some(3));
        let err = error("\\xZ1");
        assert_eq!((err.start, err.end), (Some(0), Some(2)));
        let err = error("\\x1");
        assert_eq!((err.start, err.end), (Some(0), Some(3)));
    }
}

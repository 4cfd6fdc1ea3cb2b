//! The single error raised by both lexers.

use thiserror::Error;

/// A syntax error found while lexing. `end` is exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.message, .start, .end))]
pub struct LexError {
    pub message: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
}

pub type LexResult<T> = Result<T, LexError>;

impl LexError {
    pub fn new(message: impl Into<String>) -> Self {
        LexError {
            message: message.into(),
            start: None,
            end: None,
        }
    }

    pub fn at(message: impl Into<String>, pos: usize) -> Self {
        LexError {
            message: message.into(),
            start: Some(pos),
            end: None,
        }
    }

    pub fn spanning(message: impl Into<String>, start: usize, end: usize) -> Self {
        LexError {
            message: message.into(),
            start: Some(start),
            end: Some(end),
        }
    }
}

fn render(message: &str, start: &Option<usize>, end: &Option<usize>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{start}-{end}: {message}"),
        (Some(start), None) => format!("{start}: {message}"),
        _ => message.to_string(),
    }
}

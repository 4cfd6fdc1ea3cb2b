//! Lexical analysis of regular expressions for syntax highlighting.
//!
//! [`lex_pattern`] classifies every character of a pattern into a [`Style`]
//! under one of five dialects and reports the first syntax error it meets.
//! [`lex_replacement`] does the same for replacement templates.
//!
//! ```
//! use lexregex::{lex_pattern, Dialect, Span, Style};
//!
//! let spans = lex_pattern("[a-c]", Dialect::Python).unwrap();
//! assert_eq!(spans[2], Span::new(Style::Special, 2));
//! assert!(lex_pattern("(?<=x)y", Dialect::JavaScript).is_err());
//! ```

pub mod chars;
pub mod dialect;
pub mod error;
pub mod groups;
pub mod lexer;
pub mod replacement;
pub mod style;

pub use dialect::{Dialect, DialectPolicy, Feature};
pub use error::{LexError, LexResult};
pub use lexer::{lex_pattern, PatternLexer};
pub use replacement::{lex_replacement, ReplacementLexer};
pub use style::{Span, Style};

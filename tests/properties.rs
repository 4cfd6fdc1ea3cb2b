//! Property-based checks of the span invariants.

use lexregex::{lex_pattern, Dialect, Span, Style};
use proptest::prelude::*;

const ALPHABET: &[char] = &[
    'a', 'b', 'z', '0', '1', '7', '9', '(', ')', '[', ']', '{', '}', ',', '\\', '^', '$', '.', '|',
    '*', '+', '?', '-', ':', '=', '!', '<', '>', '\'', '#', 'P', 'k', 'x', 'd', 'i',
];

fn pattern_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(ALPHABET), 0..24)
        .prop_map(|chars| chars.into_iter().collect())
}

fn dialect_strategy() -> impl Strategy<Value = Dialect> {
    prop::sample::select(Dialect::ALL.to_vec())
}

/// Style of every character, expanded from the span list.
fn styles_per_char(spans: &[Span]) -> Vec<Style> {
    let mut styles = Vec::new();
    for span in spans {
        while styles.len() <= span.end {
            styles.push(span.style);
        }
    }
    styles
}

proptest! {
    #[test]
    fn spans_cover_the_pattern(pattern in pattern_strategy(), dialect in dialect_strategy()) {
        if let Ok(spans) = lex_pattern(&pattern, dialect) {
            let len = pattern.chars().count();
            prop_assert_eq!(spans.is_empty(), len == 0);
            for pair in spans.windows(2) {
                prop_assert!(pair[0].end < pair[1].end);
            }
            if let Some(last) = spans.last() {
                prop_assert_eq!(last.end, len - 1);
            }
            prop_assert!(spans.iter().all(|s| s.style != Style::Default));
        }
    }

    #[test]
    fn lexing_is_deterministic(pattern in pattern_strategy(), dialect in dialect_strategy()) {
        prop_assert_eq!(lex_pattern(&pattern, dialect), lex_pattern(&pattern, dialect));
    }

    #[test]
    fn accepted_parens_balance(pattern in pattern_strategy(), dialect in dialect_strategy()) {
        if let Ok(spans) = lex_pattern(&pattern, dialect) {
            let styles = styles_per_char(&spans);
            let (mut open, mut close) = (0, 0);
            for (c, style) in pattern.chars().zip(styles) {
                match (c, style) {
                    ('(', Style::Operator) => open += 1,
                    (')', Style::Operator) => close += 1,
                    _ => {}
                }
            }
            prop_assert_eq!(open, close);
        }
    }

    #[test]
    fn arbitrary_input_never_panics(pattern in any::<String>(), dialect in dialect_strategy()) {
        let _ = lex_pattern(&pattern, dialect);
        let _ = lexregex::lex_replacement(&pattern, dialect);
    }
}

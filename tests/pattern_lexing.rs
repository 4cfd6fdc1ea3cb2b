//! End-to-end lexing scenarios through the public API.

use lexregex::{lex_pattern, lex_replacement, Dialect, LexError, Span, Style};

fn spans(pattern: &str, dialect: Dialect) -> Vec<(Style, usize)> {
    lex_pattern(pattern, dialect)
        .unwrap_or_else(|e| panic!("lexing {pattern:?} under {dialect} failed: {e}"))
        .into_iter()
        .map(|Span { style, end }| (style, end))
        .collect()
}

fn error(pattern: &str, dialect: Dialect) -> LexError {
    lex_pattern(pattern, dialect).expect_err(pattern)
}

#[test]
fn lookbehind_is_gated_by_dialect() {
    let err = error("(?<=x)y", Dialect::JavaScript);
    assert_eq!(err.start, Some(2));
    assert_eq!(err.message, "javascript doesn't support look-behind");
    assert!(lex_pattern("(?<=x)y", Dialect::Perl).is_ok());
    assert!(lex_pattern("(?<=x)y", Dialect::Python).is_ok());
}

#[test]
fn charset_range_order() {
    let err = error("[c-a]", Dialect::Python);
    assert_eq!((err.start, err.end), (Some(1), Some(4)));
    assert!(err.message.starts_with("illegal character range"));
    assert_eq!(
        spans("[a-c]", Dialect::Python),
        vec![
            (Style::CharsetOperator, 0),
            (Style::Text, 1),
            (Style::Special, 2),
            (Style::Text, 3),
            (Style::CharsetOperator, 4),
        ]
    );
}

#[test]
fn non_numeric_braces_are_text() {
    assert_eq!(spans("a{b}", Dialect::Python), vec![(Style::Text, 3)]);
}

#[test]
fn lazy_modifier_is_the_only_legal_stacking() {
    assert_eq!(
        spans("a*?", Dialect::Python),
        vec![(Style::Text, 0), (Style::Quantifier, 2)]
    );
    let err = error("a**", Dialect::Python);
    assert_eq!(err.start, Some(2));
    assert!(err.message.contains("illegal quantifier"));
}

#[test]
fn named_group_then_reference() {
    assert_eq!(
        spans("(?P<x>a)(?P=x)", Dialect::Python),
        vec![
            (Style::Operator, 0),
            (Style::GroupTag, 5),
            (Style::Text, 6),
            (Style::Operator, 7),
            (Style::Operator, 8),
            (Style::GroupRef, 12),
            (Style::Operator, 13),
        ]
    );
    let err = error("(?P=x)(?P<x>a)", Dialect::Python);
    assert!(err.message.contains("no such group"));
}

#[test]
fn conditional_parens_are_operators() {
    let spans = spans("(a)(?(1)b|c)", Dialect::Perl);
    let operators: Vec<usize> = spans
        .iter()
        .filter(|(style, _)| *style == Style::Operator)
        .map(|&(_, end)| end)
        .collect();
    assert_eq!(operators, [0, 2, 3, 5, 7, 11]);
}

#[test]
fn python_style_group_refs_are_gated_by_dialect() {
    assert!(lex_pattern("(?P<x>a)(?P=x)", Dialect::Php).is_ok());
    let err = error("(?<x>a)(?P=x)", Dialect::Ruby);
    assert_eq!(err.message, "ruby doesn't support '(?P=name)' group references");
    let err = error("(a)(?P=x)", Dialect::JavaScript);
    assert_eq!(err.start, Some(4));
    assert!(err.message.starts_with("javascript doesn't support"));
}

#[test]
fn replacement_templates() {
    assert!(lex_replacement(r"\g<name>", Dialect::Python).is_ok());
    assert!(lex_replacement(r"\1", Dialect::Python).is_ok());
    let err = lex_replacement(r"\g<>", Dialect::Python).unwrap_err();
    assert_eq!(err.message, "group cannot be empty");
}

#[test]
fn realistic_patterns() {
    let doctype = r#"<!DOCTYPE\s+(?P<name>[a-zA-Z_:][\w:.-]*)\s+(?:SYSTEM\s+(["'])(?P<system_id_a>.*?)\2|PUBLIC\s+(["'])(?P<public_id_b>.*?)\4\s+(["'])(?P<system_id_b>.*?)\6)\s*>"#;
    assert!(lex_pattern(doctype, Dialect::Python).is_ok());

    let perl = r"^(?<year>\d{4})-(?<month>\d\d)(?i:-(?<day>\d\d))?\k<year>$";
    assert!(lex_pattern(perl, Dialect::Perl).is_ok());
    assert!(lex_pattern(perl, Dialect::Python).is_err());

    let js = r"^[\w.+-]+@[a-z\d-]+(\.[a-z\d-]+)*\.[a-z]+$";
    assert!(lex_pattern(js, Dialect::JavaScript).is_ok());
}

#[test]
fn errors_render_positions() {
    assert_eq!(error("(foo", Dialect::Python).to_string(), "0-4: unterminated group");
    assert_eq!(error("foo)", Dialect::Python).to_string(), "3: unbalanced parenthesis");
}

#[test]
fn dialect_names_round_trip() {
    for dialect in Dialect::ALL {
        assert_eq!(Dialect::parse(&dialect.to_string()), Some(dialect));
    }
    assert_eq!(Dialect::parse("tcl"), None);
}

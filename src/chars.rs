//! Character predicates shared by the pattern and replacement lexers.

/// Letters that form a character-class shorthand after `\` outside a charset.
pub const CHARCLASS_LETTERS: &str = "AbBdDsSwWZ";

/// Inside a charset `\b` is a backspace escape, not a word boundary.
pub const CHARSET_CHARCLASS_LETTERS: &str = "ABdDsSwWZ";

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

pub fn is_digit_char(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_octal_digit(c: char) -> bool {
    matches!(c, '0'..='7')
}

pub fn is_hex_digit(c: char) -> bool {
    c.is_ascii_hexdigit()
}

/// True if a quantifier starts at `pos`.
///
/// `{` only counts when a complete repetition (`{}`, `{,}`, `{m}`, `{m,}`,
/// `{,n}` or `{m,n}`) follows; any other brace is ordinary text.
pub fn looks_like_quantifier(chars: &[char], pos: usize) -> bool {
    match chars.get(pos) {
        Some('+' | '*' | '?') => true,
        Some('{') => repetition_end(chars, pos).is_some(),
        _ => false,
    }
}

/// Index of the `}` closing the brace repetition that opens at `pos`.
pub(crate) fn repetition_end(chars: &[char], pos: usize) -> Option<usize> {
    if chars.get(pos) != Some(&'{') {
        return None;
    }
    let mut i = pos + 1;
    while chars.get(i).copied().is_some_and(is_digit_char) {
        i += 1;
    }
    if chars.get(i) == Some(&',') {
        i += 1;
        while chars.get(i).copied().is_some_and(is_digit_char) {
            i += 1;
        }
    }
    (chars.get(i) == Some(&'}')).then_some(i)
}

/// True if the text at `pos` (just after `(?`) opens a named group:
/// `P<name>`, `<name>` or `'name'`.
///
/// `<=` and `<!` are lookbehinds, not names. The name itself is validated by
/// the lexer, so an empty or malformed name still counts here.
pub fn looks_like_named_group(chars: &[char], pos: usize) -> bool {
    match chars.get(pos) {
        Some('P') => chars.get(pos + 1) == Some(&'<'),
        Some('\'') => true,
        Some('<') => !matches!(chars.get(pos + 1), Some('=' | '!')),
        _ => false,
    }
}

//! Pattern lexer: splits a regular expression into styled spans.
//!
//! A single left-to-right pass over the pattern drives a small state
//! machine. Each state consumes one lexical unit and names the state to run
//! next; a span is emitted whenever a state has consumed something, so runs
//! of the same unit coalesce naturally. Syntax errors stop the pass at once.

use tracing::{debug, trace};

use crate::chars::{
    is_digit_char, is_hex_digit, is_ident_char, is_octal_digit, looks_like_named_group,
    looks_like_quantifier, repetition_end, CHARCLASS_LETTERS, CHARSET_CHARCLASS_LETTERS,
};
use crate::dialect::{Dialect, DialectPolicy, Feature};
use crate::error::{LexError, LexResult};
use crate::groups::{GroupKind, GroupRegistry};
use crate::style::{Span, SpanSink, Style};

/// Lex `pattern` under `dialect`.
pub fn lex_pattern(pattern: &str, dialect: Dialect) -> LexResult<Vec<Span>> {
    debug!(pattern, %dialect, "lexing pattern");
    PatternLexer::new(pattern, dialect).lex()
}

/// The `[...]` currently being lexed.
#[derive(Debug, Clone, Copy)]
struct Charset {
    start: usize,
    /// Members consumed so far; a negating `^` does not count.
    members: usize,
}

/// One end point of a charset range: `chars[start..end]` lexed as `style`.
#[derive(Debug, Clone, Copy)]
struct RangeAtom {
    style: Style,
    start: usize,
    end: usize,
}

pub struct PatternLexer {
    chars: Vec<char>,
    pos: usize,
    dialect: Dialect,
    policy: &'static DialectPolicy,
    groups: GroupRegistry,
    charset: Option<Charset>,
    range_start: Option<RangeAtom>,
    /// Set after `(?` when the next `(` opens a conditional's condition.
    condition_pending: bool,
    sink: SpanSink,
}

impl PatternLexer {
    pub fn new(pattern: &str, dialect: Dialect) -> Self {
        PatternLexer {
            chars: pattern.chars().collect(),
            pos: 0,
            dialect,
            policy: dialect.policy(),
            groups: GroupRegistry::new(),
            charset: None,
            range_start: None,
            condition_pending: false,
            sink: SpanSink::default(),
        }
    }

    /// Run the state machine over the whole pattern.
    pub fn lex(mut self) -> LexResult<Vec<Span>> {
        let mut state = Style::Default;
        let mut previous = Style::Default;
        loop {
            trace!(pos = self.pos, %state, "step");
            let next = match state {
                Style::Default => self.lex_default(previous)?,
                Style::Text => self.lex_text()?,
                Style::Special => self.lex_special(),
                Style::CharsetOperator => self.lex_charset_operator(),
                Style::Operator => self.lex_operator()?,
                Style::Comment => self.lex_comment()?,
                Style::GroupRef => self.lex_group_ref()?,
                Style::Quantifier => self.lex_quantifier()?,
                Style::GroupTag => self.lex_group_tag()?,
                Style::CharClass => self.lex_char_class()?,
                Style::CharEscape => self.lex_char_escape()?,
            };
            self.sink.emit(state, self.pos);
            if self.pos >= self.chars.len() {
                break;
            }
            previous = state;
            state = next;
        }

        if let Some(start) = self.groups.innermost_unclosed() {
            return Err(LexError::spanning("unterminated group", start, self.pos));
        }
        if let Some(charset) = self.charset {
            return Err(LexError::spanning(
                "unterminated character set",
                charset.start,
                self.pos,
            ));
        }
        Ok(self.sink.finish())
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn at_quantifier(&self) -> bool {
        looks_like_quantifier(&self.chars, self.pos)
    }

    fn quantifier_or_default(&self) -> Style {
        if self.at_quantifier() {
            Style::Quantifier
        } else {
            Style::Default
        }
    }

    fn text(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }

    fn mark_group(&mut self, kind: GroupKind) {
        if let Some(group) = self.groups.current_mut() {
            group.kind = kind;
        }
    }

    /// `\ooo` with a non-zero leading digit.
    fn octal_triplet_at(&self, at: usize) -> bool {
        matches!(self.chars.get(at), Some('1'..='7'))
            && self.chars.get(at + 1).copied().is_some_and(is_octal_digit)
            && self.chars.get(at + 2).copied().is_some_and(is_octal_digit)
    }

    fn lex_default(&mut self, previous: Style) -> LexResult<Style> {
        let Some(c) = self.peek() else {
            return Ok(Style::Default);
        };

        if let Some(charset) = self.charset {
            // A leading ']' is a member, not the end of the set.
            if charset.members > 0 && c == ']' {
                return Ok(Style::CharsetOperator);
            }
            if c == '\\' {
                return match self.peek_at(1) {
                    None => Err(LexError::at("unexpected end of string in escape", self.pos)),
                    Some(n) if CHARSET_CHARCLASS_LETTERS.contains(n) => Ok(Style::CharClass),
                    Some(_) => Ok(Style::CharEscape),
                };
            }
            return Ok(Style::Text);
        }

        match c {
            '(' | ')' => Ok(Style::Operator),
            '[' => Ok(Style::CharsetOperator),
            '.' | '|' | '^' | '$' => Ok(Style::Special),
            _ if self.at_quantifier() => {
                let message = if previous == Style::Quantifier {
                    "illegal quantifier: multiple repeat"
                } else {
                    "illegal position for a quantifier"
                };
                Err(LexError::at(message, self.pos))
            }
            '\\' => self.dispatch_escape(),
            _ => Ok(Style::Text),
        }
    }

    /// Pick the state for a `\` outside a charset.
    fn dispatch_escape(&self) -> LexResult<Style> {
        let Some(next) = self.peek_at(1) else {
            return Err(LexError::at("unexpected end of string in escape", self.pos));
        };
        let style = if CHARCLASS_LETTERS.contains(next) {
            Style::CharClass
        } else if next == '0' || self.octal_triplet_at(self.pos + 1) {
            Style::CharEscape
        } else if matches!(next, '1'..='9') {
            Style::GroupRef
        } else if next == 'k'
            && self.policy.named_backrefs
            && matches!(self.peek_at(2), Some('<' | '\''))
            && self.peek_at(3).is_some_and(is_ident_char)
        {
            Style::GroupRef
        } else {
            Style::CharEscape
        };
        Ok(style)
    }

    fn lex_text(&mut self) -> LexResult<Style> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(Style::Default);
            };
            match self.charset {
                Some(charset) => {
                    if charset.members > 0 && c == ']' {
                        return Ok(Style::CharsetOperator);
                    }
                    if c == '\\' {
                        return Ok(Style::Default);
                    }
                }
                None => {
                    if "\\().|^$[".contains(c) {
                        return Ok(Style::Default);
                    }
                    if self.at_quantifier() {
                        return Ok(Style::Quantifier);
                    }
                }
            }

            self.pos += 1;
            if self.charset.is_some() {
                self.count_members(1);
                if let Some(next) = self.after_member(Style::Text, self.pos - 1)? {
                    return Ok(next);
                }
            }
        }
    }

    fn count_members(&mut self, n: usize) {
        if let Some(charset) = self.charset.as_mut() {
            charset.members += n;
        }
    }

    /// Range bookkeeping after a charset member `chars[start..pos]`.
    ///
    /// Closes a pending range (validating it), or opens one when a `-`
    /// follows that is not the last character of the set. Returns
    /// `Some(Special)` when the `-` should be lexed next.
    fn after_member(&mut self, style: Style, start: usize) -> LexResult<Option<Style>> {
        let atom = RangeAtom {
            style,
            start,
            end: self.pos,
        };
        if let Some(low) = self.range_start.take() {
            self.validate_range(low, atom)?;
            return Ok(None);
        }
        if self.peek() == Some('-') && self.peek_at(1).is_some_and(|c| c != ']') {
            self.range_start = Some(atom);
            return Ok(Some(Style::Special));
        }
        Ok(None)
    }

    fn validate_range(&self, low: RangeAtom, high: RangeAtom) -> LexResult<()> {
        if low.style == Style::CharClass || high.style == Style::CharClass {
            return Err(LexError::spanning(
                "illegal character range: cannot use character classes in ranges",
                low.start,
                high.end,
            ));
        }
        if self.atom_value(low) > self.atom_value(high) {
            return Err(LexError::spanning(
                format!(
                    "illegal character range: start of range cannot precede end of range in ASCII order: '{}-{}'",
                    self.text(low.start, low.end),
                    self.text(high.start, high.end)
                ),
                low.start,
                high.end,
            ));
        }
        Ok(())
    }

    fn atom_value(&self, atom: RangeAtom) -> u32 {
        match &self.chars[atom.start..atom.end] {
            ['\\', body @ ..] => escape_value(body),
            [c, ..] => *c as u32,
            [] => 0,
        }
    }

    fn lex_special(&mut self) -> Style {
        let c = self.chars[self.pos];
        self.pos += 1;
        if c == '.' {
            self.quantifier_or_default()
        } else {
            Style::Default
        }
    }

    fn lex_charset_operator(&mut self) -> Style {
        let opening = self.charset.is_none();
        self.pos += 1;
        self.range_start = None;
        if opening {
            self.charset = Some(Charset {
                start: self.pos - 1,
                members: 0,
            });
            if self.peek() == Some('^') {
                Style::Special
            } else {
                Style::Default
            }
        } else {
            self.charset = None;
            self.quantifier_or_default()
        }
    }

    fn lex_operator(&mut self) -> LexResult<Style> {
        if self.chars[self.pos] == '(' {
            self.groups.open(self.pos);
            self.pos += 1;
            if self.condition_pending {
                self.mark_group(GroupKind::Conditional);
                return Ok(Style::GroupTag);
            }
            let next = match (self.peek(), self.peek_at(1), self.peek_at(2)) {
                (Some('?'), Some('#'), _) => {
                    self.mark_group(GroupKind::Comment);
                    Style::Comment
                }
                (Some('?'), Some('P'), Some('=')) => {
                    self.dialect.require(Feature::NamedGroupRefs, self.pos)?;
                    self.mark_group(GroupKind::GroupRef);
                    Style::GroupRef
                }
                (Some('?'), _, _) => Style::GroupTag,
                _ => Style::Default,
            };
            return Ok(next);
        }

        let group = self.groups.close(self.pos)?;
        self.pos += 1;
        if matches!(group.kind, GroupKind::Comment | GroupKind::Option) {
            Ok(Style::Default)
        } else {
            Ok(self.quantifier_or_default())
        }
    }

    /// Body of `(?#...)`, starting at the `?`.
    fn lex_comment(&mut self) -> LexResult<Style> {
        let group_start = self.groups.current().map_or(self.pos, |g| g.start);
        while let Some(c) = self.peek() {
            match c {
                '\\' if self.pos + 1 < self.chars.len() => self.pos += 2,
                ')' => return Ok(Style::Operator),
                _ => self.pos += 1,
            }
        }
        Err(LexError::spanning(
            "comment is not terminated",
            group_start,
            self.pos,
        ))
    }

    /// `(?P=name)` (starting at the `?`), `\N`, or `\k<name>`.
    fn lex_group_ref(&mut self) -> LexResult<Style> {
        let ref_start = self.pos;
        if self.chars[self.pos] == '?' {
            self.pos += 3;
            let name_start = self.pos;
            let name = self.lex_group_name(')', name_start)?;
            self.groups.resolve_named_ref(&name, ref_start, self.pos)?;
            return Ok(Style::Operator);
        }

        self.pos += 1;
        if self.peek() == Some('k') {
            let close = if self.peek_at(1) == Some('<') { '>' } else { '\'' };
            self.pos += 2;
            let name_start = self.pos;
            // Only the shape is checked; the name is not looked up.
            self.lex_group_name(close, name_start)?;
            self.pos += 1;
        } else {
            let digits_start = self.pos;
            self.pos += 1;
            if self.peek().is_some_and(is_digit_char) {
                self.pos += 1;
            }
            let number = self.chars[digits_start..self.pos]
                .iter()
                .filter_map(|c| c.to_digit(10))
                .fold(0usize, |n, d| n * 10 + d as usize);
            self.groups.resolve_numbered_ref(number, ref_start, self.pos)?;
        }
        Ok(self.quantifier_or_default())
    }

    /// Lex a group name up to (not including) `close`. Unterminated names
    /// are reported from `anchor` to the end of input.
    fn lex_group_name(&mut self, close: char, anchor: usize) -> LexResult<String> {
        let name_start = self.pos;
        match self.peek() {
            None => {
                return Err(LexError::spanning(
                    "group name is not terminated",
                    anchor,
                    self.pos,
                ))
            }
            Some(c) if c == close => {
                return Err(LexError::at("group name cannot be empty", self.pos))
            }
            Some(c) if !is_ident_char(c) => {
                return Err(LexError::at("illegal character in group name", self.pos))
            }
            Some(_) => self.pos += 1,
        }
        loop {
            match self.peek() {
                None => {
                    return Err(LexError::spanning(
                        "group name is not terminated",
                        anchor,
                        self.pos,
                    ))
                }
                Some(c) if c == close => break,
                Some(c) if is_ident_char(c) || is_digit_char(c) => self.pos += 1,
                Some(_) => {
                    return Err(LexError::at("illegal character in group name", self.pos))
                }
            }
        }
        Ok(self.text(name_start, self.pos))
    }

    fn lex_quantifier(&mut self) -> LexResult<Style> {
        if self.chars[self.pos] == '{' {
            let close = repetition_end(&self.chars, self.pos).ok_or_else(|| {
                LexError::at("unterminated repetition quantifier", self.pos)
            })?;
            self.pos = close + 1;
        } else {
            self.pos += 1;
        }
        // lazy
        if self.peek() == Some('?') {
            self.pos += 1;
        }
        Ok(Style::Default)
    }

    /// Everything after `(?` that decides what kind of group this is.
    fn lex_group_tag(&mut self) -> LexResult<Style> {
        if self.condition_pending {
            self.condition_pending = false;
            return self.lex_condition();
        }
        self.pos += 1;
        // Running out here is reported as an unterminated group.
        let Some(c) = self.peek() else {
            return Ok(Style::Default);
        };

        if matches!(c, '+' | '-') && self.peek_at(1).is_some_and(is_digit_char) {
            return self.lex_recursion_number();
        }
        if c == '-' || self.policy.inline_flags.contains(c) {
            return self.lex_flag_group();
        }
        if looks_like_named_group(&self.chars, self.pos) {
            return self.lex_named_group();
        }

        match c {
            ':' => {
                if let Some(group) = self.groups.current_mut() {
                    group.kind = GroupKind::NonCapturing;
                    group.non_capturing = true;
                }
                self.pos += 1;
                Ok(Style::Default)
            }
            '=' | '!' => {
                self.mark_group(GroupKind::Lookaround);
                self.pos += 1;
                Ok(Style::Default)
            }
            '<' => {
                self.dialect.require(Feature::Lookbehind, self.pos)?;
                self.mark_group(GroupKind::Lookaround);
                self.pos += 2;
                Ok(Style::Default)
            }
            '>' => {
                self.dialect.require(Feature::NonBacktracking, self.pos)?;
                self.mark_group(GroupKind::NonBacktracking);
                self.pos += 1;
                Ok(Style::Default)
            }
            '|' => {
                self.dialect.require(Feature::BranchReset, self.pos)?;
                self.mark_group(GroupKind::BranchReset);
                self.pos += 1;
                Ok(Style::Default)
            }
            _ if is_digit_char(c) => self.lex_recursion_number(),
            'R' => {
                self.dialect.require(Feature::Recursion, self.pos)?;
                self.mark_group(GroupKind::Recursion);
                self.pos += 1;
                self.expect_recursion_close()
            }
            'P' if matches!(self.peek_at(1), Some('>' | '&'))
                && self.peek_at(2).is_some_and(is_ident_char) =>
            {
                self.dialect.require(Feature::Recursion, self.pos)?;
                self.pos += 2;
                self.lex_recursion_name()
            }
            '&' if self.peek_at(1).is_some_and(is_ident_char) => {
                self.dialect.require(Feature::Recursion, self.pos)?;
                self.pos += 1;
                self.lex_recursion_name()
            }
            '(' => {
                self.dialect.require(Feature::Conditional, self.pos)?;
                self.mark_group(GroupKind::Conditional);
                self.condition_pending = true;
                Ok(Style::Operator)
            }
            _ => Err(LexError::at(
                "illegal or incomplete group tag following '?'",
                self.pos,
            )),
        }
    }

    /// `(?flags)`, `(?flags-flags)` or `(?flags:...)`.
    fn lex_flag_group(&mut self) -> LexResult<Style> {
        self.dialect.require(Feature::InlineFlags, self.pos)?;
        self.mark_group(GroupKind::Option);
        let policy = self.policy;
        let mut negated = false;
        while let Some(c) = self.peek() {
            match c {
                ')' => return Ok(Style::Operator),
                '-' if policy.scoped_flags && (!negated || policy.repeated_negation) => {
                    negated = true;
                }
                ':' if policy.scoped_flags => {
                    if let Some(group) = self.groups.current_mut() {
                        group.kind = GroupKind::NonCapturing;
                        group.non_capturing = true;
                    }
                    self.pos += 1;
                    return Ok(Style::Default);
                }
                'p' if negated && self.dialect == Dialect::Perl => {
                    return Err(LexError::at(
                        "illegal flag character in flag group",
                        self.pos,
                    ));
                }
                _ if policy.inline_flags.contains(c) => {}
                _ => {
                    return Err(LexError::at(
                        "illegal flag character in flag group",
                        self.pos,
                    ))
                }
            }
            self.pos += 1;
        }
        Ok(Style::Operator)
    }

    /// `(?P<name>`, `(?<name>` or `(?'name'`, starting after the `?`.
    fn lex_named_group(&mut self) -> LexResult<Style> {
        let opener = self.pos;
        let syntax = self.policy.named_groups;
        self.dialect.require(Feature::NamedGroups, opener)?;

        let c = self.chars[opener];
        let close = match c {
            'P' if !syntax.python => {
                return Err(LexError::at(
                    format!("{} uses '(?<', not '(?P<' for named-group capture", self.dialect),
                    opener,
                ));
            }
            '<' | '\'' if !(syntax.angle && syntax.quote) => {
                return Err(LexError::at(
                    "missing 'P' in '(?P<' for named-group capture",
                    opener,
                ));
            }
            '\'' => '\'',
            _ => '>',
        };
        self.pos += if c == 'P' { 2 } else { 1 };

        let name = self.lex_group_name(close, self.pos - 1)?;
        if let Some(group) = self.groups.current_mut() {
            group.kind = GroupKind::Named;
            group.name = Some(name);
        }
        self.pos += 1;
        Ok(Style::Default)
    }

    /// `(?N)`, `(?+N)` or `(?-N)`.
    fn lex_recursion_number(&mut self) -> LexResult<Style> {
        self.dialect.require(Feature::Recursion, self.pos)?;
        self.mark_group(GroupKind::Recursion);
        if matches!(self.peek(), Some('+' | '-')) {
            self.pos += 1;
        }
        while self.peek().is_some_and(is_digit_char) {
            self.pos += 1;
        }
        self.expect_recursion_close()
    }

    /// Name of `(?P>name)`, `(?P&name)` or `(?&name)`.
    fn lex_recursion_name(&mut self) -> LexResult<Style> {
        self.mark_group(GroupKind::Recursion);
        while self
            .peek()
            .is_some_and(|c| is_ident_char(c) || is_digit_char(c))
        {
            self.pos += 1;
        }
        self.expect_recursion_close()
    }

    fn expect_recursion_close(&self) -> LexResult<Style> {
        if self.peek() == Some(')') {
            Ok(Style::Operator)
        } else {
            Err(LexError::at(
                "illegal character in recurse-pattern number group",
                self.pos,
            ))
        }
    }

    /// Condition of `(?(cond)yes|no)`, just after its `(`. The condition is
    /// its own group, closed by the operator state at its `)`.
    fn lex_condition(&mut self) -> LexResult<Style> {
        let cond_start = self.pos - 1;
        let close = self.chars[self.pos..]
            .iter()
            .position(|&c| c == ')')
            .map(|i| self.pos + i)
            .ok_or_else(|| {
                LexError::spanning(
                    "condition of conditional pattern is not terminated",
                    cond_start,
                    self.chars.len(),
                )
            })?;
        self.pos = close;
        Ok(Style::Operator)
    }

    /// Two-character shorthand such as `\d`.
    fn lex_char_class(&mut self) -> LexResult<Style> {
        let start = self.pos;
        self.pos += 2;
        if self.charset.is_some() {
            self.count_members(2);
            let next = self.after_member(Style::CharClass, start)?;
            return Ok(next.unwrap_or(Style::Default));
        }
        Ok(self.quantifier_or_default())
    }

    /// Literal, octal (`\0`, `\0o`, `\0oo`, `\ooo`) or hex (`\xHH`) escape.
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
            Some('0') => {
                self.pos += 1;
                for _ in 0..2 {
                    if !self.peek().is_some_and(is_octal_digit) {
                        break;
                    }
                    self.pos += 1;
                }
            }
            Some(_) if self.octal_triplet_at(self.pos) => self.pos += 3,
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
            Some(_) => self.pos += 1,
        }

        if self.charset.is_some() {
            self.count_members(self.pos - start);
            let next = self.after_member(Style::CharEscape, start)?;
            return Ok(next.unwrap_or(Style::Default));
        }
        Ok(self.quantifier_or_default())
    }
}

/// Code point denoted by an escape, given the characters after the `\`.
fn escape_value(body: &[char]) -> u32 {
    match body {
        ['x', digits @ ..] => digits
            .iter()
            .filter_map(|c| c.to_digit(16))
            .fold(0, |v, d| v * 16 + d),
        [first, ..] if is_octal_digit(*first) && body.iter().all(|c| is_octal_digit(*c)) => body
            .iter()
            .filter_map(|c| c.to_digit(8))
            .fold(0, |v, d| v * 8 + d),
        ['a'] => 0x07,
        ['b'] => 0x08,
        ['t'] => 0x09,
        ['n'] => 0x0a,
        ['v'] => 0x0b,
        ['f'] => 0x0c,
        ['r'] => 0x0d,
        [c, ..] => *c as u32,
        [] => 0,
    }
}

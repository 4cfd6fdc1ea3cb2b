//! Group bookkeeping for a single lex pass.

use crate::error::{LexError, LexResult};

/// What kind of parenthesized construct a group is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `(...)`
    Plain,
    /// `(?P<name>...)`, `(?<name>...)`, `(?'name'...)`
    Named,
    /// `(?:...)` and scoped flags `(?i:...)`
    NonCapturing,
    /// `(?iLmsux)`
    Option,
    /// `(?#...)`
    Comment,
    /// `(?P=name)`
    GroupRef,
    /// `(?(cond)yes|no)` and its condition.
    Conditional,
    /// `(?=...)`, `(?!...)`, `(?<=...)`, `(?<!...)`
    Lookaround,
    /// `(?>...)`
    NonBacktracking,
    /// `(?|...)`
    BranchReset,
    /// `(?R)`, `(?1)`, `(?P>name)`, ...
    Recursion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub start: usize,
    /// Index of the closing `)`; `None` while the group is open.
    pub end: Option<usize>,
    pub name: Option<String>,
    pub kind: GroupKind,
    pub non_capturing: bool,
}

impl Group {
    /// Only these groups get a number for `\N` references.
    pub fn is_capturing(&self) -> bool {
        matches!(self.kind, GroupKind::Plain | GroupKind::Named) && !self.non_capturing
    }

    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }
}

/// Open-group stack plus the ordered list of groups seen so far.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: Vec<Group>,
    open: Vec<usize>,
}

impl GroupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a new open plain group starting at `start`.
    pub fn open(&mut self, start: usize) -> usize {
        let index = self.groups.len();
        self.groups.push(Group {
            start,
            end: None,
            name: None,
            kind: GroupKind::Plain,
            non_capturing: false,
        });
        self.open.push(index);
        index
    }

    /// Innermost open group.
    pub fn current(&self) -> Option<&Group> {
        self.open.last().map(|&i| &self.groups[i])
    }

    pub fn current_mut(&mut self) -> Option<&mut Group> {
        self.open.last().map(|&i| &mut self.groups[i])
    }

    /// Close the innermost open group at `end` and return it.
    ///
    /// Groups that cannot be back-referenced are dropped from the list
    /// once closed. Every index still on the open stack is smaller than the
    /// one being removed, so the stack stays valid.
    pub fn close(&mut self, end: usize) -> LexResult<Group> {
        let index = self
            .open
            .pop()
            .ok_or_else(|| LexError::at("unbalanced parenthesis", end))?;
        self.groups[index].end = Some(end);
        let group = if self.groups[index].is_capturing() {
            self.groups[index].clone()
        } else {
            self.groups.remove(index)
        };
        Ok(group)
    }

    /// Start of the innermost group that never got closed.
    pub fn innermost_unclosed(&self) -> Option<usize> {
        self.current().map(|g| g.start)
    }

    /// Resolve `\n` (1-based) for a reference spanning `start..end`.
    pub fn resolve_numbered_ref(&self, n: usize, start: usize, end: usize) -> LexResult<&Group> {
        let group = n
            .checked_sub(1)
            .and_then(|i| self.groups.iter().filter(|g| g.is_capturing()).nth(i));
        Self::check_ref(group, &n.to_string(), start, end)
    }

    /// Resolve a reference by name; the earliest-opened match wins.
    pub fn resolve_named_ref(&self, name: &str, start: usize, end: usize) -> LexResult<&Group> {
        let group = self
            .groups
            .iter()
            .find(|g| g.name.as_deref() == Some(name));
        Self::check_ref(group, name, start, end)
    }

    fn check_ref<'g>(
        group: Option<&'g Group>,
        label: &str,
        start: usize,
        end: usize,
    ) -> LexResult<&'g Group> {
        match group {
            None => Err(LexError::spanning(
                format!("invalid group reference: no such group: '{label}'"),
                start,
                end,
            )),
            Some(g) if g.is_open() => Err(LexError::spanning(
                format!("invalid group reference: cannot refer to an open group: '{label}'"),
                start,
                end,
            )),
            Some(g) => Ok(g),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbering_skips_non_capturing_groups() {
        let mut reg = GroupRegistry::new();
        reg.open(0);
        reg.close(2).unwrap();
        reg.open(3);
        reg.current_mut().unwrap().kind = GroupKind::NonCapturing;
        reg.close(7).unwrap();
        reg.open(8);
        reg.current_mut().unwrap().kind = GroupKind::Named;
        reg.current_mut().unwrap().name = Some("x".into());
        reg.close(15).unwrap();

        assert_eq!(reg.resolve_numbered_ref(1, 0, 0).unwrap().start, 0);
        assert_eq!(reg.resolve_numbered_ref(2, 0, 0).unwrap().start, 8);
        assert!(reg.resolve_numbered_ref(3, 0, 0).is_err());
        assert!(reg.resolve_numbered_ref(0, 0, 0).is_err());
        assert_eq!(reg.resolve_named_ref("x", 0, 0).unwrap().end, Some(15));
    }

    #[test]
    fn open_groups_cannot_be_referenced() {
        let mut reg = GroupRegistry::new();
        reg.open(0);
        let err = reg.resolve_numbered_ref(1, 1, 3).unwrap_err();
        assert!(err.message.contains("cannot refer to an open group"));
        assert_eq!((err.start, err.end), (Some(1), Some(3)));
    }

    #[test]
    fn option_and_comment_groups_are_dropped_on_close() {
        let mut reg = GroupRegistry::new();
        reg.open(0);
        reg.open(1);
        reg.current_mut().unwrap().kind = GroupKind::Option;
        let closed = reg.close(4).unwrap();
        assert_eq!(closed.kind, GroupKind::Option);
        reg.open(5);
        reg.current_mut().unwrap().kind = GroupKind::Comment;
        reg.close(8).unwrap();
        reg.close(9).unwrap();
        assert_eq!(reg.resolve_numbered_ref(1, 0, 0).unwrap().end, Some(9));
        assert!(reg.resolve_numbered_ref(2, 0, 0).is_err());
    }

    #[test]
    fn unbalanced_close() {
        let mut reg = GroupRegistry::new();
        let err = reg.close(3).unwrap_err();
        assert_eq!(err.message, "unbalanced parenthesis");
        assert_eq!(err.start, Some(3));
    }

    #[test]
    fn reports_innermost_unclosed_group() {
        let mut reg = GroupRegistry::new();
        reg.open(0);
        reg.open(1);
        reg.close(5).unwrap();
        reg.open(6);
        assert_eq!(reg.innermost_unclosed(), Some(6));
    }
}

//! Per-dialect syntax policy.

use std::fmt;
use std::str::FromStr;

use crate::error::{LexError, LexResult};

/// Regex syntax convention a pattern is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    #[default]
    Python,
    Perl,
    Php,
    Ruby,
    JavaScript,
}

/// Which named-group openers a dialect accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NamedGroupSyntax {
    /// `(?<name>...)`
    pub angle: bool,
    /// `(?'name'...)`
    pub quote: bool,
    /// `(?P<name>...)`
    pub python: bool,
}

impl NamedGroupSyntax {
    pub fn any(self) -> bool {
        self.angle || self.quote || self.python
    }
}

/// What a dialect permits. Looked up once per lex call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectPolicy {
    /// Letters legal in `(?flags)`.
    pub inline_flags: &'static str,
    /// Whether `(?flags)` groups are accepted at all.
    pub inline_flag_groups: bool,
    /// `(?i-m)` negation parts and `(?i:...)` scoped flags.
    pub scoped_flags: bool,
    /// More than one `-` part in a flag group.
    pub repeated_negation: bool,
    pub named_groups: NamedGroupSyntax,
    pub lookbehind: bool,
    /// `(?>...)`
    pub non_backtracking: bool,
    /// `(?R)`, `(?N)`, `(?P>name)` and friends.
    pub recursion: bool,
    /// `(?|...)`
    pub branch_reset: bool,
    /// `(?(cond)yes|no)`
    pub conditionals: bool,
    /// `\k<name>` and `\k'name'`
    pub named_backrefs: bool,
    /// `(?P=name)`
    pub named_group_refs: bool,
}

/// An extended construct that only some dialects support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    InlineFlags,
    NamedGroups,
    NamedGroupRefs,
    Lookbehind,
    NonBacktracking,
    Recursion,
    BranchReset,
    Conditional,
}

impl Feature {
    pub fn description(self) -> &'static str {
        match self {
            Feature::InlineFlags => "inline flag groups",
            Feature::NamedGroups => "named-group capture",
            Feature::NamedGroupRefs => "'(?P=name)' group references",
            Feature::Lookbehind => "look-behind",
            Feature::NonBacktracking => "non-backtracking groups",
            Feature::Recursion => "recursing into capture-buffers",
            Feature::BranchReset => "branch-reset patterns",
            Feature::Conditional => "conditional patterns",
        }
    }
}

const PYTHON: DialectPolicy = DialectPolicy {
    inline_flags: "iLmsux",
    inline_flag_groups: true,
    scoped_flags: false,
    repeated_negation: false,
    named_groups: NamedGroupSyntax {
        angle: false,
        quote: false,
        python: true,
    },
    lookbehind: true,
    non_backtracking: false,
    recursion: false,
    branch_reset: false,
    conditionals: false,
    named_backrefs: false,
    named_group_refs: true,
};

const PERL: DialectPolicy = DialectPolicy {
    inline_flags: "ipxsm",
    inline_flag_groups: true,
    scoped_flags: true,
    repeated_negation: false,
    named_groups: NamedGroupSyntax {
        angle: true,
        quote: true,
        python: false,
    },
    lookbehind: true,
    non_backtracking: true,
    recursion: true,
    branch_reset: true,
    conditionals: true,
    named_backrefs: true,
    named_group_refs: true,
};

const PHP: DialectPolicy = DialectPolicy {
    inline_flags: "ixsm",
    inline_flag_groups: true,
    scoped_flags: true,
    repeated_negation: true,
    named_groups: NamedGroupSyntax {
        angle: true,
        quote: true,
        python: true,
    },
    lookbehind: true,
    non_backtracking: true,
    recursion: true,
    branch_reset: false,
    conditionals: true,
    named_backrefs: true,
    named_group_refs: true,
};

const RUBY: DialectPolicy = DialectPolicy {
    inline_flags: "ixm",
    inline_flag_groups: true,
    scoped_flags: true,
    repeated_negation: true,
    named_groups: NamedGroupSyntax {
        angle: true,
        quote: true,
        python: false,
    },
    lookbehind: true,
    non_backtracking: true,
    recursion: false,
    branch_reset: false,
    conditionals: false,
    named_backrefs: false,
    named_group_refs: false,
};

const JAVASCRIPT: DialectPolicy = DialectPolicy {
    inline_flags: "m",
    inline_flag_groups: false,
    scoped_flags: false,
    repeated_negation: false,
    named_groups: NamedGroupSyntax {
        angle: false,
        quote: false,
        python: false,
    },
    lookbehind: false,
    non_backtracking: false,
    recursion: false,
    branch_reset: false,
    conditionals: false,
    named_backrefs: false,
    named_group_refs: false,
};

impl Dialect {
    pub const ALL: [Dialect; 5] = [
        Dialect::Python,
        Dialect::Perl,
        Dialect::Php,
        Dialect::Ruby,
        Dialect::JavaScript,
    ];

    /// Resolve one of the configuration names `python`, `perl`, `php`,
    /// `ruby`, `javascript`.
    pub fn parse(name: &str) -> Option<Dialect> {
        match name {
            "python" => Some(Dialect::Python),
            "perl" => Some(Dialect::Perl),
            "php" => Some(Dialect::Php),
            "ruby" => Some(Dialect::Ruby),
            "javascript" => Some(Dialect::JavaScript),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Dialect::Python => "python",
            Dialect::Perl => "perl",
            Dialect::Php => "php",
            Dialect::Ruby => "ruby",
            Dialect::JavaScript => "javascript",
        }
    }

    pub fn policy(self) -> &'static DialectPolicy {
        match self {
            Dialect::Python => &PYTHON,
            Dialect::Perl => &PERL,
            Dialect::Php => &PHP,
            Dialect::Ruby => &RUBY,
            Dialect::JavaScript => &JAVASCRIPT,
        }
    }

    pub fn supports(self, feature: Feature) -> bool {
        let policy = self.policy();
        match feature {
            Feature::InlineFlags => policy.inline_flag_groups,
            Feature::NamedGroups => policy.named_groups.any(),
            Feature::NamedGroupRefs => policy.named_group_refs,
            Feature::Lookbehind => policy.lookbehind,
            Feature::NonBacktracking => policy.non_backtracking,
            Feature::Recursion => policy.recursion,
            Feature::BranchReset => policy.branch_reset,
            Feature::Conditional => policy.conditionals,
        }
    }

    /// Fail at `pos` unless this dialect supports `feature`.
    pub fn require(self, feature: Feature, pos: usize) -> LexResult<()> {
        if self.supports(feature) {
            Ok(())
        } else {
            Err(LexError::at(
                format!("{} doesn't support {}", self, feature.description()),
                pos,
            ))
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::parse(s).ok_or_else(|| {
            format!("Unknown language: {s}. Supported: python, perl, php, ruby, javascript")
        })
    }
}

/// User-visible exclude rule parsed from one pattern-file line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExcludeRule {
    pub(crate) pattern: String,
    pub(crate) negated: bool,
    pub(crate) dir_only: bool,
    pub(crate) anchored: bool,
}

impl ExcludeRule {
    /// Creates an exclude rule for `pattern`.
    #[must_use]
    pub fn exclude(pattern: impl Into<String>) -> Self {
        Self::build(pattern.into(), false)
    }

    /// Creates a re-include rule for `pattern`, overriding earlier excludes.
    #[must_use]
    pub fn reinclude(pattern: impl Into<String>) -> Self {
        Self::build(pattern.into(), true)
    }

    /// Parses a single pattern-file line.
    ///
    /// Returns `None` for blank lines and `#` comments. A leading `!` marks a
    /// re-include, a trailing `/` a directory-only rule, and a leading `/`
    /// anchors the pattern to the sync root.
    #[must_use]
    pub fn parse_line(line: &str) -> Option<Self> {
        let trimmed = line.trim_end_matches(['\r', '\n']).trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        match trimmed.strip_prefix('!') {
            Some(rest) if rest.is_empty() => None,
            Some(rest) => Some(Self::build(rest.to_owned(), true)),
            None => Some(Self::build(trimmed.to_owned(), false)),
        }
    }

    fn build(raw: String, negated: bool) -> Self {
        let dir_only = raw.ends_with('/');
        let without_dir = raw.trim_end_matches('/');
        let anchored = without_dir.starts_with('/');
        let pattern = without_dir.trim_start_matches('/').to_owned();
        Self {
            pattern,
            negated,
            dir_only,
            anchored,
        }
    }

    /// Returns the glob pattern text with `!`, anchor, and directory markers
    /// stripped.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns whether the rule re-includes matching paths.
    #[must_use]
    pub const fn is_reinclude(&self) -> bool {
        self.negated
    }

    /// Returns whether the rule only applies to directories.
    #[must_use]
    pub const fn is_dir_only(&self) -> bool {
        self.dir_only
    }

    /// Returns whether the rule is anchored to the sync root.
    #[must_use]
    pub const fn is_anchored(&self) -> bool {
        self.anchored
    }
}

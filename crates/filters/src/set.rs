use std::path::Path;
use std::sync::Arc;

use globset::{GlobBuilder, GlobMatcher};

use crate::{ExcludeRule, PatternError};

/// Compiled, immutable collection of exclude rules for fast path matching.
///
/// An `ExcludeSet` is built from a sequence of [`ExcludeRule`]s via
/// [`from_rules`](Self::from_rules). During construction each rule is compiled
/// into optimised glob matchers. Directory-only rules additionally cover their
/// contents so nested paths can be queried directly.
///
/// Rules are evaluated in definition order with first-match-wins semantics.
/// If no rule matches, the path is admitted.
///
/// `ExcludeSet` is cheaply cloneable (the compiled state is behind an
/// [`Arc`]), which lets the per-attempt engine context carry its own handle
/// without recompiling patterns on every restart.
#[derive(Clone, Debug, Default)]
pub struct ExcludeSet {
    rules: Arc<[CompiledRule]>,
}

impl ExcludeSet {
    /// Builds an [`ExcludeSet`] from the supplied rules.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] if any rule's pattern cannot be compiled into
    /// a valid glob matcher.
    pub fn from_rules<I>(rules: I) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = ExcludeRule>,
    {
        let compiled: Vec<CompiledRule> = rules
            .into_iter()
            .map(CompiledRule::new)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            rules: compiled.into(),
        })
    }

    /// Returns the union of `self` and `other`, with `self`'s rules evaluated
    /// first.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        let mut rules = Vec::with_capacity(self.rules.len() + other.rules.len());
        rules.extend_from_slice(&self.rules);
        rules.extend_from_slice(&other.rules);
        Self {
            rules: rules.into(),
        }
    }

    /// Returns `true` if the set contains no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the number of compiled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if `path` (relative to the sync root) is excluded.
    ///
    /// `is_dir` should be `true` when the path refers to a directory, which
    /// affects directory-only rules (patterns with a trailing `/`).
    #[must_use]
    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        for rule in self.rules.iter() {
            if rule.matches(path, is_dir) {
                return !rule.rule.negated;
            }
        }
        false
    }
}

/// One rule together with its compiled matchers.
#[derive(Clone, Debug)]
struct CompiledRule {
    rule: ExcludeRule,
    matcher: GlobMatcher,
    /// Covers the contents of directory-only rules.
    subtree: Option<GlobMatcher>,
}

impl CompiledRule {
    fn new(rule: ExcludeRule) -> Result<Self, PatternError> {
        let base = if rule.anchored {
            rule.pattern.clone()
        } else {
            format!("**/{}", rule.pattern)
        };

        let matcher = compile(&base, &rule.pattern)?;
        let subtree = if rule.dir_only {
            Some(compile(&format!("{base}/**"), &rule.pattern)?)
        } else {
            None
        };

        Ok(Self {
            rule,
            matcher,
            subtree,
        })
    }

    fn matches(&self, path: &Path, is_dir: bool) -> bool {
        if let Some(subtree) = &self.subtree {
            if subtree.is_match(path) {
                return true;
            }
        }
        if self.rule.dir_only && !is_dir {
            return false;
        }
        self.matcher.is_match(path)
    }
}

fn compile(glob: &str, pattern: &str) -> Result<GlobMatcher, PatternError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| PatternError::new(pattern.to_owned(), source))
}

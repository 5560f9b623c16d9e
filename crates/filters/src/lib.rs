#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cloudcmd-filters` provides ordered exclude-pattern evaluation for the
//! `cloudcmd` workspace. Patterns follow the exclude-list grammar used by the
//! sync client: one glob per line, `#` comments and blank lines ignored, a
//! leading `!` re-includes a previously excluded name, a trailing `/` limits
//! the rule to directories, and a leading `/` anchors the rule to the sync
//! root. Unanchored rules match at any depth.
//!
//! # Design
//!
//! - [`ExcludeRule`] captures one parsed line. The rule itself is lightweight;
//!   heavy lifting happens when an [`ExcludeSet`] is constructed.
//! - [`ExcludeSet`] owns the compiled representation of each rule. Directory
//!   rules expand into matchers that also cover their contents so callers can
//!   query nested paths without re-deriving ancestry.
//! - Rules are evaluated in definition order with first-match-wins semantics;
//!   paths that match no rule are admitted.
//!
//! # Errors
//!
//! [`ExcludeSet::from_rules`] reports [`PatternError`] when a rule expands to
//! an invalid glob expression. The error carries the offending pattern and the
//! underlying [`globset::Error`] for debugging. Loading an exclude file can
//! additionally fail with [`ExcludeFileError`] when the file is unreadable.
//!
//! The two-source admission policy lives in [`load_exclude_set`]: the
//! system-wide list and the user-supplied list load independently, and the run
//! may only proceed when at least one of them is usable.

mod error;
mod load;
mod rule;
mod set;

pub use error::{ExcludeFileError, NoUsableExcludes, PatternError};
pub use load::{load_exclude_set, parse_rules, read_rules};
pub use rule::ExcludeRule;
pub use set::ExcludeSet;

#[cfg(test)]
mod tests;

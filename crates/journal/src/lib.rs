#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cloudcmd-journal` owns the state that survives between synchronization
//! runs: the selective-sync baseline (the folders the user chose not to
//! sync) and a per-folder record saying whether cached sync metadata for
//! that folder may still be trusted.
//!
//! The journal is a JSON document stored inside the synced tree itself
//! ([`JOURNAL_FILE_NAME`]), keyed by separator-terminated folder path. It is
//! a single-writer resource: within one process invocation only one party
//! mutates it at a time — the reconciler before the restart loop, then the
//! engine during its pass.
//!
//! # Design
//!
//! - [`SelectiveSyncList`] is an ordered sequence of folder paths, each
//!   forced to end with `/` before any comparison or persistence. The
//!   normalization is enforced by construction, never by callers.
//! - [`Journal`] loads lazily and writes atomically (temp file + rename) so
//!   a crashed run never leaves a torn document behind.
//! - [`reconcile_selective_sync`] compares the persisted baseline with the
//!   list supplied for the current run and invalidates cached state for
//!   every folder whose inclusion status flipped, in either direction. A
//!   folder whose status flips must not reuse stale cached file-state, or
//!   newly included files could be silently skipped and newly excluded
//!   files left dangling.

mod error;
mod journal;
mod reconcile;
mod selective;

pub use error::JournalError;
pub use journal::{JOURNAL_FILE_NAME, Journal};
pub use reconcile::reconcile_selective_sync;
pub use selective::SelectiveSyncList;

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cloudcmd-engine` is the boundary between the run orchestrator and the
//! component that computes and applies the actual file diff for one
//! synchronization pass. The orchestrator constructs a fresh
//! [`EngineContext`] per attempt, hands it to a [`SyncEngine`], and consumes
//! the resulting [`SyncReport`]; nothing engine-side outlives the attempt.
//!
//! # Design
//!
//! - [`EngineContext`] is a value type assembled once per attempt from the
//!   run configuration, the normalized target, the compiled exclude set, and
//!   the selective-sync list. It is dropped with the attempt.
//! - [`SyncEngine`] is the seam the orchestrator drives. Implementations are
//!   `Send` because the orchestrator queues the invocation on a worker
//!   thread and blocks on its completion signal.
//! - [`LocalDiscoveryEngine`] is the bundled implementation: a single local
//!   discovery pass over the sync folder that honours the exclude set, the
//!   hidden-file policy, and the selective-sync list, consults the journal
//!   for folders whose cached state was invalidated, and reports pass
//!   statistics. Files younger than the configured minimum upload age are
//!   deferred and flagged through
//!   [`SyncReport::another_sync_needed`].
//!
//! # Errors
//!
//! A pass either completes with a [`SyncReport`] or fails hard with an
//! [`EngineError`]; both count as completion for the orchestrator's restart
//! loop.

mod context;
mod discovery;
mod error;
mod report;

pub use context::{EngineContext, ProxyConfig};
pub use discovery::LocalDiscoveryEngine;
pub use error::EngineError;
pub use report::SyncReport;

/// One-pass synchronization engine driven by the run orchestrator.
///
/// Success and failure both count as completion; the orchestrator decides
/// whether to re-run based on [`SyncReport::another_sync_needed`] and its
/// restart budget.
pub trait SyncEngine: Send {
    /// Performs one synchronization pass over `context`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when the pass fails hard; a pass that merely
    /// discovers more work to do reports it through the [`SyncReport`]
    /// instead.
    fn sync(&mut self, context: EngineContext) -> Result<SyncReport, EngineError>;
}

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cloudcmd-core` implements the run orchestration for the command-line
//! sync client: resolving connection credentials from their ranked sources,
//! normalizing the user-supplied target address into the canonical form the
//! engine consumes, selecting the outbound proxy, and driving the bounded
//! auto-restart loop around the synchronization engine.
//!
//! # Design
//!
//! - [`client::RunConfig`] is immutable after startup and passed by
//!   reference into the engine-invocation boundary; there is no process-wide
//!   mutable state.
//! - [`creds`] composes explicit [`creds::CredentialSource`] stages instead
//!   of hooking credential callbacks into the engine framework.
//! - [`client::run_sync`] owns the restart loop. Each attempt constructs and
//!   tears down its own engine context; the engine invocation is queued on a
//!   worker thread and the orchestrator blocks on an explicit completion
//!   channel, so a failure occurring before the wait starts still completes
//!   the attempt cleanly instead of deadlocking.

pub mod account;
pub mod client;
pub mod creds;
pub mod target;

pub use account::{Account, AccountError};
pub use client::{ClientError, RestartState, RunConfig, RunSummary, run_sync};
pub use creds::{CredentialSource, Credentials};
pub use target::{NormalizedTarget, TargetAddress, TargetError};

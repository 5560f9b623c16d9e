//! crates/core/src/client/run.rs

use std::thread;
use std::time::Duration;

use crossbeam_channel::bounded;

use engine::{EngineContext, EngineError, ProxyConfig, SyncEngine, SyncReport};
use filters::ExcludeSet;
use journal::SelectiveSyncList;

use super::config::RunConfig;
use super::error::ClientError;
use super::proxy::parse_proxy;
use super::restart::RestartState;
use crate::creds::Credentials;
use crate::target::NormalizedTarget;

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug)]
pub struct RunSummary {
    attempts: u32,
    restarts_exhausted: bool,
    last_report: SyncReport,
}

impl RunSummary {
    /// Returns the number of engine invocations performed.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Returns whether the restart budget ran out while another sync was
    /// still needed. This is reported, not an error.
    #[must_use]
    pub const fn restarts_exhausted(&self) -> bool {
        self.restarts_exhausted
    }

    /// Returns the report of the final attempt.
    #[must_use]
    pub const fn last_report(&self) -> &SyncReport {
        &self.last_report
    }
}

/// Drives the bounded auto-restart loop around the synchronization engine.
///
/// Each attempt constructs a fresh engine from `make_engine` and a fresh
/// [`EngineContext`]; nothing engine-side is reused across restarts. When
/// the engine signals that another sync is needed and the restart budget
/// allows it, the loop goes again; an exhausted budget is logged and the
/// run still counts as successful. An engine hard error ends the run
/// immediately.
///
/// # Errors
///
/// Returns [`ClientError::Engine`] when an attempt fails hard, including
/// the case where the engine terminates without reporting a result.
pub fn run_sync<E, F>(
    config: &RunConfig,
    target: &NormalizedTarget,
    credentials: &Credentials,
    excludes: &ExcludeSet,
    selective_sync: &SelectiveSyncList,
    mut make_engine: F,
) -> Result<RunSummary, ClientError>
where
    E: SyncEngine + 'static,
    F: FnMut() -> E,
{
    let proxy = config.proxy().map_or(ProxyConfig::System, parse_proxy);
    if let ProxyConfig::Manual { host, port } = &proxy {
        tracing::debug!(host, port, "using manual http proxy");
    }

    let mut restarts = RestartState::new(config.max_sync_retries());
    loop {
        let context = EngineContext::new(
            config.source_dir().to_owned(),
            target.server_url().clone(),
            target.remote_path(),
            target.folder(),
        )
        .with_excludes(excludes.clone())
        .with_selective_sync(selective_sync.clone())
        .with_ignore_hidden_files(config.ignore_hidden_files())
        .with_trust_ssl(credentials.ssl_trusted())
        // this utility usually runs right after a change, so nothing is
        // held back for settling
        .with_minimum_file_age_for_upload(Duration::ZERO)
        .with_proxy(proxy.clone());

        let report = complete_attempt(make_engine(), context)?;

        if !report.another_sync_needed() {
            return Ok(RunSummary {
                attempts: restarts.attempts(),
                restarts_exhausted: false,
                last_report: report,
            });
        }
        if restarts.try_restart() {
            tracing::debug!(
                restart = restarts.restarts(),
                "restarting sync, because another sync is needed"
            );
            continue;
        }
        tracing::warn!(
            restarts = restarts.restarts(),
            "another sync is needed, but not done because restart count is exceeded"
        );
        return Ok(RunSummary {
            attempts: restarts.attempts(),
            restarts_exhausted: true,
            last_report: report,
        });
    }
}

/// Queues one engine invocation and blocks until it completes.
///
/// The attempt runs on a worker thread with a bounded completion channel:
/// a failure occurring before the wait starts is still delivered as a
/// completion, so teardown never deadlocks. A worker that dies without
/// sending anything surfaces as [`EngineError::Aborted`].
fn complete_attempt<E>(mut engine: E, context: EngineContext) -> Result<SyncReport, ClientError>
where
    E: SyncEngine + 'static,
{
    let (sender, receiver) = bounded(1);
    let worker = thread::Builder::new()
        .name("sync-engine".to_owned())
        .spawn(move || {
            let result = engine.sync(context);
            let _ = sender.send(result);
        })
        .map_err(|_| ClientError::Engine(EngineError::Aborted))?;

    let completion = receiver.recv();
    let _ = worker.join();

    match completion {
        Ok(result) => result.map_err(ClientError::from),
        Err(_) => Err(ClientError::Engine(EngineError::Aborted)),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use url::Url;

    use engine::{EngineContext, EngineError, SyncEngine, SyncReport};
    use filters::ExcludeSet;
    use journal::SelectiveSyncList;

    use super::run_sync;
    use crate::client::{ClientError, RunConfig};
    use crate::creds::Credentials;
    use crate::target::NormalizedTarget;

    /// Engine double fed from a shared script, one entry per attempt.
    struct ScriptedEngine {
        script: Arc<Mutex<VecDeque<Result<SyncReport, EngineError>>>>,
        invocations: Arc<AtomicU32>,
    }

    impl SyncEngine for ScriptedEngine {
        fn sync(&mut self, _context: EngineContext) -> Result<SyncReport, EngineError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .expect("script lock")
                .pop_front()
                .unwrap_or_else(|| Ok(SyncReport::new()))
        }
    }

    struct PanickyEngine;

    impl SyncEngine for PanickyEngine {
        fn sync(&mut self, _context: EngineContext) -> Result<SyncReport, EngineError> {
            panic!("engine fell over before reporting");
        }
    }

    fn fixture(max_sync_retries: u32) -> (RunConfig, NormalizedTarget, Credentials) {
        let config = RunConfig::builder("/tmp/sync-src/".into(), "https://cloud.example.com/")
            .max_sync_retries(max_sync_retries)
            .build();
        let target = NormalizedTarget::new(
            Url::parse("https://cloud.example.com/").expect("url"),
            "/remote.php/webdav/",
            "",
        );
        (config, target, Credentials::new("alice", None))
    }

    fn run_scripted(
        max_sync_retries: u32,
        script: Vec<Result<SyncReport, EngineError>>,
    ) -> (Result<super::RunSummary, ClientError>, u32) {
        let (config, target, credentials) = fixture(max_sync_retries);
        let script = Arc::new(Mutex::new(VecDeque::from(script)));
        let invocations = Arc::new(AtomicU32::new(0));

        let result = run_sync(
            &config,
            &target,
            &credentials,
            &ExcludeSet::default(),
            &SelectiveSyncList::default(),
            || ScriptedEngine {
                script: Arc::clone(&script),
                invocations: Arc::clone(&invocations),
            },
        );
        (result, invocations.load(Ordering::SeqCst))
    }

    fn needs_another() -> Result<SyncReport, EngineError> {
        Ok(SyncReport::new().with_another_sync_needed(true))
    }

    #[test]
    fn single_clean_pass_runs_once() {
        let (result, invocations) = run_scripted(3, vec![Ok(SyncReport::new())]);
        let summary = result.expect("run succeeds");
        assert_eq!(invocations, 1);
        assert_eq!(summary.attempts(), 1);
        assert!(!summary.restarts_exhausted());
    }

    #[test]
    fn restart_loop_stops_at_budget_plus_one_invocations() {
        let script = vec![
            needs_another(),
            needs_another(),
            needs_another(),
            needs_another(),
        ];
        let (result, invocations) = run_scripted(2, script);
        let summary = result.expect("exhausted budget is not an error");
        assert_eq!(invocations, 3);
        assert_eq!(summary.attempts(), 3);
        assert!(summary.restarts_exhausted());
    }

    #[test]
    fn loop_ends_as_soon_as_no_more_work_is_signalled() {
        let script = vec![needs_another(), needs_another(), Ok(SyncReport::new())];
        let (result, invocations) = run_scripted(5, script);
        let summary = result.expect("run succeeds");
        assert_eq!(invocations, 3);
        assert!(!summary.restarts_exhausted());
    }

    #[test]
    fn hard_error_ends_the_run_without_restarts() {
        let script = vec![Err(EngineError::Aborted), needs_another()];
        let (result, invocations) = run_scripted(3, script);
        assert!(matches!(result, Err(ClientError::Engine(_))));
        assert_eq!(invocations, 1);
    }

    #[test]
    fn zero_budget_still_performs_the_first_attempt() {
        let (result, invocations) = run_scripted(0, vec![needs_another()]);
        let summary = result.expect("run succeeds");
        assert_eq!(invocations, 1);
        assert!(summary.restarts_exhausted());
    }

    #[test]
    fn dead_engine_surfaces_as_a_completion_not_a_hang() {
        let (config, target, credentials) = fixture(3);
        let result = run_sync(
            &config,
            &target,
            &credentials,
            &ExcludeSet::default(),
            &SelectiveSyncList::default(),
            || PanickyEngine,
        );
        assert!(matches!(
            result,
            Err(ClientError::Engine(EngineError::Aborted))
        ));
    }
}

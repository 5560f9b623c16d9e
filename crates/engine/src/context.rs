use std::path::{Path, PathBuf};
use std::time::Duration;

use filters::ExcludeSet;
use journal::SelectiveSyncList;
use url::Url;

/// Outbound proxy selection for one synchronization attempt.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum ProxyConfig {
    /// Use system-configured proxy discovery.
    #[default]
    System,
    /// Route all traffic through exactly this proxy.
    Manual {
        /// Proxy host.
        host: String,
        /// Proxy port.
        port: u16,
    },
}

/// Everything one synchronization attempt needs, assembled by the run
/// orchestrator and destroyed with the attempt.
///
/// The context is never reused across restarts; the orchestrator builds a
/// fresh one for every attempt so no engine-side state leaks between passes.
#[derive(Clone, Debug)]
pub struct EngineContext {
    local_root: PathBuf,
    server_url: Url,
    remote_path: String,
    folder: String,
    excludes: ExcludeSet,
    selective_sync: SelectiveSyncList,
    journal_path: PathBuf,
    ignore_hidden_files: bool,
    trust_ssl: bool,
    minimum_file_age_for_upload: Duration,
    proxy: ProxyConfig,
}

impl EngineContext {
    /// Creates a context for one attempt against `server_url`.
    ///
    /// `remote_path` is the full remote path including the protocol sub-path;
    /// `folder` is the local-folder suffix being synced (empty for the
    /// address root).
    #[must_use]
    pub fn new(
        local_root: PathBuf,
        server_url: Url,
        remote_path: impl Into<String>,
        folder: impl Into<String>,
    ) -> Self {
        let journal_path = local_root.join(journal::JOURNAL_FILE_NAME);
        Self {
            local_root,
            server_url,
            remote_path: remote_path.into(),
            folder: folder.into(),
            excludes: ExcludeSet::default(),
            selective_sync: SelectiveSyncList::default(),
            journal_path,
            ignore_hidden_files: true,
            trust_ssl: false,
            minimum_file_age_for_upload: Duration::ZERO,
            proxy: ProxyConfig::System,
        }
    }

    /// Sets the compiled exclude set for this attempt.
    #[must_use]
    pub fn with_excludes(mut self, excludes: ExcludeSet) -> Self {
        self.excludes = excludes;
        self
    }

    /// Sets the selective-sync list for this attempt.
    #[must_use]
    pub fn with_selective_sync(mut self, selective_sync: SelectiveSyncList) -> Self {
        self.selective_sync = selective_sync;
        self
    }

    /// Sets whether hidden files are ignored (the default) or synced.
    #[must_use]
    pub const fn with_ignore_hidden_files(mut self, ignore: bool) -> Self {
        self.ignore_hidden_files = ignore;
        self
    }

    /// Sets whether TLS certificate errors are trusted for this attempt.
    #[must_use]
    pub const fn with_trust_ssl(mut self, trust: bool) -> Self {
        self.trust_ssl = trust;
        self
    }

    /// Overrides the minimum age a file must have before it is uploaded.
    ///
    /// The command-line client sets this to zero because it is usually run
    /// right after a change.
    #[must_use]
    pub const fn with_minimum_file_age_for_upload(mut self, age: Duration) -> Self {
        self.minimum_file_age_for_upload = age;
        self
    }

    /// Sets the outbound proxy selection.
    #[must_use]
    pub fn with_proxy(mut self, proxy: ProxyConfig) -> Self {
        self.proxy = proxy;
        self
    }

    /// Returns the local sync folder (trailing-separator-normalized).
    #[must_use]
    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    /// Returns the server URL with credentials embedded and a real network
    /// scheme.
    #[must_use]
    pub fn server_url(&self) -> &Url {
        &self.server_url
    }

    /// Returns the server URL with the password removed, for diagnostics.
    #[must_use]
    pub fn display_url(&self) -> Url {
        let mut url = self.server_url.clone();
        let _ = url.set_password(None);
        url
    }

    /// Returns the full remote path including the protocol sub-path.
    #[must_use]
    pub fn remote_path(&self) -> &str {
        &self.remote_path
    }

    /// Returns the local-folder suffix being synced.
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// Returns the compiled exclude set.
    #[must_use]
    pub fn excludes(&self) -> &ExcludeSet {
        &self.excludes
    }

    /// Returns the selective-sync list.
    #[must_use]
    pub fn selective_sync(&self) -> &SelectiveSyncList {
        &self.selective_sync
    }

    /// Returns the journal file path for this synced tree.
    #[must_use]
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Returns whether hidden files are ignored.
    #[must_use]
    pub const fn ignore_hidden_files(&self) -> bool {
        self.ignore_hidden_files
    }

    /// Returns whether TLS certificate errors are trusted.
    #[must_use]
    pub const fn trust_ssl(&self) -> bool {
        self.trust_ssl
    }

    /// Returns the minimum age a file must have before upload.
    #[must_use]
    pub const fn minimum_file_age_for_upload(&self) -> Duration {
        self.minimum_file_age_for_upload
    }

    /// Returns the outbound proxy selection.
    #[must_use]
    pub fn proxy(&self) -> &ProxyConfig {
        &self.proxy
    }
}

use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

/// Default number of additional synchronization attempts after the first.
pub const DEFAULT_SYNC_RETRIES: u32 = 3;

/// Immutable run configuration, created once from the parsed arguments.
///
/// The engine framework never sees this type directly; the orchestrator
/// derives a fresh engine context from it for every attempt, so no mutable
/// process-wide state is needed.
#[derive(Debug)]
pub struct RunConfig {
    source_dir: PathBuf,
    target_address: String,
    proxy: Option<String>,
    silent: bool,
    trust_ssl: bool,
    use_netrc: bool,
    interactive: bool,
    ignore_hidden_files: bool,
    non_shib: bool,
    exclude_file: Option<PathBuf>,
    unsynced_folders_file: Option<PathBuf>,
    dav_path: Option<String>,
    max_sync_retries: u32,
    user: Option<String>,
    password: Option<Zeroizing<String>>,
}

impl RunConfig {
    /// Starts building a configuration for one run.
    ///
    /// `source_dir` must already be trailing-separator-normalized by the
    /// caller.
    #[must_use]
    pub fn builder(source_dir: PathBuf, target_address: impl Into<String>) -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self {
                source_dir,
                target_address: target_address.into(),
                proxy: None,
                silent: false,
                trust_ssl: false,
                use_netrc: false,
                interactive: true,
                ignore_hidden_files: true,
                non_shib: false,
                exclude_file: None,
                unsynced_folders_file: None,
                dav_path: None,
                max_sync_retries: DEFAULT_SYNC_RETRIES,
                user: None,
                password: None,
            },
        }
    }

    /// Returns the local source directory.
    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Returns the raw target address as supplied on the command line.
    #[must_use]
    pub fn target_address(&self) -> &str {
        &self.target_address
    }

    /// Returns the `--httpproxy` value, if supplied.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Returns whether verbose output was suppressed.
    #[must_use]
    pub const fn silent(&self) -> bool {
        self.silent
    }

    /// Returns whether TLS certificate errors are trusted.
    #[must_use]
    pub const fn trust_ssl(&self) -> bool {
        self.trust_ssl
    }

    /// Returns whether the netrc login lookup is enabled.
    #[must_use]
    pub const fn use_netrc(&self) -> bool {
        self.use_netrc
    }

    /// Returns whether missing credentials may be prompted for.
    #[must_use]
    pub const fn interactive(&self) -> bool {
        self.interactive
    }

    /// Returns whether hidden files are ignored.
    #[must_use]
    pub const fn ignore_hidden_files(&self) -> bool {
        self.ignore_hidden_files
    }

    /// Returns whether non-Shibboleth authentication was requested.
    #[must_use]
    pub const fn non_shib(&self) -> bool {
        self.non_shib
    }

    /// Returns the user exclude-list path, if supplied.
    #[must_use]
    pub fn exclude_file(&self) -> Option<&Path> {
        self.exclude_file.as_deref()
    }

    /// Returns the selective-sync folder file, if supplied.
    #[must_use]
    pub fn unsynced_folders_file(&self) -> Option<&Path> {
        self.unsynced_folders_file.as_deref()
    }

    /// Returns the custom protocol sub-path, if supplied.
    #[must_use]
    pub fn dav_path(&self) -> Option<&str> {
        self.dav_path.as_deref()
    }

    /// Returns the restart budget.
    #[must_use]
    pub const fn max_sync_retries(&self) -> u32 {
        self.max_sync_retries
    }

    /// Returns the `--user` value, if supplied.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Returns the `--password` value, if supplied.
    #[must_use]
    pub fn password(&self) -> Option<&Zeroizing<String>> {
        self.password.as_ref()
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    /// Sets the `--httpproxy` value.
    #[must_use]
    pub fn proxy(mut self, proxy: Option<String>) -> Self {
        self.config.proxy = proxy;
        self
    }

    /// Suppresses verbose output.
    #[must_use]
    pub const fn silent(mut self, silent: bool) -> Self {
        self.config.silent = silent;
        self
    }

    /// Trusts TLS certificate errors.
    #[must_use]
    pub const fn trust_ssl(mut self, trust: bool) -> Self {
        self.config.trust_ssl = trust;
        self
    }

    /// Enables the netrc login lookup.
    #[must_use]
    pub const fn use_netrc(mut self, use_netrc: bool) -> Self {
        self.config.use_netrc = use_netrc;
        self
    }

    /// Enables or disables interactive prompts.
    #[must_use]
    pub const fn interactive(mut self, interactive: bool) -> Self {
        self.config.interactive = interactive;
        self
    }

    /// Sets the hidden-file policy.
    #[must_use]
    pub const fn ignore_hidden_files(mut self, ignore: bool) -> Self {
        self.config.ignore_hidden_files = ignore;
        self
    }

    /// Requests non-Shibboleth authentication.
    #[must_use]
    pub const fn non_shib(mut self, non_shib: bool) -> Self {
        self.config.non_shib = non_shib;
        self
    }

    /// Sets the user exclude-list path.
    #[must_use]
    pub fn exclude_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.exclude_file = path;
        self
    }

    /// Sets the selective-sync folder file.
    #[must_use]
    pub fn unsynced_folders_file(mut self, path: Option<PathBuf>) -> Self {
        self.config.unsynced_folders_file = path;
        self
    }

    /// Sets the custom protocol sub-path.
    #[must_use]
    pub fn dav_path(mut self, path: Option<String>) -> Self {
        self.config.dav_path = path;
        self
    }

    /// Sets the restart budget.
    #[must_use]
    pub const fn max_sync_retries(mut self, retries: u32) -> Self {
        self.config.max_sync_retries = retries;
        self
    }

    /// Sets the `--user` value.
    #[must_use]
    pub fn user(mut self, user: Option<String>) -> Self {
        self.config.user = user;
        self
    }

    /// Sets the `--password` value.
    #[must_use]
    pub fn password(mut self, password: Option<Zeroizing<String>>) -> Self {
        self.config.password = password;
        self
    }

    /// Finishes the build.
    #[must_use]
    pub fn build(self) -> RunConfig {
        self.config
    }
}

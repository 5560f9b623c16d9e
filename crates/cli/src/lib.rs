#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `cloudcmd-cli` is the thin command-line front-end for the `cloudcmd`
//! sync client. It recognises the tool's option surface, sequences one
//! non-interactive synchronization run — source-directory validation,
//! account construction, target normalization, credential resolution,
//! exclude-list admission, selective-sync reconciliation — and hands the
//! prepared run to the orchestrator in `cloudcmd_core`.
//!
//! # Design
//!
//! The crate exposes [`run`] as the primary entry point. The function
//! accepts an iterator of arguments together with handles for standard
//! output and error, which keeps the binary trivial and lets tests drive
//! the full startup path in-process. A
//! [`clap`](https://docs.rs/clap/) command definition performs the parse;
//! any parse problem (unknown flag, missing value, missing positionals)
//! prints the usage text and exits successfully, reproducing the
//! historical help-on-any-parse-problem behaviour of the tool.
//!
//! # Invariants
//!
//! - `run` never panics; startup failures surface as exit code 1 with a
//!   diagnostic on standard error. The one exception is a failed account
//!   construction, which is unrecoverable and aborts the process.
//! - The tracing subscriber is installed once per process; `--silent`
//!   lowers the default level to warnings.

use std::env;
use std::ffi::OsString;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

use cloudcmd_core::client::{DEFAULT_SYNC_RETRIES, RunConfig, run_sync};
use cloudcmd_core::creds::{CredentialSource, resolve};
use cloudcmd_core::{Account, TargetAddress};
use engine::LocalDiscoveryEngine;
use filters::load_exclude_set;
use journal::{Journal, SelectiveSyncList, reconcile_selective_sync};

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;

/// Environment override for the system-wide exclude list, used to keep
/// tests hermetic. An empty value disables the system source entirely.
const SYSTEM_EXCLUDES_ENV: &str = "CLOUDCMD_SYSTEM_EXCLUDES";
const SYSTEM_EXCLUDES_PATH: &str = "/etc/cloudcmd/sync-exclude.lst";

/// Deterministic help text describing the CLI surface.
const HELP_TEXT: &str = concat!(
    "cloudcmd - command line cloud synchronization client tool\n",
    "\n",
    "Usage: cloudcmd [OPTION] <source_dir> <server_url>\n",
    "\n",
    "A proxy can either be set manually using --httpproxy.\n",
    "Otherwise, the setting from a configured sync client will be used.\n",
    "\n",
    "Options:\n",
    "  --silent, -s           Don't be so verbose\n",
    "  --httpproxy [proxy]    Specify a http proxy to use.\n",
    "                         Proxy is http://server:port\n",
    "  --trust                Trust the SSL certification.\n",
    "  --exclude [file]       Exclude list file\n",
    "  --unsyncedfolders [file]    File containing the list of unsynced folders (selective sync)\n",
    "  --user, -u [name]      Use [name] as the login name\n",
    "  --password, -p [pass]  Use [pass] as password\n",
    "  -n                     Use netrc (5) for login\n",
    "  --non-interactive      Do not block execution with interaction\n",
    "  --nonshib              Use Non Shibboleth WebDAV authentication\n",
    "  --davpath [path]       Custom themed dav path, overrides --nonshib\n",
    "  --max-sync-retries [n] Retries maximum n times (default to 3)\n",
    "  -h                     Sync hidden files, do not ignore them\n",
    "  --version, -v          Display version and exit\n",
);

/// Parsed command-line options for one run.
#[derive(Debug)]
struct CmdOptions {
    source_dir: String,
    target_url: String,
    user: Option<String>,
    password: Option<String>,
    proxy: Option<String>,
    silent: bool,
    trust_ssl: bool,
    use_netrc: bool,
    interactive: bool,
    ignore_hidden_files: bool,
    non_shib: bool,
    exclude: Option<PathBuf>,
    unsynced_folders: Option<PathBuf>,
    dav_path: Option<String>,
    restart_times: u32,
}

#[derive(Debug)]
enum ParseOutcome {
    Run(Box<CmdOptions>),
    Version,
    Help,
}

/// Builds the `clap` command used for parsing.
///
/// Built-in help and version handling is disabled: `-h` belongs to the
/// hidden-files flag and the usage text is rendered from [`HELP_TEXT`].
fn clap_command() -> Command {
    Command::new("cloudcmd")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("silent")
                .long("silent")
                .short('s')
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("httpproxy")
                .long("httpproxy")
                .value_name("proxy")
                .action(ArgAction::Set),
        )
        .arg(Arg::new("trust").long("trust").action(ArgAction::SetTrue))
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .value_name("file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("unsyncedfolders")
                .long("unsyncedfolders")
                .value_name("file")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .value_name("name")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("password")
                .long("password")
                .short('p')
                .value_name("pass")
                .action(ArgAction::Set),
        )
        .arg(Arg::new("netrc").short('n').action(ArgAction::SetTrue))
        .arg(
            Arg::new("non_interactive")
                .long("non-interactive")
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("nonshib").long("nonshib").action(ArgAction::SetTrue))
        .arg(
            Arg::new("davpath")
                .long("davpath")
                .value_name("path")
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("max_sync_retries")
                .long("max-sync-retries")
                .value_name("n")
                .value_parser(clap::value_parser!(u32))
                .action(ArgAction::Set),
        )
        .arg(Arg::new("sync_hidden").short('h').action(ArgAction::SetTrue))
        .arg(
            Arg::new("version")
                .long("version")
                .short('v')
                .action(ArgAction::SetTrue),
        )
        .arg(Arg::new("source_dir").index(1))
        .arg(Arg::new("server_url").index(2))
}

fn parse_args<I, S>(arguments: I) -> ParseOutcome
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
{
    let matches = match clap_command().try_get_matches_from(arguments) {
        Ok(matches) => matches,
        // any parse problem falls back to the usage text
        Err(_) => return ParseOutcome::Help,
    };

    if matches.get_flag("version") {
        return ParseOutcome::Version;
    }

    let (Some(source_dir), Some(target_url)) = (
        matches.get_one::<String>("source_dir"),
        matches.get_one::<String>("server_url"),
    ) else {
        return ParseOutcome::Help;
    };

    ParseOutcome::Run(Box::new(CmdOptions {
        source_dir: source_dir.clone(),
        target_url: target_url.clone(),
        user: matches.get_one::<String>("user").cloned(),
        password: matches.get_one::<String>("password").cloned(),
        proxy: matches.get_one::<String>("httpproxy").cloned(),
        silent: matches.get_flag("silent"),
        trust_ssl: matches.get_flag("trust"),
        use_netrc: matches.get_flag("netrc"),
        interactive: !matches.get_flag("non_interactive"),
        ignore_hidden_files: !matches.get_flag("sync_hidden"),
        non_shib: matches.get_flag("nonshib"),
        exclude: path_arg(&matches, "exclude"),
        unsynced_folders: path_arg(&matches, "unsyncedfolders"),
        dav_path: matches.get_one::<String>("davpath").cloned(),
        restart_times: matches
            .get_one::<u32>("max_sync_retries")
            .copied()
            .unwrap_or(DEFAULT_SYNC_RETRIES),
    }))
}

fn path_arg(matches: &ArgMatches, id: &str) -> Option<PathBuf> {
    matches.get_one::<String>(id).map(PathBuf::from)
}

/// Runs the command-line client and returns the process exit code.
///
/// The first argument is expected to be the binary name. Output intended
/// for the user is written to `stdout`/`stderr`; diagnostics go through
/// `tracing` on standard error.
pub fn run<I, S, Out, Err>(arguments: I, stdout: &mut Out, stderr: &mut Err) -> i32
where
    I: IntoIterator<Item = S>,
    S: Into<OsString> + Clone,
    Out: Write,
    Err: Write,
{
    match parse_args(arguments) {
        ParseOutcome::Help => {
            let _ = write!(stdout, "{HELP_TEXT}");
            EXIT_OK
        }
        ParseOutcome::Version => {
            let _ = writeln!(stdout, "cloudcmd version {}", env!("CARGO_PKG_VERSION"));
            EXIT_OK
        }
        ParseOutcome::Run(options) => execute(*options, stderr),
    }
}

/// Maps [`run`]'s return value onto a process [`ExitCode`].
#[must_use]
pub fn exit_code_from(code: i32) -> ExitCode {
    u8::try_from(code).map_or(ExitCode::FAILURE, ExitCode::from)
}

fn execute<Err: Write>(options: CmdOptions, stderr: &mut Err) -> i32 {
    init_tracing(options.silent);

    let mut source_dir = options.source_dir;
    if !source_dir.ends_with('/') {
        source_dir.push('/');
    }
    let source_path = PathBuf::from(&source_dir);
    if !source_path.exists() {
        let _ = writeln!(stderr, "Source dir '{source_dir}' does not exist.");
        return EXIT_FAILURE;
    }

    let config = RunConfig::builder(source_path, options.target_url)
        .proxy(options.proxy)
        .silent(options.silent)
        .trust_ssl(options.trust_ssl)
        .use_netrc(options.use_netrc)
        .interactive(options.interactive)
        .ignore_hidden_files(options.ignore_hidden_files)
        .non_shib(options.non_shib)
        .exclude_file(options.exclude)
        .unsynced_folders_file(options.unsynced_folders)
        .dav_path(options.dav_path)
        .max_sync_retries(options.restart_times)
        .user(options.user)
        .password(options.password.map(Zeroizing::new))
        .build();

    let account = match Account::create(config.non_shib(), config.dav_path()) {
        Ok(account) => account,
        Err(error) => {
            // nothing sensible can run without an account
            let _ = writeln!(stderr, "Could not initialize account: {error}");
            process::abort();
        }
    };

    let address = match TargetAddress::parse(config.target_address(), &account) {
        Ok(address) => address,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            return EXIT_FAILURE;
        }
    };

    // Order of retrieval attempt (later attempts override earlier ones):
    // 1. From URL
    // 2. From options
    // 3. From netrc (if enabled)
    // 4. From prompt (if interactive)
    let mut sources = vec![
        CredentialSource::Embedded {
            user: address.username().to_owned(),
            secret: address
                .password()
                .map(|secret| Zeroizing::new(secret.to_owned())),
        },
        CredentialSource::FlagSupplied {
            user: config.user().map(str::to_owned),
            secret: config.password().cloned(),
        },
    ];
    if config.use_netrc() {
        sources.push(CredentialSource::LookupFile { path: None });
    }
    if config.interactive() {
        sources.push(CredentialSource::InteractivePrompt);
    }
    let mut credentials = resolve(sources, address.host());
    credentials.set_ssl_trusted(config.trust_ssl());

    let target = match address.normalize(&credentials) {
        Ok(target) => target,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            return EXIT_FAILURE;
        }
    };

    let system_excludes = system_exclude_file();
    let excludes = match load_exclude_set(system_excludes.as_deref(), config.exclude_file()) {
        Ok(excludes) => excludes,
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            return EXIT_FAILURE;
        }
    };

    let selective_sync = config
        .unsynced_folders_file()
        .map_or_else(SelectiveSyncList::new, read_unsynced_folders);

    {
        let mut journal = match Journal::open(config.source_dir()) {
            Ok(journal) => journal,
            Err(error) => {
                let _ = writeln!(stderr, "{error}");
                return EXIT_FAILURE;
            }
        };
        if !selective_sync.is_empty() {
            if let Err(error) = reconcile_selective_sync(&mut journal, &selective_sync) {
                let _ = writeln!(stderr, "{error}");
                return EXIT_FAILURE;
            }
        }
        // single-writer discipline: the engine owns the journal during the
        // pass, so the startup handle is released before the loop starts
    }

    match run_sync(
        &config,
        &target,
        &credentials,
        &excludes,
        &selective_sync,
        LocalDiscoveryEngine::new,
    ) {
        Ok(summary) => {
            tracing::info!(
                attempts = summary.attempts(),
                files = summary.last_report().files_seen(),
                "sync run finished"
            );
            EXIT_OK
        }
        Err(error) => {
            let _ = writeln!(stderr, "Sync run failed: {error}");
            EXIT_FAILURE
        }
    }
}

fn read_unsynced_folders(path: &Path) -> SelectiveSyncList {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            tracing::error!(
                %error,
                path = %path.display(),
                "could not open file containing the list of unsynced folders"
            );
            return SelectiveSyncList::new();
        }
    };
    match SelectiveSyncList::from_reader(file) {
        Ok(list) => list,
        Err(error) => {
            tracing::error!(
                %error,
                path = %path.display(),
                "could not read the list of unsynced folders"
            );
            SelectiveSyncList::new()
        }
    }
}

fn system_exclude_file() -> Option<PathBuf> {
    match env::var_os(SYSTEM_EXCLUDES_ENV) {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(PathBuf::from(value)),
        None => Some(PathBuf::from(SYSTEM_EXCLUDES_PATH)),
    }
}

fn init_tracing(silent: bool) {
    let default_level = if silent { "warn" } else { "debug" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

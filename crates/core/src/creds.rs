//! Credential resolution from ranked sources.
//!
//! The resolver folds a sequence of [`CredentialSource`] stages; each stage
//! overrides the previous one only where it carries a non-empty value. The
//! interactive prompt comes last and only fills fields that are still empty.
//! An empty field after all stages is not fatal here: the downstream
//! authentication attempt surfaces the failure.

pub mod netrc;
mod prompt;

use std::io;
use std::path::PathBuf;

use is_terminal::IsTerminal;
use zeroize::Zeroizing;

pub use netrc::{LoginPair, Netrc, NetrcError};
pub(crate) use prompt::{Prompt, TerminalPrompt};

/// Final (user, secret) pair handed as a read-only view to the engine.
///
/// Exactly one instance exists per run. The instance is never replaced once
/// constructed; only a missing secret may be filled in lazily on first use.
#[derive(Debug)]
pub struct Credentials {
    user: String,
    secret: Option<Zeroizing<String>>,
    ssl_trusted: bool,
}

impl Credentials {
    /// Creates credentials, usually via [`resolve`].
    #[must_use]
    pub fn new(user: impl Into<String>, secret: Option<Zeroizing<String>>) -> Self {
        Self {
            user: user.into(),
            secret: secret.filter(|secret| !secret.is_empty()),
            ssl_trusted: false,
        }
    }

    /// Returns the user identifier; empty when no source supplied one.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the secret, if one was supplied or filled in.
    #[must_use]
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().map(String::as_str)
    }

    /// Fills in the secret on first use. A secret that is already present is
    /// never replaced.
    pub fn fill_secret(&mut self, secret: Zeroizing<String>) {
        if self.secret.is_none() && !secret.is_empty() {
            self.secret = Some(secret);
        }
    }

    /// Marks TLS certificate errors as trusted for this run.
    pub fn set_ssl_trusted(&mut self, trusted: bool) {
        self.ssl_trusted = trusted;
    }

    /// Returns whether TLS certificate errors are trusted.
    #[must_use]
    pub const fn ssl_trusted(&self) -> bool {
        self.ssl_trusted
    }
}

/// One stage of the credential resolution chain, in ranking order.
#[derive(Debug)]
pub enum CredentialSource {
    /// Values embedded in the target address.
    Embedded {
        /// User from the address, possibly empty.
        user: String,
        /// Secret from the address, if present.
        secret: Option<Zeroizing<String>>,
    },
    /// Values supplied via explicit options.
    FlagSupplied {
        /// `--user` value.
        user: Option<String>,
        /// `--password` value.
        secret: Option<Zeroizing<String>>,
    },
    /// Host lookup in a netrc file; failures leave prior values unchanged.
    LookupFile {
        /// Explicit netrc location, or the default when `None`.
        path: Option<PathBuf>,
    },
    /// Prompt on the controlling terminal for fields still empty.
    InteractivePrompt,
}

/// Resolves the final (user, secret) pair for `host`.
///
/// Stages are applied in the supplied order; see [`CredentialSource`]. When
/// standard input is not a terminal the interactive stage is skipped, since
/// there is no controlling terminal to prompt on.
#[must_use]
pub fn resolve(sources: Vec<CredentialSource>, host: &str) -> Credentials {
    let mut prompt = TerminalPrompt;
    let interactive_possible = io::stdin().is_terminal();
    let sources = sources
        .into_iter()
        .filter(|source| {
            if matches!(source, CredentialSource::InteractivePrompt) && !interactive_possible {
                tracing::debug!("standard input is not a terminal, skipping credential prompt");
                return false;
            }
            true
        })
        .collect();
    resolve_with(sources, host, &mut prompt)
}

pub(crate) fn resolve_with(
    sources: Vec<CredentialSource>,
    host: &str,
    prompt: &mut dyn Prompt,
) -> Credentials {
    let mut user = String::new();
    let mut secret: Option<Zeroizing<String>> = None;

    for source in sources {
        match source {
            CredentialSource::Embedded {
                user: embedded_user,
                secret: embedded_secret,
            } => {
                apply(&mut user, &mut secret, Some(embedded_user), embedded_secret);
            }
            CredentialSource::FlagSupplied {
                user: flag_user,
                secret: flag_secret,
            } => {
                apply(&mut user, &mut secret, flag_user, flag_secret);
            }
            CredentialSource::LookupFile { path } => {
                let loaded = match path {
                    Some(path) => Netrc::load(&path),
                    None => Netrc::load_default(),
                };
                match loaded {
                    Ok(netrc) => {
                        if let Some(pair) = netrc.find(host) {
                            apply(
                                &mut user,
                                &mut secret,
                                Some(pair.user().to_owned()),
                                Some(Zeroizing::new(pair.secret().to_owned())),
                            );
                        } else {
                            tracing::debug!(host, "no netrc entry for host");
                        }
                    }
                    Err(error) => tracing::debug!(%error, "netrc not usable"),
                }
            }
            CredentialSource::InteractivePrompt => {
                if user.is_empty() {
                    match prompt.user_name() {
                        Ok(name) => user = name,
                        Err(error) => tracing::warn!(%error, "user name prompt failed"),
                    }
                }
                if secret.is_none() {
                    match prompt.secret(&user) {
                        Ok(value) if !value.is_empty() => secret = Some(value),
                        Ok(_) => {}
                        Err(error) => tracing::warn!(%error, "password prompt failed"),
                    }
                }
            }
        }
    }

    Credentials::new(user, secret)
}

/// Applies one stage: non-empty values override, everything else is kept.
fn apply(
    user: &mut String,
    secret: &mut Option<Zeroizing<String>>,
    new_user: Option<String>,
    new_secret: Option<Zeroizing<String>>,
) {
    if let Some(new_user) = new_user {
        if !new_user.is_empty() {
            *user = new_user;
        }
    }
    if let Some(new_secret) = new_secret {
        if !new_secret.is_empty() {
            *secret = Some(new_secret);
        }
    }
}

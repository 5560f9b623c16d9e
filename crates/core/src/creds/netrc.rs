//! Host-keyed login lookup in netrc (5) format.
//!
//! The parser recognises the `machine`, `default`, `login`, and `password`
//! directives, skips `account` values, and stops at `macdef` bodies. Lines
//! starting with `#` are treated as comments, matching the widely deployed
//! parser behaviour even though netrc (5) does not formally define them.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use zeroize::Zeroizing;

/// One (login, password) entry from a netrc file.
#[derive(Clone, Debug, Default)]
pub struct LoginPair {
    user: String,
    secret: Zeroizing<String>,
}

impl LoginPair {
    /// Returns the login name.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the password.
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    fn is_empty(&self) -> bool {
        self.user.is_empty() && self.secret.is_empty()
    }
}

/// Error produced when the netrc file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum NetrcError {
    /// No home directory to resolve the default location against.
    #[error("cannot determine the netrc location: HOME is not set")]
    NoHome,
    /// The netrc file could not be read.
    #[error("failed to read netrc '{}': {source}", .path.display())]
    Read {
        /// Netrc file path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
}

/// Parsed netrc contents, keyed by machine name.
#[derive(Debug, Default)]
pub struct Netrc {
    machines: HashMap<String, LoginPair>,
    default: Option<LoginPair>,
}

impl Netrc {
    /// Loads `$HOME/.netrc`.
    ///
    /// # Errors
    ///
    /// Returns [`NetrcError::NoHome`] when the home directory cannot be
    /// determined and [`NetrcError::Read`] when the file is unreadable.
    pub fn load_default() -> Result<Self, NetrcError> {
        let home = env::var_os("HOME").ok_or(NetrcError::NoHome)?;
        Self::load(&Path::new(&home).join(".netrc"))
    }

    /// Loads and parses the netrc file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`NetrcError::Read`] when the file is unreadable.
    pub fn load(path: &Path) -> Result<Self, NetrcError> {
        let text = fs::read_to_string(path).map_err(|source| NetrcError::Read {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    /// Parses netrc text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut netrc = Self::default();
        let mut current: Option<(Option<String>, LoginPair)> = None;

        let mut tokens = text
            .lines()
            .flat_map(|line| {
                line.split_whitespace()
                    .take_while(|token| !token.starts_with('#'))
            })
            .peekable();

        while let Some(token) = tokens.next() {
            match token {
                "machine" => {
                    if let Some(entry) = current.take() {
                        netrc.store(entry);
                    }
                    if let Some(name) = tokens.next() {
                        current = Some((Some(name.to_owned()), LoginPair::default()));
                    }
                }
                "default" => {
                    if let Some(entry) = current.take() {
                        netrc.store(entry);
                    }
                    current = Some((None, LoginPair::default()));
                }
                "login" => {
                    if let (Some((_, pair)), Some(value)) = (current.as_mut(), tokens.next()) {
                        pair.user = value.to_owned();
                    }
                }
                "password" => {
                    if let (Some((_, pair)), Some(value)) = (current.as_mut(), tokens.next()) {
                        pair.secret = Zeroizing::new(value.to_owned());
                    }
                }
                "account" => {
                    let _ = tokens.next();
                }
                // macdef bodies run to a blank line; a token stream has no
                // blank lines left, so stop parsing here like ftp(1) does
                // when it cannot interpret the remainder.
                "macdef" => break,
                _ => {}
            }
        }
        if let Some(entry) = current.take() {
            netrc.store(entry);
        }
        netrc
    }

    fn store(&mut self, (machine, pair): (Option<String>, LoginPair)) {
        if pair.is_empty() {
            return;
        }
        match machine {
            Some(machine) => {
                self.machines.insert(machine, pair);
            }
            None => self.default = Some(pair),
        }
    }

    /// Looks up the entry for `host`, falling back to the `default` entry.
    #[must_use]
    pub fn find(&self, host: &str) -> Option<&LoginPair> {
        self.machines.get(host).or(self.default.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::Netrc;

    #[test]
    fn machine_entries_are_keyed_by_host() {
        let netrc = Netrc::parse(
            "machine cloud.example.com login alice password secret\n\
             machine other.example.com login bob password hunter2\n",
        );
        let pair = netrc.find("cloud.example.com").expect("entry");
        assert_eq!(pair.user(), "alice");
        assert_eq!(pair.secret(), "secret");
        assert_eq!(netrc.find("other.example.com").expect("entry").user(), "bob");
    }

    #[test]
    fn default_entry_answers_unknown_hosts() {
        let netrc = Netrc::parse("default login fallback password pass\n");
        assert_eq!(netrc.find("anything").expect("entry").user(), "fallback");
    }

    #[test]
    fn unknown_host_without_default_yields_nothing() {
        let netrc = Netrc::parse("machine known login a password b\n");
        assert!(netrc.find("unknown").is_none());
    }

    #[test]
    fn comments_and_account_values_are_skipped() {
        let netrc = Netrc::parse(
            "# personal logins\n\
             machine cloud.example.com account billing login alice password secret # inline\n",
        );
        let pair = netrc.find("cloud.example.com").expect("entry");
        assert_eq!(pair.user(), "alice");
        assert_eq!(pair.secret(), "secret");
    }

    #[test]
    fn tokens_may_span_lines() {
        let netrc = Netrc::parse("machine cloud.example.com\n  login alice\n  password secret\n");
        assert_eq!(netrc.find("cloud.example.com").expect("entry").user(), "alice");
    }

    #[test]
    fn macdef_stops_the_parse() {
        let netrc = Netrc::parse(
            "machine first login a password b\n\
             macdef init\n\
             machine ignored login x password y\n",
        );
        assert!(netrc.find("first").is_some());
        assert!(netrc.find("ignored").is_none());
    }
}

//! Account-level metadata for the remote storage service.

/// Default remote protocol sub-path.
pub const WEBDAV_PATH: &str = "remote.php/webdav/";

/// Remote protocol sub-path used with non-Shibboleth authentication.
pub const NONSHIB_WEBDAV_PATH: &str = "remote.php/nonshib-webdav/";

/// Error produced when the account cannot be constructed.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// A custom protocol sub-path was supplied but empty.
    #[error("custom dav path must not be empty")]
    EmptyDavPath,
}

/// Account-level metadata: the remote protocol sub-path and the
/// authentication flavour.
///
/// A custom sub-path supplied via `--davpath` overrides the non-Shibboleth
/// flag, which in turn overrides the default.
#[derive(Clone, Debug)]
pub struct Account {
    non_shib: bool,
    dav_path: Option<String>,
}

impl Account {
    /// Constructs the account from the command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns [`AccountError::EmptyDavPath`] when a custom sub-path is
    /// supplied but blank. The caller treats a failed account construction
    /// as unrecoverable.
    pub fn create(non_shib: bool, dav_path: Option<&str>) -> Result<Self, AccountError> {
        let dav_path = match dav_path {
            Some(path) if path.trim().is_empty() => return Err(AccountError::EmptyDavPath),
            Some(path) => {
                let mut path = path.trim_start_matches('/').to_owned();
                if !path.ends_with('/') {
                    path.push('/');
                }
                Some(path)
            }
            None => None,
        };
        Ok(Self { non_shib, dav_path })
    }

    /// Returns the effective remote protocol sub-path.
    #[must_use]
    pub fn dav_path(&self) -> &str {
        match &self.dav_path {
            Some(path) => path,
            None if self.non_shib => NONSHIB_WEBDAV_PATH,
            None => WEBDAV_PATH,
        }
    }

    /// Returns whether non-Shibboleth authentication was requested.
    #[must_use]
    pub const fn non_shib(&self) -> bool {
        self.non_shib
    }
}

#[cfg(test)]
mod tests {
    use super::{Account, NONSHIB_WEBDAV_PATH, WEBDAV_PATH};

    #[test]
    fn default_dav_path_follows_the_auth_flavour() {
        let account = Account::create(false, None).expect("account");
        assert_eq!(account.dav_path(), WEBDAV_PATH);

        let nonshib = Account::create(true, None).expect("account");
        assert_eq!(nonshib.dav_path(), NONSHIB_WEBDAV_PATH);
    }

    #[test]
    fn custom_dav_path_overrides_nonshib() {
        let account = Account::create(true, Some("custom/dav")).expect("account");
        assert_eq!(account.dav_path(), "custom/dav/");
    }

    #[test]
    fn blank_dav_path_fails_construction() {
        assert!(Account::create(false, Some("  ")).is_err());
    }
}

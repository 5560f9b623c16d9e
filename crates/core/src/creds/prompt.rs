//! Terminal prompts for the interactive credential stage.

use std::io::{self, BufRead, Write};

use zeroize::Zeroizing;

/// Prompt seam so the resolver can be exercised without a terminal.
pub(crate) trait Prompt {
    /// Asks for the user name with input echoed.
    fn user_name(&mut self) -> io::Result<String>;

    /// Asks for the secret with input echo suppressed.
    fn secret(&mut self, user: &str) -> io::Result<Zeroizing<String>>;
}

/// Prompts on the controlling terminal.
///
/// The secret prompt acquires the terminal's echo state for the duration of
/// the read and restores it on every exit path, including interrupted reads;
/// `rpassword` scopes the raw-mode handle so the restore happens on drop.
pub(crate) struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn user_name(&mut self) -> io::Result<String> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "Please enter user name: ")?;
        stdout.flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_owned())
    }

    fn secret(&mut self, user: &str) -> io::Result<Zeroizing<String>> {
        rpassword::prompt_password(format!("Password for user {user}: ")).map(Zeroizing::new)
    }
}

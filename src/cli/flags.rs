use crate::pin::PasswordType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// No subcommand: only info flags, or the interactive menu.
    #[default]
    None,
    Register,
    Login,
    Experiment,
    Condition,
    Keypad,
    Status,
    Logout,
}

#[derive(Debug, Default)]
pub struct CliFlags {
    pub help: bool,
    pub version: bool,
    pub quiet: bool,
    pub urandom: bool,
    pub command: Command,
    /// Positional value after `experiment` or `condition`.
    pub value: Option<String>,
    pub participant: Option<String>,
    pub username: Option<String>,
    pub password_type: Option<PasswordType>,
    /// Keypad slots typed non-interactively, e.g. `3141`.
    pub entry: Option<String>,
    pub home: Option<String>,
    pub vocab: Option<String>,
}

impl CliFlags {
    pub fn has_identity(&self) -> bool {
        self.participant.is_some() && self.username.is_some()
    }
}

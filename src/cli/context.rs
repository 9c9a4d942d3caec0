//! CLI context - bundles flags, the session and the registration store.

use std::io::{self, Write};
use std::path::PathBuf;

use zeroize::Zeroize;

use super::{CliFlags, Command, prompts, quiet};
use crate::auth::input::slot_index;
use crate::auth::{self, AuthError, ConfirmOutcome, LoginFlow, LoginOutcome, RegistrationFlow};
use crate::pin::{PIN_LENGTH, PasswordType, Symbol, Vocabulary};
use crate::rand;
use crate::session::{ExperimentMode, Session};
use crate::settings::{default_home, settings_path};
use crate::store::{LocalStore, RegistrationStore};
use crate::terminal::keypad_rows;
use crate::tui;

/// Early exit carrying the process status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Done {
    /// Finished early without error (help, version).
    Success,
    /// Usage error, mismatch or failed save.
    Failure,
    /// Login attempted with nothing registered.
    NotRegistered,
}

impl Done {
    pub fn code(self) -> i32 {
        match self {
            Done::Success => 0,
            Done::Failure => 1,
            Done::NotRegistered => 2,
        }
    }
}

/// Application context for CLI mode.
pub struct Context {
    pub flags: CliFlags,
    pub session: Session,
    pub store: LocalStore,
}

impl Context {
    /// Create a new context by parsing command-line arguments.
    /// Returns Err with the error message if parsing or vocabulary loading fails.
    pub fn new(args: Vec<String>) -> Result<Self, String> {
        let flags = super::parse(&args).map_err(|e| e.to_string())?;
        quiet::set(flags.quiet);

        let home = flags
            .home
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(default_home);
        let vocab = match &flags.vocab {
            Some(path) => Vocabulary::from_file(path).map_err(|e| format!("{e:#}"))?,
            None => Vocabulary::standard(),
        };

        Ok(Self {
            session: Session::open(settings_path(&home), vocab),
            store: LocalStore::new(home),
            flags,
        })
    }

    /// Run CLI. Returns `Err(Done)` for early exits, `Ok(())` on completion.
    pub fn run(&mut self) -> Result<(), Done> {
        self.handle_info_flags()?;
        self.handle_urandom();

        match self.flags.command {
            Command::None => self.menu(),
            Command::Register => self.register(),
            Command::Login => self.login(),
            Command::Experiment => self.experiment(),
            Command::Condition => self.condition(),
            Command::Keypad => {
                self.keypad();
                Ok(())
            }
            Command::Status => {
                self.status();
                Ok(())
            }
            Command::Logout => {
                auth::logout(&mut self.session);
                prompts::info("Logged out.");
                Ok(())
            }
        }
    }

    fn handle_info_flags(&self) -> Result<(), Done> {
        if self.flags.help {
            tui::print_help();
            return Err(Done::Success);
        }
        if self.flags.version {
            println!("emojipin {}", env!("CARGO_PKG_VERSION"));
            return Err(Done::Success);
        }
        Ok(())
    }

    fn handle_urandom(&self) {
        if self.flags.urandom && !rand::enable_urandom() {
            prompts::urandom_unavailable();
        }
    }

    /// Global flags only: open the menu on a terminal, otherwise it is a usage error.
    fn menu(&mut self) -> Result<(), Done> {
        if quiet::skip_prompt() {
            prompts::error("No command given.");
            prompts::usage_hint();
            return Err(Done::Failure);
        }
        tui::gen_main_menu(&mut self.session, &mut self.store);
        Ok(())
    }

    fn register(&mut self) -> Result<(), Done> {
        if !self.flags.has_identity() {
            prompts::error("register needs -p ID and -n NAME");
            return Err(Done::Failure);
        }
        let participant = self.flags.participant.clone().unwrap_or_default();
        let username = self.flags.username.clone().unwrap_or_default();
        let password_type = self
            .flags
            .password_type
            .unwrap_or_else(|| self.session.condition());

        let mut flow = RegistrationFlow::new();
        if let Err(e) = flow.generate(&mut self.session, &participant, &username, password_type) {
            prompts::error(&e.to_string());
            return Err(Done::Failure);
        }

        if self.use_keypad_screen() {
            return match tui::confirm_screen(&mut flow, &mut self.store) {
                Some(_) => Ok(()),
                None => Err(Done::Failure),
            };
        }

        let mut entry = {
            let Some(pending) = flow.pending() else {
                return Err(Done::Failure);
            };
            println!("Passcode: {}", tui::spaced(pending.passcode().symbols()));
            print_keys(pending.keys());
            self.read_entry()?
        };

        let Some(pending) = flow.pending_mut() else {
            return Err(Done::Failure);
        };
        let entered = enter_slots(&entry, |c| pending.press_slot(c));
        entry.zeroize();
        entered?;
        if !pending.input().is_complete() {
            prompts::error(&format!("Please enter {} characters", PIN_LENGTH));
            return Err(Done::Failure);
        }

        match flow.confirm(&mut self.store) {
            Ok(ConfirmOutcome::Registered(_)) => {
                prompts::success(&format!("Registered {} ✅", participant.trim()));
                Ok(())
            }
            Ok(ConfirmOutcome::Mismatch) => {
                prompts::error("Passcode does not match. Nothing was saved.");
                Err(Done::Failure)
            }
            Ok(ConfirmOutcome::SaveFailed) => {
                prompts::error("Could not save registration.");
                Err(Done::Failure)
            }
            Err(e) => {
                prompts::error(&e.to_string());
                Err(Done::Failure)
            }
        }
    }

    fn login(&mut self) -> Result<(), Done> {
        let participant = self.flags.participant.as_deref();
        let mut flow = match LoginFlow::open(&self.store, &mut self.session, participant) {
            Ok(f) => f,
            Err(e @ AuthError::NotRegistered) => {
                prompts::error(&e.to_string());
                return Err(Done::NotRegistered);
            }
            Err(e) => {
                prompts::error(&e.to_string());
                return Err(Done::Failure);
            }
        };

        if self.use_keypad_screen() {
            return if tui::login_screen(&mut flow, &mut self.store, &mut self.session) {
                prompts::success(&LoginOutcome::Success.message());
                Ok(())
            } else {
                Err(Done::Failure)
            };
        }

        print_keys(flow.keys());
        let mut entry = self.read_entry()?;
        let entered = enter_slots(&entry, |c| flow.press_slot(c));
        entry.zeroize();
        entered?;

        match flow.submit(&mut self.store, &mut self.session) {
            LoginOutcome::Success => {
                prompts::success(&LoginOutcome::Success.message());
                Ok(())
            }
            outcome => {
                prompts::error(&outcome.message());
                Err(Done::Failure)
            }
        }
    }

    fn experiment(&mut self) -> Result<(), Done> {
        let mode = match self.flags.value.as_deref() {
            None => {
                println!("{}", self.session.experiment_mode());
                return Ok(());
            }
            Some("on") => ExperimentMode::On,
            Some("off") => ExperimentMode::Off,
            Some(other) => {
                prompts::error(&format!("Invalid value for experiment: {} (use on or off)", other));
                return Err(Done::Failure);
            }
        };
        self.session.set_experiment_mode(mode);
        prompts::info(&format!("Experiment mode: {}", mode));
        Ok(())
    }

    fn condition(&mut self) -> Result<(), Done> {
        let Some(value) = self.flags.value.as_deref() else {
            println!("{}", self.session.condition());
            return Ok(());
        };
        match value.parse::<PasswordType>() {
            Ok(condition) => {
                self.session.set_condition(condition);
                prompts::info(&format!("Condition: {}", condition));
                Ok(())
            }
            Err(e) => {
                prompts::error(&e.to_string());
                Err(Done::Failure)
            }
        }
    }

    fn keypad(&mut self) {
        let pool = self.session.keypad_pool();
        if quiet::is_stdout_tty() {
            tui::print_pool(&pool);
        } else {
            println!("{}", tui::spaced(&pool));
        }
    }

    fn status(&mut self) {
        let latest = self.store.read_registration(self.flags.participant.as_deref());
        let lines = tui::status_lines(&self.session, self.store.kind(), latest.as_ref());
        if quiet::is_stdout_tty() {
            tui::print_status(&lines);
        } else {
            lines.iter().for_each(|line| println!("{}", line));
        }
    }

    /// The raw keypad only when nothing was passed with `--entry` and a
    /// person is at the terminal.
    fn use_keypad_screen(&self) -> bool {
        self.flags.entry.is_none() && !quiet::skip_prompt()
    }

    /// Slots from `--entry` (login only), else one line of stdin.
    fn read_entry(&mut self) -> Result<String, Done> {
        if let Some(entry) = self.flags.entry.take() {
            return Ok(entry);
        }

        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(n) if n > 0 => {
                let entry = line.trim().to_string();
                line.zeroize();
                Ok(entry)
            }
            _ => {
                prompts::error("No keypad entry given. Pipe one line of slot keys.");
                Err(Done::Failure)
            }
        }
    }
}

/// Printed even in quiet mode.
fn print_keys(keys: &[Symbol]) {
    let mut out = io::stdout().lock();
    let _ = write_keys(&mut out, keys, quiet::is_stdout_tty());
}

fn write_keys(out: &mut impl Write, keys: &[Symbol], color: bool) -> io::Result<()> {
    for row in keypad_rows(keys, color) {
        writeln!(out, "{}", row)?;
    }
    out.flush()
}

/// Press each slot key in `entry`. Whitespace is skipped.
fn enter_slots(entry: &str, mut press: impl FnMut(char) -> bool) -> Result<(), Done> {
    for c in entry.chars().filter(|c| !c.is_whitespace()) {
        if slot_index(c).is_none() {
            prompts::error(&format!("Invalid slot key: {} (use 1-9 and 0)", c));
            return Err(Done::Failure);
        }
        if !press(c) {
            prompts::error(&format!("Enter exactly {} keys", PIN_LENGTH));
            return Err(Done::Failure);
        }
    }
    Ok(())
}

//! Interactive TUI menus.

mod input;
mod keypad;
mod menu;
mod text;

pub use input::*;
pub use keypad::*;
pub use menu::*;
pub use text::*;

use crate::pin::Vocabulary;
use crate::session::Session;
use crate::settings::{default_home, settings_path};
use crate::store::LocalStore;

/// Run TUI interactive mode against the default home directory.
pub fn run() {
    let home = default_home();
    let mut session = Session::open(settings_path(&home), Vocabulary::standard());
    let mut store = LocalStore::new(&home);
    gen_main_menu(&mut session, &mut store);
}

use std::env;

use emojipin::{cli, exits, tui};

fn main() {
    exits::reset_terminal();
    exits::install_handlers();
    // Keep passcodes out of core dumps and ptrace
    #[cfg(target_os = "linux")]
    unsafe {
        libc::prctl(libc::PR_SET_DUMPABLE, 0);
    }

    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => tui::run(),
        _ => cli::run(args),
    }
}

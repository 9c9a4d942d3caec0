//! Exit handling: signal handlers, cleanup, and graceful shutdown.

use crate::rand;

/// Reset terminal to sane state using termios directly
fn reset_terminal_termios() {
    unsafe {
        let mut termios: libc::termios = std::mem::zeroed();
        if libc::tcgetattr(0, &mut termios) == 0 {
            termios.c_oflag |= libc::OPOST | libc::ONLCR;
            termios.c_lflag |= libc::ICANON | libc::ECHO | libc::ISIG;
            libc::tcsetattr(0, libc::TCSANOW, &termios);
        }
    }
}

/// Registered with atexit: restore the terminal and wipe generator state.
extern "C" fn cleanup_on_exit() {
    reset_terminal_termios();
    // Show the cursor again, but only on a terminal so piped output stays clean
    unsafe {
        if libc::isatty(1) == 1 {
            let seq = b"\x1b[0m\x1b[?25h";
            libc::write(1, seq.as_ptr() as *const libc::c_void, seq.len());
        }
    }
    if rand::is_urandom_enabled() {
        rand::disable_urandom();
    }
    rand::zeroize_state();
}

/// SIGINT/SIGTERM/SIGHUP: exit so atexit cleanup runs.
extern "C" fn signal_handler(_: libc::c_int) {
    unsafe { libc::exit(130) }
}

/// SIGSEGV/SIGABRT: zero what we can without locking, then re-raise.
extern "C" fn crash_handler(sig: libc::c_int) {
    unsafe {
        rand::urand::emergency_zero();
        rand::zeroize_state();
        libc::signal(sig, libc::SIG_DFL);
        libc::raise(sig);
    }
}

/// Install all signal handlers and register atexit cleanup.
/// Call this early in main().
pub fn install_handlers() {
    let exit_signals = [libc::SIGINT, libc::SIGTERM, libc::SIGHUP];
    let crash_signals = [libc::SIGSEGV, libc::SIGABRT];
    unsafe {
        libc::atexit(cleanup_on_exit);
        for sig in exit_signals {
            libc::signal(sig, signal_handler as *const () as libc::sighandler_t);
        }
        for sig in crash_signals {
            libc::signal(sig, crash_handler as *const () as libc::sighandler_t);
        }
    }
}

/// Reset terminal state (public for use in other modules)
pub fn reset_terminal() {
    reset_terminal_termios();
}

mod context;
mod flags;
mod parse;
pub mod prompts;
pub mod quiet;

pub use context::{Context, Done};
pub use flags::{CliFlags, Command};
pub use parse::{ParseError, parse};

/// Run a CLI invocation and exit with its status.
pub fn run(args: Vec<String>) {
    let code = match Context::new(args) {
        Ok(mut ctx) => match ctx.run() {
            Ok(()) => 0,
            Err(done) => done.code(),
        },
        Err(e) => {
            prompts::error(&e);
            prompts::usage_hint();
            1
        }
    };
    // Context is dropped above, so entry buffers are wiped before exit
    std::process::exit(code);
}

mod analytics;
mod changelog;
mod cli;
mod config;
mod export;
mod rules;
mod scan;
mod watch;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // handle broken pipe gracefully (e.g., when piping to `head` or `jq` that exits early)
    reset_sigpipe();

    let cli = Cli::parse();
    cli::run(cli)
}

/// reset SIGPIPE to default behavior (terminate process) instead of panicking
/// this is the standard Unix behavior for CLI tools
fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

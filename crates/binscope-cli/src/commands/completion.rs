//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::io::Write;

const BIN_NAME: &str = "binscope";

/// Writes completions for `shell` to stdout.
pub fn execute(shell: Shell) {
    generate_to(shell, &mut io::stdout());
}

fn generate_to(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, BIN_NAME, out);
}

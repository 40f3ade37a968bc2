//! Command: emit shell completion scripts.
use std::io::Write;

use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionsOpts};

/// Write the completion script for `opts.shell` to `out`.
pub fn run(opts: &CompletionsOpts, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(opts.shell, &mut cmd, name, out);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        run(
            &CompletionsOpts {
                shell: clap_complete::Shell::Bash,
            },
            &mut out,
        );
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("deskutil"));
        assert!(script.contains("tempmail"));
    }
}

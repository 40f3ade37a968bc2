//! Command: show which desktop tool each capability resolves to.
use std::io::Write;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::commands::CommandSetup;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::tools::{ToolKind, Toolchain};

/// Run the `tools` command.
///
/// # Errors
///
/// Returns an error if configuration loading or writing to stdout fails.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let tools = setup.toolchain(&executor);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&tools, &mut out)
}

/// Print one `<kind> <command>` line per capability.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn run_with(tools: &Toolchain<'_>, out: &mut dyn Write) -> Result<()> {
    for kind in ToolKind::ALL {
        let resolved = tools
            .get(kind)
            .map_or_else(|_| "not found".to_string(), |tool| tool.to_string());
        writeln!(out, "{:<10} {resolved}", kind.to_string())?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    #[test]
    fn lists_every_kind() {
        let exec = MockExecutor::new().with_programs(&["rofi", "wl-copy", "xdotool", "pactl"]);
        let tools = Toolchain::new(&exec).with_candidates(
            ToolKind::Wallpaper,
            vec!["feh --bg-scale".to_string()],
        );
        let mut out = Vec::new();
        run_with(&tools, &mut out).unwrap();
        insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r"
        menu       rofi -dmenu
        clipboard  wl-copy
        type       xdotool type --file -
        tab        xdotool key Tab
        click      xdotool click
        volume     pactl
        wallpaper  not found
        ");
    }
}

//! Command: change speaker or microphone volume.
use anyhow::Result;

use crate::cli::{GlobalOpts, VolumeCommand};
use crate::commands::CommandSetup;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::volume::{self, VolumeAction};

/// Run the `volume` command.
///
/// # Errors
///
/// Returns an error if no sound tool is available or the change fails.
pub fn run(global: &GlobalOpts, cmd: VolumeCommand, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let tools = setup.toolchain(&executor);
    let level = volume::apply(&tools, action(cmd))?;
    log.info(&format!(
        "{}%{}",
        level.percent,
        if level.muted { " (muted)" } else { "" }
    ));
    Ok(())
}

const fn action(cmd: VolumeCommand) -> VolumeAction {
    match cmd {
        VolumeCommand::Up { step } => VolumeAction::Up(step),
        VolumeCommand::Down { step } => VolumeAction::Down(step),
        VolumeCommand::Mute => VolumeAction::Mute,
        VolumeCommand::MicMute => VolumeAction::MicMute,
    }
}

//! Repeated pointer clicks until interrupted.
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::tools::{ToolCommand, ToolKind, Toolchain};

/// Default pause between clicks.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Pointer button to click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ClickButton {
    /// Primary button.
    #[default]
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

impl ClickButton {
    /// Button argument for `program`: `ydotool` takes a press+release code,
    /// X11 tools take the button number.
    #[must_use]
    pub fn arg_for(self, program: &str) -> &'static str {
        match (program == "ydotool", self) {
            (true, Self::Left) => "0xC0",
            (true, Self::Right) => "0xC1",
            (true, Self::Middle) => "0xC2",
            (false, Self::Left) => "1",
            (false, Self::Right) => "3",
            (false, Self::Middle) => "2",
        }
    }
}

/// Click `button` every `interval` until `stop` is set.
///
/// Returns the number of clicks sent.
///
/// # Errors
///
/// Returns an error if no click tool is available or a click fails.
pub fn run(
    tools: &Toolchain<'_>,
    button: ClickButton,
    interval: Duration,
    stop: &AtomicBool,
) -> Result<u64> {
    let tool = tools.get(ToolKind::Click)?;
    tracing::info!("clicking {button:?} every {}ms with {}", interval.as_millis(), tool.program);
    let mut clicks = 0;
    while !stop.load(Ordering::SeqCst) {
        click(tools, &tool, button)?;
        clicks += 1;
        std::thread::sleep(interval);
    }
    tracing::info!("stopped after {clicks} clicks");
    Ok(clicks)
}

fn click(tools: &Toolchain<'_>, tool: &ToolCommand, button: ClickButton) -> Result<()> {
    let arg = button.arg_for(&tool.program);
    tools.executor().run(&tool.program, &tool.args_with(&[arg]))?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    #[test]
    fn button_codes_per_backend() {
        assert_eq!(ClickButton::Left.arg_for("ydotool"), "0xC0");
        assert_eq!(ClickButton::Right.arg_for("xdotool"), "3");
        assert_eq!(ClickButton::Middle.arg_for("xdotool"), "2");
    }

    #[test]
    fn stops_before_clicking_when_flag_is_set() {
        let exec = MockExecutor::new().with_programs(&["ydotool"]);
        let tools = Toolchain::new(&exec);
        let stop = AtomicBool::new(true);
        let clicks = run(&tools, ClickButton::Left, Duration::ZERO, &stop).unwrap();
        assert_eq!(clicks, 0);
        assert!(exec.calls().is_empty());
    }

    #[test]
    fn clicks_until_stopped() {
        let exec = MockExecutor::new().with_programs(&["xdotool"]);
        let tools = Toolchain::new(&exec);
        let stop = AtomicBool::new(false);
        std::thread::scope(|s| {
            let handle = s.spawn(|| run(&tools, ClickButton::Left, Duration::from_millis(1), &stop));
            while exec.calls().len() < 3 {
                std::thread::yield_now();
            }
            stop.store(true, Ordering::SeqCst);
            let clicks = handle.join().unwrap().unwrap();
            assert!(clicks >= 3);
        });
        assert_eq!(exec.calls_to("xdotool")[0].args, vec!["click", "1"]);
    }

    #[test]
    fn failing_click_aborts() {
        let exec = MockExecutor::new().with_programs(&["ydotool"]).with_failure();
        let tools = Toolchain::new(&exec);
        let stop = AtomicBool::new(false);
        assert!(run(&tools, ClickButton::Left, Duration::ZERO, &stop).is_err());
    }

    #[test]
    fn button_deserializes_lowercase() {
        #[derive(Deserialize)]
        struct Wrap {
            button: ClickButton,
        }
        let w: Wrap = toml::from_str("button = \"right\"").unwrap();
        assert_eq!(w.button, ClickButton::Right);
    }
}

//! Command: click until interrupted.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::{Context as _, Result};

use crate::autoclick::{self, ClickButton};
use crate::cli::{AutoclickOpts, GlobalOpts};
use crate::commands::CommandSetup;
use crate::config::AutoclickConfig;
use crate::exec::SystemExecutor;
use crate::logging::Logger;

/// Run the `autoclick` command. Stops on SIGINT or SIGTERM, which is how
/// `toggle autoclick` ends it.
///
/// # Errors
///
/// Returns an error if the signal handler cannot be installed or clicking
/// fails.
pub fn run(global: &GlobalOpts, opts: &AutoclickOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let (interval, button) = settings(opts, &setup.config.autoclick);

    let stop = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&stop);
    ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
        .context("installing signal handler")?;

    let executor = SystemExecutor;
    let tools = setup.toolchain(&executor);
    log.stage(&format!(
        "Clicking {button:?} every {}ms",
        interval.as_millis()
    ));
    let clicks = autoclick::run(&tools, button, interval, &stop)?;
    log.debug(&format!("{clicks} clicks sent"));
    Ok(())
}

/// Interval and button: command-line values win over the config.
fn settings(opts: &AutoclickOpts, config: &AutoclickConfig) -> (Duration, ClickButton) {
    let interval = opts.interval_ms.unwrap_or(config.interval_ms);
    (
        Duration::from_millis(interval),
        opts.button.unwrap_or(config.button),
    )
}

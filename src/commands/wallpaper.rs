//! Command: pick and apply a wallpaper.
use std::path::Path;

use anyhow::{Result, bail};
use rand::RngCore;

use crate::cli::{GlobalOpts, WallpaperOpts};
use crate::commands::CommandSetup;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::menu::Menu;
use crate::tools::Toolchain;
use crate::wallpaper;

/// Run the `wallpaper` command.
///
/// # Errors
///
/// Returns an error if the directory holds no images or no setter works.
pub fn run(global: &GlobalOpts, opts: &WallpaperOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let tools = setup.toolchain(&executor);
    let dir = opts
        .dir
        .clone()
        .or_else(|| setup.config.wallpaper.dir.clone())
        .unwrap_or_else(wallpaper::default_dir);
    run_with(&tools, &dir, opts.random, log, &mut rand::rng())
}

/// Choose an image from `dir` (randomly or via the menu) and apply it.
///
/// # Errors
///
/// Same as [`run`].
pub fn run_with(
    tools: &Toolchain<'_>,
    dir: &Path,
    random: bool,
    log: &Logger,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let images = wallpaper::list(dir)?;
    if images.is_empty() {
        bail!("no images in {}", dir.display());
    }
    let image = if random {
        wallpaper::random(rng, &images).cloned()
    } else {
        let names: Vec<String> = images
            .iter()
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect();
        Menu::new(tools)
            .choose("wallpaper", &names)?
            .and_then(|name| images.iter().find(|p| p.ends_with(&name)).cloned())
    };
    let Some(image) = image else {
        log.debug("wallpaper selection cancelled");
        return Ok(());
    };
    wallpaper::apply(tools, &image)?;
    log.info(&format!("applied {}", image.display()));
    Ok(())
}

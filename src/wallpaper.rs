//! Wallpaper discovery and application.
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use rand::Rng;
use rand::seq::IndexedRandom as _;

use crate::tools::{ToolKind, Toolchain};

/// Image extensions offered as wallpapers, compared case-insensitively.
pub const EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];

/// Default wallpaper directory: `~/Pictures/wallpapers`.
#[must_use]
pub fn default_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wallpapers")
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// Image files directly inside `dir`, sorted by file name.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn list(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry
            .with_context(|| format!("reading {}", dir.display()))?
            .path();
        if path.is_file() && is_image(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Pick one of `images` uniformly at random.
pub fn random<'a, R: Rng + ?Sized>(rng: &mut R, images: &'a [PathBuf]) -> Option<&'a PathBuf> {
    images.choose(rng)
}

/// Set `image` as the wallpaper with the first available setter.
///
/// `swaybg` stays in the foreground for as long as the wallpaper is shown,
/// so it is started detached after stopping any previous instance.
///
/// # Errors
///
/// Returns an error if no setter is available or it fails.
pub fn apply(tools: &Toolchain<'_>, image: &Path) -> Result<()> {
    let tool = tools.get(ToolKind::Wallpaper)?;
    let executor = tools.executor();
    let image = image.display().to_string();
    let args = tool.args_with(&[&image]);
    if tool.program == "swaybg" {
        let _ = executor.run_unchecked("pkill", &["-x", "swaybg"]);
        let pid = executor.spawn(&tool.program, &args)?;
        tracing::debug!("swaybg running as pid {pid}");
    } else {
        executor.run(&tool.program, &args)?;
    }
    tracing::info!("wallpaper set to {image}");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn list_filters_and_sorts_images() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["b.jpg", "a.PNG", "c.webp", "notes.txt", "d.gif", "e.jpeg", "noext"] {
            touch(tmp.path(), name);
        }
        fs::create_dir(tmp.path().join("sub.png")).unwrap();

        let names: Vec<String> = list(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg", "c.webp", "d.gif", "e.jpeg"]);
    }

    #[test]
    fn list_missing_dir_errors() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(list(&tmp.path().join("nope")).is_err());
    }

    #[test]
    fn random_picks_from_list() {
        let images = vec![PathBuf::from("/w/a.png"), PathBuf::from("/w/b.png")];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(images.contains(random(&mut rng, &images).unwrap()));
        assert!(random(&mut rng, &[]).is_none());
    }

    #[test]
    fn apply_runs_swww() {
        let exec = MockExecutor::new().with_programs(&["swww", "feh"]);
        let tools = Toolchain::new(&exec);
        apply(&tools, Path::new("/w/a.png")).unwrap();
        assert_eq!(exec.calls_to("swww")[0].args, vec!["img", "/w/a.png"]);
    }

    #[test]
    fn apply_detaches_swaybg() {
        let exec = MockExecutor::new().with_programs(&["swaybg"]);
        let tools = Toolchain::new(&exec);
        apply(&tools, Path::new("/w/a.png")).unwrap();
        let calls = exec.calls();
        assert_eq!(calls[0].program, "pkill");
        assert_eq!(calls[1].program, "swaybg");
        assert_eq!(calls[1].args, vec!["-i", "/w/a.png"]);
    }

    #[test]
    fn apply_without_setter_errors() {
        let exec = MockExecutor::new();
        let tools = Toolchain::new(&exec);
        let err = apply(&tools, Path::new("/w/a.png")).unwrap_err();
        assert!(err.to_string().starts_with("wallpaper tool not found"));
    }
}

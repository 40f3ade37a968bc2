//! Log file locations, rotation and line formatting helpers.
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the console log filter.
pub(super) const FILTER_ENV: &str = "DESKUTIL_LOG";

/// Remove terminal escape sequences so the log file stays plain text.
///
/// Any CSI sequence (`ESC [` up to a final byte in `@`..=`~`) is dropped,
/// as is the character following a lone `ESC`.
pub(super) fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        if chars.next() == Some('[') {
            for inner in chars.by_ref() {
                if ('@'..='~').contains(&inner) {
                    break;
                }
            }
        }
    }
    out
}

/// Directory holding per-command logs, created on demand.
///
/// `$XDG_CACHE_HOME/deskutil`, falling back to `~/.cache/deskutil`.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .filter(|p| p.is_absolute())
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))?;
    let dir = base.join("deskutil");
    fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file for one subcommand, e.g. `~/.cache/deskutil/pass.log`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    Some(cache_dir()?.join(format!("{command}.log")))
}

/// Move the previous run's log aside to `<name>.1`, replacing any older copy.
///
/// Commands are mostly started from keybindings, so the run that failed is
/// usually the one before the run that gets inspected.
pub(super) fn rotate(path: &Path) {
    if !path.exists() {
        return;
    }
    let mut previous = path.as_os_str().to_owned();
    previous.push(".1");
    if let Err(e) = fs::rename(path, &previous) {
        tracing::debug!("could not rotate {}: {e}", path.display());
    }
}

/// Local wall-clock time as `YYYY-MM-DD HH:MM:SS`.
pub(super) fn local_datetime() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Local wall-clock time as `HH:MM:SS.mmm`.
pub(super) fn local_time() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::TEST_ENV_MUTEX;

    #[test]
    fn strip_ansi_drops_escape_sequences() {
        assert_eq!(strip_ansi("\x1b[31mERROR\x1b[0m boom"), "ERROR boom");
        assert_eq!(strip_ansi("\x1b[1;34m==>\x1b[0m Toggling"), "==> Toggling");
        assert_eq!(strip_ansi("\x1b[2;5Hat\x1b[Kend"), "atend");
        assert_eq!(strip_ansi("\x1bMx"), "x");
        assert_eq!(strip_ansi("plain"), "plain");
    }

    #[test]
    #[allow(unsafe_code)]
    fn log_file_lives_under_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by TEST_ENV_MUTEX.
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("volume");
        // SAFETY: Protected by TEST_ENV_MUTEX.
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("deskutil").join("volume.log")));
        assert!(tmp.path().join("deskutil").is_dir());
    }

    #[test]
    fn rotate_keeps_one_previous_run() {
        let tmp = tempfile::tempdir().unwrap();
        let log = tmp.path().join("pass.log");
        rotate(&log);
        assert!(!tmp.path().join("pass.log.1").exists());

        fs::write(&log, "first").unwrap();
        rotate(&log);
        fs::write(&log, "second").unwrap();
        rotate(&log);
        assert!(!log.exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join("pass.log.1")).unwrap(),
            "second"
        );
    }

    #[test]
    fn timestamps_have_fixed_width() {
        let time = local_time();
        assert_eq!(time.len(), 12);
        assert_eq!(&time[8..9], ".");
        let datetime = local_datetime();
        assert_eq!(datetime.len(), 19);
        assert_eq!(&datetime[10..11], " ");
    }
}

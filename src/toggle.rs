//! Start/stop background helpers with a single command.
//!
//! Each daemon is tracked by a PID file in the runtime state directory.
//! Every check-and-act sequence runs under an exclusive advisory lock on a
//! sibling lock file, so two concurrent `toggle` invocations cannot both
//! observe "stopped" and start two copies.
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::ToggleError;
use crate::exec::Executor;

/// Name of the built-in lid-switch inhibitor.
pub const LID_INHIBIT: &str = "lid-inhibit";
/// Name of the built-in auto-clicker.
pub const AUTOCLICK: &str = "autoclick";

/// Outcome of [`ToggleDaemon::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The daemon was not running and has been started with this PID.
    Started(u32),
    /// The daemon was running and has been stopped.
    Stopped,
}

/// Whether a daemon is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Running with this PID.
    Running(u32),
    /// Not running.
    Stopped,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running(pid) => write!(f, "running (pid {pid})"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// Built-in command for `name`, if any.
#[must_use]
pub fn builtin(name: &str) -> Option<Vec<String>> {
    match name {
        LID_INHIBIT => Some(
            [
                "systemd-inhibit",
                "--what=handle-lid-switch",
                "--who=deskutil",
                "--why=lid-inhibit",
                "sleep",
                "infinity",
            ]
            .map(String::from)
            .to_vec(),
        ),
        AUTOCLICK => {
            let exe = std::env::current_exe()
                .map_or_else(|_| "deskutil".to_string(), |p| p.display().to_string());
            Some(vec![exe, AUTOCLICK.to_string()])
        }
        _ => None,
    }
}

/// Resolve the command for `name`: configured commands take precedence
/// over built-ins.
///
/// # Errors
///
/// Returns [`ToggleError::Unknown`] if neither defines `name`.
pub fn command_for(
    name: &str,
    configured: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<String>, ToggleError> {
    configured
        .get(name)
        .cloned()
        .or_else(|| builtin(name))
        .ok_or_else(|| ToggleError::Unknown(name.to_string()))
}

/// Default state directory: `$XDG_RUNTIME_DIR/deskutil`, or the system
/// temp directory when no runtime directory exists.
#[must_use]
pub fn default_state_dir() -> PathBuf {
    dirs::runtime_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("deskutil")
}

/// A named background process tracked through a PID file.
#[derive(Debug)]
pub struct ToggleDaemon<'a> {
    name: String,
    command: Vec<String>,
    state_dir: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> ToggleDaemon<'a> {
    /// Create a daemon handle.
    ///
    /// # Errors
    ///
    /// Returns [`ToggleError::EmptyCommand`] if `command` is empty.
    pub fn new(
        name: &str,
        command: Vec<String>,
        state_dir: PathBuf,
        executor: &'a dyn Executor,
    ) -> Result<Self, ToggleError> {
        if command.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(ToggleError::EmptyCommand(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            command,
            state_dir,
            executor,
        })
    }

    /// Daemon name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the PID file.
    #[must_use]
    pub fn pid_file(&self) -> PathBuf {
        self.state_dir.join(format!("{}.pid", self.name))
    }

    fn lock_file(&self) -> PathBuf {
        self.state_dir.join(format!("{}.lock", self.name))
    }

    /// Current status. A missing, unparsable or stale PID file means
    /// [`Status::Stopped`].
    #[must_use]
    pub fn status(&self) -> Status {
        self.running_pid().map_or(Status::Stopped, Status::Running)
    }

    /// Stop the daemon if it is running, start it otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory is not writable or the
    /// command cannot be started.
    pub fn toggle(&self) -> anyhow::Result<Toggled> {
        let _guard = self.lock()?;
        if let Some(pid) = self.running_pid() {
            self.kill(pid)?;
            return Ok(Toggled::Stopped);
        }
        Ok(Toggled::Started(self.spawn()?))
    }

    /// Start the daemon unless it is already running.
    ///
    /// # Errors
    ///
    /// Same as [`ToggleDaemon::toggle`].
    pub fn start(&self) -> anyhow::Result<u32> {
        let _guard = self.lock()?;
        if let Some(pid) = self.running_pid() {
            tracing::debug!("{} already running (pid {pid})", self.name);
            return Ok(pid);
        }
        self.spawn()
    }

    /// Stop the daemon if it is running. Returns whether anything was stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory is not writable.
    pub fn stop(&self) -> anyhow::Result<bool> {
        let _guard = self.lock()?;
        if let Some(pid) = self.running_pid() {
            self.kill(pid)?;
            return Ok(true);
        }
        self.clear_pid_file()?;
        Ok(false)
    }

    /// Take the exclusive lock. Released when the returned file is dropped.
    fn lock(&self) -> Result<File, ToggleError> {
        fs::create_dir_all(&self.state_dir).map_err(|source| ToggleError::Io {
            path: self.state_dir.clone(),
            source,
        })?;
        let path = self.lock_file();
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|source| ToggleError::Io {
                path: path.clone(),
                source,
            })?;
        file.lock()
            .map_err(|source| ToggleError::Io { path, source })?;
        Ok(file)
    }

    fn running_pid(&self) -> Option<u32> {
        let pid = read_pid(&self.pid_file())?;
        let alive = self
            .executor
            .run_unchecked("kill", &["-0", &pid.to_string()])
            .is_ok_and(|r| r.success);
        if !alive {
            tracing::debug!("{}: stale pid {pid}", self.name);
        }
        alive.then_some(pid)
    }

    fn spawn(&self) -> anyhow::Result<u32> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| ToggleError::EmptyCommand(self.name.clone()))?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let pid = self.executor.spawn(program, &args)?;
        let path = self.pid_file();
        fs::write(&path, format!("{pid}\n")).map_err(|source| ToggleError::Io { path, source })?;
        tracing::info!("started {} (pid {pid})", self.name);
        Ok(pid)
    }

    fn kill(&self, pid: u32) -> Result<(), ToggleError> {
        match self.executor.run_unchecked("kill", &[&pid.to_string()]) {
            Ok(r) if r.success => {}
            Ok(r) => tracing::warn!("kill {pid} failed: {}", r.stderr.trim()),
            Err(e) => tracing::warn!("kill {pid} failed: {e:#}"),
        }
        self.clear_pid_file()?;
        tracing::info!("stopped {} (pid {pid})", self.name);
        Ok(())
    }

    fn clear_pid_file(&self) -> Result<(), ToggleError> {
        let path = self.pid_file();
        match fs::remove_file(&path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                Err(ToggleError::Io { path, source: e })
            }
            _ => Ok(()),
        }
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    fn daemon<'a>(dir: &Path, exec: &'a MockExecutor) -> ToggleDaemon<'a> {
        ToggleDaemon::new(
            "test",
            vec!["sleep".to_string(), "infinity".to_string()],
            dir.to_path_buf(),
            exec,
        )
        .unwrap()
    }

    fn started(outcome: Toggled) -> Option<u32> {
        match outcome {
            Toggled::Started(pid) => Some(pid),
            Toggled::Stopped => None,
        }
    }

    #[test]
    fn toggle_starts_when_stopped() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let d = daemon(tmp.path(), &exec);

        let pid = started(d.toggle().unwrap()).unwrap();
        assert_eq!(exec.calls_to("sleep")[0].args, vec!["infinity"]);
        assert_eq!(read_pid(&d.pid_file()), Some(pid));
        assert_eq!(d.status(), Status::Running(pid));
    }

    #[test]
    fn double_toggle_restores_stopped_state() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let d = daemon(tmp.path(), &exec);

        let pid = started(d.toggle().unwrap()).unwrap();
        assert_eq!(d.toggle().unwrap(), Toggled::Stopped);
        assert!(!exec.is_alive(pid));
        assert!(!d.pid_file().exists());
        assert_eq!(d.status(), Status::Stopped);
    }

    #[test]
    fn double_toggle_restores_running_state() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new().with_alive(77);
        let d = daemon(tmp.path(), &exec);
        fs::write(d.pid_file(), "77\n").unwrap();

        assert_eq!(d.toggle().unwrap(), Toggled::Stopped);
        assert!(matches!(d.toggle().unwrap(), Toggled::Started(_)));
        assert!(matches!(d.status(), Status::Running(_)));
    }

    #[test]
    fn stale_pid_file_counts_as_stopped() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let d = daemon(tmp.path(), &exec);
        fs::write(d.pid_file(), "999\n").unwrap();

        assert_eq!(d.status(), Status::Stopped);
        assert!(matches!(d.toggle().unwrap(), Toggled::Started(_)));
        assert!(exec.calls_to("kill").iter().all(|c| c.args[0] == "-0"));
    }

    #[test]
    fn garbage_pid_file_counts_as_stopped() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let d = daemon(tmp.path(), &exec);
        fs::write(d.pid_file(), "not a pid").unwrap();
        assert_eq!(d.status(), Status::Stopped);
        assert!(exec.calls_to("kill").is_empty());
    }

    #[test]
    fn start_and_stop_are_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        let d = daemon(tmp.path(), &exec);

        let first = d.start().unwrap();
        assert_eq!(d.start().unwrap(), first);
        assert_eq!(exec.calls_to("sleep").len(), 1);

        assert!(d.stop().unwrap());
        assert!(!d.stop().unwrap());
        assert_eq!(
            exec.calls_to("kill")
                .iter()
                .filter(|c| c.args[0] != "-0")
                .count(),
            1
        );
    }

    #[test]
    fn concurrent_toggles_are_serialized() {
        let tmp = tempfile::tempdir().unwrap();
        let exec = MockExecutor::new();
        std::thread::scope(|s| {
            for _ in 0..2 {
                s.spawn(|| daemon(tmp.path(), &exec).toggle().unwrap());
            }
        });
        assert_eq!(exec.calls_to("sleep").len(), 1);
        assert_eq!(daemon(tmp.path(), &exec).status(), Status::Stopped);
    }

    #[test]
    fn empty_command_is_rejected() {
        let exec = MockExecutor::new();
        let err = ToggleDaemon::new("x", Vec::new(), PathBuf::from("/tmp"), &exec).unwrap_err();
        assert!(matches!(err, ToggleError::EmptyCommand(name) if name == "x"));
    }

    #[test]
    fn command_resolution() {
        let mut configured = BTreeMap::new();
        configured.insert("nightlight".to_string(), vec!["wlsunset".to_string()]);

        assert_eq!(command_for("nightlight", &configured).unwrap(), vec!["wlsunset"]);
        assert_eq!(command_for(LID_INHIBIT, &configured).unwrap()[0], "systemd-inhibit");
        assert_eq!(command_for(AUTOCLICK, &configured).unwrap()[1], "autoclick");
        assert!(matches!(
            command_for("nope", &configured),
            Err(ToggleError::Unknown(_))
        ));
    }

    #[test]
    fn configured_command_overrides_builtin() {
        let mut configured = BTreeMap::new();
        configured.insert(LID_INHIBIT.to_string(), vec!["my-inhibit".to_string()]);
        assert_eq!(command_for(LID_INHIBIT, &configured).unwrap(), vec!["my-inhibit"]);
    }

    #[test]
    fn status_display() {
        assert_eq!(Status::Running(5).to_string(), "running (pid 5)");
        assert_eq!(Status::Stopped.to_string(), "stopped");
    }
}

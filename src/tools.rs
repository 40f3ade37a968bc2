//! Ordered fallback selection of external desktop tools.
//!
//! Each capability ([`ToolKind`]) has a priority list of candidate command
//! lines. The first candidate whose program is on PATH wins; selection only
//! fails when none of them are present.
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

use crate::error::ToolError;
use crate::exec::Executor;

/// A capability provided by an external program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// Interactive selection menu reading items from stdin.
    Menu,
    /// Clipboard writer reading the value from stdin.
    Clipboard,
    /// Keystroke injector reading the text from stdin.
    Type,
    /// Keystroke injector that presses a single tab key.
    Tab,
    /// Pointer button injector.
    Click,
    /// Sound server control utility.
    Volume,
    /// Wallpaper setter taking the image path as its last argument.
    Wallpaper,
}

impl ToolKind {
    /// Every capability, in display order.
    pub const ALL: [Self; 7] = [
        Self::Menu,
        Self::Clipboard,
        Self::Type,
        Self::Tab,
        Self::Click,
        Self::Volume,
        Self::Wallpaper,
    ];

    /// Built-in candidates in priority order.
    #[must_use]
    pub const fn defaults(self) -> &'static [&'static str] {
        match self {
            Self::Menu => &[
                "fuzzel --dmenu",
                "wofi --dmenu",
                "rofi -dmenu",
                "bemenu",
                "dmenu",
            ],
            Self::Clipboard => &[
                "wl-copy",
                "xclip -selection clipboard",
                "xsel --clipboard --input",
            ],
            Self::Type => &["wtype -", "ydotool type --file -", "xdotool type --file -"],
            Self::Tab => &["wtype -k Tab", "ydotool key 15:1 15:0", "xdotool key Tab"],
            Self::Click => &["ydotool click", "xdotool click"],
            Self::Volume => &["wpctl", "pamixer", "pactl"],
            Self::Wallpaper => &["swww img", "swaybg -i", "feh --bg-fill"],
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Menu => write!(f, "menu"),
            Self::Clipboard => write!(f, "clipboard"),
            Self::Type => write!(f, "type"),
            Self::Tab => write!(f, "tab"),
            Self::Click => write!(f, "click"),
            Self::Volume => write!(f, "volume"),
            Self::Wallpaper => write!(f, "wallpaper"),
        }
    }
}

/// A resolved command line: program plus leading arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program looked up on PATH.
    pub program: String,
    /// Arguments placed before any per-call arguments.
    pub args: Vec<String>,
}

impl ToolCommand {
    /// Split a whitespace-separated command line.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::EmptyCommand`] if `line` has no words.
    pub fn parse(kind: ToolKind, line: &str) -> Result<Self, ToolError> {
        let mut words = line.split_whitespace().map(String::from);
        let program = words.next().ok_or(ToolError::EmptyCommand { kind })?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    /// Leading arguments followed by `extra`, borrowed for [`Executor`] calls.
    #[must_use]
    pub fn args_with<'a>(&'a self, extra: &[&'a str]) -> Vec<&'a str> {
        self.args
            .iter()
            .map(String::as_str)
            .chain(extra.iter().copied())
            .collect()
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Return the first candidate whose program is available.
///
/// # Errors
///
/// Returns [`ToolError::NotFound`] listing every probed program when none
/// are available, or [`ToolError::EmptyCommand`] for a blank candidate.
pub fn select<S: AsRef<str>>(
    kind: ToolKind,
    candidates: &[S],
    executor: &dyn Executor,
) -> Result<ToolCommand, ToolError> {
    let mut tried = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let command = ToolCommand::parse(kind, candidate.as_ref())?;
        if executor.which(&command.program) {
            tracing::debug!("{kind} tool: {command}");
            return Ok(command);
        }
        tried.push(command.program);
    }
    Err(ToolError::NotFound { kind, tried })
}

/// Lazily resolves and caches one tool per [`ToolKind`].
#[derive(Debug)]
pub struct Toolchain<'a> {
    executor: &'a dyn Executor,
    overrides: HashMap<ToolKind, Vec<String>>,
    resolved: Mutex<HashMap<ToolKind, ToolCommand>>,
}

impl<'a> Toolchain<'a> {
    /// Create a toolchain using the built-in priority lists.
    #[must_use]
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self {
            executor,
            overrides: HashMap::new(),
            resolved: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the candidate list for `kind`. An empty list is ignored.
    #[must_use]
    pub fn with_candidates(mut self, kind: ToolKind, candidates: Vec<String>) -> Self {
        if !candidates.is_empty() {
            self.overrides.insert(kind, candidates);
        }
        self
    }

    /// The executor the resolved tools run through.
    #[must_use]
    pub fn executor(&self) -> &'a dyn Executor {
        self.executor
    }

    /// Candidate command lines for `kind`, override first.
    #[must_use]
    pub fn candidates(&self, kind: ToolKind) -> Vec<String> {
        self.overrides.get(&kind).map_or_else(
            || kind.defaults().iter().map(|s| (*s).to_string()).collect(),
            Clone::clone,
        )
    }

    /// Resolve the tool for `kind`, probing PATH on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::NotFound`] when no candidate is available.
    pub fn get(&self, kind: ToolKind) -> Result<ToolCommand, ToolError> {
        if let Ok(cache) = self.resolved.lock()
            && let Some(cmd) = cache.get(&kind)
        {
            return Ok(cmd.clone());
        }
        let cmd = select(kind, &self.candidates(kind), self.executor)?;
        if let Ok(mut cache) = self.resolved.lock() {
            cache.insert(kind, cmd.clone());
        }
        Ok(cmd)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;

    #[test]
    fn select_picks_first_available_in_order() {
        let exec = MockExecutor::new().with_programs(&["rofi", "dmenu"]);
        let cmd = select(ToolKind::Menu, ToolKind::Menu.defaults(), &exec).unwrap();
        assert_eq!(cmd.program, "rofi");
        assert_eq!(cmd.args, vec!["-dmenu"]);
    }

    #[test]
    fn select_prefers_higher_priority_even_if_later_is_present() {
        let exec = MockExecutor::new().with_programs(&["xclip", "wl-copy"]);
        let cmd = select(ToolKind::Clipboard, ToolKind::Clipboard.defaults(), &exec).unwrap();
        assert_eq!(cmd.program, "wl-copy");
    }

    #[test]
    fn select_fails_when_none_present() {
        let exec = MockExecutor::new();
        let err = select(ToolKind::Type, ToolKind::Type.defaults(), &exec).unwrap_err();
        assert_eq!(
            err,
            ToolError::NotFound {
                kind: ToolKind::Type,
                tried: vec![
                    "wtype".to_string(),
                    "ydotool".to_string(),
                    "xdotool".to_string()
                ],
            }
        );
        assert_eq!(
            err.to_string(),
            "type tool not found (tried: wtype, ydotool, xdotool)"
        );
    }

    #[test]
    fn select_rejects_blank_candidate() {
        let exec = MockExecutor::new();
        let err = select(ToolKind::Menu, &["  "], &exec).unwrap_err();
        assert_eq!(err, ToolError::EmptyCommand { kind: ToolKind::Menu });
    }

    #[test]
    fn override_replaces_defaults() {
        let exec = MockExecutor::new().with_programs(&["wl-copy", "my-clip"]);
        let chain = Toolchain::new(&exec)
            .with_candidates(ToolKind::Clipboard, vec!["my-clip --primary".to_string()]);
        let cmd = chain.get(ToolKind::Clipboard).unwrap();
        assert_eq!(cmd.to_string(), "my-clip --primary");
    }

    #[test]
    fn empty_override_keeps_defaults() {
        let exec = MockExecutor::new().with_programs(&["wtype"]);
        let chain = Toolchain::new(&exec).with_candidates(ToolKind::Tab, Vec::new());
        let cmd = chain.get(ToolKind::Tab).unwrap();
        assert_eq!(cmd.args_with(&[]), vec!["-k", "Tab"]);
    }

    #[test]
    fn args_with_appends_extra() {
        let cmd = ToolCommand::parse(ToolKind::Type, "ydotool type --file -").unwrap();
        assert_eq!(cmd.program, "ydotool");
        assert_eq!(cmd.args_with(&["x"]), vec!["type", "--file", "-", "x"]);
    }

    #[test]
    fn kind_display() {
        assert_eq!(ToolKind::Clipboard.to_string(), "clipboard");
        assert_eq!(ToolKind::Tab.to_string(), "tab");
    }
}

//! `[tools]` section: candidate overrides for each tool kind.
use serde::Deserialize;

use crate::tools::{ToolKind, Toolchain};

/// Ordered candidate command lines replacing the built-in lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolsConfig {
    /// Menu candidates.
    pub menu: Vec<String>,
    /// Clipboard candidates.
    pub clipboard: Vec<String>,
    /// Keystroke typing candidates.
    #[serde(rename = "type")]
    pub type_: Vec<String>,
    /// Tab key candidates.
    pub tab: Vec<String>,
    /// Mouse click candidates.
    pub click: Vec<String>,
    /// Volume control candidates. Only `wpctl`, `pamixer` and `pactl` are
    /// understood.
    pub volume: Vec<String>,
    /// Wallpaper setter candidates.
    pub wallpaper: Vec<String>,
}

impl ToolsConfig {
    /// Configured candidates per kind, in a fixed order.
    #[must_use]
    pub fn entries(&self) -> [(ToolKind, &[String]); 7] {
        [
            (ToolKind::Menu, self.menu.as_slice()),
            (ToolKind::Clipboard, self.clipboard.as_slice()),
            (ToolKind::Type, self.type_.as_slice()),
            (ToolKind::Tab, self.tab.as_slice()),
            (ToolKind::Click, self.click.as_slice()),
            (ToolKind::Volume, self.volume.as_slice()),
            (ToolKind::Wallpaper, self.wallpaper.as_slice()),
        ]
    }

    /// Install the configured overrides on `toolchain`.
    #[must_use]
    pub fn apply<'a>(&self, toolchain: Toolchain<'a>) -> Toolchain<'a> {
        self.entries()
            .into_iter()
            .fold(toolchain, |chain, (kind, candidates)| {
                chain.with_candidates(kind, candidates.to_vec())
            })
    }
}

//! Command-line interface definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::autoclick::ClickButton;

/// Top-level CLI entry point for the desktop utilities.
#[derive(Parser, Debug)]
#[command(
    name = "deskutil",
    about = "Password menu, temporary mail and desktop toggles",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared by every subcommand.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file (default: $XDG_CONFIG_HOME/deskutil/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pick a credential and copy or type a field
    Pass(PassOpts),
    /// Manage temporary mailboxes linked to credentials
    #[command(subcommand)]
    Tempmail(TempmailCommand),
    /// Start or stop a background helper
    Toggle(ToggleOpts),
    /// Click repeatedly until interrupted
    Autoclick(AutoclickOpts),
    /// Control the dictation daemon
    #[command(subcommand)]
    Dictation(DictationCommand),
    /// Change speaker or microphone volume
    #[command(subcommand)]
    Volume(VolumeCommand),
    /// Pick and apply a wallpaper
    Wallpaper(WallpaperOpts),
    /// Show which desktop tools would be used
    Tools,
    /// Generate shell completions
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

/// Options for the `pass` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct PassOpts {
    /// Type username, tab, password into the focused window
    #[arg(short, long)]
    pub autotype: bool,

    /// Copy the value, optionally with a custom clipboard command
    #[arg(
        short,
        long,
        value_name = "CMD",
        num_args = 0..=1,
        default_missing_value = "",
        conflicts_with = "type_"
    )]
    pub copy: Option<String>,

    /// Type the value, optionally with a custom typing command
    #[arg(
        short,
        long = "type",
        id = "type_",
        value_name = "CMD",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub type_: Option<String>,

    /// Print the value to stdout instead of delivering it
    #[arg(short, long, conflicts_with_all = ["copy", "type_", "autotype"])]
    pub print: bool,

    /// Non-interactive action instead of the menu.
    #[command(subcommand)]
    pub action: Option<PassCommand>,
}

/// `pass` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum PassCommand {
    /// Create an entry with a random password, username and name
    Generate {
        /// Entry path, e.g. `web/example.com`
        path: String,
        /// Overwrite an existing entry
        #[arg(short, long)]
        force: bool,
    },
}

/// `tempmail` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum TempmailCommand {
    /// Create a mailbox for an entry (prompts when omitted)
    Create {
        /// Entry the mailbox is for
        entry: Option<String>,
    },
    /// Read messages of an entry's mailbox
    Inbox {
        /// Entry or mailbox path
        entry: Option<String>,
    },
    /// Delete an entry's mailbox
    Delete {
        /// Entry or mailbox path
        entry: Option<String>,
    },
}

/// Options for the `toggle` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ToggleOpts {
    /// Daemon name (`lid-inhibit`, `autoclick`, or a configured name)
    pub name: String,

    /// Report whether it is running instead of toggling
    #[arg(short, long)]
    pub status: bool,
}

/// Options for the `autoclick` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct AutoclickOpts {
    /// Milliseconds between clicks (default from config)
    #[arg(short, long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Button to click (default from config)
    #[arg(short, long, value_enum)]
    pub button: Option<ClickButton>,
}

/// `dictation` subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DictationCommand {
    /// Start recording
    Start,
    /// Stop recording
    Stop,
    /// Toggle recording
    Toggle,
    /// Print the daemon status as JSON
    Status,
}

/// `volume` subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeCommand {
    /// Raise output volume
    Up {
        /// Step in percent
        #[arg(default_value_t = 5)]
        step: u8,
    },
    /// Lower output volume
    Down {
        /// Step in percent
        #[arg(default_value_t = 5)]
        step: u8,
    },
    /// Toggle output mute
    Mute,
    /// Toggle microphone mute
    MicMute,
}

/// Options for the `wallpaper` subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct WallpaperOpts {
    /// Pick a random image instead of showing the menu
    #[arg(short, long)]
    pub random: bool,

    /// Image directory (default from config)
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Options for the `completions` subcommand.
#[derive(Args, Debug, Clone)]
pub struct CompletionsOpts {
    /// Target shell
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

impl Command {
    /// Short name used for the per-command log file.
    #[must_use]
    pub const fn log_name(&self) -> &'static str {
        match self {
            Self::Pass(_) => "pass",
            Self::Tempmail(_) => "tempmail",
            Self::Toggle(_) => "toggle",
            Self::Autoclick(_) => "autoclick",
            Self::Dictation(_) => "dictation",
            Self::Volume(_) => "volume",
            Self::Wallpaper(_) => "wallpaper",
            Self::Tools => "tools",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

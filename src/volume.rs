//! Speaker and microphone control across PipeWire and PulseAudio tools.
use anyhow::{Result, bail};

use crate::exec::Executor;
use crate::notify;
use crate::tools::{ToolKind, Toolchain};

/// A requested change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeAction {
    /// Raise the output volume by this many percent.
    Up(u8),
    /// Lower the output volume by this many percent.
    Down(u8),
    /// Toggle output mute.
    Mute,
    /// Toggle microphone mute.
    MicMute,
}

/// Which device an action or reading refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Device {
    /// Default output.
    Sink,
    /// Default input.
    Source,
}

/// Volume and mute state read back after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    /// Volume in percent (may exceed 100).
    pub percent: u32,
    /// Whether the device is muted.
    pub muted: bool,
}

/// Supported control utilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// PipeWire `wpctl`.
    Wpctl,
    /// `pamixer`.
    Pamixer,
    /// PulseAudio `pactl`.
    Pactl,
}

impl Backend {
    /// Map a resolved program name to a backend.
    #[must_use]
    pub fn from_program(program: &str) -> Option<Self> {
        match program {
            "wpctl" => Some(Self::Wpctl),
            "pamixer" => Some(Self::Pamixer),
            "pactl" => Some(Self::Pactl),
            _ => None,
        }
    }

    /// Program name.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Wpctl => "wpctl",
            Self::Pamixer => "pamixer",
            Self::Pactl => "pactl",
        }
    }

    fn change_args(self, action: VolumeAction) -> Vec<String> {
        let s = |v: &[&str]| v.iter().map(|a| (*a).to_string()).collect::<Vec<_>>();
        match (self, action) {
            (Self::Wpctl, VolumeAction::Up(step)) => {
                s(&["set-volume", "-l", "1.5", "@DEFAULT_AUDIO_SINK@", &format!("{step}%+")])
            }
            (Self::Wpctl, VolumeAction::Down(step)) => {
                s(&["set-volume", "@DEFAULT_AUDIO_SINK@", &format!("{step}%-")])
            }
            (Self::Wpctl, VolumeAction::Mute) => s(&["set-mute", "@DEFAULT_AUDIO_SINK@", "toggle"]),
            (Self::Wpctl, VolumeAction::MicMute) => {
                s(&["set-mute", "@DEFAULT_AUDIO_SOURCE@", "toggle"])
            }
            (Self::Pamixer, VolumeAction::Up(step)) => s(&["-i", &step.to_string()]),
            (Self::Pamixer, VolumeAction::Down(step)) => s(&["-d", &step.to_string()]),
            (Self::Pamixer, VolumeAction::Mute) => s(&["-t"]),
            (Self::Pamixer, VolumeAction::MicMute) => s(&["--default-source", "-t"]),
            (Self::Pactl, VolumeAction::Up(step)) => {
                s(&["set-sink-volume", "@DEFAULT_SINK@", &format!("+{step}%")])
            }
            (Self::Pactl, VolumeAction::Down(step)) => {
                s(&["set-sink-volume", "@DEFAULT_SINK@", &format!("-{step}%")])
            }
            (Self::Pactl, VolumeAction::Mute) => s(&["set-sink-mute", "@DEFAULT_SINK@", "toggle"]),
            (Self::Pactl, VolumeAction::MicMute) => {
                s(&["set-source-mute", "@DEFAULT_SOURCE@", "toggle"])
            }
        }
    }

    /// Read the current level of `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if the utility fails or prints something unexpected.
    pub fn read(self, executor: &dyn Executor, device: Device) -> Result<Level> {
        let program = self.program();
        match self {
            Self::Wpctl => {
                let target = match device {
                    Device::Sink => "@DEFAULT_AUDIO_SINK@",
                    Device::Source => "@DEFAULT_AUDIO_SOURCE@",
                };
                let out = executor.run(program, &["get-volume", target])?;
                parse_wpctl(&out.stdout)
            }
            Self::Pamixer => {
                let args = |flag: &'static str| match device {
                    Device::Sink => vec![flag],
                    Device::Source => vec!["--default-source", flag],
                };
                let volume = executor.run(program, &args("--get-volume"))?;
                // Exits non-zero when unmuted.
                let mute = executor.run_unchecked(program, &args("--get-mute"))?;
                let percent = volume.stdout.trim().parse()?;
                Ok(Level {
                    percent,
                    muted: mute.stdout.trim() == "true",
                })
            }
            Self::Pactl => {
                let (volume_args, mute_args) = match device {
                    Device::Sink => (
                        ["get-sink-volume", "@DEFAULT_SINK@"],
                        ["get-sink-mute", "@DEFAULT_SINK@"],
                    ),
                    Device::Source => (
                        ["get-source-volume", "@DEFAULT_SOURCE@"],
                        ["get-source-mute", "@DEFAULT_SOURCE@"],
                    ),
                };
                let volume = executor.run(program, &volume_args)?;
                let mute = executor.run(program, &mute_args)?;
                parse_pactl(&volume.stdout, &mute.stdout)
            }
        }
    }
}

/// Parse `Volume: 0.40` or `Volume: 0.40 [MUTED]`.
fn parse_wpctl(out: &str) -> Result<Level> {
    let Some(rest) = out.trim().strip_prefix("Volume:") else {
        bail!("unexpected wpctl output: {}", out.trim());
    };
    let mut words = rest.split_whitespace();
    let Some(fraction) = words.next() else {
        bail!("unexpected wpctl output: {}", out.trim());
    };
    let (whole, frac) = fraction.split_once('.').unwrap_or((fraction, ""));
    let hundredths: String = frac.chars().chain(std::iter::repeat('0')).take(2).collect();
    let percent = whole.parse::<u32>()? * 100 + hundredths.parse::<u32>()?;
    Ok(Level {
        percent,
        muted: words.any(|w| w == "[MUTED]"),
    })
}

/// Parse `pactl get-*-volume` and `get-*-mute` output.
fn parse_pactl(volume: &str, mute: &str) -> Result<Level> {
    let Some(percent) = volume
        .split_whitespace()
        .find_map(|w| w.strip_suffix('%').and_then(|n| n.parse().ok()))
    else {
        bail!("unexpected pactl output: {}", volume.trim());
    };
    Ok(Level {
        percent,
        muted: mute.trim().ends_with("yes"),
    })
}

/// Apply `action` with the first available backend, read the level back
/// and show it as a notification.
///
/// # Errors
///
/// Returns an error if no backend is installed or the change fails.
pub fn apply(tools: &Toolchain<'_>, action: VolumeAction) -> Result<Level> {
    let tool = tools.get(ToolKind::Volume)?;
    let Some(backend) = Backend::from_program(&tool.program) else {
        bail!("unsupported volume tool: {}", tool.program);
    };
    let executor = tools.executor();
    let args = backend.change_args(action);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    executor.run(backend.program(), &args)?;

    let device = if action == VolumeAction::MicMute {
        Device::Source
    } else {
        Device::Sink
    };
    let level = backend.read(executor, device)?;
    tracing::debug!("{device:?} level {}% muted={}", level.percent, level.muted);

    let (summary, body) = match (device, level.muted) {
        (Device::Source, true) => ("Microphone", "muted".to_string()),
        (Device::Source, false) => ("Microphone", "unmuted".to_string()),
        (Device::Sink, true) => ("Volume", "muted".to_string()),
        (Device::Sink, false) => ("Volume", format!("{}%", level.percent)),
    };
    notify::send_replacing(executor, "volume", summary, &body);
    Ok(level)
}

//! Desktop helper utilities.
//!
//! A single `deskutil` binary bundles the small imperative tools of a
//! desktop session: a password menu over `pass` with one-time codes and
//! temporary mailboxes, toggles for background helpers, a dictation
//! client, volume control and a wallpaper picker.
//!
//! The crate is organised into three layers:
//!
//! - **Primitives**: [`exec`] runs external programs, [`tools`] picks the
//!   first installed program per capability, [`store`] wraps `pass`.
//! - **Domain modules**: [`entry`], [`otp`], [`generate`], [`tempmail`],
//!   [`menu`], [`toggle`], [`dictation`], [`volume`], [`wallpaper`],
//!   [`autoclick`].
//! - **[`commands`]**: subcommand handlers wiring configuration, logging and
//!   the domain modules together.
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod autoclick;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dictation;
pub mod entry;
pub mod error;
pub mod exec;
pub mod generate;
pub mod logging;
pub mod menu;
pub mod notify;
pub mod otp;
pub mod store;
pub mod tempmail;
pub mod toggle;
pub mod tools;
pub mod volume;
pub mod wallpaper;

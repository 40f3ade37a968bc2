//! Subcommand handlers and the setup they share.
pub mod autoclick;
pub mod completions;
pub mod dictation;
pub mod pass;
pub mod tempmail;
pub mod toggle;
pub mod tools;
pub mod version;
pub mod volume;
pub mod wallpaper;

use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Logger;
use crate::store::{CredentialStore, PassStore};
use crate::tempmail::MailTmClient;
use crate::tools::Toolchain;

/// Shared state produced by the common command setup sequence.
///
/// Loads the configuration once so that each command does not have to
/// repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Loaded configuration.
    pub config: Config,
}

impl CommandSetup {
    /// Load configuration from `--config` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn init(global: &GlobalOpts, log: &Logger) -> Result<Self> {
        let path = global.config.clone().or_else(Config::default_path);
        log.debug(&format!(
            "config: {}",
            path.as_ref()
                .map_or_else(|| "(none)".to_string(), |p| p.display().to_string())
        ));
        let config = Config::load(global.config.as_deref()).context("loading configuration")?;
        log.debug(&format!("{} configured toggle(s)", config.toggle.len()));
        Ok(Self { config })
    }

    /// Toolchain with the configured candidate overrides applied.
    #[must_use]
    pub fn toolchain<'a>(&self, executor: &'a dyn Executor) -> Toolchain<'a> {
        self.config.tools.apply(Toolchain::new(executor))
    }

    /// Credential store directory.
    #[must_use]
    pub fn store_dir(&self) -> PathBuf {
        self.config
            .store
            .dir
            .clone()
            .unwrap_or_else(PassStore::default_dir)
    }

    /// Credential store backed by `pass`.
    #[must_use]
    pub fn store<'a>(&self, executor: &'a dyn Executor) -> PassStore<'a> {
        PassStore::new(self.store_dir(), executor)
    }

    /// Temporary mail API client.
    #[must_use]
    pub fn mail_api(&self) -> MailTmClient {
        MailTmClient::new(&self.config.tempmail.api_base)
    }
}

/// Present every store entry (plus `extra` items first) and return the choice.
///
/// # Errors
///
/// Returns an error if the store cannot be listed or no menu is available.
pub fn choose_entry(
    menu: &crate::menu::Menu<'_>,
    store: &dyn CredentialStore,
    prompt: &str,
    extra: &[&str],
) -> Result<Option<String>> {
    let mut items: Vec<String> = extra.iter().map(|s| (*s).to_string()).collect();
    items.extend(store.list()?);
    menu.choose(prompt, &items)
}

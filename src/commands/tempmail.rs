//! Command: manage temporary mailboxes outside the password menu.
use std::io::Write;

use anyhow::{Result, bail};
use rand::RngCore;

use crate::cli::{GlobalOpts, TempmailCommand};
use crate::commands::pass::PassContext;
use crate::commands::{CommandSetup, choose_entry};
use crate::entry::Entry;
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::menu::Menu;
use crate::tempmail;

/// Run the `tempmail` command.
///
/// # Errors
///
/// Returns an error if configuration loading, the store or the mail API
/// fails.
pub fn run(global: &GlobalOpts, cmd: &TempmailCommand, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let tools = setup.toolchain(&executor);
    let store = setup.store(&executor);
    let api = setup.mail_api();
    let ctx = PassContext {
        store: &store,
        api: &api,
        tools: &tools,
        prefix: &setup.config.store.tempmail_prefix,
        generate: setup.config.generate,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with(&ctx, cmd, log, &mut out, &mut rand::rng())
}

/// Run the `tempmail` command against explicit dependencies.
///
/// # Errors
///
/// Returns an error if the store or the mail API fails, or the entry has
/// no mailbox.
pub fn run_with(
    ctx: &PassContext<'_>,
    cmd: &TempmailCommand,
    log: &Logger,
    out: &mut dyn Write,
    rng: &mut dyn RngCore,
) -> Result<()> {
    match cmd {
        TempmailCommand::Create { entry } => {
            let Some(entry) = resolve(ctx, entry.as_deref(), "create mail for")? else {
                return Ok(());
            };
            log.stage(&format!("Creating mailbox for {entry}"));
            let mailbox = tempmail::provision(ctx.store, ctx.api, &entry, ctx.prefix, rng)?;
            log.info(&format!("stored {}", mailbox.path));
            writeln!(out, "{}", mailbox.address)?;
        }
        TempmailCommand::Inbox { entry } => {
            let Some(path) = mailbox(ctx, entry.as_deref(), "inbox of")? else {
                return Ok(());
            };
            let (_, messages) = tempmail::inbox(ctx.store, ctx.api, &path)?;
            if messages.is_empty() {
                log.info(&format!("{path}: inbox empty"));
            }
            for message in &messages {
                let unread = if message.seen { "" } else { " (unread)" };
                writeln!(
                    out,
                    "{}  {}  {}{unread}",
                    message.created_at, message.from.address, message.subject
                )?;
            }
        }
        TempmailCommand::Delete { entry } => {
            let Some(path) = mailbox(ctx, entry.as_deref(), "delete mail of")? else {
                return Ok(());
            };
            tempmail::delete(ctx.store, ctx.api, &path)?;
            log.info(&format!("deleted {path}"));
        }
    }
    Ok(())
}

/// The given entry, or one picked from the menu.
fn resolve(ctx: &PassContext<'_>, entry: Option<&str>, prompt: &str) -> Result<Option<String>> {
    if let Some(entry) = entry {
        return Ok(Some(entry.to_string()));
    }
    choose_entry(&Menu::new(ctx.tools), ctx.store, prompt, &[])
}

/// Mailbox path for the given or picked entry.
fn mailbox(ctx: &PassContext<'_>, entry: Option<&str>, prompt: &str) -> Result<Option<String>> {
    let Some(entry) = resolve(ctx, entry, prompt)? else {
        return Ok(None);
    };
    let email = if tempmail::is_tempmail(&entry, ctx.prefix) {
        None
    } else {
        Entry::parse(&entry, &ctx.store.show(&entry)?)
            .field("email")
            .map(str::to_string)
    };
    let Some(path) = tempmail::mailbox_for(ctx.store, &entry, email.as_deref(), ctx.prefix)? else {
        bail!("{entry} has no temporary mailbox");
    };
    Ok(Some(path))
}

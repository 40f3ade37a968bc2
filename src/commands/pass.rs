//! Command: pick a credential and deliver one of its fields.
use std::fmt;
use std::io::Write;

use anyhow::{Context as _, Result, bail};
use rand::RngCore;

use crate::cli::{GlobalOpts, PassCommand, PassOpts};
use crate::commands::{CommandSetup, choose_entry};
use crate::config::GenerateConfig;
use crate::entry::{Entry, Field};
use crate::error::StoreError;
use crate::exec::SystemExecutor;
use crate::generate;
use crate::logging::Logger;
use crate::menu::{Deliverer, Delivery, Menu};
use crate::notify;
use crate::otp::{self, OtpAuth};
use crate::store::CredentialStore;
use crate::tempmail::{self, MailApi};
use crate::tools::{ToolKind, Toolchain};

/// Entry-menu item that creates a new generated entry.
pub const NEW_ITEM: &str = "[new]";
/// Field-menu action that provisions a mailbox for the entry.
pub const CREATE_MAIL: &str = "create temp mail";
/// Field-menu action that reads the entry's mailbox.
pub const INBOX: &str = "inbox";
/// Field-menu action that deletes the entry's mailbox.
pub const DELETE_MAIL: &str = "delete mailbox";
/// Field-menu labels reserved for mailbox actions.
const ACTIONS: [&str; 3] = [CREATE_MAIL, INBOX, DELETE_MAIL];

/// Everything the password menu needs besides user input.
pub struct PassContext<'a> {
    /// Credential store.
    pub store: &'a dyn CredentialStore,
    /// Temporary mail provider.
    pub api: &'a dyn MailApi,
    /// Resolved desktop tools.
    pub tools: &'a Toolchain<'a>,
    /// Store prefix reserved for mailboxes.
    pub prefix: &'a str,
    /// Settings for generated entries.
    pub generate: GenerateConfig,
}

impl fmt::Debug for PassContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PassContext")
            .field("store", &self.store)
            .field("prefix", &self.prefix)
            .field("generate", &self.generate)
            .finish_non_exhaustive()
    }
}

/// Where a chosen value ends up: a desktop tool, or stdout with `--print`.
struct Output<'a, 'w> {
    deliverer: Deliverer<'a>,
    print: Option<&'w mut dyn Write>,
}

impl Output<'_, '_> {
    fn emit(&mut self, label: &str, value: &str) -> Result<()> {
        if let Some(out) = self.print.as_mut() {
            writeln!(out, "{value}")?;
            return Ok(());
        }
        self.deliverer.deliver(label, value)
    }
}

/// Run the `pass` command.
///
/// # Errors
///
/// Returns an error if configuration loading fails or the chosen action
/// fails.
pub fn run(global: &GlobalOpts, opts: &PassOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let executor = SystemExecutor;
    let tools = with_overrides(setup.toolchain(&executor), opts);
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
    run_with(&ctx, opts, log, &mut out, &mut rand::rng())
}

/// Apply `--copy CMD` / `--type CMD` overrides.
fn with_overrides<'a>(tools: Toolchain<'a>, opts: &PassOpts) -> Toolchain<'a> {
    let custom = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| vec![v.to_string()])
    };
    let mut tools = tools;
    if let Some(cmd) = custom(opts.copy.as_deref()) {
        tools = tools.with_candidates(ToolKind::Clipboard, cmd);
    }
    if let Some(cmd) = custom(opts.type_.as_deref()) {
        tools = tools.with_candidates(ToolKind::Type, cmd);
    }
    tools
}

/// Run the `pass` command against explicit dependencies.
///
/// # Errors
///
/// Returns an error if a menu, store, mail or delivery step fails.
pub fn run_with(
    ctx: &PassContext<'_>,
    opts: &PassOpts,
    log: &Logger,
    out: &mut dyn Write,
    rng: &mut dyn RngCore,
) -> Result<()> {
    let mode = if opts.type_.is_some() {
        Delivery::Type
    } else {
        Delivery::Copy
    };
    let deliverer = Deliverer::new(ctx.tools, mode);
    let mut output = Output {
        deliverer,
        print: opts.print.then_some(out),
    };

    if let Some(PassCommand::Generate { path, force }) = &opts.action {
        let entry = generate_entry(ctx.store, path, *force, ctx.generate, rng)?;
        log.info(&format!("generated {path}"));
        return output.emit(&format!("{path} password"), &entry.password);
    }

    let menu = Menu::new(ctx.tools);
    let Some(choice) = choose_entry(&menu, ctx.store, "entry", &[NEW_ITEM])? else {
        log.debug("entry selection cancelled");
        return Ok(());
    };

    if choice == NEW_ITEM {
        let Some(path) = menu.choose::<&str>("new entry", &[])? else {
            log.debug("new entry cancelled");
            return Ok(());
        };
        let path = path.trim();
        if path.is_empty() {
            return Ok(());
        }
        let entry = generate_entry(ctx.store, path, false, ctx.generate, rng)?;
        log.info(&format!("generated {path}"));
        return output.emit(&format!("{path} password"), &entry.password);
    }

    let entry = Entry::parse(&choice, &ctx.store.show(&choice)?);
    if opts.autotype {
        deliverer.autotype(entry.username(), &entry.password)?;
        log.info(&format!("autotyped {choice}"));
        return Ok(());
    }

    let mailbox = tempmail::mailbox_for(ctx.store, &choice, entry.field("email"), ctx.prefix)?;
    let mut items: Vec<String> = entry
        .available_fields()
        .iter()
        .map(ToString::to_string)
        .filter(|label| !ACTIONS.contains(&label.as_str()))
        .collect();
    if mailbox.is_some() {
        items.push(INBOX.to_string());
        items.push(DELETE_MAIL.to_string());
    } else {
        items.push(CREATE_MAIL.to_string());
    }

    let Some(picked) = menu.choose("field", &items)? else {
        log.debug("field selection cancelled");
        return Ok(());
    };

    match (picked.as_str(), mailbox) {
        (CREATE_MAIL, None) => {
            let created = tempmail::provision(ctx.store, ctx.api, &choice, ctx.prefix, rng)?;
            log.info(&format!("created mailbox {} for {choice}", created.address));
            output.emit(&format!("{} address", created.path), &created.address)
        }
        (INBOX, Some(path)) => read_inbox(ctx, &menu, &mut output, &path, log),
        (DELETE_MAIL, Some(path)) => {
            tempmail::delete(ctx.store, ctx.api, &path)?;
            log.info(&format!("deleted mailbox {path}"));
            notify::send(ctx.tools.executor(), "Mailbox deleted", &path);
            Ok(())
        }
        (label, _) => {
            let field = Field::from_label(label);
            if field == Field::Autotype {
                deliverer.autotype(entry.username(), &entry.password)?;
                log.info(&format!("autotyped {choice}"));
                return Ok(());
            }
            let (value, label) = field_value(&entry, &field)?;
            log.info(&format!("delivered {field} of {choice}"));
            output.emit(&label, &value)
        }
    }
}

/// Value of `field` in `entry`, with the label shown when it is copied.
fn field_value(entry: &Entry, field: &Field) -> Result<(String, String)> {
    let label = format!("{} {field}", entry.path);
    let value = match field {
        Field::Password => entry.password.clone(),
        Field::Username => entry.username().to_string(),
        Field::Otp => {
            let Some(uri) = &entry.otpauth else {
                bail!("{} has no otpauth line", entry.path);
            };
            let otp = OtpAuth::parse(uri)
                .with_context(|| format!("reading one-time password of {}", entry.path))?;
            let now = otp::now();
            let code = otp.code_at(now);
            let Some(left) = otp.remaining(now) else {
                return Ok((code, label));
            };
            return Ok((code, format!("{label} ({left}s left)")));
        }
        Field::Named(name) => {
            let Some(value) = entry.field(name) else {
                bail!("{} has no field '{name}'", entry.path);
            };
            value.to_string()
        }
        Field::Autotype => bail!("autotype has no single value"),
    };
    Ok((value, label))
}

/// Let the user pick a message from the mailbox at `path` and deliver its
/// text.
fn read_inbox(
    ctx: &PassContext<'_>,
    menu: &Menu<'_>,
    output: &mut Output<'_, '_>,
    path: &str,
    log: &Logger,
) -> Result<()> {
    let (token, messages) = tempmail::inbox(ctx.store, ctx.api, path)?;
    if messages.is_empty() {
        log.info(&format!("{path}: inbox empty"));
        notify::send(ctx.tools.executor(), "Inbox empty", path);
        return Ok(());
    }
    let items: Vec<String> = messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("{}. {}: {}", i + 1, m.from.address, m.subject))
        .collect();
    let Some(picked) = menu.choose("message", &items)? else {
        return Ok(());
    };
    let Some(summary) = items
        .iter()
        .position(|item| *item == picked)
        .and_then(|i| messages.get(i))
    else {
        bail!("unknown message: {picked}");
    };
    let message = ctx.api.message(&token, &summary.id)?;
    log.info(&format!("read message {} in {path}", message.id));
    output.emit(&format!("message from {}", message.from.address), &message.text)
}

/// Create `path` with a generated password, username and name.
///
/// # Errors
///
/// Returns [`StoreError::Exists`] if the entry exists and `force` is unset,
/// or any store error.
pub fn generate_entry(
    store: &dyn CredentialStore,
    path: &str,
    force: bool,
    settings: GenerateConfig,
    rng: &mut dyn RngCore,
) -> Result<Entry> {
    if !force && store.exists(path)? {
        return Err(StoreError::Exists(path.to_string()).into());
    }
    let content = generate::new_entry_content(rng, settings.length, settings.symbols);
    store.insert(path, &content)?;
    Ok(Entry::parse(path, &content))
}

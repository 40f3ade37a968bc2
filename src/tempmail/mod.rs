//! Temporary mailbox provisioning backed by the credential store.
//!
//! A mailbox is stored as a regular credential entry under a reserved
//! prefix (`tempmail/<address>`). Its `associated` field points back at the
//! entry that requested it, and that entry gains an `email` field.
mod client;

pub use client::{DEFAULT_API_BASE, MailTmClient};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::{DeskError, MailError};
use crate::generate;
use crate::store::CredentialStore;

/// Default path prefix reserved for temporary mailboxes.
pub const DEFAULT_PREFIX: &str = "tempmail";

/// Length of generated mailbox passwords.
const MAILBOX_PASSWORD_LEN: usize = 20;

/// Sender or recipient of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Mailbox address.
    #[serde(default)]
    pub address: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
}

/// A message as listed in the inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Provider message id.
    pub id: String,
    /// Sender.
    #[serde(default)]
    pub from: Address,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Leading text of the body.
    #[serde(default)]
    pub intro: String,
    /// Whether the message was already opened.
    #[serde(default)]
    pub seen: bool,
    /// Creation timestamp as reported by the provider.
    #[serde(default, rename = "createdAt")]
    pub created_at: String,
}

/// A full message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Provider message id.
    pub id: String,
    /// Sender.
    #[serde(default)]
    pub from: Address,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Plain-text body.
    #[serde(default)]
    pub text: String,
}

/// Remote mailbox provider.
#[cfg_attr(test, mockall::automock)]
pub trait MailApi {
    /// Active domains offered for new accounts.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport or decoding failure.
    fn domains(&self) -> Result<Vec<String>, MailError>;

    /// Create an account and return its id.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport or decoding failure.
    fn create_account(&self, address: &str, password: &str) -> Result<String, MailError>;

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport or decoding failure.
    fn token(&self, address: &str, password: &str) -> Result<String, MailError>;

    /// List inbox messages.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport or decoding failure.
    fn messages(&self, token: &str) -> Result<Vec<MessageSummary>, MailError>;

    /// Fetch one message.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport or decoding failure.
    fn message(&self, token: &str, id: &str) -> Result<Message, MailError>;

    /// Delete the account.
    ///
    /// # Errors
    ///
    /// Returns a [`MailError`] on transport failure.
    fn delete_account(&self, token: &str, id: &str) -> Result<(), MailError>;
}

/// A freshly provisioned mailbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Store path of the mailbox entry.
    pub path: String,
    /// Mailbox address.
    pub address: String,
    /// Provider account id.
    pub account_id: String,
}

/// Whether `path` lives under the reserved mailbox prefix.
#[must_use]
pub fn is_tempmail(path: &str, prefix: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.starts_with('/'))
}

/// Create a mailbox for `associated` and record it in the store.
///
/// Steps run in order and abort on the first error; an account created
/// remotely before a failing store write is not rolled back.
///
/// # Errors
///
/// Returns [`MailError::NoDomains`] if the provider offers no domain, or any
/// API or store error.
pub fn provision<R: Rng + ?Sized>(
    store: &dyn CredentialStore,
    api: &dyn MailApi,
    associated: &str,
    prefix: &str,
    rng: &mut R,
) -> Result<Mailbox, DeskError> {
    let domain = api
        .domains()?
        .into_iter()
        .next()
        .ok_or(MailError::NoDomains)?;
    let address = format!("{}@{domain}", generate::username(rng));
    let password = generate::password(rng, MAILBOX_PASSWORD_LEN, false);
    let account_id = api.create_account(&address, &password)?;
    tracing::debug!("created mailbox {address}");

    let path = format!("{prefix}/{address}");
    let mut mailbox = Entry::parse(&path, &password);
    mailbox.set_field("username", &address);
    mailbox.set_field("id", &account_id);
    mailbox.set_field("associated", associated);
    store.insert(&path, &mailbox.to_content())?;

    let mut origin = Entry::parse(associated, &store.show(associated)?);
    origin.set_field("email", &address);
    store.insert(associated, &origin.to_content())?;

    Ok(Mailbox {
        path,
        address,
        account_id,
    })
}

/// Find the mailbox entry whose `associated` field equals `associated`.
///
/// Every mailbox entry is decrypted in turn. Entries that cannot be read
/// are skipped with a warning.
///
/// # Errors
///
/// Returns a store error if listing fails.
pub fn find_for(
    store: &dyn CredentialStore,
    associated: &str,
    prefix: &str,
) -> Result<Option<String>, DeskError> {
    for path in store.list()? {
        if !is_tempmail(&path, prefix) {
            continue;
        }
        let content = match store.show(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("skipping unreadable mailbox: {e}");
                continue;
            }
        };
        if Entry::parse(&path, &content).field("associated") == Some(associated) {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

/// Mailbox path for `entry`.
///
/// A mailbox entry is its own mailbox. Otherwise the entry's `email`
/// field names the mailbox at `<prefix>/<email>`, which only needs a store
/// listing to confirm. Entries without an `email` field fall back to
/// [`find_for`].
///
/// # Errors
///
/// Returns a store error if listing fails.
pub fn mailbox_for(
    store: &dyn CredentialStore,
    entry: &str,
    email: Option<&str>,
    prefix: &str,
) -> Result<Option<String>, DeskError> {
    if is_tempmail(entry, prefix) {
        return Ok(Some(entry.to_string()));
    }
    let Some(email) = email else {
        return find_for(store, entry, prefix);
    };
    let path = format!("{prefix}/{email}");
    Ok(store.exists(&path)?.then_some(path))
}

fn login(
    store: &dyn CredentialStore,
    api: &dyn MailApi,
    path: &str,
) -> Result<(Entry, String), DeskError> {
    let entry = Entry::parse(path, &store.show(path)?);
    let address = entry.field("username").ok_or(MailError::MissingField {
        path: path.to_string(),
        field: "username",
    })?;
    let token = api.token(address, &entry.password)?;
    Ok((entry, token))
}

/// Log into the mailbox stored at `path` and list its messages.
///
/// Returns the bearer token alongside the messages so callers can fetch
/// bodies without logging in again.
///
/// # Errors
///
/// Returns a store or API error.
pub fn inbox(
    store: &dyn CredentialStore,
    api: &dyn MailApi,
    path: &str,
) -> Result<(String, Vec<MessageSummary>), DeskError> {
    let (_, token) = login(store, api, path)?;
    let messages = api.messages(&token)?;
    Ok((token, messages))
}

fn delete_remote(api: &dyn MailApi, entry: &Entry, token: &str) {
    let Some(id) = entry.field("id") else {
        tracing::warn!("{} has no account id; removing entry only", entry.path);
        return;
    };
    if let Err(e) = api.delete_account(token, id) {
        tracing::warn!("remote mailbox not deleted: {e}");
    }
}

/// Delete the remote account (best effort) and then the store entry.
///
/// # Errors
///
/// Returns a store error if the entry cannot be read or removed.
pub fn delete(store: &dyn CredentialStore, api: &dyn MailApi, path: &str) -> Result<(), DeskError> {
    match login(store, api, path) {
        Ok((entry, token)) => delete_remote(api, &entry, &token),
        Err(DeskError::Store(e)) => return Err(e.into()),
        Err(e) => tracing::warn!("remote mailbox not deleted: {e}"),
    }
    store.remove(path)?;
    Ok(())
}

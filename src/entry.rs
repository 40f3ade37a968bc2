//! Parsing and re-serialising decrypted credential entries.
//!
//! The plaintext layout is line oriented: the first line is always the
//! password, later lines are `key: value` fields, an optional
//! `otpauth://` URI, or free text.
use std::fmt;

/// Field names consulted, in order, when looking for a username.
const USERNAME_KEYS: &[&str] = &["username", "user", "login", "email"];

/// A value that can be picked from an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// First line of the entry.
    Password,
    /// Username field, or the last path component.
    Username,
    /// One-time password generated from the `otpauth://` line.
    Otp,
    /// Username, tab, password typed in sequence.
    Autotype,
    /// Any other `key: value` field.
    Named(String),
}

impl Field {
    /// Parse a menu label back into a field.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "password" => Self::Password,
            "username" => Self::Username,
            "otp" => Self::Otp,
            "autotype" => Self::Autotype,
            other => Self::Named(other.to_string()),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Password => write!(f, "password"),
            Self::Username => write!(f, "username"),
            Self::Otp => write!(f, "otp"),
            Self::Autotype => write!(f, "autotype"),
            Self::Named(name) => write!(f, "{name}"),
        }
    }
}

/// Labels with a built-in meaning in the field menu. Stored fields with
/// these names are not offered as named fields.
const BUILTIN_LABELS: &[&str] = &["password", "username", "user", "login", "otp", "autotype"];

/// A parsed credential entry.
///
/// The lines after the password are kept verbatim, so [`Entry::set_field`]
/// followed by [`Entry::to_content`] changes only the edited line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Hierarchical store path, e.g. `web/github/alice`.
    pub path: String,
    /// First line, verbatim.
    pub password: String,
    /// `key: value` fields in file order; keys are lowercased and trimmed.
    pub fields: Vec<(String, String)>,
    /// The first `otpauth://` URI, if present.
    pub otpauth: Option<String>,
    /// Non-empty lines that are neither fields nor an otpauth URI.
    pub extra: Vec<String>,
    body: Vec<String>,
}

/// Split a body line into its trimmed key and value.
///
/// Blank lines, `otpauth://` URIs and bare `scheme://` URLs are not fields.
fn split_field(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim();
    if trimmed.starts_with("otpauth://") {
        return None;
    }
    let (key, value) = trimmed.split_once(':')?;
    let key = key.trim();
    if key.is_empty() || (value.starts_with("//") && !key.contains(char::is_whitespace)) {
        return None;
    }
    Some((key, value.trim()))
}

impl Entry {
    /// Parse decrypted entry content.
    #[must_use]
    pub fn parse(path: &str, content: &str) -> Self {
        let mut lines = content.lines();
        let password = lines.next().unwrap_or_default().to_string();
        let body: Vec<String> = lines.map(str::to_string).collect();
        let mut fields = Vec::new();
        let mut otpauth = None;
        let mut extra = Vec::new();

        for line in &body {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if trimmed.starts_with("otpauth://") {
                if otpauth.is_none() {
                    otpauth = Some(trimmed.to_string());
                }
                continue;
            }
            match split_field(line) {
                Some((key, value)) => fields.push((key.to_lowercase(), value.to_string())),
                None => extra.push(line.clone()),
            }
        }

        Self {
            path: path.to_string(),
            password,
            fields,
            otpauth,
            extra,
            body,
        }
    }

    /// Look up a field by (case-insensitive) name. First occurrence wins.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        let name = name.trim().to_lowercase();
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Username from the first matching field, else the last path component.
    #[must_use]
    pub fn username(&self) -> &str {
        USERNAME_KEYS
            .iter()
            .find_map(|key| self.field(key))
            .unwrap_or_else(|| self.path.rsplit('/').next().unwrap_or(&self.path))
    }

    /// Set a field, rewriting the first line with that key (keeping its key
    /// spelling) or appending a new `key: value` line.
    pub fn set_field(&mut self, key: &str, value: &str) {
        self.write_field_line(key.trim(), value.trim());
        *self = Self::parse(&self.path, &self.to_content());
    }

    fn write_field_line(&mut self, key: &str, value: &str) {
        let lowered = key.to_lowercase();
        let existing = self.body.iter_mut().find_map(|line| {
            let spelled = split_field(line)
                .filter(|(k, _)| k.to_lowercase() == lowered)?
                .0
                .to_string();
            Some((line, spelled))
        });
        if let Some((line, spelled)) = existing {
            *line = format!("{spelled}: {value}");
            return;
        }
        self.body.push(format!("{key}: {value}"));
    }

    /// Fields offered in the picker, in menu order.
    #[must_use]
    pub fn available_fields(&self) -> Vec<Field> {
        let mut out = vec![Field::Password, Field::Username];
        if self.otpauth.is_some() {
            out.push(Field::Otp);
        }
        out.push(Field::Autotype);
        for (key, _) in &self.fields {
            let named = Field::Named(key.clone());
            if !BUILTIN_LABELS.contains(&key.as_str()) && !out.contains(&named) {
                out.push(named);
            }
        }
        out
    }

    /// Serialise back into the store's plaintext layout.
    #[must_use]
    pub fn to_content(&self) -> String {
        let mut out = String::with_capacity(
            self.password.len() + self.body.iter().map(|l| l.len() + 1).sum::<usize>() + 1,
        );
        out.push_str(&self.password);
        out.push('\n');
        for line in &self.body {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

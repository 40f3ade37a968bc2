//! RFC 4226 / RFC 6238 one-time passwords from `otpauth://` URIs.
use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha512};

use crate::error::OtpError;

/// HMAC digest used for code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    /// HMAC-SHA1 (the default).
    #[default]
    Sha1,
    /// HMAC-SHA256.
    Sha256,
    /// HMAC-SHA512.
    Sha512,
}

impl Algorithm {
    fn parse(value: &str) -> Result<Self, OtpError> {
        match value.to_ascii_uppercase().as_str() {
            "SHA1" => Ok(Self::Sha1),
            "SHA256" => Ok(Self::Sha256),
            "SHA512" => Ok(Self::Sha512),
            _ => Err(OtpError::UnsupportedAlgorithm(value.to_string())),
        }
    }
}

/// Time- or counter-based moving factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpKind {
    /// TOTP with the window length in seconds.
    Totp {
        /// Window length in seconds.
        period: u64,
    },
    /// HOTP with the stored counter.
    Hotp {
        /// Counter value from the URI.
        counter: u64,
    },
}

/// A parsed `otpauth://` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpAuth {
    /// TOTP or HOTP.
    pub kind: OtpKind,
    /// Percent-decoded label (usually `issuer:account`).
    pub label: String,
    /// Issuer parameter, if present.
    pub issuer: Option<String>,
    /// Decoded shared secret.
    pub secret: Vec<u8>,
    /// HMAC algorithm.
    pub algorithm: Algorithm,
    /// Code length, 6 or 8.
    pub digits: u32,
}

impl OtpAuth {
    /// Parse an `otpauth://totp/...` or `otpauth://hotp/...` URI.
    ///
    /// # Errors
    ///
    /// Returns an [`OtpError`] describing the first invalid component.
    pub fn parse(uri: &str) -> Result<Self, OtpError> {
        let rest = uri
            .trim()
            .strip_prefix("otpauth://")
            .ok_or(OtpError::InvalidUri)?;
        let (kind, rest) = rest.split_once('/').ok_or(OtpError::InvalidUri)?;
        let (label, query) = rest.split_once('?').unwrap_or((rest, ""));

        let mut secret = None;
        let mut issuer = None;
        let mut algorithm = Algorithm::default();
        let mut digits = 6;
        let mut period = 30;
        let mut counter = 0;

        for pair in query.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = percent_decode(value);
            match key.to_ascii_lowercase().as_str() {
                "secret" => secret = Some(decode_secret(&value)?),
                "issuer" => issuer = Some(value),
                "algorithm" => algorithm = Algorithm::parse(&value)?,
                "digits" => {
                    digits = value
                        .parse()
                        .map_err(|_| OtpError::UnsupportedDigits(0))?;
                }
                "period" => {
                    period = value.parse().map_err(|_| OtpError::InvalidPeriod)?;
                }
                "counter" => {
                    counter = value.parse().map_err(|_| OtpError::InvalidUri)?;
                }
                _ => {}
            }
        }

        if digits != 6 && digits != 8 {
            return Err(OtpError::UnsupportedDigits(digits));
        }
        let kind = match kind.to_ascii_lowercase().as_str() {
            "totp" if period == 0 => return Err(OtpError::InvalidPeriod),
            "totp" => OtpKind::Totp { period },
            "hotp" => OtpKind::Hotp { counter },
            _ => return Err(OtpError::InvalidUri),
        };

        Ok(Self {
            kind,
            label: percent_decode(label),
            issuer,
            secret: secret.ok_or(OtpError::MissingSecret)?,
            algorithm,
            digits,
        })
    }

    /// Generate the code for the given Unix time (ignored for HOTP).
    #[must_use]
    pub fn code_at(&self, unix_secs: u64) -> String {
        let counter = match self.kind {
            OtpKind::Totp { period } => unix_secs / period,
            OtpKind::Hotp { counter } => counter,
        };
        let digest = self.digest(counter);
        let value = truncate(&digest) % 10u32.pow(self.digits);
        format!("{value:0width$}", width = self.digits as usize)
    }

    /// Seconds left in the current TOTP window, `None` for HOTP.
    #[must_use]
    pub const fn remaining(&self, unix_secs: u64) -> Option<u64> {
        match self.kind {
            OtpKind::Totp { period } => Some(period - unix_secs % period),
            OtpKind::Hotp { .. } => None,
        }
    }

    fn digest(&self, counter: u64) -> Vec<u8> {
        let msg = counter.to_be_bytes();
        match self.algorithm {
            Algorithm::Sha1 => hmac_digest::<Hmac<Sha1>>(&self.secret, &msg),
            Algorithm::Sha256 => hmac_digest::<Hmac<Sha256>>(&self.secret, &msg),
            Algorithm::Sha512 => hmac_digest::<Hmac<Sha512>>(&self.secret, &msg),
        }
    }
}

/// Current Unix time in seconds.
#[must_use]
pub fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

fn hmac_digest<M: Mac + hmac::digest::KeyInit>(key: &[u8], msg: &[u8]) -> Vec<u8> {
    // HMAC accepts keys of any length.
    let Ok(mut mac) = <M as Mac>::new_from_slice(key) else {
        return Vec::new();
    };
    mac.update(msg);
    mac.finalize().into_bytes().to_vec()
}

/// RFC 4226 dynamic truncation.
fn truncate(digest: &[u8]) -> u32 {
    let offset = digest.last().map_or(0, |b| usize::from(b & 0x0f));
    digest
        .get(offset..offset + 4)
        .and_then(|s| <[u8; 4]>::try_from(s).ok())
        .map_or(0, |bytes| u32::from_be_bytes(bytes) & 0x7fff_ffff)
}

fn decode_secret(value: &str) -> Result<Vec<u8>, OtpError> {
    let normalized: String = value
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != '=' && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if normalized.is_empty() {
        return Err(OtpError::MissingSecret);
    }
    BASE32_NOPAD
        .decode(normalized.as_bytes())
        .map_err(|_| OtpError::InvalidSecret)
}

fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while let Some(&b) = bytes.get(i) {
        let hex = bytes
            .get(i + 1..i + 3)
            .and_then(|h| std::str::from_utf8(h).ok())
            .and_then(|h| u8::from_str_radix(h, 16).ok());
        match (b, hex) {
            (b'%', Some(decoded)) => {
                out.push(decoded);
                i += 3;
            }
            _ => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

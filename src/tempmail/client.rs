//! HTTP client for the mail.tm-compatible REST API.
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{MailApi, Message, MessageSummary};
use crate::error::MailError;

/// Default API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.mail.tm";

#[derive(Debug, Deserialize)]
struct Domain {
    domain: String,
    #[serde(default = "active_by_default", rename = "isActive")]
    is_active: bool,
}

const fn active_by_default() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct Account {
    id: String,
}

#[derive(Debug, Deserialize)]
struct Token {
    token: String,
}

/// [`MailApi`] implementation over HTTPS using `ureq`.
#[derive(Debug)]
pub struct MailTmClient {
    base: String,
    agent: ureq::Agent,
}

impl MailTmClient {
    /// Create a client for `base` (e.g. [`DEFAULT_API_BASE`]).
    #[must_use]
    pub fn new(base: &str) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(20)))
            .build()
            .into();
        Self {
            base: base.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn get_json(&self, path: &str, token: Option<&str>) -> Result<Value, MailError> {
        let url = self.url(path);
        tracing::debug!("GET {url}");
        let mut request = self.agent.get(&url).header("Accept", "application/json");
        if let Some(token) = token {
            request = request.header("Authorization", &format!("Bearer {token}"));
        }
        let mut response = request.call().map_err(|e| request_error(&url, &e))?;
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| decode_error(&url, &e))
    }

    fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T, MailError> {
        let url = self.url(path);
        tracing::debug!("POST {url}");
        let mut response = self
            .agent
            .post(&url)
            .header("Accept", "application/json")
            .send_json(body)
            .map_err(|e| request_error(&url, &e))?;
        response
            .body_mut()
            .read_json::<T>()
            .map_err(|e| decode_error(&url, &e))
    }
}

fn request_error(url: &str, err: &ureq::Error) -> MailError {
    MailError::Request {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

fn decode_error(url: &str, err: &dyn std::fmt::Display) -> MailError {
    MailError::Decode {
        url: url.to_string(),
        reason: err.to_string(),
    }
}

/// Accept both a bare JSON array and a JSON-LD `hydra:member` collection.
pub(super) fn members<T: DeserializeOwned>(url: &str, value: Value) -> Result<Vec<T>, MailError> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("hydra:member") {
            Some(Value::Array(items)) => items,
            _ => return Err(decode_error(url, &"missing hydra:member collection")),
        },
        _ => return Err(decode_error(url, &"expected a collection")),
    };
    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(|e| decode_error(url, &e)))
        .collect()
}

impl MailApi for MailTmClient {
    fn domains(&self) -> Result<Vec<String>, MailError> {
        let value = self.get_json("/domains", None)?;
        let domains: Vec<Domain> = members(&self.url("/domains"), value)?;
        Ok(domains
            .into_iter()
            .filter(|d| d.is_active)
            .map(|d| d.domain)
            .collect())
    }

    fn create_account(&self, address: &str, password: &str) -> Result<String, MailError> {
        let body = json!({ "address": address, "password": password });
        let account: Account = self.post_json("/accounts", &body)?;
        Ok(account.id)
    }

    fn token(&self, address: &str, password: &str) -> Result<String, MailError> {
        let body = json!({ "address": address, "password": password });
        let token: Token = self.post_json("/token", &body)?;
        Ok(token.token)
    }

    fn messages(&self, token: &str) -> Result<Vec<MessageSummary>, MailError> {
        let value = self.get_json("/messages", Some(token))?;
        members(&self.url("/messages"), value)
    }

    fn message(&self, token: &str, id: &str) -> Result<Message, MailError> {
        let path = format!("/messages/{id}");
        let value = self.get_json(&path, Some(token))?;
        serde_json::from_value(value).map_err(|e| decode_error(&self.url(&path), &e))
    }

    fn delete_account(&self, token: &str, id: &str) -> Result<(), MailError> {
        let url = self.url(&format!("/accounts/{id}"));
        tracing::debug!("DELETE {url}");
        self.agent
            .delete(&url)
            .header("Authorization", &format!("Bearer {token}"))
            .call()
            .map_err(|e| request_error(&url, &e))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn members_accepts_plain_array() {
        let value = json!([{ "domain": "a.test" }, { "domain": "b.test", "isActive": false }]);
        let domains: Vec<Domain> = members("u", value).unwrap();
        assert_eq!(domains.len(), 2);
        assert!(domains[0].is_active);
        assert!(!domains[1].is_active);
    }

    #[test]
    fn members_accepts_hydra_collection() {
        let value = json!({
            "hydra:member": [{ "id": "m1", "subject": "hi", "from": { "address": "x@y.z", "name": "X" } }],
            "hydra:totalItems": 1
        });
        let messages: Vec<MessageSummary> = members("u", value).unwrap();
        assert_eq!(messages[0].id, "m1");
        assert_eq!(messages[0].from.address, "x@y.z");
        assert!(!messages[0].seen);
    }

    #[test]
    fn members_rejects_scalar() {
        let err = members::<Domain>("https://api.test/domains", json!(42)).unwrap_err();
        assert!(matches!(err, MailError::Decode { .. }));
        assert!(err.to_string().contains("https://api.test/domains"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = MailTmClient::new("https://api.test/");
        assert_eq!(client.url("/token"), "https://api.test/token");
    }
}

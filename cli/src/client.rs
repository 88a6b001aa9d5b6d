//! HTTP client for keygate REST endpoints.
//!
//! [`KeygateClient`] wraps `reqwest::Client` with one typed method per
//! endpoint. Responses deserialize into the wire shapes below.
//!
//! ## Error handling
//!
//! Non-2xx responses are parsed for an `error` field in the JSON body. If
//! parsing fails, the raw response body is returned as the error message.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

/// Response of `POST /generate-key`. The only response carrying `api_key`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedKey {
    pub id: String,
    pub api_key: String,
    pub prefix: String,
    pub masked_key: String,
    pub expires_at: String,
}

/// One entry of `GET /keys`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyListItem {
    pub id: String,
    pub prefix: String,
    pub masked_key: String,
    pub expires_at: String,
    pub created_at: String,
}

#[derive(Deserialize)]
struct KeyList {
    keys: Vec<KeyListItem>,
}

#[derive(Deserialize)]
struct Greeting {
    message: String,
}

/// Errors returned by [`KeygateClient`] methods.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error (connection refused, timeout, DNS failure, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The server returned a non-2xx HTTP status.
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },
    /// The response body did not have the expected shape.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl ClientError {
    /// Returns `true` if the error is an HTTP 404 Not Found response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }

    /// Returns `true` if the server rejected the API key.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Server { status: 401, .. })
    }
}

/// HTTP client for a single keygate server.
pub struct KeygateClient {
    http: reqwest::Client,
    base_url: String,
}

impl KeygateClient {
    /// Create a client for the server at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The server's base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `POST /generate-key` — issue a new key.
    pub async fn generate_key(&self) -> Result<GeneratedKey, ClientError> {
        let resp = self
            .http
            .post(format!("{}/generate-key", self.base_url))
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    /// `GET /keys` — list issued keys.
    pub async fn list_keys(&self) -> Result<Vec<KeyListItem>, ClientError> {
        let resp = self
            .http
            .get(format!("{}/keys", self.base_url))
            .send()
            .await?;
        let list: KeyList = Self::handle_response(resp).await?;
        Ok(list.keys)
    }

    /// `DELETE /keys/{id}` — revoke a key.
    pub async fn delete_key(&self, id: &str) -> Result<(), ClientError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::Protocol(format!("Invalid base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::Protocol("Base URL cannot have a path".into()))?
            .pop_if_empty()
            .extend(["keys", id]);

        let resp = self.http.delete(url).send().await?;
        let _: serde_json::Value = Self::handle_response(resp).await?;
        Ok(())
    }

    /// `GET /hello` — protected greeting, authenticated with `api_key`.
    pub async fn hello(&self, api_key: &str) -> Result<String, ClientError> {
        let resp = self
            .http
            .get(format!("{}/hello", self.base_url))
            .header("x-api-key", api_key)
            .send()
            .await?;
        let greeting: Greeting = Self::handle_response(resp).await?;
        Ok(greeting.message)
    }

    /// Parse an HTTP response — returns the decoded body on success, or a
    /// [`ClientError`] with the server's error message on failure.
    async fn handle_response<T: DeserializeOwned>(
        resp: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.text().await?;

        if status.is_success() {
            serde_json::from_str(&body)
                .map_err(|e| ClientError::Protocol(format!("Invalid JSON from server: {e}")))
        } else {
            Err(ClientError::Server {
                status: status.as_u16(),
                message: error_message(&body),
            })
        }
    }
}

/// Extract `error` from a JSON error body, or fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"].as_str().map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_json() {
        assert_eq!(error_message(r#"{"error":"Key not found"}"#), "Key not found");
    }

    #[test]
    fn test_error_message_raw_body() {
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(r#"{"detail":"x"}"#), r#"{"detail":"x"}"#);
    }

    #[test]
    fn test_error_predicates() {
        let err = ClientError::Server {
            status: 404,
            message: "Key not found".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_unauthorized());
        assert_eq!(err.to_string(), "Server error (HTTP 404): Key not found");
    }

    #[test]
    fn test_trailing_slash_stripped() {
        let client = KeygateClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}

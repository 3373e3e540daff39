//! HTTP plumbing shared by every gateway.
//!
//! The transport attaches the bearer credential to each outbound request
//! and inspects each inbound response. An unauthorized response tears the
//! session down on the spot, no matter which component issued the request;
//! callers cannot opt out of that.

use std::{collections::BTreeMap, time::Duration};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use crate::{infra::config::ServerConfig, infra::error::AppError, usecases::session::SessionHandle};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("the backend rejected the session credential")]
    Unauthorized,
    #[error("request failed with status {status}: {}", error_detail(body))]
    Status { status: u16, body: String },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("invalid response payload: {message}")]
    Decode { message: String },
}

pub struct HttpTransport {
    rt: tokio::runtime::Runtime,
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
}

impl HttpTransport {
    pub fn new(config: &ServerConfig, session: SessionHandle) -> Result<Self, AppError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| AppError::TransportInit {
                message: format!("failed to initialize async runtime: {source}"),
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|source| AppError::TransportInit {
                message: format!("failed to build http client: {source}"),
            })?;

        Ok(Self {
            rt,
            http,
            base_url: normalize_base_url(&config.base_url),
            session,
        })
    }

    pub(crate) fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TransportError> {
        let request = self.http.get(self.url(path)).query(query);
        self.send_json(request)
    }

    pub(crate) fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let request = self.http.post(self.url(path)).json(body);
        self.send_json(request)
    }

    pub(crate) fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, TransportError> {
        let request = self.http.patch(self.url(path)).json(body);
        self.send_json(request)
    }

    pub(crate) fn delete(&self, path: &str) -> Result<(), TransportError> {
        let request = self.http.delete(self.url(path));
        self.dispatch(request).map(|_| ())
    }

    pub(crate) fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, TransportError> {
        let request = self.http.post(self.url(path)).multipart(form);
        self.send_json(request)
    }

    fn send_json<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TransportError> {
        let body = self.dispatch(request)?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            message: source.to_string(),
        })
    }

    /// Sends one request and returns the raw success body. Credential
    /// attachment and the unauthorized teardown both live here so that no
    /// endpoint can bypass them.
    fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, TransportError> {
        let request = match self.session.credential() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let outcome = self.rt.block_on(async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        });

        let (status, body) = outcome.map_err(|source| TransportError::Network {
            message: source.to_string(),
        })?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            tracing::warn!("unauthorized response, tearing down the session");
            self.session.expire();
            return Err(TransportError::Unauthorized);
        }

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        Ok(body.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_owned()
}

/// Pulls a human-readable detail out of a backend error body. The backend
/// answers either `{"error": "..."}` or `{"errors": {"field": "..."}}`.
pub(crate) fn error_detail(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
        message: Option<String>,
        errors: Option<BTreeMap<String, String>>,
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(error) = parsed.error {
            return error;
        }
        if let Some(errors) = parsed.errors {
            if !errors.is_empty() {
                return errors
                    .into_iter()
                    .map(|(field, message)| format!("{field}: {message}"))
                    .collect::<Vec<_>>()
                    .join("; ");
            }
        }
        if let Some(message) = parsed.message {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no detail provided".to_owned()
    } else {
        trimmed.chars().take(120).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::token_store::TokenStore;

    fn transport_with_base(base_url: &str) -> HttpTransport {
        let dir = tempfile::tempdir().expect("temp dir should be creatable");
        let session = SessionHandle::new(TokenStore::new(dir.path().join("token")));
        HttpTransport::new(
            &ServerConfig {
                base_url: base_url.to_owned(),
                timeout_ms: 1_000,
            },
            session,
        )
        .expect("transport should build")
    }

    #[test]
    fn url_joins_base_and_path_without_double_slash() {
        let transport = transport_with_base("http://localhost:5000/");

        assert_eq!(
            transport.url("/api/auth/me"),
            "http://localhost:5000/api/auth/me"
        );
    }

    #[test]
    fn error_detail_prefers_the_error_field() {
        assert_eq!(
            error_detail(r#"{"error": "Invalid credentials"}"#),
            "Invalid credentials"
        );
    }

    #[test]
    fn error_detail_flattens_field_errors() {
        assert_eq!(
            error_detail(r#"{"errors": {"name": "Group name is required"}}"#),
            "name: Group name is required"
        );
    }

    #[test]
    fn error_detail_falls_back_to_raw_body() {
        assert_eq!(error_detail("upstream exploded"), "upstream exploded");
        assert_eq!(error_detail("   "), "no detail provided");
    }
}

//! REST service wrappers
//!
//! Thin typed clients over the backend endpoints. Calls are async, bounded
//! by the configured timeout, and fail closed: any failure surfaces as an
//! `ApiError` and never as partial state. A 401 from any endpoint clears
//! the persisted identity and signals a login redirect.

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::checkout::Redirect;
use crate::config::Config;
use crate::session::AuthSession;
use crate::storage::SharedStorage;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("session expired")]
    SessionExpired,
    #[error("network error: {0}")]
    Network(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Where the router should send the user, when the error implies it.
    pub fn redirect(&self) -> Option<Redirect> {
        matches!(self, ApiError::SessionExpired).then_some(Redirect::Login)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Rejection for an envelope that came back with `success: false`.
pub(crate) fn rejected(message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Rejected {
        status: 200,
        message: message.unwrap_or_else(|| fallback.to_string()),
    }
}

/// Shared HTTP client. Injects the bearer token from the session on every
/// call.
pub struct ApiClient {
    base_url: String,
    http: Client,
    session: AuthSession,
}

impl ApiClient {
    pub fn new(config: &Config, storage: SharedStorage) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            http,
            session: AuthSession::new(storage),
        })
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(Method::GET, path, None::<&()>).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "backend request");
        let mut request = self.http.request(method, url.as_str());
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Network("request timed out".to_string())
            } else {
                ApiError::Network(e.to_string())
            }
        })?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            warn!(%url, "session expired, clearing identity");
            self.session.clear_identity();
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::Rejected { status: status.as_u16(), message });
        }
        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Authenticated download of an absolute URL handed out by the backend
    /// (receipt PDFs).
    pub(crate) async fn get_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        let mut request = self.http.get(url);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.session.clear_identity();
            return Err(ApiError::SessionExpired);
        }
        if !status.is_success() {
            return Err(ApiError::Rejected { status: status.as_u16(), message: status.to_string() });
        }
        let bytes = response.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_session_expiry_signals_login_redirect() {
        assert_eq!(ApiError::SessionExpired.redirect(), Some(Redirect::Login));
        assert_eq!(ApiError::Network("down".into()).redirect(), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let mut config = Config::default();
        config.api_base_url = "http://localhost:5000/".to_string();
        let client = ApiClient::new(&config, MemoryStorage::shared()).unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }
}

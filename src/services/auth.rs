//! Authentication service

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{rejected, ApiClient, ApiError};
use crate::session::User;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
struct LoginResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct MessageResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    user: Option<User>,
}

pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// Logs in and persists the identity. Switching to a different user
    /// clears the persisted cart (see `AuthSession::store_login`).
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let resp: LoginResponse = self
            .client
            .post("/api/auth/login", &Credentials { email, password })
            .await?;
        match (resp.success, resp.token, resp.user) {
            (true, Some(token), Some(user)) => {
                self.client.session().store_login(&token, &user);
                Ok(user)
            }
            _ => Err(rejected(resp.message, "login failed")),
        }
    }

    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<String, ApiError> {
        let resp: MessageResponse = self.client.post("/api/auth/register", registration).await?;
        if resp.success {
            Ok(resp.message.unwrap_or_else(|| "registered".to_string()))
        } else {
            Err(rejected(resp.message, "registration failed"))
        }
    }

    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<User, ApiError> {
        let resp: ProfileResponse = self.client.get("/api/auth/me").await?;
        match (resp.success, resp.user) {
            (true, Some(user)) => Ok(user),
            _ => Err(rejected(resp.message, "failed to load profile")),
        }
    }

    /// Restores the persisted session, if any.
    pub fn check_session(&self) -> Option<User> {
        self.client.session().user()
    }

    pub fn logout(&self) {
        self.client.session().clear_identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::domain::value_objects::Role;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_check_session_reads_stored_identity() {
        let storage = MemoryStorage::shared();
        let client = Arc::new(ApiClient::new(&Config::default(), storage).unwrap());
        let service = AuthService::new(client.clone());
        assert!(service.check_session().is_none());

        let user = User {
            id: 9,
            name: "Ana".into(),
            email: "ana@example.com".into(),
            role: Role::Client,
        };
        client.session().store_login("tok", &user);
        assert_eq!(service.check_session(), Some(user));

        service.logout();
        assert!(service.check_session().is_none());
    }
}

//! Staff user administration

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use super::{rejected, ApiClient, ApiError};
use crate::domain::value_objects::Role;
use crate::session::User;

#[derive(Deserialize)]
struct UsersResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Deserialize)]
struct MessageResponse {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct RoleBody {
    role: Role,
}

#[derive(Debug, Error)]
pub enum UserAdminError {
    #[error("only administrators may change roles")]
    NotPermitted,
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub struct UsersService {
    client: Arc<ApiClient>,
}

impl UsersService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        let resp: UsersResponse = self.client.get("/api/admin/users").await?;
        if resp.success {
            Ok(resp.users)
        } else {
            Err(rejected(resp.message, "failed to load users"))
        }
    }

    /// Changes a user's role. Admin only; checked here to gate the control
    /// and re-checked by the backend.
    #[instrument(skip(self))]
    pub async fn update_role(
        &self,
        user_id: i64,
        role: Role,
        actor: Role,
    ) -> Result<String, UserAdminError> {
        if actor != Role::Admin {
            return Err(UserAdminError::NotPermitted);
        }
        let resp: MessageResponse = self
            .client
            .put(&format!("/api/admin/users/{user_id}/role"), &RoleBody { role })
            .await?;
        if resp.success {
            Ok(resp.message.unwrap_or_else(|| "role updated".to_string()))
        } else {
            Err(rejected(resp.message, "role update failed").into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::MemoryStorage;

    #[tokio::test]
    async fn test_only_admins_may_change_roles() {
        let client = ApiClient::new(&Config::default(), MemoryStorage::shared()).unwrap();
        let service = UsersService::new(Arc::new(client));
        for actor in [Role::Seller, Role::Client] {
            let err = service.update_role(4, Role::Seller, actor).await.unwrap_err();
            assert!(matches!(err, UserAdminError::NotPermitted));
        }
    }
}

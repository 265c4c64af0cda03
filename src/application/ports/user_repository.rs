use async_trait::async_trait;

use crate::domain::error::ApiResult;
use crate::domain::users::user::{User, UserPatch};

/// Exact-equality predicate over stored fields. Every supplied field must
/// match for a user to be selected. Partial/pattern matching is an API-layer
/// concern and stays out of the repository.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub id: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub token: Option<String>,
    pub is_admin: Option<bool>,
}

impl UserQuery {
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    pub fn by_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            ..Default::default()
        }
    }

    pub fn by_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Default::default()
        }
    }

    pub fn by_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Default::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.id.as_deref().is_none_or(|v| v == user.id)
            && self.username.as_deref().is_none_or(|v| v == user.username)
            && self.email.as_deref().is_none_or(|v| v == user.email)
            && self.token.as_deref().is_none_or(|v| v == user.token)
            && self.is_admin.is_none_or(|v| v == user.is_admin)
    }
}

/// The authoritative user collection. Implementations own both the in-memory
/// map and its durable form; every mutation is persisted before the call
/// returns.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Every user, in insertion order.
    async fn all(&self) -> ApiResult<Vec<User>>;

    /// Users matching every supplied field of the query.
    async fn filter(&self, query: &UserQuery) -> ApiResult<Vec<User>>;

    /// First user matching the query, or none.
    async fn find(&self, query: &UserQuery) -> ApiResult<Option<User>>;

    /// Insert or overwrite by id, persist, and return the stored user.
    async fn save(&self, user: User) -> ApiResult<User>;

    /// Shallow-merge `patch` into the user with this id, persist, and return
    /// the updated user. Fails with `ApiError::NotFound` when the id is
    /// absent.
    async fn update(&self, id: &str, patch: UserPatch) -> ApiResult<User>;

    /// Remove and return the user with this id, or none when absent.
    /// Persists afterward either way.
    async fn del(&self, id: &str) -> ApiResult<Option<User>>;
}

use crate::application::ports::user_repository::{UserQuery, UserRepository};
use crate::domain::error::ApiResult;
use crate::domain::users::user::User;

// Presentation layer is responsible for handing the raw Authorization header
// value down. This module intentionally avoids depending on HTTP types.

/// Extract the opaque token from an `Authorization: Bearer <token>` value.
/// A missing header or any other scheme yields `None`, not an error:
/// anonymous requests proceed and per-route checks decide what they may do.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header?.strip_prefix("Bearer ")
}

/// Resolve the request identity from the Authorization header value via a
/// token lookup. Unknown tokens are anonymous, not errors.
pub async fn resolve_from_header<R>(repo: &R, header: Option<&str>) -> ApiResult<Option<User>>
where
    R: UserRepository + ?Sized,
{
    let Some(token) = bearer_token(header) else {
        return Ok(None);
    };
    repo.find(&UserQuery::by_token(token)).await
}

/// True iff a user is present and holds the admin flag.
pub fn require_admin(user: Option<&User>) -> bool {
    user.map(|u| u.is_admin).unwrap_or(false)
}

/// True iff a user is present and is either the target account or an admin.
pub fn require_self_or_admin(user: Option<&User>, target_id: &str) -> bool {
    user.map(|u| u.id == target_id || u.is_admin).unwrap_or(false)
}

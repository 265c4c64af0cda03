use axum::http::header::AUTHORIZATION;
use axum::{Router, extract::State, response::Response, routing::post};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::access;
use crate::application::use_cases::auth::issue_token::IssueToken;
use crate::bootstrap::app_context::AppContext;
use crate::domain::error::ApiError;
use crate::domain::users::user::User;
use crate::presentation::http::envelope::{self, ApiJson, ErrorResponse};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(post, path = "/tokens", tag = "Auth", request_body = TokenRequest, security(()), responses(
    (status = 200, body = TokenResponse),
    (status = 404, description = "Unknown username"),
    (status = 401, description = "Incorrect password")
))]
pub async fn issue_token(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<TokenRequest>,
) -> Result<Response, ErrorResponse> {
    let repo = ctx.user_repo();
    let uc = IssueToken {
        repo: repo.as_ref(),
        hasher: ctx.hasher(),
    };
    let token = uc.execute(&req.username, &req.password).await?;
    Ok(envelope::data(TokenResponse { token }))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/tokens", post(issue_token))
        .with_state(ctx)
}

// --- Bearer extraction ---
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// The raw `Authorization` header value, when one was sent. Absence is not a
/// rejection: anonymous requests reach the handler and fail its per-route
/// check instead.
pub struct MaybeBearer(pub Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeBearer
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Ok(MaybeBearer(header))
    }
}

/// Resolve the caller, or `None` for anonymous/unknown-token requests.
pub(crate) async fn identify(
    ctx: &AppContext,
    bearer: &MaybeBearer,
) -> Result<Option<User>, ErrorResponse> {
    let repo = ctx.user_repo();
    access::resolve_from_header(repo.as_ref(), bearer.0.as_deref())
        .await
        .map_err(Into::into)
}

pub(crate) fn unauthorized() -> ErrorResponse {
    ErrorResponse(ApiError::Auth("Unauthorized.".into()))
}

use axum::{
    Router,
    extract::{Path, Query, State},
    response::Response,
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::application::access;
use crate::application::use_cases::users::create_user::{CreateUser, CreateUserRequest};
use crate::application::use_cases::users::delete_user::DeleteUser;
use crate::application::use_cases::users::get_user::GetUser;
use crate::application::use_cases::users::list_users::{ListFilter, ListUsers};
use crate::application::use_cases::users::update_user::{UpdateUser, UpdateUserRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::error::ApiError;
use crate::domain::users::user::User;
use crate::presentation::http::auth::{MaybeBearer, identify, unauthorized};
use crate::presentation::http::envelope::{self, ApiJson, ErrorResponse};

/// A user as shown to API clients; the password hash never leaves the store.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub token: String,
    pub is_admin: bool,
    pub valid: bool,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            username: u.username,
            email: u.email,
            token: u.token,
            is_admin: u.is_admin,
            valid: u.valid,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateUserBody {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateUserBody {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub is_admin: Option<bool>,
    pub valid: Option<bool>,
}

impl From<UpdateUserBody> for UpdateUserRequest {
    fn from(b: UpdateUserBody) -> Self {
        UpdateUserRequest {
            username: b.username,
            email: b.email,
            password: b.password,
            is_admin: b.is_admin,
            valid: b.valid,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub username: Option<String>,
    pub email: Option<String>,
    pub admin: Option<bool>,
}

#[utoipa::path(get, path = "/users", tag = "Users",
    params(
        ("username" = Option<String>, Query, description = "Substring filter"),
        ("email" = Option<String>, Query, description = "Substring filter"),
        ("admin" = Option<bool>, Query, description = "Exact filter")
    ),
    responses((status = 200, body = [UserResponse]), (status = 401)))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    Query(q): Query<ListQuery>,
) -> Result<Response, ErrorResponse> {
    let caller = identify(&ctx, &bearer).await?;
    if !access::require_admin(caller.as_ref()) {
        return Err(unauthorized());
    }
    let repo = ctx.user_repo();
    let uc = ListUsers { repo: repo.as_ref() };
    let users = uc
        .execute(&ListFilter {
            username: q.username,
            email: q.email,
            admin: q.admin,
        })
        .await?;
    let users: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(envelope::data(json!({ "users": users })))
}

#[utoipa::path(post, path = "/users", tag = "Users", request_body = CreateUserBody,
    responses((status = 200, body = UserResponse), (status = 400), (status = 401)))]
pub async fn create_user(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    body: Result<ApiJson<CreateUserBody>, ErrorResponse>,
) -> Result<Response, ErrorResponse> {
    let caller = identify(&ctx, &bearer).await?;
    if !access::require_admin(caller.as_ref()) {
        return Err(unauthorized());
    }
    let ApiJson(body) = body?;
    let repo = ctx.user_repo();
    let uc = CreateUser {
        repo: repo.as_ref(),
        hasher: ctx.hasher(),
    };
    let user = uc
        .execute(&CreateUserRequest {
            username: body.username,
            email: body.email,
            password: body.password,
            is_admin: body.is_admin,
        })
        .await?;
    Ok(envelope::data(json!({ "user": UserResponse::from(user) })))
}

#[utoipa::path(get, path = "/users/me", tag = "Users",
    responses((status = 200, body = UserResponse), (status = 401)))]
pub async fn me(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
) -> Result<Response, ErrorResponse> {
    let Some(caller) = identify(&ctx, &bearer).await? else {
        return Err(unauthorized());
    };
    Ok(envelope::data(json!({ "user": UserResponse::from(caller) })))
}

#[utoipa::path(put, path = "/users/me", tag = "Users", request_body = UpdateUserBody,
    responses((status = 200, body = UserResponse), (status = 400), (status = 401)))]
pub async fn update_me(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    body: Result<ApiJson<UpdateUserBody>, ErrorResponse>,
) -> Result<Response, ErrorResponse> {
    let Some(caller) = identify(&ctx, &bearer).await? else {
        return Err(unauthorized());
    };
    let ApiJson(body) = body?;
    // Only admins may touch the admin flag, even on their own record.
    if body.is_admin.is_some() && !caller.is_admin {
        return Err(unauthorized());
    }
    let repo = ctx.user_repo();
    let uc = UpdateUser {
        repo: repo.as_ref(),
        hasher: ctx.hasher(),
    };
    let user = uc.execute(&caller.id, body.into()).await?;
    Ok(envelope::data(json!({ "user": UserResponse::from(user) })))
}

#[utoipa::path(get, path = "/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse), (status = 401), (status = 404)))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    Path(id): Path<String>,
) -> Result<Response, ErrorResponse> {
    let caller = identify(&ctx, &bearer).await?;
    if !access::require_admin(caller.as_ref()) {
        return Err(unauthorized());
    }
    let repo = ctx.user_repo();
    let uc = GetUser { repo: repo.as_ref() };
    let user = uc.execute(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(envelope::data(json!({ "user": UserResponse::from(user) })))
}

#[utoipa::path(put, path = "/users/{id}", tag = "Users", request_body = UpdateUserBody,
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse), (status = 401), (status = 404)))]
pub async fn update_user(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    Path(id): Path<String>,
    body: Result<ApiJson<UpdateUserBody>, ErrorResponse>,
) -> Result<Response, ErrorResponse> {
    let caller = identify(&ctx, &bearer).await?;
    if !access::require_admin(caller.as_ref()) {
        return Err(unauthorized());
    }
    let ApiJson(body) = body?;
    let repo = ctx.user_repo();
    let uc = UpdateUser {
        repo: repo.as_ref(),
        hasher: ctx.hasher(),
    };
    let user = uc.execute(&id, body.into()).await?;
    Ok(envelope::data(json!({ "user": UserResponse::from(user) })))
}

#[utoipa::path(delete, path = "/users/{id}", tag = "Users",
    params(("id" = String, Path, description = "User id")),
    responses((status = 200, body = UserResponse), (status = 400), (status = 401), (status = 404)))]
pub async fn delete_user(
    State(ctx): State<AppContext>,
    bearer: MaybeBearer,
    Path(id): Path<String>,
) -> Result<Response, ErrorResponse> {
    let caller = identify(&ctx, &bearer).await?;
    if !access::require_admin(caller.as_ref()) {
        return Err(unauthorized());
    }
    if caller.as_ref().is_some_and(|u| u.id == id) {
        return Err(ErrorResponse(ApiError::BadRequest(
            "You can't delete yourself!".into(),
        )));
    }
    let repo = ctx.user_repo();
    let uc = DeleteUser { repo: repo.as_ref() };
    let user = uc.execute(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(envelope::data(
        json!({ "user": UserResponse::from(user), "deleted": true }),
    ))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(me).put(update_me))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(ctx)
}

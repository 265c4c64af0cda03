use axum::Router;

use crate::bootstrap::app_context::AppContext;

pub mod auth;
pub mod envelope;
pub mod health;
pub mod users;

/// Every route the service exposes, without the outer middleware layers;
/// `main` adds CORS, tracing, and the Swagger UI on top.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .merge(auth::routes(ctx.clone()))
        .merge(users::routes(ctx.clone()))
        .merge(health::routes(ctx))
}

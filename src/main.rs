use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use accounts::application::ports::user_repository::{UserQuery, UserRepository};
use accounts::application::use_cases::users::create_user::{CreateUser, CreateUserRequest};
use accounts::bootstrap::app_context::{AppContext, AppServices};
use accounts::bootstrap::config::Config;
use accounts::infrastructure::crypto::Hasher;
use accounts::infrastructure::store::json_file::JsonFileUserRepository;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        accounts::presentation::http::auth::issue_token,
        accounts::presentation::http::users::list_users,
        accounts::presentation::http::users::create_user,
        accounts::presentation::http::users::me,
        accounts::presentation::http::users::update_me,
        accounts::presentation::http::users::get_user,
        accounts::presentation::http::users::update_user,
        accounts::presentation::http::users::delete_user,
        accounts::presentation::http::health::health,
    ),
    components(schemas(
        accounts::presentation::http::auth::TokenRequest,
        accounts::presentation::http::auth::TokenResponse,
        accounts::presentation::http::users::UserResponse,
        accounts::presentation::http::users::CreateUserBody,
        accounts::presentation::http::users::UpdateUserBody,
        accounts::presentation::http::health::HealthResp,
    )),
    tags(
        (name = "Auth", description = "Token issuance"),
        (name = "Users", description = "User management"),
        (name = "Health", description = "System health checks")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "accounts=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(port = cfg.api_port, users_file = %cfg.users_file, "Starting accounts backend");

    // A store file that exists but will not parse is fatal: refuse to serve
    // against an unloaded collection.
    let repo = Arc::new(JsonFileUserRepository::load(&cfg.users_file).await?);
    let hasher = Hasher::default();

    seed_admin(&cfg, repo.as_ref(), hasher).await?;

    let services = AppServices::new(repo, hasher);
    let ctx = AppContext::new(cfg.clone(), services);

    let cors = match cfg
        .frontend_url
        .as_deref()
        .and_then(|origin| HeaderValue::from_str(origin).ok())
    {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true),
        None => CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION]),
    };

    let app = accounts::presentation::http::router(ctx)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the configured bootstrap admin when the store holds no admin yet.
/// Every user-management route is admin-only, so a store without one is
/// unusable until seeded.
async fn seed_admin(cfg: &Config, repo: &dyn UserRepository, hasher: Hasher) -> anyhow::Result<()> {
    let (Some(username), Some(password)) = (
        cfg.bootstrap_admin_username.as_deref(),
        cfg.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    let admin_query = UserQuery {
        is_admin: Some(true),
        ..Default::default()
    };
    if repo.find(&admin_query).await?.is_some() {
        return Ok(());
    }

    let email = cfg
        .bootstrap_admin_email
        .clone()
        .unwrap_or_else(|| format!("{username}@localhost"));
    let uc = CreateUser { repo, hasher };
    let user = uc
        .execute(&CreateUserRequest {
            username: username.to_string(),
            email,
            password: password.to_string(),
            is_admin: true,
        })
        .await?;
    info!(username = %user.username, "Bootstrap admin created");
    Ok(())
}

//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::net::SocketAddr;
use std::sync::Arc;

use auth::{AuthConfig, AuthMiddlewareState, PgAuthRepository, auth_router_generic};
use axum::{
    Router, http,
    http::{Method, header},
};
use club::{ClubConfig, IntegrityCoordinator, PgClubRepository, club_router};
use platform::media::{CloudinaryConfig, CloudinaryMediaStore, InMemoryMediaStore, MediaStore};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                //.unwrap_or_else(|_| "api=debug,club=debug,tower_http=debug".into()),
                .unwrap_or_else(|_| "api=info,auth=info,club=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = platform::config::required("DATABASE_URL")?;
    let max_connections = platform::config::parse_or("DATABASE_MAX_CONNECTIONS", 5u32)?;

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_config = Arc::new(AuthConfig::from_env()?);
    let club_config = Arc::new(ClubConfig::from_env()?);

    // Media store: Cloudinary when configured, process memory only in debug builds
    let app = match cloudinary_from_env() {
        Some(cloudinary) => {
            tracing::info!(cloud_name = %cloudinary.cloud_name, "Using Cloudinary media store");
            build_app(
                pool,
                Arc::new(CloudinaryMediaStore::new(cloudinary)),
                auth_config,
                club_config,
            )
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("Cloudinary not configured, uploads are kept in memory");
            build_app(
                pool,
                Arc::new(InMemoryMediaStore::new()),
                auth_config,
                club_config,
            )
        }
        None => anyhow::bail!(
            "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set in production"
        ),
    };

    // Start server
    let addr: SocketAddr = platform::config::parse_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 31113)))?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn cloudinary_from_env() -> Option<CloudinaryConfig> {
    let config = CloudinaryConfig::new(
        platform::config::optional("CLOUDINARY_CLOUD_NAME")?,
        platform::config::optional("CLOUDINARY_API_KEY")?,
        platform::config::optional("CLOUDINARY_API_SECRET")?,
    );

    Some(match platform::config::optional("CLOUDINARY_FOLDER") {
        Some(folder) => config.with_folder(folder),
        None => config,
    })
}

fn build_app<M>(
    pool: PgPool,
    media: Arc<M>,
    auth_config: Arc<AuthConfig>,
    club_config: Arc<ClubConfig>,
) -> Router
where
    M: MediaStore + Send + Sync + 'static,
{
    let users = Arc::new(PgAuthRepository::new(pool.clone()));
    let club_store = Arc::new(PgClubRepository::new(pool));

    // ユーザー削除時にいいねを先に消す
    let cascade = IntegrityCoordinator::new(club_store.clone(), media.clone());
    let auth_state = AuthMiddlewareState::new(users.clone(), auth_config.clone());

    let api = Router::new()
        .nest("/users", auth_router_generic(users, cascade, auth_config))
        .merge(club_router(club_store, media, club_config, auth_state));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    let frontend_origins = platform::config::optional("FRONTEND_ORIGINS")
        .unwrap_or_else(|| "http://localhost:5173,http://127.0.0.1:5173".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true)
}

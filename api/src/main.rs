//! PlaceMate API Server
//!
//! Persistence and HTTP surface for a campus placement portal: recruiting
//! companies, candidates, and the relationships between them.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::Database;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    ensure_schema, PostgresCompanyRepository, PostgresReferenceRepository, PostgresUserRepository,
};
use app::{CompanyService, UserService};
use config::Config;
use domain::ports::{CompanyRepository, ReferenceRepository, UserRepository};

pub type SharedCompanyService = CompanyService<dyn CompanyRepository, dyn ReferenceRepository>;
pub type SharedUserService =
    UserService<dyn UserRepository, dyn CompanyRepository, dyn ReferenceRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub company_service: Arc<SharedCompanyService>,
    pub user_service: Arc<SharedUserService>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        companies: Arc<dyn CompanyRepository>,
        users: Arc<dyn UserRepository>,
        references: Arc<dyn ReferenceRepository>,
        config: Config,
    ) -> Self {
        let company_service = Arc::new(CompanyService::new(
            companies.clone(),
            references.clone(),
        ));
        let user_service = Arc::new(UserService::new(users, companies, references));

        Self {
            company_service,
            user_service,
            config,
        }
    }
}

/// Build the application router
///
/// Reads are public. Writes go through the admin key middleware.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/companies", get(handlers::list_companies))
        .route("/companies/:id", get(handlers::get_company))
        .route("/users", get(handlers::list_users))
        .route("/users/:id", get(handlers::get_user))
        .route("/users/:id/upcoming", get(handlers::get_upcoming))
        .route("/users/:id/applications", get(handlers::get_applications));

    let admin_routes = Router::new()
        .route("/companies", post(handlers::create_company))
        .route(
            "/companies/:id",
            put(handlers::update_company).delete(handlers::delete_company),
        )
        .route("/users", post(handlers::register_user))
        .route(
            "/users/:id",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/users/:id/skills", put(handlers::update_skills))
        .route(
            "/users/:id/upcoming/refresh",
            post(handlers::refresh_upcoming),
        )
        .route("/users/:id/applications", post(handlers::apply))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_middleware,
        ));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,placemate_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting PlaceMate API...");

    // Load configuration
    let config = Config::from_env()?;
    if !config.admin_enabled() {
        tracing::warn!("ADMIN_API_KEY is not set; all write routes will return 401");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    if config.auto_migrate {
        ensure_schema(&db)
            .await
            .context("Failed to create database schema")?;
    }

    // Create adapters
    let company_repo = Arc::new(PostgresCompanyRepository::new(db.clone()));
    let user_repo = Arc::new(PostgresUserRepository::new(db.clone()));
    let reference_repo = Arc::new(PostgresReferenceRepository::new(db));

    let state = AppState::new(company_repo, user_repo, reference_repo, config.clone());

    // Rate limiting config: 10 req/sec sustained, burst of 20
    // PeerIpKeyExtractor reads the socket address, hence connect info below
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(10)
            .burst_size(20)
            .finish()
            .context("Failed to build governor config")?,
    );

    let app = create_router(state).layer(GovernorLayer {
        config: governor_config,
    });

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}

//! WiFi billing service: splits a shared monthly WiFi bill among active
//! members and tracks payments against it.

pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use config::Config;
use error::AppError;
use services::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Config,
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    ///
    /// Connects to the database, runs migrations, and binds the listener
    /// (port 0 = random port for testing).
    pub async fn build(config: Config) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await?;

        db.run_migrations().await?;

        let state = AppState {
            db,
            config: config.clone(),
        };

        let router = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/ready", get(handlers::readiness_check))
            .route("/dashboard", get(handlers::dashboard::get_dashboard))
            // Member roster
            .route(
                "/members",
                get(handlers::members::list_members).post(handlers::members::create_member),
            )
            .route(
                "/members/:id",
                get(handlers::members::get_member)
                    .put(handlers::members::update_member)
                    .delete(handlers::members::delete_member),
            )
            // Bill ledger
            .route(
                "/bills",
                get(handlers::bills::list_bills).post(handlers::bills::create_bill),
            )
            .route(
                "/bills/:id",
                get(handlers::bills::get_bill)
                    .put(handlers::bills::update_bill)
                    .delete(handlers::bills::delete_bill),
            )
            .route("/bills/:id/close", post(handlers::bills::close_bill))
            // Payment ledger
            .route(
                "/payments",
                get(handlers::payments::list_payments).post(handlers::payments::create_payment),
            )
            .route(
                "/payments/:id",
                get(handlers::payments::get_payment)
                    .put(handlers::payments::update_payment)
                    .delete(handlers::payments::delete_payment),
            )
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|value| value.to_str().ok())
                        .unwrap_or("-");

                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                        version = ?request.version(),
                    )
                }),
            )
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("WiFi billing service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router).await
    }
}

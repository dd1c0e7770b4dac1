//! Axum server setup
//!
//! Server skeleton with:
//! - Explicitly constructed dependencies in `AppState`
//! - Allow-listed CORS origins by default
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::routes;
use crate::config::HttpConfig;
use crate::db::{
    CategoryRepo, CategoryStore, IndexRepo, IndexStore, MemoryStore, PostRepo, PostStore,
};
use crate::newsletter::MailingList;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub categories: Arc<dyn CategoryStore>,
    pub posts: Arc<dyn PostStore>,
    pub index: Arc<dyn IndexStore>,
    pub newsletter: Arc<dyn MailingList>,
}

impl AppState {
    /// State backed by PostgreSQL repositories sharing one pool.
    pub fn from_pool(pool: PgPool, newsletter: Arc<dyn MailingList>) -> Self {
        Self {
            categories: Arc::new(CategoryRepo::new(pool.clone())),
            posts: Arc::new(PostRepo::new(pool.clone())),
            index: Arc::new(IndexRepo::new(pool)),
            newsletter,
        }
    }

    /// State backed by one in-memory store.
    pub fn in_memory(store: MemoryStore, newsletter: Arc<dyn MailingList>) -> Self {
        Self {
            categories: Arc::new(store.clone()),
            posts: Arc::new(store.clone()),
            index: Arc::new(store),
            newsletter,
        }
    }
}

/// CORS policy for the configured origins.
pub fn cors_layer(config: &HttpConfig) -> CorsLayer {
    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(config.cors_origins.clone())
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Build the application router with all routes.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::posts::router())
        .merge(routes::categories::router())
        .merge(routes::index::router())
        .merge(routes::newsletter::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Run the HTTP server.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&config.database.url).await?;
/// let state = AppState::from_pool(pool, Arc::new(mailchimp));
/// run_server(state, config.http).await?;
/// ```
pub async fn run_server(state: AppState, config: HttpConfig) -> Result<(), ServerError> {
    let app = build_router(state, cors_layer(&config));

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::newsletter::MockMailingList;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn app(config: &HttpConfig) -> Router {
        let state = AppState::in_memory(MemoryStore::new(), Arc::new(MockMailingList::new()));
        build_router(state, cors_layer(config))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/posts")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn allowed_origin_gets_cors_headers() {
        let response = app(&HttpConfig::default())
            .oneshot(preflight("http://localhost:4200"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:4200"
        );
    }

    #[tokio::test]
    async fn foreign_origin_gets_no_cors_headers() {
        let response = app(&HttpConfig::default())
            .oneshot(preflight("https://evil.example"))
            .await
            .unwrap();

        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn permissive_allows_any_origin() {
        let config = HttpConfig {
            cors_permissive: true,
            ..HttpConfig::default()
        };
        let response = app(&config)
            .oneshot(preflight("https://anywhere.example"))
            .await
            .unwrap();

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}

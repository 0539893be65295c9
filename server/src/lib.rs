//! REST service backing the todo list.
//!
//! Four routes over one document collection: list, create, update, delete.
//! Each request touches a single document and is immediately visible to the
//! next one; there is no batching and no cross-document transaction.

pub mod config;
pub mod error;
pub mod routes;
pub mod store;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{AllowedOrigins, Config, ConfigError};
pub use error::AppError;
pub use store::{StoreError, Todo, TodoPatch, TodoStore};

/// Router over a fresh in-memory collection, without CORS or tracing layers.
pub fn app() -> Router {
    router(TodoStore::new())
}

/// The bare API routes over `store`.
pub fn router(store: TodoStore) -> Router {
    Router::new()
        .route("/api/todos", get(routes::list_todos).post(routes::create_todo))
        .route(
            "/api/todos/{id}",
            put(routes::update_todo).delete(routes::delete_todo),
        )
        .fallback(routes::not_found)
        .with_state(store)
}

/// The full service: routes plus request tracing and the CORS policy.
pub fn service(store: TodoStore, config: &Config) -> Router {
    router(store)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins))
}

pub fn cors_layer(origins: &AllowedOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    match origins {
        AllowedOrigins::Any => layer.allow_origin(cors::Any),
        AllowedOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();
            layer.allow_origin(values).allow_credentials(true)
        }
    }
}

/// Serve `app` on `listener` until Ctrl-C.
pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

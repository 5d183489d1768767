//! Feed Server
//!
//! A small CRUD backend over a document store: feeds wrap a reference to a
//! message, and read paths inline the referenced message into the response.

mod handlers;
mod services;
mod storage;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use services::{FeedService, MessageService};
use storage::{DocumentStore, MemoryStore, Repository, SqliteStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub feed_service: FeedService,
    pub message_service: MessageService,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("[FATAL] Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!("Starting feed server v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run_server().await {
        error!("Server failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run_server() -> Result<()> {
    let config = load_config().await.context("Failed to load configuration")?;

    let store = open_store(&config).await?;

    let feeds = Repository::new(store.clone());
    let messages = Repository::new(store);

    let state = AppState {
        feed_service: FeedService::new(feeds, messages.clone()),
        message_service: MessageService::new(messages),
    };

    info!("Building HTTP router...");
    let app = app_router(state);

    let addr: SocketAddr = config
        .bind_address
        .parse()
        .context("Failed to parse bind address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("Server ready to accept connections");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Explicit route table, built once at startup.
fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/feed",
            get(handlers::feeds::list).post(handlers::feeds::create),
        )
        .route(
            "/feed/:id",
            get(handlers::feeds::get).put(handlers::feeds::update),
        )
        .route(
            "/message",
            get(handlers::messages::list).post(handlers::messages::create),
        )
        .route(
            "/message/:id",
            get(handlers::messages::get).put(handlers::messages::update),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn open_store(config: &Config) -> Result<Arc<dyn DocumentStore>> {
    match config.store_backend {
        StoreBackend::Sqlite => {
            info!("Initializing SQLite document store...");
            let store = SqliteStore::new(&config.database_path)
                .await
                .context("Failed to initialize document store")?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Initializing in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Debug, Clone)]
struct Config {
    bind_address: String,
    database_path: String,
    store_backend: StoreBackend,
}

async fn load_config() -> Result<Config> {
    let data_dir = std::env::var("DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    tokio::fs::create_dir_all(&data_dir)
        .await
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

    let database_path = std::env::var("DATABASE_PATH").unwrap_or_else(|_| {
        let path = data_dir.join("feeds.db");
        path.to_string_lossy().to_string()
    });

    let bind_address =
        std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let store_backend = match std::env::var("STORE_BACKEND").ok().as_deref() {
        Some("memory") => StoreBackend::Memory,
        Some("sqlite") | None => StoreBackend::Sqlite,
        Some(other) => {
            warn!("Unknown STORE_BACKEND '{}', falling back to sqlite", other);
            StoreBackend::Sqlite
        }
    };

    info!(
        "Config loaded: bind={}, db={}, backend={:?}",
        bind_address, database_path, store_backend
    );

    Ok(Config {
        bind_address,
        database_path,
        store_backend,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let feeds = Repository::new(store.clone());
        let messages = Repository::new(store);
        let state = AppState {
            feed_service: FeedService::new(feeds, messages.clone()),
            message_service: MessageService::new(messages),
        };
        app_router(state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn put(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn posting_a_feed_creates_the_message_and_the_denormalized_read() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post("/feed", json!({"message": {"text": "hi"}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let created = body_json(response).await;
        let feed_id = created["id"].as_str().unwrap().to_string();
        let message_id = created["message"]["id"].as_str().unwrap().to_string();
        assert_eq!(created["message"]["text"], "hi");

        // The message is independently readable.
        let response = app
            .clone()
            .oneshot(get_req(&format!("/message/{}", message_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Direct fetch returns the denormalized shape.
        let response = app
            .clone()
            .oneshot(get_req(&format!("/feed/{}", feed_id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched = body_json(response).await;
        assert_eq!(fetched["id"], feed_id.as_str());
        assert_eq!(fetched["message"]["id"], message_id.as_str());
        assert_eq!(fetched["message"]["text"], "hi");
    }

    #[tokio::test]
    async fn missing_resources_read_as_404() {
        let app = test_app();

        for uri in ["/feed/nope", "/message/nope"] {
            let response = app.clone().oneshot(get_req(uri)).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {}", uri);
        }

        let response = app
            .clone()
            .oneshot(put("/message/nope", json!({"text": "b"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn putting_a_message_replaces_its_text_but_not_its_id() {
        let app = test_app();

        let response = app
            .clone()
            .oneshot(post("/message", json!({"text": "a"})))
            .await
            .unwrap();
        let created = body_json(response).await;
        let id = created["id"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(put(&format!("/message/{}", id), json!({"text": "b"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated = body_json(response).await;
        assert_eq!(updated["id"], id.as_str());
        assert_eq!(updated["text"], "b");
    }

    #[tokio::test]
    async fn feed_list_inlines_messages() {
        let app = test_app();

        app.clone()
            .oneshot(post("/feed", json!({"message": {"text": "one"}})))
            .await
            .unwrap();
        app.clone()
            .oneshot(post("/feed", json!({"message": {"text": "two"}})))
            .await
            .unwrap();

        let response = app.clone().oneshot(get_req("/feed")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let feeds = body_json(response).await;
        let feeds = feeds.as_array().unwrap();
        assert_eq!(feeds.len(), 2);
        for feed in feeds {
            assert!(feed["message"]["id"].is_string());
            assert!(feed["message"]["text"].is_string());
        }
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let app = test_app();
        let response = app.oneshot(get_req("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

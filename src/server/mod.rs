use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::config::{self, CognetConfig};
use crate::importer::DataImporter;
use crate::storage::{ImportMetadata, SqliteStore};

pub mod error;
pub mod routes;

pub use error::{ApiError, ApiResult};

/// Server state.
///
/// The SQLite connection is shared behind an async mutex and only touched
/// from the blocking pool (see [`with_store`]). The importer and the
/// last-import summary live outside it so status checks never wait on the
/// store.
pub struct AppState {
    pub store: Mutex<SqliteStore>,
    pub importer: DataImporter,
    last_import: RwLock<Option<ImportMetadata>>,
}

impl AppState {
    pub fn new(store: SqliteStore) -> crate::Result<Self> {
        let last_import = store.import_metadata()?;
        Ok(Self {
            store: Mutex::new(store),
            importer: DataImporter::new(),
            last_import: RwLock::new(last_import),
        })
    }

    /// Summary of the latest completed import, if any
    pub fn last_import(&self) -> Option<ImportMetadata> {
        self.last_import
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_last_import(&self, metadata: Option<ImportMetadata>) {
        *self.last_import.write().unwrap_or_else(PoisonError::into_inner) = metadata;
    }
}

/// Run store work on the blocking pool while holding the store lock.
///
/// SQLite calls are synchronous; running them here keeps large imports
/// from stalling the runtime's worker threads.
pub async fn with_store<T, F>(state: &Arc<AppState>, work: F) -> ApiResult<T>
where
    F: FnOnce(&AppState, &mut SqliteStore) -> crate::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || {
        let mut store = state.store.blocking_lock();
        work(&*state, &mut *store)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("store task failed: {}", e)))?
    .map_err(ApiError::from)
}

/// Build the API router
pub fn router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let import = Router::new()
        .route("/tsv", post(routes::import_tsv))
        .route("/languages", post(routes::import_languages))
        .route("/status", get(routes::import_status))
        .route("/clear", delete(routes::clear_database));

    let search = Router::new()
        .route("/suggestions", get(routes::suggestions))
        .route("/concept/{id}", get(routes::cognates_by_concept))
        .route("/chains/concept/{id}", get(routes::cognate_chains));

    let api = Router::new()
        .nest("/import", import)
        .nest("/search", search);

    Router::new()
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy: any origin when the list is empty or contains `*`
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| anyhow::anyhow!("invalid CORS origin: {}", o)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT]))
}

pub async fn start_server(config: &CognetConfig) -> anyhow::Result<()> {
    let database_path = config.database_path();
    config::ensure_db_dir(&database_path)?;
    let store = SqliteStore::open(&database_path)?;

    let state = Arc::new(AppState::new(store)?);
    let app = router(state, cors_layer(&config.cors_origins)?);

    let addr = config.bind_addr()?;
    tracing::info!("Starting server on {} (database {:?})", addr, database_path);
    println!("🌍 Server running at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutting down server...");
}

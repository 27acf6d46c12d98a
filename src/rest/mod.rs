use std::net::SocketAddr;
use std::path::PathBuf;

use axum::extract::DefaultBodyLimit;
use axum::http::Method;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::store::ActivityStore;

mod handlers;
mod models;

use handlers::{
    create_activity, delete_activity, get_activity, health, list_activities, not_found, root,
    serve_upload, update_activity, upload_image,
};

/// Maximum request body size: 10 MB, enough for image uploads.
const MAX_BODY_SIZE: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState<S: ActivityStore> {
    pub store: S,
    pub upload_dir: PathBuf,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: ActivityStore + Clone + Send + Sync + 'static>(state: AppState<S>) -> Router {
    // CORS is permissive: the API is meant to sit behind a local frontend.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health::<S>))
        .route(
            "/api/activities",
            get(list_activities::<S>).post(create_activity::<S>),
        )
        .route(
            "/api/activities/:id",
            get(get_activity::<S>)
                .put(update_activity::<S>)
                .delete(delete_activity::<S>),
        )
        .route("/api/activities/:id/upload-image", post(upload_image::<S>))
        .route("/uploads/:filename", get(serve_upload::<S>))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .with_state(state)
}

pub async fn serve<S: ActivityStore + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    store: S,
    upload_dir: PathBuf,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let state = AppState {
        store,
        upload_dir,
        started_at: std::time::SystemTime::now(),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}

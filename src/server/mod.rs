use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::registry::ActivationRegistry;
use crate::source::TableSource;

pub mod api;
pub mod error;
pub mod pages;


pub const SPREADSHEET_ID_PARAM: &str = "spreadsheetId";

pub struct AppState<S> {
    pub source: Arc<S>,
    pub registry: Arc<ActivationRegistry>,
    pub shuffle_passes: usize,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        AppState {
            source: self.source.clone(),
            registry: self.registry.clone(),
            shuffle_passes: self.shuffle_passes,
        }
    }
}

pub fn router<S: TableSource>(state: AppState<S>) -> Router {
    Router::new()
        .route("/", get(pages::root))
        .route("/admin", get(pages::admin))
        .route("/quiz/{quiz_name}", get(pages::quiz::<S>))
        .route("/style.css", get(pages::style))
        .route("/admin.js", get(pages::admin_script))
        .route("/quiz.js", get(pages::quiz_script))
        .route("/api/questions/{sheet_name}", get(api::questions::<S>))
        .route("/api/sheets", get(api::sheets::<S>))
        .route("/api/quizzes/activate", post(api::activate::<S>))
        .route("/api/quizzes/deactivate", post(api::deactivate::<S>))
        .with_state(state)
}

pub async fn serve<S: TableSource>(listener: TcpListener, state: AppState<S>) -> std::io::Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutting down"),
        Err(e) => tracing::error!(error = %e, "could not listen for ctrl-c"),
    }
}

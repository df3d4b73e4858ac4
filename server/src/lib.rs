//! REST front for the clinic appointment store.

use std::sync::Arc;

use appointment_db::AppointmentStore;
use axum::{
    routing::{get, patch},
    Router,
};
use chrono::NaiveDate;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ErrorBody};

/// Shared handler state. The write lock serializes mutations in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<AppointmentStore>>,
    pub reference_date: NaiveDate,
}

impl AppState {
    pub fn new(store: AppointmentStore, reference_date: NaiveDate) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            reference_date,
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::create_appointment),
        )
        .route("/appointments/counts", get(handlers::appointment_counts))
        .route(
            "/appointments/:id",
            get(handlers::get_appointment)
                .patch(handlers::update_details)
                .delete(handlers::delete_appointment),
        )
        .route("/appointments/:id/status", patch(handlers::update_status))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the router on an already bound listener until the process stops
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

use appointment_db::AppointmentStore;
use appointment_server::{AppState, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    let store = if config.seed_data {
        AppointmentStore::seeded()
    } else {
        AppointmentStore::new()
    };
    tracing::info!(
        appointments = store.len(),
        reference_date = %config.reference_date,
        "appointment store ready"
    );

    let state = AppState::new(store, config.reference_date);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("Appointments API running on http://{}", listener.local_addr()?);

    appointment_server::serve(listener, state).await?;

    Ok(())
}

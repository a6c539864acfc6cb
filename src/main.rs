use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use ehr_core::{store_backend_from_env_value, CoreConfig, PatientService};

/// Main entry point for the EHR records server
///
/// Resolves configuration once, opens the record store and serves the REST API.
///
/// # Environment Variables
/// - `EHR_REST_ADDR`: REST server address (default: "0.0.0.0:5000")
/// - `EHR_STORE`: record store backend, `file` or `memory` (default: "file")
/// - `PATIENT_DATA_DIR`: Directory for patient data storage (default: "patient_data")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is invalid or the record store cannot be opened,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("ehr_run=info".parse()?)
                .add_directive("ehr_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("EHR_REST_ADDR")
        .unwrap_or_else(|_| ehr_core::DEFAULT_REST_ADDR.into())
        .parse()?;

    let patient_data_dir = std::env::var("PATIENT_DATA_DIR")
        .unwrap_or_else(|_| ehr_core::DEFAULT_PATIENT_DATA_DIR.into());
    let store_backend = store_backend_from_env_value(std::env::var("EHR_STORE").ok())?;

    let cfg = CoreConfig::new(PathBuf::from(patient_data_dir), store_backend);
    let store = cfg.open_store()?;

    tracing::info!(
        "++ Opened {:?} record store at {}",
        cfg.store_backend(),
        cfg.patient_data_dir().display()
    );
    tracing::info!("++ Starting EHR REST on {}", rest_addr);

    let app = router(AppState::new(PatientService::new(store)));

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

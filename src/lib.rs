pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod dossier;
pub mod models;
pub mod session;
pub mod status_store;

use tracing_subscriber::EnvFilter;

/// Initialize the process-wide tracing subscriber.
///
/// Honors `RUST_LOG` when set, otherwise falls back to the application
/// default filter. Call once from the hosting shell before opening any
/// review session.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}

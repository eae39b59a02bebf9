use std::time::Duration;

use crate::{
    backend::AppointmentBackend, configuration::Configuration,
    configuration_handler::ConfigurationHandler, database_interface::DatabaseInterface,
    http::create_app, local_appointments::LocalAppointments,
};
use anyhow::Context;
use tokio::time::sleep;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod backend;
mod configuration;
mod configuration_handler;
mod database_interface;
mod error;
mod http;
mod local_appointments;
mod schema;
#[cfg(test)]
mod testutils;
mod types;
mod validation;

#[derive(Clone)]
pub struct AppState<T: AppointmentBackend> {
    backend: T,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("appointment_booking=info,tower_http=info")),
        )
        .init();

    let configuration = ConfigurationHandler::parse_arguments();

    let address = format!("0.0.0.0:{}", configuration.port());
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("bind {address}"))?;
    info!("Accessible at {address}");

    let app = if let Some(database_url) = configuration.database_url() {
        let backend = loop {
            match DatabaseInterface::new(&database_url) {
                Ok(backend) => {
                    info!("Successfully connected to database");
                    break backend;
                }
                Err(err) => {
                    error!(%err, "Failed to establish database connection. Retry in 1 sec. Start without a database URL to keep appointments in memory.");
                    sleep(Duration::from_secs(1)).await;
                }
            }
        };
        create_app(backend, configuration)
    } else {
        warn!("No database configured, appointments are kept in memory only");
        create_app(LocalAppointments::default(), configuration)
    };

    axum::serve(listener, app).await.context("serve")?;
    Ok(())
}

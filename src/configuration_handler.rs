use crate::configuration::Configuration;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "appointment_booking", about = "Appointment booking HTTP API")]
pub struct ConfigurationHandler {
    /// Port the server listens on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// Postgres connection URL, appointments are not persisted if omitted
    #[arg(short, long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Directory with static assets served for all non-API paths
    #[arg(long, env = "PUBLIC_DIR")]
    public_dir: Option<PathBuf>,
}

impl ConfigurationHandler {
    pub fn parse_arguments() -> Self {
        Self::parse()
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self {
            port: 0,
            database_url: None,
            public_dir: None,
        }
    }

    #[cfg(test)]
    pub fn with_public_dir(public_dir: PathBuf) -> Self {
        Self {
            public_dir: Some(public_dir),
            ..Self::in_memory()
        }
    }
}

impl Configuration for ConfigurationHandler {
    fn port(&self) -> u16 {
        self.port
    }

    fn database_url(&self) -> Option<String> {
        self.database_url.clone()
    }

    fn public_dir(&self) -> Option<PathBuf> {
        self.public_dir.clone()
    }
}

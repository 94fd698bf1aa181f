//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `RIDELEDGER__*` environment variables.
//!
//! ```toml
//! [app]
//! level = "debug"
//! driver = "Ana"
//!
//! [database]
//! sqlite = "./rideledger.db"
//!
//! [goals]
//! daily = "250"
//! ```
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
    /// Name used in shared reports.
    pub driver: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
            driver: None,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("./rideledger.db".to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct Goals {
    /// Daily net profit target, as a decimal amount.
    pub daily: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    #[serde(default)]
    pub database: Database,
    #[serde(default)]
    pub goals: Goals,
}

impl Settings {
    /// Loads `path` (required) or `settings.toml` in the working directory
    /// (optional), then applies environment overrides.
    pub fn new(path: Option<&str>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::with_name(path).required(true),
            None => File::with_name("settings").required(false),
        };
        let settings = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix("RIDELEDGER").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// sea-orm connection string for the configured database.
    pub fn database_url(&self) -> String {
        match &self.database {
            Database::Memory => String::from("sqlite::memory:"),
            Database::Sqlite(path) => format!("sqlite:{path}?mode=rwc"),
        }
    }
}

use crate::error::ConfigError;
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalyticsSettings, AuthSettings, CacheSettings, DatabaseSettings, ServerOverrides,
    ServerSettings, Settings,
};

/// Environment variable prefix, e.g. `MAXVARIANCE__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "MAXVARIANCE";

/// Loads the application configuration from `config.toml` in the working directory.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(Path::new("config.toml"))
}

/// Loads the application configuration from the given file, then layers
/// `MAXVARIANCE__*` environment variables over it.
///
/// The file is optional: every section has defaults.
pub fn load_config_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("analytics.default_duration_boundaries")
                .try_parsing(true),
        );

    let settings = build(builder)?;
    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}

use thiserror::Error;

/// Errors raised while reading or writing a persisted store.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope was written by a format older than we can migrate.
    #[error("{store} save version {found} is older than the minimum compatible version {min}")]
    IncompatibleVersion {
        store: &'static str,
        found: u32,
        min: u32,
    },

    /// The envelope belongs to a different store (e.g. quests loaded as character).
    #[error("expected {expected} save data, found {found}")]
    WrongStore { expected: &'static str, found: String },
}

/// Errors raised while loading a [`crate::config::GameConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

use thiserror::Error;

/// Startup configuration errors. A missing credential is the only
/// condition that aborts a run; everything downstream degrades per item.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingToken(&'static str),
}

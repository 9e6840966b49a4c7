pub mod config;
pub mod errors;
pub mod logging;

pub use config::CiConfig;
pub use errors::ConfigError;

/// HTTP transport for the Personio API.
pub mod client;
/// Client configuration loading.
pub mod config;
/// Error types shared by every module.
pub mod error;
/// One-time log helpers.
pub mod logging;
/// Field mappings, resource records and concrete Personio resources.
pub mod models;

pub use error::{PersonioError, Result};

/// Logging verbosity for SDK operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Emit verbose debug output, including request bodies.
    Debug,
    /// Emit standard informational output.
    Information,
}

impl Default for LogLevel {
    /// Defaults to `Information` logging.
    fn default() -> Self {
        LogLevel::Information
    }
}

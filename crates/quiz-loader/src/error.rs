//! Error types for the page runtime
//!
//! None of these reach page code through the coordinator's own operations;
//! they surface from setup paths (config parsing, binding installation) and
//! are logged there.

use quiz_hal::HostError;

/// Errors raised while setting up the page runtime
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// No global `window` (not running in a browser main thread)
    #[error("no window available")]
    NoWindow,

    /// The window has no document
    #[error("no document available")]
    NoDocument,

    /// Runtime config could not be parsed
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// A host/DOM operation failed
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

use std::path::PathBuf;

use thiserror::Error;

/// Startup failures of the development host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("PORT must be a number between 1 and 65535, got '{value}'")]
    InvalidPort { value: String },

    #[error("Static directory '{}' does not exist (build the frontend with `trunk build`)", path.display())]
    MissingStaticDir { path: PathBuf },

    #[error("ASSISTANT_API_BASE must be an http(s) URL or empty, got '{value}'")]
    InvalidApiBase { value: String },
}

use thiserror::Error;

/// Failures surfaced by the client when talking to the assistant or the browser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    // ── Transport ────────────────────────────────────────────────────────────
    /// The server answered with a non-success status. `body` is the raw response text.
    #[error("Server error ({status}): {body}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Decode(String),

    // ── Browser storage ──────────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ClientError {
    pub fn transport(status: u16, body: impl Into<String>) -> Self {
        ClientError::Transport { status, body: body.into() }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write for '{key}' rejected: {reason}")]
    WriteRejected { key: String, reason: String },

    #[error("Failed to encode '{key}': {reason}")]
    Encode { key: String, reason: String },
}

/// Why a single UI command was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("command is not a JSON object")]
    NotAnObject,

    #[error("command must have exactly one key, found {0}")]
    NotSingleKey(usize),

    #[error("unknown command '{0}'")]
    Unknown(String),

    #[error("malformed '{tag}' command: {reason}")]
    Malformed { tag: String, reason: String },
}

impl CommandError {
    pub fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        CommandError::Malformed { tag: tag.to_string(), reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_carries_raw_body() {
        let err = ClientError::transport(502, "upstream exploded");
        assert!(err.is_transport());
        assert_eq!(err.to_string(), "Server error (502): upstream exploded");
    }

    #[test]
    fn storage_error_converts_into_client_error() {
        let err: ClientError = StorageError::Unavailable("no window".into()).into();
        assert!(!err.is_transport());
        assert_eq!(err.to_string(), "Storage unavailable: no window");
    }
}

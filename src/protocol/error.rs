//! Protocol error taxonomy

/// Result type for codec operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors raised while encoding or decoding wire events.
///
/// Decode failures are never fatal to a stream: callers log the line and
/// skip it.
#[derive(Debug)]
pub enum ProtocolError {
    /// The line is not valid JSON.
    Json(serde_json::Error),
    /// The line is valid JSON but not a well-formed event.
    MalformedEvent(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Json(e) => write!(f, "JSON error: {}", e),
            ProtocolError::MalformedEvent(msg) => write!(f, "malformed event: {}", msg),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ProtocolError::MalformedEvent("no recognized event key".to_string());
        assert_eq!(err.to_string(), "malformed event: no recognized event key");
    }
}

use thiserror::Error;

/// Boxed cause carried by [`NetworkError::TransportFailure`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classified failure of a single pipeline call.
///
/// The `Display` text is the user-facing description; the wrapped causes are
/// available through `source()` for logging.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// Base address, path or query could not form a valid URL, or a header
    /// was not valid HTTP.
    #[error("Unable to connect. Please check your internet connection and try again.")]
    MalformedRequest,

    #[error("Received an invalid response from the server. Please try again later.")]
    InvalidResponse,

    #[error("Unable to prepare the request. Please try again.")]
    SerializationFailed(#[source] serde_json::Error),

    #[error("Unable to process the data. Please try again.")]
    DecodingFailed(#[source] serde_json::Error),

    /// Non-2xx response carrying a human-readable message.
    #[error("{0}")]
    ApiMessage(String),

    /// Non-2xx response without an extractable message.
    #[error("{}", server_error_description(*status, body.as_deref()))]
    ServerError { status: u16, body: Option<String> },

    #[error("Authentication failed. Please check your API key.")]
    Unauthorized,

    #[error("No internet connection. Please check your network settings.")]
    NetworkUnavailable,

    #[error("Request timed out. Please check your connection and try again.")]
    Timeout,

    #[error("Network error: {0}")]
    TransportFailure(#[source] BoxError),
}

impl NetworkError {
    /// True for the 401/403 classification without a message.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, NetworkError::Unauthorized)
    }

    /// HTTP status for errors that were produced from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            NetworkError::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn server_error_description(status: u16, body: Option<&str>) -> String {
    if let Some(body) = body {
        return body.to_string();
    }

    match status {
        404 => "The requested content was not found.".to_string(),
        500..=599 => "Server is temporarily unavailable. Please try again later.".to_string(),
        _ => "Server error occurred. Please try again later.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_error_prefers_raw_body() {
        let err = NetworkError::ServerError { status: 500, body: Some("boom".into()) };
        assert_eq!(err.to_string(), "boom");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn server_error_without_body_describes_status() {
        let not_found = NetworkError::ServerError { status: 404, body: None };
        assert_eq!(not_found.to_string(), "The requested content was not found.");

        let unavailable = NetworkError::ServerError { status: 503, body: None };
        assert!(unavailable.to_string().contains("temporarily unavailable"));

        let other = NetworkError::ServerError { status: 418, body: None };
        assert_eq!(other.to_string(), "Server error occurred. Please try again later.");
    }

    #[test]
    fn api_message_is_shown_verbatim() {
        let err = NetworkError::ApiMessage("Invalid login credentials".into());
        assert_eq!(err.to_string(), "Invalid login credentials");
    }

    #[test]
    fn decoding_failure_keeps_source() {
        let cause = serde_json::from_str::<u32>("\"nope\"").unwrap_err();
        let err = NetworkError::DecodingFailed(cause);
        assert!(std::error::Error::source(&err).is_some());
    }
}

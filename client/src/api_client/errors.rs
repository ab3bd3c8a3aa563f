use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DocsClientError {
    #[error("Document not found")]
    NotFound,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unexpected Server response: {0}")]
    Other(StatusCode, String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl DocsClientError {
    fn new(status: StatusCode, message: &str) -> Self {
        match status {
            StatusCode::NOT_FOUND => DocsClientError::NotFound,
            s if s.is_client_error() || s.is_server_error() => {
                DocsClientError::Other(status, message.to_owned())
            }
            _ => DocsClientError::Unexpected(format!("{message} (status: {status})")),
        }
    }

    /// Server errors, throttling and connection failures may succeed on a
    /// later attempt. Everything else is final.
    pub fn is_transient(&self) -> bool {
        match self {
            DocsClientError::Network(_) => true,
            DocsClientError::Other(status, _) => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }

    pub async fn from_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        let message = resp.text().await.unwrap_or_default();

        DocsClientError::new(status, &message)
    }
}

impl From<reqwest::Error> for DocsClientError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DocsClientError::new(status, &err.to_string()),
            None if err.is_timeout() || err.is_connect() || err.is_request() => {
                DocsClientError::Network(err.to_string())
            }
            None => DocsClientError::Unexpected(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_status_maps_to_not_found() {
        assert!(matches!(
            DocsClientError::new(StatusCode::NOT_FOUND, ""),
            DocsClientError::NotFound
        ));
    }

    #[test]
    fn error_statuses_keep_the_server_message() {
        let err = DocsClientError::new(StatusCode::SERVICE_UNAVAILABLE, "maintenance");

        assert!(matches!(
            err,
            DocsClientError::Other(StatusCode::SERVICE_UNAVAILABLE, ref m) if m == "maintenance"
        ));
    }

    #[test]
    fn only_server_side_and_network_failures_are_transient() {
        assert!(DocsClientError::new(StatusCode::SERVICE_UNAVAILABLE, "").is_transient());
        assert!(DocsClientError::new(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(DocsClientError::Network("reset".to_owned()).is_transient());

        assert!(!DocsClientError::new(StatusCode::BAD_REQUEST, "").is_transient());
        assert!(!DocsClientError::NotFound.is_transient());
        assert!(!DocsClientError::InvalidUrl("x".to_owned()).is_transient());
        assert!(!DocsClientError::Unexpected("x".to_owned()).is_transient());
    }

    #[test]
    fn unexpected_statuses_are_reported_with_status() {
        let err = DocsClientError::new(StatusCode::MOVED_PERMANENTLY, "moved");

        assert_eq!(
            err.to_string(),
            "Unexpected error: moved (status: 301 Moved Permanently)"
        );
    }
}

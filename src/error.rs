// Client error types
use thiserror::Error;

/// Failure of a request against the CFS session service.
///
/// A missing auth token is not represented here; it is an ordinary `None`.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("endpoint url '{0}' must be an http(s) base url")]
    UnsupportedUrl(String),

    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    // Service answered, but not with 200
    #[error("{url} responded with {status} {status_text}")]
    HttpStatus {
        url: String,
        status: u16,
        status_text: String,
    },

    // Request never completed (refused, dns, timeout, dropped body)
    #[error("{url} is unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("response from {url} is not valid json: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("request to {url} was cancelled")]
    Cancelled { url: String },
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchErrorKind {
    Configuration,
    HttpStatus,
    NetworkUnreachable,
    Decode,
    Cancelled,
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            FetchError::InvalidUrl { .. }
            | FetchError::UnsupportedUrl(_)
            | FetchError::ClientBuild(_) => FetchErrorKind::Configuration,
            FetchError::HttpStatus { .. } => FetchErrorKind::HttpStatus,
            FetchError::Unreachable { .. } => FetchErrorKind::NetworkUnreachable,
            FetchError::Decode { .. } => FetchErrorKind::Decode,
            FetchError::Cancelled { .. } => FetchErrorKind::Cancelled,
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self.kind() {
            FetchErrorKind::Configuration => "CONFIGURATION",
            FetchErrorKind::HttpStatus if self.is_unauthorized() => "UNAUTHORIZED",
            FetchErrorKind::HttpStatus => "HTTP_STATUS",
            FetchErrorKind::NetworkUnreachable => "NETWORK_UNREACHABLE",
            FetchErrorKind::Decode => "DECODE_FAILURE",
            FetchErrorKind::Cancelled => "CANCELLED",
        }
    }

    /// HTTP status of the response, if one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for 401/403, where the caller should send the user to log in.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// Failure to read claims out of a bearer token.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is empty")]
    Empty,

    #[error("token is not a readable JWT: {0}")]
    Malformed(#[from] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error(status: u16) -> FetchError {
        FetchError::HttpStatus {
            url: "http://localhost:3000/cfssessions".to_string(),
            status,
            status_text: String::new(),
        }
    }

    #[test]
    fn test_unauthorized_statuses() {
        assert!(status_error(401).is_unauthorized());
        assert!(status_error(403).is_unauthorized());
        assert!(!status_error(500).is_unauthorized());
        assert!(!FetchError::Cancelled { url: "x".into() }.is_unauthorized());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(status_error(401).error_code(), "UNAUTHORIZED");
        assert_eq!(status_error(502).error_code(), "HTTP_STATUS");
        assert_eq!(FetchError::Cancelled { url: "x".into() }.error_code(), "CANCELLED");
    }

    #[test]
    fn test_display_carries_status_text() {
        let err = FetchError::HttpStatus {
            url: "http://localhost:3000/cfssessions".to_string(),
            status: 401,
            status_text: "Unauthorized".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "http://localhost:3000/cfssessions responded with 401 Unauthorized"
        );
        assert_eq!(err.kind(), FetchErrorKind::HttpStatus);
    }

    #[test]
    fn test_invalid_url_is_configuration() {
        let err = FetchError::InvalidUrl {
            url: "::".to_string(),
            source: url::Url::parse("::").unwrap_err(),
        };
        assert_eq!(err.kind(), FetchErrorKind::Configuration);
    }
}

//! Error types
//!
//! Every failure surfaces through [`Error`]. Nothing in this crate retries or
//! swallows an error; the first one aborts the current operation.

use crate::model::ErrorProto;
use serde::Deserialize;

/// Maximum length of response body kept in an error (to avoid leaking sensitive data)
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Type alias to [`std::result::Result<T, Error>`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required identifier was empty. Raised before any request is sent.
    #[error("{0} must not be empty")]
    MissingArgument(&'static str),
    #[error(transparent)]
    Auth(#[from] gcp_auth::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status.
    #[error("API request failed: {status} - {message}")]
    Api {
        status: u16,
        message: String,
        errors: Vec<ErrorProto>,
    },
    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("transport error: {0}")]
    Transport(String),
}

impl Error {
    /// HTTP status of an API failure, if this error came from one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build an [`Error::Api`] from a failed response body.
    ///
    /// Google APIs wrap failures in `{"error": {"code", "message", "errors"}}`.
    /// When the body doesn't match that shape the truncated raw text is kept.
    pub(crate) fn from_api_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct Envelope {
            error: ApiErrorBody,
        }

        #[derive(Deserialize)]
        struct ApiErrorBody {
            #[serde(default)]
            message: String,
            #[serde(default)]
            errors: Vec<ErrorProto>,
        }

        match serde_json::from_str::<Envelope>(body) {
            Ok(Envelope { error }) => Self::Api {
                status,
                message: error.message,
                errors: error.errors,
            },
            Err(_) => Self::Api {
                status,
                message: sanitize_for_log(body),
                errors: Vec::new(),
            },
        }
    }
}

/// Sanitize response body for logging.
/// Truncates long responses and drops control characters.
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| c.is_control(), "")
}

/// Format an API error for display.
/// Security: maps statuses to generic messages instead of echoing API internals.
pub fn format_api_error(error: &Error) -> String {
    match error.status() {
        Some(401) => {
            return "Authentication failed. Run 'gcloud auth application-default login'."
                .to_string()
        }
        Some(403) => return "Permission denied. Check your BigQuery IAM permissions.".to_string(),
        Some(404) => return "Resource not found.".to_string(),
        Some(409) => {
            return "Resource conflict. The resource may already exist or be in use.".to_string()
        }
        Some(429) => return "Rate limit exceeded. Please try again later.".to_string(),
        Some(400) => return "Invalid request. Check your parameters.".to_string(),
        Some(500..=599) => {
            return "BigQuery service temporarily unavailable. Please try again.".to_string()
        }
        _ => {}
    }

    match error {
        Error::MissingArgument(_) | Error::Url(_) => error.to_string(),
        Error::Auth(_) => {
            "Could not obtain credentials. Run 'gcloud auth application-default login'."
                .to_string()
        }
        Error::Http(_) => {
            "Request failed. Check your network connection and try again.".to_string()
        }
        other => {
            let text = other.to_string();
            let sanitized = text
                .chars()
                .filter(|c| c.is_ascii_graphic() || *c == ' ')
                .take(80)
                .collect::<String>();

            if sanitized.len() < text.len() {
                format!("{}...", sanitized)
            } else {
                sanitized
            }
        }
    }
}

use thiserror::Error;

/// Errors that abort an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    /// The Slack API answered with `ok: false`.
    #[error("slack api {method} returned error: {message}")]
    Api { method: String, message: String },

    /// A paged endpoint still had pages left after the configured cap.
    #[error("slack api {method} still had more results after {pages} pages")]
    PaginationExhausted { method: String, pages: u32 },

    #[error("activity window of {days} days reaches past the earliest supported date")]
    WindowOutOfRange { days: u32 },

    #[error("invalid channel filter: {0}")]
    InvalidChannelFilter(#[from] regex::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode slack {method} response: {source}")]
    Decode {
        method: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid slack api url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    pub fn api(method: &str, message: impl Into<String>) -> Self {
        Self::Api {
            method: method.to_string(),
            message: message.into(),
        }
    }

    /// Short label used in the final error log line.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Api { .. } => "api_error",
            Self::PaginationExhausted { .. } => "pagination_exhausted",
            Self::WindowOutOfRange { .. } => "window_out_of_range",
            Self::InvalidChannelFilter(_) => "invalid_channel_filter",
            Self::Http(_) => "http_error",
            Self::Decode { .. } => "decode_error",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Io(_) => "io_error",
        }
    }
}

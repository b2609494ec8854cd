use thiserror::Error;

/// Failures at the control-plane boundary. Callers degrade to empty data; nothing here is fatal.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// HTTP 401 or envelope code 401: token missing or expired.
    #[error("unauthorized: token missing or expired")]
    Unauthorized,

    /// Envelope code other than 200/0, or no code at all; `message` is the server's text.
    #[error("API error {code:?}: {message}")]
    Api { code: Option<i64>, message: String },

    #[error("response for {0} carried no data")]
    MissingData(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

/// Maximum number of response-body bytes kept in an HTTP status error
const ERROR_BODY_LIMIT: usize = 512;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tracker returned HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),

    #[error("Tracker client configuration error: {0}")]
    Config(String),
}

impl FetchError {
    pub fn http_status(status: u16, body: &str) -> Self {
        Self::HttpStatus {
            status,
            message: truncate_body(body).to_string(),
        }
    }

    /// Stable identifier of the failure class, for reports and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::HttpStatus { .. } => "http_status",
            Self::MalformedResponse(_) => "malformed_response",
            Self::Config(_) => "config",
        }
    }
}

fn truncate_body(body: &str) -> &str {
    let body = body.trim();
    if body.len() <= ERROR_BODY_LIMIT {
        return body;
    }
    let mut end = ERROR_BODY_LIMIT;
    while end > 0 && !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

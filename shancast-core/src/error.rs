use reqwest::StatusCode;
use thiserror::Error;

/// The one failure a weather fetch can surface.
///
/// The dashboard treats every variant the same way (keep the previous
/// snapshot); the variants only exist so logs say what went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to reach weather provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("weather provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode weather payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    pub(crate) fn status(status: StatusCode, body: &str) -> Self {
        Self::Status { status, body: truncate_body(body) }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

/// Failures a proxy operation can end in.
///
/// Every handler returns this type, and it converts into a JSON error body of
/// the form `{ "error": ..., "details": ... }`. Upstream rejections keep the
/// upstream status and body so the caller sees exactly what Spotify answered.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Bad or missing input. No upstream call was made.
    #[error("{0}")]
    Validation(String),

    /// The server is missing credentials it needs.
    #[error("{0}")]
    Configuration(String),

    /// The caller did not present a usable bearer token.
    #[error("{0}")]
    Authentication(String),

    /// The token endpoint rejected the exchange.
    #[error("{message}")]
    UpstreamAuth {
        message: String,
        status: StatusCode,
        details: Value,
    },

    /// A resource endpoint rejected the request.
    #[error("{message}")]
    UpstreamResource {
        message: String,
        status: StatusCode,
        details: Value,
    },

    /// The upstream API could not be reached.
    #[error("Internal Server Error")]
    Transport(String),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Authentication(_) => StatusCode::UNAUTHORIZED,
            ProxyError::UpstreamAuth { status, .. } => *status,
            ProxyError::UpstreamResource { status, .. } => *status,
            ProxyError::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            ProxyError::UpstreamAuth { details, .. } | ProxyError::UpstreamResource { details, .. } => {
                json!({ "error": self.to_string(), "details": details })
            }
            ProxyError::Transport(message) => {
                json!({ "error": self.to_string(), "details": message })
            }
            _ => json!({ "error": self.to_string() }),
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Transport(err.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match &self {
            ProxyError::UpstreamAuth { status, details, .. }
            | ProxyError::UpstreamResource { status, details, .. } => {
                tracing::error!(%status, %details, "{}", self);
            }
            ProxyError::Transport(message) => tracing::error!(%message, "upstream unreachable"),
            ProxyError::Configuration(message) => tracing::error!(%message, "server misconfigured"),
            _ => tracing::debug!("{}", self),
        }

        (self.status(), Json(self.body())).into_response()
    }
}

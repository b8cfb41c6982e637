use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Bad request error (required field missing or empty).
    BadRequest(String),
    /// A failed call to the Spinwheel API, already normalized to a single message.
    Provider(String),
    /// A 2xx provider response missing an expected field.
    InvalidResponse(String),
    /// Internal server error.
    InternalError(String),
    /// Error with context chain for better debugging.
    WithContext {
        /// The underlying source of the error.
        source: Box<AppError>,
        /// Additional context message.
        context: String,
    },
}

impl fmt::Display for AppError {
    /// Formats the error for display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Provider(msg) => write!(f, "Provider error: {}", msg),
            AppError::InvalidResponse(msg) => write!(f, "Invalid provider response: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal error: {}", msg),
            AppError::WithContext { source, context } => {
                write!(f, "{}: {}", context, source)
            }
        }
    }
}

impl AppError {
    /// The bare message carried by this error, without any variant prefix.
    ///
    /// Used as the `message` field of failure bodies, so the normalized
    /// provider text reaches the caller verbatim.
    pub fn message(&self) -> String {
        match self {
            AppError::BadRequest(msg)
            | AppError::Provider(msg)
            | AppError::InvalidResponse(msg)
            | AppError::InternalError(msg) => msg.clone(),
            AppError::WithContext { source, .. } => source.message(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Provider(_) | AppError::InvalidResponse(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::WithContext { source, .. } => source.status_code(),
        }
    }
}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// All failure bodies follow `{error: string, message?: string}`.
    /// Validation errors put the fixed message in `error`; provider and shape
    /// failures put the operation context in `error` and the normalized
    /// provider message in `message`.
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match &self {
            AppError::BadRequest(msg) => Json(json!({ "error": msg })),
            AppError::Provider(msg) => {
                tracing::error!("Spinwheel API error: {}", msg);
                Json(json!({ "error": "API request failed", "message": msg }))
            }
            AppError::InvalidResponse(msg) => {
                tracing::error!("Unexpected Spinwheel response: {}", msg);
                Json(json!({ "error": "Unexpected provider response", "message": msg }))
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                Json(json!({ "error": "Internal server error" }))
            }
            AppError::WithContext { source, context } => {
                tracing::error!("Error with context: {} -> {}", context, source);
                Json(json!({ "error": context, "message": source.message() }))
            }
        };

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Converts a transport-level `reqwest::Error` into an `AppError`.
    fn from(err: reqwest::Error) -> Self {
        AppError::Provider(err.to_string())
    }
}

/// Extension trait for adding context to errors.
/// Similar to `anyhow::Context` but for our `AppError` type.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Arguments
    ///
    /// * `context` - The context message to add.
    fn context(self, context: impl Into<String>) -> Result<T, AppError>;

    /// Add context lazily (only evaluated on error).
    ///
    /// # Arguments
    ///
    /// * `f` - A closure that produces the context message.
    #[allow(dead_code)]
    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T, AppError> {
    fn context(self, context: impl Into<String>) -> Result<T, AppError> {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: context.into(),
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, AppError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| AppError::WithContext {
            source: Box::new(e),
            context: f(),
        })
    }
}

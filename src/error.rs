use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::views;

/// A user-correctable input problem, shown inline on the submitted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub &'static str);

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User {0} is already registered.")]
    DuplicateUser(String),
    #[error("Invalid username or password.")]
    InvalidCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("You are not allowed to do that.")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateUser(_) => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the error belongs inline on the form that caused it.
    pub fn is_form_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::DuplicateUser(_) | Self::InvalidCredentials
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 4xx is already visible in the TraceLayer span; only internal faults need the chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, "internal error");
        }
        (status, Html(views::error_page(status, &self.to_string()))).into_response()
    }
}

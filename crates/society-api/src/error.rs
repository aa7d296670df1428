use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use society_core::error::DomainError;

use crate::views::ViewError;

/// Failure while building a read-only page. Form posts never produce one;
/// they redirect with a notice instead.
#[derive(Error, Debug)]
pub enum PageError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    View(#[from] ViewError),
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match &self {
            PageError::Domain(DomainError::NotFound(msg)) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg.clone()).into_response()
            }
            e => {
                tracing::error!("Page failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
            }
        }
    }
}

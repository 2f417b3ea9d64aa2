pub mod cart;
pub mod handlers;
pub mod routes;
pub mod session;

use axum::{http::StatusCode, Json};
use serde::Serialize;

pub use routes::create_router;
pub use session::{SessionId, SESSION_HEADER};

/// Error body shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub(crate) fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

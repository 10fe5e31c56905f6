use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use derive_more::Display;
use serde_json::json;

use crate::payroll::month::InvalidMonth;

/// Failure taxonomy for the payroll subsystem.
///
/// Validation and reference failures are rejected synchronously with no
/// partial effect; everything here is retryable from the caller's side.
/// Database failures surface as an opaque 500, logged server-side.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "worker {} not found", _0)]
    UnknownWorker(i64),

    #[display(fmt = "worker {} is not active", _0)]
    WorkerInactive(i64),

    #[display(fmt = "{}", _0)]
    Validation(String),

    #[display(
        fmt = "advance deduction {:.2} exceeds outstanding balance {:.2}",
        requested,
        outstanding
    )]
    AdvanceOverdrawn { requested: f64, outstanding: f64 },

    #[display(fmt = "database error")]
    Db(sqlx::Error),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Db(e)
    }
}

impl From<InvalidMonth> for ApiError {
    fn from(e: InvalidMonth) -> Self {
        ApiError::Validation(e.to_string())
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownWorker(_) => StatusCode::NOT_FOUND,
            ApiError::WorkerInactive(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::AdvanceOverdrawn { .. } => StatusCode::CONFLICT,
            ApiError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            ApiError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

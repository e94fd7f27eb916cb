// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use revenant_core::{ErrorKind, RevenantError};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] RevenantError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Payment required: {0}")]
    PaymentRequired(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(err) => match err.kind() {
                ErrorKind::MalformedPayload => StatusCode::BAD_REQUEST,
                ErrorKind::RevivalNotFound => StatusCode::NOT_FOUND,
                ErrorKind::RevivalCorrupt | ErrorKind::UnsupportedVersion => StatusCode::UNPROCESSABLE_ENTITY,
                ErrorKind::LedgerWriteFailure | ErrorKind::ChainQueryFailure => StatusCode::BAD_GATEWAY,
                ErrorKind::Config => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::PaymentRequired(_) => StatusCode::PAYMENT_REQUIRED,
        }
    }
}

// Body decode failures keep the `{"error": ..}` shape.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

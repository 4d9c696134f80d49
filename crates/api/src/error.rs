//! Error rendering for HTTP responses.
//!
//! Repository and domain errors are first mapped onto [`AppError`], which
//! carries the status code and error code. Bodies are
//! `{"error": "<CODE>", "message": "<text>"}`; server-side failures are
//! logged and their details withheld.

use alianza_core::error::CommissionError;
use alianza_db::repositories::{
    ClientError, ExecutiveError, PartnerError, ReleaseError, TransferError,
};
use alianza_shared::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde_json::json;
use tracing::error;

/// Error type returned by handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400 response.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_server_error() {
            error!(error = %self.0, "Request failed");
            "An error occurred".to_string()
        } else {
            self.0.to_string()
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self(AppError::Database(err.to_string()))
    }
}

impl From<CommissionError> for ApiError {
    fn from(err: CommissionError) -> Self {
        Self(AppError::Validation(err.to_string()))
    }
}

impl From<PartnerError> for ApiError {
    fn from(err: PartnerError) -> Self {
        match err {
            PartnerError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            PartnerError::EmptyName => Self(AppError::Validation(err.to_string())),
            PartnerError::Database(e) => e.into(),
        }
    }
}

impl From<ExecutiveError> for ApiError {
    fn from(err: ExecutiveError) -> Self {
        match err {
            ExecutiveError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            ExecutiveError::EmptyName => Self(AppError::Validation(err.to_string())),
            ExecutiveError::Database(e) => e.into(),
        }
    }
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotFound(_)
            | ClientError::PartnerNotFound(_)
            | ClientError::ExecutiveNotFound(_) => Self(AppError::NotFound(err.to_string())),
            ClientError::EmptyName => Self(AppError::Validation(err.to_string())),
            ClientError::Commission(e) => e.into(),
            ClientError::Release(e) => e.into(),
            ClientError::Database(e) => e.into(),
        }
    }
}

impl From<ReleaseError> for ApiError {
    fn from(err: ReleaseError) -> Self {
        match err {
            ReleaseError::ClientNotFound(_) => Self(AppError::NotFound(err.to_string())),
            ReleaseError::Commission(e) => Self(AppError::Internal(e.to_string())),
            ReleaseError::Database(e) => e.into(),
        }
    }
}

impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::NotFound(_)
            | TransferError::ClientNotFound(_)
            | TransferError::ExecutiveNotFound(_) => Self(AppError::NotFound(err.to_string())),
            TransferError::Commission(e) => e.into(),
            TransferError::Release(e) => e.into(),
            TransferError::Database(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_validation_error_body() {
        let response = ApiError::from(CommissionError::InvalidPercentage("abc".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("abc"));
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let response =
            ApiError::from(DbErr::Custom("connection refused".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "DATABASE_ERROR");
        assert_eq!(body["message"], "An error occurred");
    }

    #[test]
    fn test_repository_error_mapping() {
        let id = Uuid::nil();
        assert_eq!(ApiError::from(TransferError::NotFound(id)).0.status_code(), 404);
        assert_eq!(ApiError::from(TransferError::ClientNotFound(id)).0.status_code(), 404);
        assert_eq!(ApiError::from(ClientError::PartnerNotFound(id)).0.status_code(), 404);
        assert_eq!(
            ApiError::from(TransferError::Commission(CommissionError::MissingClientReference))
                .0
                .status_code(),
            400
        );
        assert_eq!(
            ApiError::from(TransferError::Commission(CommissionError::NegativeAmount(
                Decimal::NEGATIVE_ONE
            )))
            .0
            .status_code(),
            400
        );
        assert_eq!(
            ApiError::from(ClientError::Commission(CommissionError::TooManySlots {
                count: 13,
                max: 12
            }))
            .0
            .status_code(),
            400
        );
        assert_eq!(ApiError::from(PartnerError::EmptyName).0.status_code(), 400);
        assert_eq!(ApiError::from(ExecutiveError::NotFound(id)).0.status_code(), 404);
        assert_eq!(ApiError::from(TransferError::ExecutiveNotFound(id)).0.status_code(), 404);
        assert_eq!(ApiError::from(ClientError::ExecutiveNotFound(id)).0.status_code(), 404);
    }

    #[tokio::test]
    async fn test_oversized_amount_is_a_validation_error() {
        let amount = Decimal::MAX;
        let response = ApiError::from(TransferError::Commission(
            CommissionError::AmountOutOfRange(amount),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert!(body["message"].as_str().unwrap().contains("999999999999.99"));
    }
}

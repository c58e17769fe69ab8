use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::response::{ApiResponse, Meta};

/// Failures raised by an order store backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("orm error: {0}")]
    Orm(#[from] sea_orm::DbErr),

    #[error("sheet request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sheet api returned {status}: {body}")]
    SheetApi { status: u16, body: String },

    #[error("sheet authentication failed: {0}")]
    Auth(String),

    #[error("invalid sheet url: {0}")]
    Url(#[from] url::ParseError),

    #[error("csv mirror error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed order row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Unknown menu item {0}")]
    UnknownItem(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Cart is being checked out")]
    CheckoutInProgress,

    #[error("Order store unavailable")]
    PersistenceUnavailable(#[from] StoreError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UnknownItem(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyCart => StatusCode::BAD_REQUEST,
            AppError::CheckoutInProgress => StatusCode::CONFLICT,
            AppError::PersistenceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let detail = match &self {
            AppError::PersistenceUnavailable(source) => {
                tracing::error!(error = %source, "order store unavailable");
                "order store unavailable, please try again later".to_string()
            }
            AppError::Internal(source) => {
                tracing::error!(error = %source, "internal error");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData { error: detail }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_text(err: AppError) -> (StatusCode, String) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn store_failures_read_the_same_for_reads_and_writes() {
        let err = AppError::PersistenceUnavailable(StoreError::MalformedRow {
            row: 4,
            reason: "qty \"x\"".into(),
        });
        let (status, body) = body_text(err).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("order store unavailable"));
        assert!(!body.contains("could not be saved"));
        assert!(!body.contains("qty"));
    }

    #[tokio::test]
    async fn busy_cart_is_a_conflict() {
        let (status, body) = body_text(AppError::CheckoutInProgress).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.contains("checked out"));
    }
}

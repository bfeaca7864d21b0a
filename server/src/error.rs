//! HTTP error responses.

use assetvault_common::AssetVaultError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Domain(#[from] AssetVaultError),
    /// The request body could not be read as asset fields.
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Domain(e) => match e {
                AssetVaultError::InvalidAsset(_) => StatusCode::BAD_REQUEST,
                AssetVaultError::AssetNotFound(_) | AssetVaultError::UserNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                AssetVaultError::RateUnavailable(_)
                | AssetVaultError::Overflow(_)
                | AssetVaultError::Storage(_)
                | AssetVaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let code = match &self {
                ApiError::Domain(e) => e.error_code(),
                ApiError::BadRequest(_) => "BAD_REQUEST",
            };
            error!(error = %self, code, "Request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use assetvault_common::{AssetId, UserId};

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AssetVaultError::invalid("Invalid currency."), StatusCode::BAD_REQUEST),
            (AssetVaultError::AssetNotFound(AssetId::new(1)), StatusCode::NOT_FOUND),
            (AssetVaultError::UserNotFound(UserId::new(1)), StatusCode::NOT_FOUND),
            (
                AssetVaultError::RateUnavailable("down".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AssetVaultError::Overflow("big".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (AssetVaultError::Storage("gone".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
        assert_eq!(
            ApiError::BadRequest("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}

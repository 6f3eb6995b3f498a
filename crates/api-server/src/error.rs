use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn bad_request(message: impl ToString) -> Self {
        Self::BadRequest(message.to_string())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Domain(e) => domain_status(e),
            Self::Internal(e) => e
                .downcast_ref::<DomainError>()
                .map_or(StatusCode::INTERNAL_SERVER_ERROR, domain_status),
        }
    }
}

fn domain_status(e: &DomainError) -> StatusCode {
    match e {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidRecord { .. }
        | DomainError::InvalidQuery(_)
        | DomainError::InvalidAttachment(_)
        | DomainError::Source(_) => StatusCode::BAD_REQUEST,
        DomainError::Storage(_) | DomainError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Internal(e) => format!("{e:#}"),
            other => other.to_string(),
        };
        if status.is_server_error() {
            tracing::error!("❌ {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(DomainError::not_found("Asset", "A-1")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(DomainError::InvalidAttachment("bad".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(DomainError::Database("down".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_anyhow_wrapping_domain_error_keeps_status() {
        let err = anyhow::Error::from(DomainError::invalid_record("locations", "bad key"))
            .context("import failed");
        assert_eq!(ApiError::from(err).status(), StatusCode::BAD_REQUEST);

        let err = anyhow::anyhow!("disk full");
        assert_eq!(ApiError::from(err).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

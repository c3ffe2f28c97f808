use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use barback_engine::CatalogError;
use barback_logging::{barback_error, barback_warn};
use serde::Serialize;

/// JSON error body: `{"error": {"code": "...", "message": "..."}}`.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: &'static str,
    message: String,
}

/// Error returned by route handlers, rendered as a JSON body with a stable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found",
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        let (status, code) = match &err {
            CatalogError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "not_configured"),
            CatalogError::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream_unavailable"),
            CatalogError::NotTabular { .. } => (StatusCode::BAD_GATEWAY, "not_tabular"),
            CatalogError::Decode(_) | CatalogError::Parse(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal")
            }
        };
        Self {
            status,
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            barback_error!("{} ({}): {}", self.status, self.code, self.message);
        } else {
            barback_warn!("{} ({}): {}", self.status, self.code, self.message);
        }
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use barback_engine::{CatalogError, FailureKind, FetchError};

    use super::ApiError;

    #[test]
    fn catalog_errors_map_to_distinct_codes() {
        let cases = [
            (
                CatalogError::NotConfigured,
                StatusCode::SERVICE_UNAVAILABLE,
                "not_configured",
            ),
            (
                CatalogError::Upstream(FetchError::new(FailureKind::Timeout, "slow")),
                StatusCode::BAD_GATEWAY,
                "upstream_unavailable",
            ),
            (
                CatalogError::NotTabular {
                    url: "https://example.com".to_string(),
                },
                StatusCode::BAD_GATEWAY,
                "not_tabular",
            ),
        ];
        for (err, status, code) in cases {
            let api: ApiError = err.into();
            assert_eq!(api.status(), status);
            assert_eq!(api.code(), code);
        }
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
    }
}

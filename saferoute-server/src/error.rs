use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use saferoute_core::Error;
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Failure of an API request, already reduced to what a client may see
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("No route found between the selected points")]
    NoRoute,
    #[error("Request timed out")]
    Timeout,
    #[error("Server is busy, try again later")]
    Overloaded,
    #[error("Route calculation failed, please try again later")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NoRoute => StatusCode::NOT_FOUND,
            Self::Timeout => StatusCode::REQUEST_TIMEOUT,
            Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NoPath { .. } => Self::NoRoute,
            Error::InvalidData(message) => Self::BadRequest(message),
            Error::UnknownNode(id) => Self::BadRequest(format!("Unknown node {id}")),
            other => {
                error!("Request failed: {other}");
                Self::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_map_to_statuses() {
        let no_path = ApiError::from(Error::NoPath {
            origin: 1,
            destination: 2,
        });
        assert_eq!(no_path.status(), StatusCode::NOT_FOUND);

        let bad = ApiError::from(Error::InvalidData("lat out of range".into()));
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);

        let load = ApiError::from(Error::DataLoad {
            path: "nodos/part_0.json".into(),
            reason: "truncated".into(),
        });
        assert_eq!(load.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // internals never reach the client
        assert!(!load.to_string().contains("truncated"));
    }
}

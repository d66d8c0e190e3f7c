use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use ers_core::error::ErsError;

/// Handler error: an [`ErsError`] rendered as `{"error": .., "status": ..}`.
#[derive(Debug)]
pub struct ApiError(pub ErsError);

impl From<ErsError> for ApiError {
    fn from(err: ErsError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        (status, Json(self.0.to_json_body())).into_response()
    }
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use battstock_infra::recalc::RecalculationError;

pub fn recalculation_error_to_response(err: RecalculationError) -> axum::response::Response {
    match err {
        RecalculationError::StoreUnavailable(e) => {
            json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", e.to_string())
        }
        RecalculationError::NoKindsSelected => json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "at least one entity kind is required",
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

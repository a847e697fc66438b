//! Admin endpoints for rebuilding derived aggregates.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde::Deserialize;

use battstock_core::EntityKind;
use battstock_infra::recalc::RecalculationOptions;

use crate::app::{errors, services::AppServices};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecalculateRequest {
    /// Kind names; missing or empty means every kind.
    #[serde(default)]
    pub kinds: Option<Vec<String>>,
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl RecalculateRequest {
    fn into_options(self) -> Result<RecalculationOptions, String> {
        let mut options = match self.kinds {
            Some(names) if !names.is_empty() => {
                let kinds = names
                    .iter()
                    .map(|name| name.parse::<EntityKind>().map_err(|e| e.to_string()))
                    .collect::<Result<Vec<_>, _>>()?;
                RecalculationOptions::only(kinds)
            }
            _ => RecalculationOptions::default(),
        };
        if self.dry_run.unwrap_or(false) {
            options = options.dry_run();
        }
        Ok(options)
    }
}

pub fn router() -> Router {
    Router::new().route("/recalculate", post(recalculate))
}

async fn recalculate(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RecalculateRequest::default()
    } else {
        match serde_json::from_slice::<RecalculateRequest>(&body) {
            Ok(r) => r,
            Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_json", e.to_string()),
        }
    };

    let options = match request.into_options() {
        Ok(o) => o,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
    };

    tracing::info!(kinds = ?options.kinds, dry_run = options.dry_run, "recalculation requested");

    match services.recalculator.recalculate(options).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => errors::recalculation_error_to_response(e),
    }
}

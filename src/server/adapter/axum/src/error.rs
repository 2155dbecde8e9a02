/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pseo_server::PseoError;

/// Handler error. Renders `PseoError` as `{"ok": false, "error": {..}}` with
/// the error's HTTP status; 5xx responses are logged.
pub(crate) struct AxumError(pub PseoError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
      tracing::error!(code = err.code(), error = %err, "request failed");
    }
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.message(),
        "details": err.details(),
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<PseoError> for AxumError {
  fn from(err: PseoError) -> Self {
    Self(err)
  }
}

//! JSON error responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hoegye_core::LedgerError;
use hoegye_shared::AppError;
use serde_json::json;
use tracing::{error, warn};

/// Turns a ledger error into a `{error, message}` response.
///
/// Infrastructure failures are logged with their detail and answered with a
/// generic message.
pub fn error_response(err: LedgerError, context: &'static str) -> Response {
    let code = err.error_code();
    let retryable = err.is_retryable();
    let app: AppError = err.into();
    let status =
        StatusCode::from_u16(app.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    if app.is_infrastructure() {
        error!(error = %app, code, "{context}");
    } else if retryable {
        warn!(error = %app, code, "{context}");
    }

    (
        status,
        Json(json!({
            "error": code,
            "message": app.public_message(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoegye_core::ledger::VoucherStatus;

    #[test]
    fn test_status_follows_error_kind() {
        let not_found = error_response(LedgerError::VoucherNotFound("JV-X".into()), "test");
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let transition = error_response(
            LedgerError::InvalidTransition {
                from: VoucherStatus::Approved,
                to: VoucherStatus::Cancelled,
            },
            "test",
        );
        assert_eq!(transition.status(), StatusCode::CONFLICT);

        let closed = error_response(LedgerError::PeriodClosed { year: 2025, month: 6 }, "test");
        assert_eq!(closed.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let db = error_response(LedgerError::Database("socket closed".into()), "test");
        assert_eq!(db.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

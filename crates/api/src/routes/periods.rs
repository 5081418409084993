//! Accounting period routes.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use hoegye_core::closing::PeriodType;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the period routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/periods", get(list_periods))
        .route("/periods/close", post(close_period))
}

/// Query parameters for listing periods.
#[derive(Debug, Deserialize)]
pub struct ListPeriodsQuery {
    /// Only periods of this year.
    pub year: Option<i32>,
}

/// Request body for closing a period.
#[derive(Debug, Deserialize)]
pub struct ClosePeriodRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month; ignored for annual periods.
    #[serde(default)]
    pub month: u32,
    /// Monthly or annual.
    pub period_type: PeriodType,
    /// Closing user.
    pub closed_by: String,
    /// Closing date recorded on the period (default: today, UTC).
    #[serde(default)]
    pub closed_date: Option<NaiveDate>,
}

/// GET `/periods` - Recorded periods, newest first.
async fn list_periods(
    State(state): State<AppState>,
    Query(query): Query<ListPeriodsQuery>,
) -> impl IntoResponse {
    match state.closing().list(query.year).await {
        Ok(periods) => (StatusCode::OK, Json(json!({ "periods": periods }))).into_response(),
        Err(e) => error_response(e, "Failed to list periods"),
    }
}

/// POST `/periods/close` - Close a monthly or annual period.
async fn close_period(
    State(state): State<AppState>,
    Json(payload): Json<ClosePeriodRequest>,
) -> impl IntoResponse {
    let today = payload
        .closed_date
        .unwrap_or_else(|| Utc::now().date_naive());
    match state
        .closing()
        .close_period(
            payload.year,
            payload.month,
            payload.period_type,
            &payload.closed_by,
            today,
        )
        .await
    {
        Ok(period) => (StatusCode::OK, Json(period)).into_response(),
        Err(e) => error_response(e, "Failed to close period"),
    }
}

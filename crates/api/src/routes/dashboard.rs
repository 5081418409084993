//! Dashboard routes: read-only projections.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{Datelike, NaiveDate, Utc};
use hoegye_db::BudgetFilter;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the dashboard routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard/summary", get(summary))
        .route("/dashboard/budget-vs-actual", get(budget_vs_actual))
        .route("/dashboard/assets", get(asset_register))
        .route("/dashboard/periods", get(periods))
}

/// Query parameters for the summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Reference date (default: today, UTC).
    pub date: Option<NaiveDate>,
}

/// Query parameters for the budget view.
#[derive(Debug, Deserialize)]
pub struct BudgetQuery {
    /// Budget year (default: the current year).
    pub year: Option<i32>,
    /// Month.
    pub month: Option<u32>,
    /// Department.
    pub department: Option<String>,
}

/// Query parameters for the period view.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Only periods of this year.
    pub year: Option<i32>,
}

/// GET `/dashboard/summary` - Voucher counts around a reference date.
async fn summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    match state.dashboard().monthly_summary(date).await {
        Ok(summary) => (StatusCode::OK, Json(summary)).into_response(),
        Err(e) => error_response(e, "Failed to build dashboard summary"),
    }
}

/// GET `/dashboard/budget-vs-actual`
async fn budget_vs_actual(
    State(state): State<AppState>,
    Query(query): Query<BudgetQuery>,
) -> impl IntoResponse {
    let filter = BudgetFilter {
        year: query.year.unwrap_or_else(|| Utc::now().year()),
        month: query.month,
        department: query.department,
    };
    match state.dashboard().budget_vs_actual(&filter).await {
        Ok(lines) => (StatusCode::OK, Json(json!({ "budgets": lines }))).into_response(),
        Err(e) => error_response(e, "Failed to build budget view"),
    }
}

/// GET `/dashboard/assets` - Register with current book values.
async fn asset_register(State(state): State<AppState>) -> impl IntoResponse {
    match state.dashboard().asset_register().await {
        Ok(assets) => (StatusCode::OK, Json(json!({ "assets": assets }))).into_response(),
        Err(e) => error_response(e, "Failed to build asset register"),
    }
}

/// GET `/dashboard/periods`
async fn periods(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    match state.dashboard().periods(query.year).await {
        Ok(periods) => (StatusCode::OK, Json(json!({ "periods": periods }))).into_response(),
        Err(e) => error_response(e, "Failed to list periods"),
    }
}

//! Budget routes: planning and budget-vs-actual reports.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use hoegye_core::budget::PlanBudgetInput;
use hoegye_db::BudgetFilter;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the budget routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/budgets", get(budget_report).post(plan_budget))
}

/// Query parameters for the budget report.
#[derive(Debug, Deserialize)]
pub struct BudgetReportQuery {
    /// Budget year.
    pub year: i32,
    /// Month; omitted selects every row of the year.
    pub month: Option<u32>,
    /// Department (cost centre) or `ALL`.
    pub department: Option<String>,
}

/// GET `/budgets` - Budget vs actual with variance analysis.
async fn budget_report(
    State(state): State<AppState>,
    Query(query): Query<BudgetReportQuery>,
) -> impl IntoResponse {
    let filter = BudgetFilter {
        year: query.year,
        month: query.month,
        department: query.department,
    };
    match state.budgets().report(&filter).await {
        Ok(lines) => (StatusCode::OK, Json(json!({ "budgets": lines }))).into_response(),
        Err(e) => error_response(e, "Failed to build budget report"),
    }
}

/// POST `/budgets` - Create or replace a budget amount.
async fn plan_budget(
    State(state): State<AppState>,
    Json(payload): Json<PlanBudgetInput>,
) -> impl IntoResponse {
    match state.budgets().plan(&payload).await {
        Ok(line) => (StatusCode::OK, Json(line)).into_response(),
        Err(e) => error_response(e, "Failed to plan budget"),
    }
}

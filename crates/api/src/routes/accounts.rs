//! Chart of accounts routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use hoegye_core::{
    LedgerError,
    account::{AccountType, NewAccount},
};
use hoegye_db::AccountFilter;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{code}", get(get_account))
        .route("/accounts/{code}/deactivate", post(deactivate_account))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Filter by account type.
    #[serde(rename = "type")]
    pub account_type: Option<AccountType>,
    /// Only active accounts.
    #[serde(default)]
    pub active_only: bool,
    /// Only accounts that accept postings.
    #[serde(default)]
    pub postable_only: bool,
}

/// GET `/accounts` - List the chart in code order.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let filter = AccountFilter {
        account_type: query.account_type,
        active_only: query.active_only,
        postable_only: query.postable_only,
    };
    match state.accounts().list(&filter).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => error_response(e, "Failed to list accounts"),
    }
}

/// POST `/accounts` - Add an account.
async fn create_account(
    State(state): State<AppState>,
    Json(payload): Json<NewAccount>,
) -> impl IntoResponse {
    match state.accounts().create(&payload).await {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => error_response(e, "Failed to create account"),
    }
}

/// GET `/accounts/{code}` - Load one account.
async fn get_account(State(state): State<AppState>, Path(code): Path<String>) -> impl IntoResponse {
    match state.accounts().find_by_code(&code).await {
        Ok(Some(account)) => (StatusCode::OK, Json(account)).into_response(),
        Ok(None) => error_response(LedgerError::AccountNotFound(code), "Account lookup"),
        Err(e) => error_response(e, "Failed to load account"),
    }
}

/// POST `/accounts/{code}/deactivate` - Stop new postings to an account.
async fn deactivate_account(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> impl IntoResponse {
    match state.accounts().deactivate(&code).await {
        Ok(account) => (StatusCode::OK, Json(account)).into_response(),
        Err(e) => error_response(e, "Failed to deactivate account"),
    }
}

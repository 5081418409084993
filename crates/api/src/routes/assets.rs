//! Fixed asset routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use hoegye_core::depreciation::NewFixedAsset;
use serde::Deserialize;
use serde_json::json;

use crate::{AppState, error::error_response};

/// Creates the fixed asset routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/assets", get(list_assets).post(register_asset))
        .route("/assets/{asset_code}", get(get_asset))
        .route("/assets/{asset_code}/schedule", get(asset_schedule))
        .route(
            "/assets/{asset_code}/depreciation",
            get(depreciation_as_of).post(post_depreciation),
        )
        .route("/assets/{asset_code}/dispose", post(dispose_asset))
}

/// Query parameters for the depreciation state.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    /// Reference date (default: today, UTC).
    pub as_of: Option<NaiveDate>,
}

/// Request body for posting depreciation.
#[derive(Debug, Deserialize)]
pub struct PostDepreciationRequest {
    /// Depreciation is brought up to this date.
    pub as_of_date: NaiveDate,
    /// Creating user or module.
    pub created_by: String,
}

/// Request body for disposing of an asset.
#[derive(Debug, Deserialize)]
pub struct DisposeRequest {
    /// Date the asset left service.
    pub disposal_date: NaiveDate,
}

/// GET `/assets` - Register in code order.
async fn list_assets(State(state): State<AppState>) -> impl IntoResponse {
    match state.assets().list().await {
        Ok(assets) => (StatusCode::OK, Json(json!({ "assets": assets }))).into_response(),
        Err(e) => error_response(e, "Failed to list fixed assets"),
    }
}

/// POST `/assets` - Register an asset.
async fn register_asset(
    State(state): State<AppState>,
    Json(payload): Json<NewFixedAsset>,
) -> impl IntoResponse {
    match state.assets().register(payload).await {
        Ok(asset) => (StatusCode::CREATED, Json(asset)).into_response(),
        Err(e) => error_response(e, "Failed to register fixed asset"),
    }
}

/// GET `/assets/{asset_code}`
async fn get_asset(
    State(state): State<AppState>,
    Path(asset_code): Path<String>,
) -> impl IntoResponse {
    match state.assets().get(&asset_code).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => error_response(e, "Failed to load fixed asset"),
    }
}

/// GET `/assets/{asset_code}/schedule` - Month-by-month plan.
async fn asset_schedule(
    State(state): State<AppState>,
    Path(asset_code): Path<String>,
) -> impl IntoResponse {
    match state.assets().schedule(&asset_code).await {
        Ok(rows) => (StatusCode::OK, Json(json!({ "schedule": rows }))).into_response(),
        Err(e) => error_response(e, "Failed to build depreciation schedule"),
    }
}

/// GET `/assets/{asset_code}/depreciation` - State as of a date.
async fn depreciation_as_of(
    State(state): State<AppState>,
    Path(asset_code): Path<String>,
    Query(query): Query<AsOfQuery>,
) -> impl IntoResponse {
    let as_of = query.as_of.unwrap_or_else(|| Utc::now().date_naive());
    match state.assets().depreciation_as_of(&asset_code, as_of).await {
        Ok(schedule) => (StatusCode::OK, Json(schedule)).into_response(),
        Err(e) => error_response(e, "Failed to compute depreciation"),
    }
}

/// POST `/assets/{asset_code}/depreciation` - Draft voucher for what is due.
///
/// Answers 201 with the voucher, or 200 with `"voucher": null` when nothing
/// is due.
async fn post_depreciation(
    State(state): State<AppState>,
    Path(asset_code): Path<String>,
    Json(payload): Json<PostDepreciationRequest>,
) -> impl IntoResponse {
    match state
        .assets()
        .post_depreciation(&asset_code, payload.as_of_date, &payload.created_by)
        .await
    {
        Ok(Some(voucher)) => {
            (StatusCode::CREATED, Json(json!({ "voucher": voucher }))).into_response()
        }
        Ok(None) => (StatusCode::OK, Json(json!({ "voucher": null }))).into_response(),
        Err(e) => error_response(e, "Failed to post depreciation"),
    }
}

/// POST `/assets/{asset_code}/dispose`
async fn dispose_asset(
    State(state): State<AppState>,
    Path(asset_code): Path<String>,
    Json(payload): Json<DisposeRequest>,
) -> impl IntoResponse {
    match state.assets().dispose(&asset_code, payload.disposal_date).await {
        Ok(asset) => (StatusCode::OK, Json(asset)).into_response(),
        Err(e) => error_response(e, "Failed to dispose fixed asset"),
    }
}

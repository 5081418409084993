//! Voucher routes: creation, the approval workflow and tax invoices.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use hoegye_core::ledger::{CreateVoucherInput, VoucherStatus, VoucherTemplate, VoucherType};
use hoegye_db::VoucherFilter;
use hoegye_shared::types::PageRequest;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{AppState, error::error_response};

/// Creates the voucher routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/vouchers", get(list_vouchers).post(create_voucher))
        .route("/vouchers/templates", post(create_from_template))
        .route("/vouchers/{voucher_no}", get(get_voucher))
        .route("/vouchers/{voucher_no}/submit", post(submit_voucher))
        .route("/vouchers/{voucher_no}/approve", post(approve_voucher))
        .route("/vouchers/{voucher_no}/cancel", post(cancel_voucher))
        .route(
            "/vouchers/{voucher_no}/tax-invoice",
            get(get_tax_invoice).post(issue_tax_invoice),
        )
}

/// Query parameters for listing vouchers.
#[derive(Debug, Deserialize)]
pub struct ListVouchersQuery {
    /// First voucher date, inclusive.
    pub from: Option<NaiveDate>,
    /// Last voucher date, inclusive.
    pub to: Option<NaiveDate>,
    /// Voucher type.
    #[serde(rename = "type")]
    pub voucher_type: Option<VoucherType>,
    /// Status.
    pub status: Option<VoucherStatus>,
    /// Page number (1-indexed, default: 1).
    pub page: Option<u32>,
    /// Items per page (default: 50).
    pub per_page: Option<u32>,
}

/// Request body for creating a voucher from a template.
#[derive(Debug, Deserialize)]
pub struct TemplateVoucherRequest {
    /// Posting date.
    pub voucher_date: NaiveDate,
    /// Creating user or producing module.
    pub created_by: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Cost centre charged on the revenue or expense side.
    #[serde(default)]
    pub cost_center: Option<String>,
    /// The business event.
    pub template: VoucherTemplate,
}

/// Request body for approving a voucher.
#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    /// Approving user.
    pub approved_by: String,
}

/// Request body for issuing a tax invoice by hand.
#[derive(Debug, Deserialize)]
pub struct ManualInvoiceRequest {
    /// Taxable amount.
    pub supply_amount: Decimal,
}

/// GET `/vouchers` - Paginated voucher headers, newest first.
async fn list_vouchers(
    State(state): State<AppState>,
    Query(query): Query<ListVouchersQuery>,
) -> impl IntoResponse {
    let defaults = PageRequest::default();
    let page = PageRequest::new(
        query.page.unwrap_or(defaults.page),
        query.per_page.unwrap_or(defaults.per_page),
    );
    let filter = VoucherFilter {
        from: query.from,
        to: query.to,
        voucher_type: query.voucher_type,
        status: query.status,
    };
    match state.dashboard().list_vouchers(&filter, &page).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(e, "Failed to list vouchers"),
    }
}

/// POST `/vouchers` - Create a draft voucher from explicit lines.
async fn create_voucher(
    State(state): State<AppState>,
    Json(payload): Json<CreateVoucherInput>,
) -> impl IntoResponse {
    match state.vouchers().create(&payload).await {
        Ok(voucher) => (StatusCode::CREATED, Json(voucher)).into_response(),
        Err(e) => error_response(e, "Failed to create voucher"),
    }
}

/// POST `/vouchers/templates` - Create a draft voucher from a business event.
async fn create_from_template(
    State(state): State<AppState>,
    Json(payload): Json<TemplateVoucherRequest>,
) -> impl IntoResponse {
    let result = state
        .vouchers()
        .create_from_template(
            payload.template,
            payload.voucher_date,
            &payload.created_by,
            payload.description,
            payload.cost_center.as_deref(),
        )
        .await;
    match result {
        Ok(voucher) => (StatusCode::CREATED, Json(voucher)).into_response(),
        Err(e) => error_response(e, "Failed to create voucher from template"),
    }
}

/// GET `/vouchers/{voucher_no}` - Voucher with its lines.
async fn get_voucher(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
) -> impl IntoResponse {
    match state.vouchers().get(&voucher_no).await {
        Ok(voucher) => (StatusCode::OK, Json(voucher)).into_response(),
        Err(e) => error_response(e, "Failed to load voucher"),
    }
}

/// POST `/vouchers/{voucher_no}/submit` - Draft to pending.
async fn submit_voucher(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
) -> impl IntoResponse {
    match state.vouchers().submit(&voucher_no).await {
        Ok(voucher) => (StatusCode::OK, Json(voucher)).into_response(),
        Err(e) => error_response(e, "Failed to submit voucher"),
    }
}

/// POST `/vouchers/{voucher_no}/approve` - Pending to approved, with side
/// effects.
async fn approve_voucher(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
    Json(payload): Json<ApproveRequest>,
) -> impl IntoResponse {
    match state.vouchers().approve(&voucher_no, &payload.approved_by).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(e, "Failed to approve voucher"),
    }
}

/// POST `/vouchers/{voucher_no}/cancel` - Draft or pending to cancelled.
async fn cancel_voucher(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
) -> impl IntoResponse {
    match state.vouchers().cancel(&voucher_no).await {
        Ok(voucher) => (StatusCode::OK, Json(voucher)).into_response(),
        Err(e) => error_response(e, "Failed to cancel voucher"),
    }
}

/// GET `/vouchers/{voucher_no}/tax-invoice` - Invoice linked to a voucher.
async fn get_tax_invoice(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
) -> impl IntoResponse {
    match state.tax_invoices().get_for_voucher(&voucher_no).await {
        Ok(invoice) => (StatusCode::OK, Json(invoice)).into_response(),
        Err(e) => error_response(e, "Failed to load tax invoice"),
    }
}

/// POST `/vouchers/{voucher_no}/tax-invoice` - Manual issue for a flagged
/// voucher.
async fn issue_tax_invoice(
    State(state): State<AppState>,
    Path(voucher_no): Path<String>,
    Json(payload): Json<ManualInvoiceRequest>,
) -> impl IntoResponse {
    match state
        .tax_invoices()
        .issue_manual(&voucher_no, payload.supply_amount)
        .await
    {
        Ok(invoice) => (StatusCode::CREATED, Json(invoice)).into_response(),
        Err(e) => error_response(e, "Failed to issue tax invoice"),
    }
}

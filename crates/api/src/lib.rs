//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - JSON error responses mapped from `LedgerError`
//! - Application state holding the database pool and ledger settings

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use hoegye_db::{
    AccountRepository, BudgetRepository, ClosingRepository, DashboardRepository,
    FixedAssetRepository, TaxInvoiceRepository, VoucherRepository,
};
use hoegye_shared::LedgerConfig;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DatabaseConnection,
    /// Ledger settings, built once at startup.
    pub ledger: Arc<LedgerConfig>,
}

impl AppState {
    /// Creates the state from a pool and ledger settings.
    #[must_use]
    pub fn new(db: DatabaseConnection, ledger: LedgerConfig) -> Self {
        Self {
            db,
            ledger: Arc::new(ledger),
        }
    }

    pub(crate) fn accounts(&self) -> AccountRepository {
        AccountRepository::new(self.db.clone())
    }

    pub(crate) fn vouchers(&self) -> VoucherRepository {
        VoucherRepository::new(self.db.clone(), (*self.ledger).clone())
    }

    pub(crate) fn tax_invoices(&self) -> TaxInvoiceRepository {
        TaxInvoiceRepository::new(self.db.clone(), (*self.ledger).clone())
    }

    pub(crate) fn assets(&self) -> FixedAssetRepository {
        FixedAssetRepository::new(self.db.clone(), (*self.ledger).clone())
    }

    pub(crate) fn budgets(&self) -> BudgetRepository {
        BudgetRepository::new(self.db.clone())
    }

    pub(crate) fn closing(&self) -> ClosingRepository {
        ClosingRepository::new(self.db.clone())
    }

    pub(crate) fn dashboard(&self) -> DashboardRepository {
        DashboardRepository::new(self.db.clone())
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

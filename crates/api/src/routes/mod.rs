//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod accounts;
pub mod assets;
pub mod budgets;
pub mod dashboard;
pub mod health;
pub mod periods;
pub mod vouchers;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(vouchers::routes())
        .merge(periods::routes())
        .merge(budgets::routes())
        .merge(assets::routes())
        .merge(dashboard::routes())
}

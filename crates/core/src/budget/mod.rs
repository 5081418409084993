//! Budget tracking and variance analysis.
//!
//! Actual amounts are always recomputed in full from approved vouchers, never
//! adjusted incrementally.

pub mod service;
pub mod types;


pub use service::BudgetService;
pub use types::{
    ApprovedPosting, BudgetLine, COMPANY_WIDE_DEPARTMENT, PlanBudgetInput, VarianceResult,
    VarianceStatus, budget_id,
};

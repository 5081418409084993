//! Journal vouchers.
//!
//! This module implements the double-entry voucher rules:
//! - Voucher and line types
//! - Creation-time validation and the pre-approval balance re-check
//! - Voucher numbering format
//! - The draft/pending/approved/cancelled state machine
//! - Per-type posting templates

pub mod numbering;
pub mod template;
pub mod types;
pub mod validation;
pub mod workflow;

#[cfg(test)]
mod validation_props;
#[cfg(test)]
mod workflow_props;

pub use numbering::{MAX_SEQ, VoucherNo};
pub use template::VoucherTemplate;
pub use types::{
    CreateVoucherInput, JournalLine, JournalLineInput, ValidatedVoucher, Voucher, VoucherStatus,
    VoucherTotals, VoucherType,
};
pub use validation::{validate_voucher, verify_stored_balance};
pub use workflow::VoucherWorkflow;

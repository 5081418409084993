//! Voucher state machine.
//!
//! The repository applies transitions as conditional updates filtered on the
//! source statuses returned here, so a transition only lands if the voucher
//! is still in the state this module approved.

use super::types::VoucherStatus;
use crate::error::LedgerError;

/// Stateless service for voucher status transitions.
pub struct VoucherWorkflow;

impl VoucherWorkflow {
    /// Checks a single transition.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` naming both ends when the table does not allow it.
    pub fn transition(from: VoucherStatus, to: VoucherStatus) -> Result<VoucherStatus, LedgerError> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(LedgerError::InvalidTransition { from, to })
        }
    }

    /// Check if a status transition is valid.
    #[must_use]
    pub fn is_valid_transition(from: VoucherStatus, to: VoucherStatus) -> bool {
        Self::sources_of(to).contains(&from)
    }

    /// Statuses from which `to` can be reached.
    #[must_use]
    pub const fn sources_of(to: VoucherStatus) -> &'static [VoucherStatus] {
        match to {
            VoucherStatus::Draft => &[],
            VoucherStatus::Pending => &[VoucherStatus::Draft],
            VoucherStatus::Approved => &[VoucherStatus::Pending],
            VoucherStatus::Cancelled => &[VoucherStatus::Draft, VoucherStatus::Pending],
        }
    }
}

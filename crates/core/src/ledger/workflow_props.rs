//! Property-based tests for the voucher state machine.

use proptest::prelude::*;

use super::types::VoucherStatus;
use super::workflow::VoucherWorkflow;
use crate::error::LedgerError;

fn arb_status() -> impl Strategy<Value = VoucherStatus> {
    prop_oneof![
        Just(VoucherStatus::Draft),
        Just(VoucherStatus::Pending),
        Just(VoucherStatus::Approved),
        Just(VoucherStatus::Cancelled),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Terminal statuses accept no transition at all.
    #[test]
    fn prop_terminal_states_are_final(from in arb_status(), to in arb_status()) {
        if from.is_terminal() {
            prop_assert!(!VoucherWorkflow::is_valid_transition(from, to));
        }
    }

    /// Each transition succeeds exactly when the transition table allows it,
    /// and failures name both ends.
    #[test]
    fn prop_operations_follow_table(from in arb_status()) {
        for to in [VoucherStatus::Pending, VoucherStatus::Approved, VoucherStatus::Cancelled] {
            let result = VoucherWorkflow::transition(from, to);
            if VoucherWorkflow::is_valid_transition(from, to) {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                let matched = matches!(
                    result,
                    Err(LedgerError::InvalidTransition { from: f, to: t }) if f == from && t == to
                );
                prop_assert!(matched);
            }
        }
    }

    /// Approval is only reachable through pending.
    #[test]
    fn prop_approve_only_from_pending(from in arb_status()) {
        prop_assert_eq!(
            VoucherWorkflow::transition(from, VoucherStatus::Approved).is_ok(),
            from == VoucherStatus::Pending
        );
    }
}

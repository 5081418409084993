//! Property-based tests for voucher validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::types::{CreateVoucherInput, JournalLineInput, VoucherType};
use super::validation::{validate_voucher, verify_stored_balance};
use crate::account::{AccountCatalog, AccountType, NewAccount};
use crate::error::LedgerError;

/// Strategy to generate a positive amount from 0.01 to 1,000,000.00.
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn catalog() -> AccountCatalog {
    let mut catalog = AccountCatalog::new();
    for (code, account_type) in [("111", AccountType::Asset), ("410", AccountType::Revenue)] {
        catalog
            .add(&NewAccount {
                code: code.into(),
                name: code.into(),
                account_type,
                parent_code: None,
                is_control: false,
            })
            .unwrap();
    }
    catalog
}

fn make_input(lines: Vec<JournalLineInput>) -> CreateVoucherInput {
    CreateVoucherInput {
        voucher_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
        voucher_type: VoucherType::Transfer,
        lines,
        created_by: "hr".into(),
        description: None,
    }
}

/// Debit lines for each amount and one balancing credit line.
fn balanced_lines(debits: &[Decimal]) -> Vec<JournalLineInput> {
    let total: Decimal = debits.iter().copied().sum();
    let mut lines: Vec<_> = debits
        .iter()
        .map(|amount| JournalLineInput::debit("111", *amount))
        .collect();
    lines.push(JournalLineInput::credit("410", total));
    lines
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced vouchers pass and carry equal header totals.
    #[test]
    fn prop_balanced_vouchers_accepted(
        debits in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let voucher = validate_voucher(&make_input(balanced_lines(&debits)), &catalog()).unwrap();

        let expected: Decimal = debits.iter().copied().sum();
        prop_assert_eq!(voucher.totals.total_debit, expected);
        prop_assert_eq!(voucher.totals.total_credit, expected);
        prop_assert!(verify_stored_balance(voucher.totals, &voucher.lines).is_ok());
    }

    /// Line numbers are 1..n in input order.
    #[test]
    fn prop_lines_numbered_in_order(
        debits in prop::collection::vec(positive_amount(), 1..10),
    ) {
        let voucher = validate_voucher(&make_input(balanced_lines(&debits)), &catalog()).unwrap();
        for (expected, line) in (1u32..).zip(&voucher.lines) {
            prop_assert_eq!(line.line_no, expected);
        }
    }

    /// Any non-zero drift on one side is reported with both totals.
    #[test]
    fn prop_drift_reported_as_unbalanced(
        debits in prop::collection::vec(positive_amount(), 1..10),
        drift in positive_amount(),
    ) {
        let mut lines = balanced_lines(&debits);
        let last = lines.len() - 1;
        lines[last].credit_amount += drift;

        let debit: Decimal = debits.iter().copied().sum();
        match validate_voucher(&make_input(lines), &catalog()) {
            Err(LedgerError::Unbalanced { debit: d, credit: c }) => {
                prop_assert_eq!(d, debit.normalize());
                prop_assert_eq!(c, (debit + drift).normalize());
            }
            other => prop_assert!(false, "expected Unbalanced, got {:?}", other),
        }
    }

    /// A negative amount anywhere is rejected with its line number.
    #[test]
    fn prop_negative_amount_rejected(
        debits in prop::collection::vec(positive_amount(), 1..10),
        index in any::<prop::sample::Index>(),
    ) {
        let mut lines = balanced_lines(&debits);
        let target = index.index(debits.len());
        lines[target].debit_amount = -lines[target].debit_amount;

        let expected = u32::try_from(target + 1).unwrap();
        prop_assert!(matches!(
            validate_voucher(&make_input(lines), &catalog()),
            Err(LedgerError::NegativeAmount { line_no }) if line_no == expected
        ), "expected NegativeAmount at line {}", expected);
    }
}

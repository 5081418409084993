//! Business rule validation for vouchers.

use rust_decimal::Decimal;

use super::types::{CreateVoucherInput, JournalLine, ValidatedVoucher, VoucherTotals};
use crate::account::AccountCatalog;
use crate::error::LedgerError;

/// Validates a voucher creation request against the chart of accounts.
///
/// Rules are checked in order and the first violation is reported:
/// 1. `created_by` is present
/// 2. at least 2 lines
/// 3. per line: no negative amount, exactly one side non-zero, postable account
/// 4. total debit equals total credit
///
/// Lines are numbered 1..n in input order.
///
/// # Errors
///
/// Returns the `LedgerError` for the first violated rule.
pub fn validate_voucher(
    input: &CreateVoucherInput,
    catalog: &AccountCatalog,
) -> Result<ValidatedVoucher, LedgerError> {
    let created_by = input.created_by.trim();
    if created_by.is_empty() {
        return Err(LedgerError::MissingField("created_by"));
    }

    if input.lines.len() < 2 {
        return Err(LedgerError::InsufficientLines {
            count: input.lines.len(),
        });
    }

    let mut lines = Vec::with_capacity(input.lines.len());
    for (line_no, line) in (1u32..).zip(&input.lines) {
        let (debit, credit) = (line.debit_amount, line.credit_amount);

        if debit < Decimal::ZERO || credit < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount { line_no });
        }
        if debit.is_zero() == credit.is_zero() {
            return Err(LedgerError::AmbiguousLine { line_no });
        }

        let account_code = line.account_code.trim();
        if !catalog.is_postable(account_code) {
            return Err(LedgerError::AccountNotPostable {
                line_no,
                account_code: account_code.to_string(),
            });
        }

        lines.push(JournalLine {
            line_no,
            account_code: account_code.to_string(),
            debit_amount: debit,
            credit_amount: credit,
            cost_center: line
                .cost_center
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        });
    }

    let totals = VoucherTotals::from_amounts(lines.iter().map(|l| (l.debit_amount, l.credit_amount)));
    if !totals.is_balanced() {
        return Err(unbalanced(totals.total_debit, totals.total_credit));
    }

    Ok(ValidatedVoucher {
        voucher_date: input.voucher_date,
        voucher_type: input.voucher_type,
        lines,
        totals,
        created_by: created_by.to_string(),
        description: input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
    })
}

/// Re-checks a stored voucher before approval: line sums must balance and
/// match the header totals.
///
/// # Errors
///
/// Returns `Unbalanced` naming the line sums when any of the four totals differ.
pub fn verify_stored_balance(header: VoucherTotals, lines: &[JournalLine]) -> Result<(), LedgerError> {
    let from_lines =
        VoucherTotals::from_amounts(lines.iter().map(|l| (l.debit_amount, l.credit_amount)));

    if !from_lines.is_balanced() || from_lines != header || lines.is_empty() {
        return Err(unbalanced(from_lines.total_debit, from_lines.total_credit));
    }
    Ok(())
}

fn unbalanced(debit: Decimal, credit: Decimal) -> LedgerError {
    LedgerError::Unbalanced {
        debit: debit.normalize(),
        credit: credit.normalize(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::account::{AccountType, NewAccount};
    use crate::ledger::types::{JournalLineInput, VoucherType};

    fn catalog() -> AccountCatalog {
        let mut catalog = AccountCatalog::new();
        for (code, account_type, parent, control) in [
            ("1", AccountType::Asset, None, true),
            ("111", AccountType::Asset, Some("1"), false),
            ("4", AccountType::Revenue, None, true),
            ("410", AccountType::Revenue, Some("4"), false),
        ] {
            catalog
                .add(&NewAccount {
                    code: code.into(),
                    name: code.into(),
                    account_type,
                    parent_code: parent.map(Into::into),
                    is_control: control,
                })
                .unwrap();
        }
        catalog
    }

    fn input(lines: Vec<JournalLineInput>) -> CreateVoucherInput {
        CreateVoucherInput {
            voucher_date: NaiveDate::from_ymd_opt(2025, 6, 6).unwrap(),
            voucher_type: VoucherType::Receipt,
            lines,
            created_by: "kim".into(),
            description: None,
        }
    }

    #[test]
    fn test_balanced_voucher_passes() {
        let voucher = validate_voucher(
            &input(vec![
                JournalLineInput::debit("111", dec!(1000000)),
                JournalLineInput::credit("410", dec!(1000000)),
            ]),
            &catalog(),
        )
        .unwrap();

        assert_eq!(voucher.totals.total_debit, dec!(1000000));
        assert_eq!(voucher.totals.total_credit, dec!(1000000));
        assert_eq!(voucher.lines[0].line_no, 1);
        assert_eq!(voucher.lines[1].line_no, 2);
    }

    #[test]
    fn test_unbalanced_voucher_names_totals() {
        let err = validate_voucher(
            &input(vec![
                JournalLineInput::debit("111", dec!(1000000)),
                JournalLineInput::credit("410", dec!(900000)),
            ]),
            &catalog(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "unbalanced: debit=1000000 credit=900000");
    }

    #[test]
    fn test_trailing_zeros_do_not_leak_into_message() {
        let err = validate_voucher(
            &input(vec![
                JournalLineInput::debit("111", dec!(1000000.00)),
                JournalLineInput::credit("410", dec!(900000.00)),
            ]),
            &catalog(),
        )
        .unwrap_err();

        assert_eq!(err.to_string(), "unbalanced: debit=1000000 credit=900000");
    }

    #[test]
    fn test_missing_creator_reported_first() {
        let mut request = input(vec![]);
        request.created_by = "   ".into();
        assert!(matches!(
            validate_voucher(&request, &catalog()),
            Err(LedgerError::MissingField("created_by"))
        ));
    }

    #[test]
    fn test_single_line_rejected() {
        assert!(matches!(
            validate_voucher(&input(vec![JournalLineInput::debit("111", dec!(1))]), &catalog()),
            Err(LedgerError::InsufficientLines { count: 1 })
        ));
    }

    #[test]
    fn test_control_account_rejected() {
        let err = validate_voucher(
            &input(vec![
                JournalLineInput::debit("1", dec!(10)),
                JournalLineInput::credit("410", dec!(10)),
            ]),
            &catalog(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::AccountNotPostable { line_no: 1, ref account_code } if account_code == "1"
        ));
    }

    #[test]
    fn test_mixed_line_rejected() {
        let mixed = JournalLineInput {
            account_code: "111".into(),
            debit_amount: dec!(10),
            credit_amount: dec!(10),
            cost_center: None,
        };
        assert!(matches!(
            validate_voucher(
                &input(vec![mixed, JournalLineInput::credit("410", dec!(0))]),
                &catalog()
            ),
            Err(LedgerError::AmbiguousLine { line_no: 1 })
        ));
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(matches!(
            validate_voucher(
                &input(vec![
                    JournalLineInput::debit("111", dec!(10)),
                    JournalLineInput::credit("410", dec!(-10)),
                ]),
                &catalog()
            ),
            Err(LedgerError::NegativeAmount { line_no: 2 })
        ));
    }

    #[test]
    fn test_stored_balance_must_match_header() {
        let lines = vec![
            JournalLine {
                line_no: 1,
                account_code: "111".into(),
                debit_amount: dec!(500),
                credit_amount: dec!(0),
                cost_center: None,
            },
            JournalLine {
                line_no: 2,
                account_code: "410".into(),
                debit_amount: dec!(0),
                credit_amount: dec!(500),
                cost_center: None,
            },
        ];
        let header = VoucherTotals {
            total_debit: dec!(500),
            total_credit: dec!(500),
        };
        assert!(verify_stored_balance(header, &lines).is_ok());

        let drifted = VoucherTotals {
            total_debit: dec!(600),
            total_credit: dec!(600),
        };
        assert!(matches!(
            verify_stored_balance(drifted, &lines),
            Err(LedgerError::Unbalanced { .. })
        ));
    }
}

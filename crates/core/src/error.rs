//! Ledger error types.
//!
//! Every failure the ledger engine can report is a variant of [`LedgerError`].
//! Variants are grouped into an [`ErrorKind`] so callers can decide how to
//! surface them (validation and state errors carry a descriptive message,
//! infrastructure errors do not).

use chrono::NaiveDate;
use hoegye_shared::AppError;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::closing::PeriodType;
use crate::ledger::VoucherStatus;

/// Broad error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input violates a ledger rule.
    Validation,
    /// The target is in a state that does not allow the operation.
    State,
    /// Voucher numbering could not complete.
    Numbering,
    /// The accounting period no longer accepts postings.
    PeriodClosed,
    /// A derived document could not be linked.
    Linkage,
    /// The referenced record does not exist.
    NotFound,
    /// Declared but unsupported behaviour.
    NotImplemented,
    /// Datastore or internal failure.
    Infrastructure,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A required field is missing or blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Voucher has fewer than two lines.
    #[error("voucher must have at least 2 lines, got {count}")]
    InsufficientLines {
        /// Number of lines supplied.
        count: usize,
    },

    /// Line carries a negative amount.
    #[error("line {line_no}: amounts must not be negative")]
    NegativeAmount {
        /// 1-based line number.
        line_no: u32,
    },

    /// Line has both or neither of debit and credit set.
    #[error("line {line_no}: exactly one of debit or credit must be non-zero")]
    AmbiguousLine {
        /// 1-based line number.
        line_no: u32,
    },

    /// Line posts to an account that cannot receive postings.
    #[error("line {line_no}: account {account_code} is not postable")]
    AccountNotPostable {
        /// 1-based line number.
        line_no: u32,
        /// Offending account code.
        account_code: String,
    },

    /// Debit and credit totals differ.
    #[error("unbalanced: debit={debit} credit={credit}")]
    Unbalanced {
        /// Total debit amount.
        debit: Decimal,
        /// Total credit amount.
        credit: Decimal,
    },

    /// Parent account is missing, of another type, or would form a cycle.
    #[error("invalid parent for account {code}: {reason}")]
    InvalidParent {
        /// Account being added.
        code: String,
        /// Why the parent was rejected.
        reason: String,
    },

    /// Account code already exists.
    #[error("account {0} already exists")]
    DuplicateAccount(String),

    /// Fixed asset code already exists.
    #[error("fixed asset {0} already exists")]
    DuplicateAsset(String),

    /// Generic rule violation on an input value.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // ========== State Errors ==========
    /// Voucher status does not allow the requested transition.
    #[error("cannot move voucher from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: VoucherStatus,
        /// Requested status.
        to: VoucherStatus,
    },

    /// Period is already closed.
    #[error("{period_type} period {year}-{month:02} is already closed")]
    PeriodAlreadyClosed {
        /// Period year.
        year: i32,
        /// Period month.
        month: u32,
        /// Monthly or annual.
        period_type: PeriodType,
    },

    /// Period still has draft or pending vouchers.
    #[error("cannot close period: {count} draft or pending voucher(s) remain")]
    OpenVouchersExist {
        /// Number of open vouchers.
        count: u64,
    },

    /// Asset already disposed on a different date.
    #[error("fixed asset {asset_code} was already disposed on {disposal_date}")]
    AssetAlreadyDisposed {
        /// Asset code.
        asset_code: String,
        /// Existing disposal date.
        disposal_date: NaiveDate,
    },

    /// Voucher already has a tax invoice.
    #[error("voucher {0} already has a tax invoice")]
    InvoiceAlreadyIssued(String),

    /// Voucher cannot carry a tax invoice in its current form.
    #[error("voucher {voucher_no} cannot take a tax invoice: {reason}")]
    InvoiceNotAllowed {
        /// Voucher number.
        voucher_no: String,
        /// Why it was refused.
        reason: String,
    },

    // ========== Numbering Errors ==========
    /// Every attempted voucher number collided.
    #[error("could not allocate a unique voucher number for {date} after {attempts} attempts")]
    DuplicateVoucherNumber {
        /// Voucher date.
        date: NaiveDate,
        /// Attempts made.
        attempts: u32,
    },

    /// The date has used every four-digit sequence number.
    #[error("voucher numbers for {date} are exhausted (max {max})")]
    SequenceExhausted {
        /// Voucher date.
        date: NaiveDate,
        /// Highest sequence the format allows.
        max: u32,
    },

    /// A numbering attempt lost a race and may be retried.
    #[error("voucher numbering conflict: {0}")]
    NumberingConflict(String),

    // ========== Period Errors ==========
    /// Posting date falls in a closed period.
    #[error("period {year}-{month:02} is closed")]
    PeriodClosed {
        /// Year of the posting date.
        year: i32,
        /// Month of the posting date.
        month: u32,
    },

    // ========== Linkage Errors ==========
    /// Tax invoice could not be derived from the voucher.
    #[error("cannot link tax invoice to {voucher_no}: {reason}")]
    Linkage {
        /// Voucher number.
        voucher_no: String,
        /// What was missing.
        reason: String,
    },

    // ========== Not Found ==========
    /// Voucher not found.
    #[error("voucher not found: {0}")]
    VoucherNotFound(String),

    /// Account not found.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Fixed asset not found.
    #[error("fixed asset not found: {0}")]
    AssetNotFound(String),

    /// Tax invoice not found.
    #[error("tax invoice not found for voucher {0}")]
    InvoiceNotFound(String),

    // ========== Not Implemented ==========
    /// Declared feature without an algorithm.
    #[error("not implemented: {0}")]
    NotImplemented(String),

    // ========== Infrastructure ==========
    /// Database error.
    #[error("database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingField(_)
            | Self::InsufficientLines { .. }
            | Self::NegativeAmount { .. }
            | Self::AmbiguousLine { .. }
            | Self::AccountNotPostable { .. }
            | Self::Unbalanced { .. }
            | Self::InvalidParent { .. }
            | Self::DuplicateAccount(_)
            | Self::DuplicateAsset(_)
            | Self::InvalidInput(_) => ErrorKind::Validation,
            Self::InvalidTransition { .. }
            | Self::PeriodAlreadyClosed { .. }
            | Self::OpenVouchersExist { .. }
            | Self::AssetAlreadyDisposed { .. }
            | Self::InvoiceAlreadyIssued(_)
            | Self::InvoiceNotAllowed { .. } => ErrorKind::State,
            Self::DuplicateVoucherNumber { .. }
            | Self::SequenceExhausted { .. }
            | Self::NumberingConflict(_) => ErrorKind::Numbering,
            Self::PeriodClosed { .. } => ErrorKind::PeriodClosed,
            Self::Linkage { .. } => ErrorKind::Linkage,
            Self::VoucherNotFound(_)
            | Self::AccountNotFound(_)
            | Self::AssetNotFound(_)
            | Self::InvoiceNotFound(_) => ErrorKind::NotFound,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::Database(_) | Self::Internal(_) => ErrorKind::Infrastructure,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InsufficientLines { .. } => "INSUFFICIENT_LINES",
            Self::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            Self::AmbiguousLine { .. } => "AMBIGUOUS_LINE",
            Self::AccountNotPostable { .. } => "ACCOUNT_NOT_POSTABLE",
            Self::Unbalanced { .. } => "UNBALANCED_VOUCHER",
            Self::InvalidParent { .. } => "INVALID_PARENT",
            Self::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            Self::DuplicateAsset(_) => "DUPLICATE_ASSET",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::PeriodAlreadyClosed { .. } => "PERIOD_ALREADY_CLOSED",
            Self::OpenVouchersExist { .. } => "OPEN_VOUCHERS_EXIST",
            Self::AssetAlreadyDisposed { .. } => "ASSET_ALREADY_DISPOSED",
            Self::InvoiceAlreadyIssued(_) => "INVOICE_ALREADY_ISSUED",
            Self::InvoiceNotAllowed { .. } => "INVOICE_NOT_ALLOWED",
            Self::DuplicateVoucherNumber { .. } => "DUPLICATE_VOUCHER_NUMBER",
            Self::SequenceExhausted { .. } => "SEQUENCE_EXHAUSTED",
            Self::NumberingConflict(_) => "NUMBERING_CONFLICT",
            Self::PeriodClosed { .. } => "PERIOD_CLOSED",
            Self::Linkage { .. } => "LINKAGE_ERROR",
            Self::VoucherNotFound(_) => "VOUCHER_NOT_FOUND",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AssetNotFound(_) => "ASSET_NOT_FOUND",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::State | ErrorKind::Numbering => 409,
            ErrorKind::PeriodClosed | ErrorKind::Linkage => 422,
            ErrorKind::NotImplemented => 501,
            ErrorKind::Infrastructure => 500,
        }
    }

    /// Returns true if the operation may succeed when attempted again.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NumberingConflict(_))
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::State | ErrorKind::Numbering => Self::Conflict(message),
            ErrorKind::PeriodClosed | ErrorKind::Linkage => Self::BusinessRule(message),
            ErrorKind::NotImplemented => Self::NotImplemented(message),
            ErrorKind::Infrastructure => match err {
                LedgerError::Database(detail) => Self::Database(detail),
                _ => Self::Internal(message),
            },
        }
    }
}

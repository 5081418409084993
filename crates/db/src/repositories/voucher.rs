//! Voucher repository: creation, numbering and the approval workflow.
//!
//! Every mutation runs in one database transaction. Numbering and the
//! workflow transitions start with a write so that concurrent callers
//! serialize on the row they touch:
//! - creation bumps the per-date `voucher_sequence` row first
//! - approval and cancellation start with a conditional status update

use std::time::Duration;

use chrono::{NaiveDate, Utc};
use hoegye_core::LedgerError;
use hoegye_core::account::AccountCatalog;
use hoegye_core::invoice::{TaxInvoice, link_tax_invoice};
use hoegye_core::ledger::{
    CreateVoucherInput, JournalLine, ValidatedVoucher, Voucher, VoucherNo, VoucherStatus,
    VoucherTemplate, VoucherWorkflow, validate_voucher, verify_stored_balance,
};
use hoegye_shared::LedgerConfig;
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::account::load_catalog;
use super::error::{db_err, is_lock_conflict, is_unique_violation, to_i32, to_u32};
use super::{budget, closing, fixed_asset, tax_invoice};
use crate::entities::{
    depreciation_entry, journal_details, journal_header,
    sea_orm_active_enums::{self, DepreciationEntryStatus},
    voucher_sequence,
};

/// Tax invoice result of an approval.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum InvoiceOutcome {
    /// The voucher type takes no tax invoice.
    NotApplicable,
    /// An invoice was issued.
    Issued {
        /// The invoice.
        invoice: TaxInvoice,
    },
    /// Linkage failed; the voucher is approved and flagged for a manual
    /// invoice.
    Flagged {
        /// Why the invoice could not be derived.
        reason: String,
    },
}

/// Result of approving a voucher.
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    /// The approved voucher.
    pub voucher: Voucher,
    /// Tax invoice result.
    pub invoice: InvoiceOutcome,
}

/// Depreciation posting to record next to a new voucher.
#[derive(Debug, Clone)]
pub(crate) struct DepreciationLink {
    pub asset_code: String,
    pub as_of_date: NaiveDate,
    pub amount: Decimal,
}

/// Why one creation attempt failed.
enum AttemptError {
    /// The voucher number was already taken.
    Taken(DbErr),
    /// Lock or serialization conflict.
    Busy(DbErr),
    /// Not retryable.
    Failed(LedgerError),
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Taken(err) | Self::Busy(err) => write!(f, "{err}"),
            Self::Failed(err) => write!(f, "{err}"),
        }
    }
}

impl From<LedgerError> for AttemptError {
    fn from(err: LedgerError) -> Self {
        Self::Failed(err)
    }
}

fn classify(err: DbErr) -> AttemptError {
    if is_unique_violation(&err) {
        AttemptError::Taken(err)
    } else if is_lock_conflict(&err) {
        AttemptError::Busy(err)
    } else {
        AttemptError::Failed(db_err(err))
    }
}

/// Voucher repository.
#[derive(Debug, Clone)]
pub struct VoucherRepository {
    db: DatabaseConnection,
    config: LedgerConfig,
}

impl VoucherRepository {
    /// Creates a new voucher repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, config: LedgerConfig) -> Self {
        Self { db, config }
    }

    /// Creates a draft voucher.
    ///
    /// # Errors
    ///
    /// - validation errors on the first violated rule
    /// - `PeriodClosed` if the voucher date is in a closed period
    /// - `DuplicateVoucherNumber` when every numbering attempt collided
    /// - `NumberingConflict` (retryable) when the last attempt hit lock
    ///   contention
    /// - `SequenceExhausted` when the date has no four-digit number left
    pub async fn create(&self, input: &CreateVoucherInput) -> Result<Voucher, LedgerError> {
        let catalog = load_catalog(&self.db).await?;
        let validated = validate_voucher(input, &catalog).inspect_err(|e| {
            warn!(created_by = %input.created_by, error = %e, "voucher rejected");
        })?;
        self.create_validated(&validated, None).await
    }

    /// Creates a draft voucher from a per-type template.
    ///
    /// # Errors
    ///
    /// See [`VoucherRepository::create`]; also `InvalidInput` for a
    /// non-positive template amount.
    pub async fn create_from_template(
        &self,
        template: VoucherTemplate,
        voucher_date: NaiveDate,
        created_by: &str,
        description: Option<String>,
        cost_center: Option<&str>,
    ) -> Result<Voucher, LedgerError> {
        let input =
            template.into_input(voucher_date, created_by, description, cost_center, &self.config)?;
        self.create(&input).await
    }

    /// Inserts a validated voucher, retrying numbering conflicts.
    pub(crate) async fn create_validated(
        &self,
        validated: &ValidatedVoucher,
        link: Option<&DepreciationLink>,
    ) -> Result<Voucher, LedgerError> {
        let date = validated.voucher_date;
        let max_attempts = self.config.numbering_max_attempts.max(1);
        let mut contended = None;

        for attempt in 1..=max_attempts {
            match self.try_create(validated, link).await {
                Ok(voucher) => {
                    info!(
                        voucher_no = %voucher.voucher_no,
                        voucher_type = %voucher.voucher_type,
                        total = %voucher.total_debit,
                        attempt,
                        "voucher created"
                    );
                    return Ok(voucher);
                }
                Err(AttemptError::Taken(err)) => {
                    contended = None;
                    warn!(%date, attempt, error = %err, "voucher number taken, retrying");
                    // The failed attempt rolled the counter back; move it past
                    // the taken number.
                    if let Err(err) = allocate_seq(&self.db, date).await {
                        warn!(%date, error = %err, "could not advance voucher sequence");
                    }
                }
                Err(AttemptError::Busy(err)) => {
                    warn!(%date, attempt, error = %err, "voucher numbering contention, retrying");
                    contended = Some(err.to_string());
                    tokio::time::sleep(Duration::from_millis(10 * u64::from(attempt))).await;
                }
                Err(AttemptError::Failed(err)) => return Err(err),
            }
        }

        // Contention on the last attempt says nothing about free numbers.
        Err(match contended {
            Some(detail) => LedgerError::NumberingConflict(detail),
            None => LedgerError::DuplicateVoucherNumber {
                date,
                attempts: max_attempts,
            },
        })
    }

    async fn try_create(
        &self,
        validated: &ValidatedVoucher,
        link: Option<&DepreciationLink>,
    ) -> Result<Voucher, AttemptError> {
        let txn = self.db.begin().await.map_err(classify)?;

        let seq = allocate_seq(&txn, validated.voucher_date).await?;
        let voucher_no = VoucherNo::new(validated.voucher_date, seq)?.to_string();

        closing::ensure_posting_period(&txn, validated.voucher_date).await?;

        let created_at = Utc::now();
        let header = journal_header::ActiveModel {
            voucher_no: Set(voucher_no.clone()),
            voucher_date: Set(validated.voucher_date),
            voucher_type: Set(validated.voucher_type.into()),
            status: Set(sea_orm_active_enums::VoucherStatus::Draft),
            total_debit: Set(validated.totals.total_debit),
            total_credit: Set(validated.totals.total_credit),
            description: Set(validated.description.clone()),
            created_by: Set(validated.created_by.clone()),
            approved_by: Set(None),
            created_at: Set(created_at),
            approved_at: Set(None),
            needs_manual_invoice: Set(false),
        };
        journal_header::Entity::insert(header)
            .exec_without_returning(&txn)
            .await
            .map_err(classify)?;

        let details = validated
            .lines
            .iter()
            .map(|line| {
                Ok(journal_details::ActiveModel {
                    voucher_no: Set(voucher_no.clone()),
                    line_no: Set(to_i32(line.line_no, "line_no")?),
                    account_code: Set(line.account_code.clone()),
                    debit_amount: Set(line.debit_amount),
                    credit_amount: Set(line.credit_amount),
                    cost_center: Set(line.cost_center.clone()),
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;
        journal_details::Entity::insert_many(details)
            .exec_without_returning(&txn)
            .await
            .map_err(classify)?;

        if let Some(link) = link {
            let entry = depreciation_entry::ActiveModel {
                id: Set(Uuid::now_v7()),
                asset_code: Set(link.asset_code.clone()),
                voucher_no: Set(voucher_no.clone()),
                as_of_date: Set(link.as_of_date),
                amount: Set(link.amount),
                status: Set(DepreciationEntryStatus::Pending),
            };
            depreciation_entry::Entity::insert(entry)
                .exec_without_returning(&txn)
                .await
                .map_err(classify)?;
        }

        txn.commit().await.map_err(classify)?;

        Ok(Voucher {
            voucher_no,
            voucher_date: validated.voucher_date,
            voucher_type: validated.voucher_type,
            status: VoucherStatus::Draft,
            total_debit: validated.totals.total_debit,
            total_credit: validated.totals.total_credit,
            description: validated.description.clone(),
            created_by: validated.created_by.clone(),
            approved_by: None,
            created_at,
            approved_at: None,
            needs_manual_invoice: false,
            lines: validated.lines.clone(),
        })
    }

    /// Submits a draft voucher for approval.
    ///
    /// # Errors
    ///
    /// - `VoucherNotFound` for an unknown number
    /// - `InvalidTransition` unless the voucher is a draft
    pub async fn submit(&self, voucher_no: &str) -> Result<Voucher, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let result = journal_header::Entity::update_many()
            .set(journal_header::ActiveModel {
                status: Set(sea_orm_active_enums::VoucherStatus::Pending),
                ..Default::default()
            })
            .filter(journal_header::Column::VoucherNo.eq(voucher_no))
            .filter(journal_header::Column::Status.is_in(sources_of(VoucherStatus::Pending)))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(transition_failure(&txn, voucher_no, VoucherStatus::Pending).await);
        }

        let voucher = require_voucher(&txn, voucher_no).await?;
        txn.commit().await.map_err(db_err)?;

        info!(voucher_no, "voucher submitted");
        Ok(voucher)
    }

    /// Approves a pending voucher and produces its derived documents.
    ///
    /// In one transaction: the status moves to approved, the posting period
    /// is checked, the stored balance is re-verified, budget actuals are
    /// recomputed, a tax invoice is linked for sales/purchase vouchers and a
    /// depreciation voucher updates its asset.
    ///
    /// # Errors
    ///
    /// - `VoucherNotFound` / `InvalidTransition` if the voucher is not pending
    /// - `PeriodClosed` if its period is closed; the voucher stays pending
    /// - `Unbalanced` if the stored lines do not match the header totals
    pub async fn approve(
        &self,
        voucher_no: &str,
        approved_by: &str,
    ) -> Result<ApprovalOutcome, LedgerError> {
        let approved_by = approved_by.trim();
        if approved_by.is_empty() {
            return Err(LedgerError::MissingField("approved_by"));
        }
        let catalog = load_catalog(&self.db).await?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let result = journal_header::Entity::update_many()
            .set(journal_header::ActiveModel {
                status: Set(sea_orm_active_enums::VoucherStatus::Approved),
                approved_by: Set(Some(approved_by.to_string())),
                approved_at: Set(Some(Utc::now())),
                ..Default::default()
            })
            .filter(journal_header::Column::VoucherNo.eq(voucher_no))
            .filter(journal_header::Column::Status.is_in(sources_of(VoucherStatus::Approved)))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(transition_failure(&txn, voucher_no, VoucherStatus::Approved).await);
        }

        let mut voucher = require_voucher(&txn, voucher_no).await?;

        if let Err(e) = closing::ensure_open(&txn, voucher.voucher_date).await {
            warn!(voucher_no, error = %e, "approval rejected");
            return Err(e);
        }
        verify_stored_balance(voucher.totals(), &voucher.lines)?;

        budget::recompute_for_voucher(&txn, &catalog, &voucher).await?;
        let invoice = self.link_invoice(&txn, &catalog, &mut voucher).await?;
        fixed_asset::apply_for_voucher(&txn, voucher_no).await?;

        txn.commit().await.map_err(db_err)?;

        info!(voucher_no, approved_by, "voucher approved");
        Ok(ApprovalOutcome { voucher, invoice })
    }

    async fn link_invoice<C: ConnectionTrait>(
        &self,
        db: &C,
        catalog: &AccountCatalog,
        voucher: &mut Voucher,
    ) -> Result<InvoiceOutcome, LedgerError> {
        if !voucher.voucher_type.requires_tax_invoice() {
            return Ok(InvoiceOutcome::NotApplicable);
        }

        match link_tax_invoice(voucher, catalog, &self.config) {
            Ok(invoice) => {
                tax_invoice::insert_invoice(db, &invoice).await?;
                Ok(InvoiceOutcome::Issued { invoice })
            }
            Err(e @ LedgerError::Linkage { .. }) => {
                warn!(voucher_no = %voucher.voucher_no, error = %e, "tax invoice linkage failed, flagging voucher");
                tax_invoice::set_manual_flag(db, &voucher.voucher_no, true).await?;
                voucher.needs_manual_invoice = true;
                Ok(InvoiceOutcome::Flagged {
                    reason: e.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Cancels a draft or pending voucher.
    ///
    /// # Errors
    ///
    /// - `VoucherNotFound` for an unknown number
    /// - `InvalidTransition` if the voucher is approved or cancelled
    pub async fn cancel(&self, voucher_no: &str) -> Result<Voucher, LedgerError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let result = journal_header::Entity::update_many()
            .set(journal_header::ActiveModel {
                status: Set(sea_orm_active_enums::VoucherStatus::Cancelled),
                ..Default::default()
            })
            .filter(journal_header::Column::VoucherNo.eq(voucher_no))
            .filter(journal_header::Column::Status.is_in(sources_of(VoucherStatus::Cancelled)))
            .exec(&txn)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(transition_failure(&txn, voucher_no, VoucherStatus::Cancelled).await);
        }

        fixed_asset::cancel_for_voucher(&txn, voucher_no).await?;
        let voucher = require_voucher(&txn, voucher_no).await?;
        txn.commit().await.map_err(db_err)?;

        info!(voucher_no, "voucher cancelled");
        Ok(voucher)
    }

    /// Loads a voucher with its lines.
    ///
    /// # Errors
    ///
    /// `VoucherNotFound` for an unknown number.
    pub async fn get(&self, voucher_no: &str) -> Result<Voucher, LedgerError> {
        require_voucher(&self.db, voucher_no).await
    }
}

/// Bumps the per-date counter and returns the new sequence number.
async fn allocate_seq<C: ConnectionTrait>(db: &C, date: NaiveDate) -> Result<u32, AttemptError> {
    let first = voucher_sequence::ActiveModel {
        voucher_date: Set(date),
        last_seq: Set(1),
    };
    voucher_sequence::Entity::insert(first)
        .on_conflict(
            OnConflict::column(voucher_sequence::Column::VoucherDate)
                .value(
                    voucher_sequence::Column::LastSeq,
                    Expr::col((voucher_sequence::Entity, voucher_sequence::Column::LastSeq)).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(classify)?;

    let row = voucher_sequence::Entity::find_by_id(date)
        .one(db)
        .await
        .map_err(classify)?
        .ok_or_else(|| LedgerError::Internal(format!("voucher sequence for {date} vanished")))?;
    Ok(to_u32(row.last_seq, "last_seq")?)
}

/// Stored statuses a transition into `to` may start from.
fn sources_of(to: VoucherStatus) -> impl Iterator<Item = sea_orm_active_enums::VoucherStatus> {
    VoucherWorkflow::sources_of(to)
        .iter()
        .map(|status| sea_orm_active_enums::VoucherStatus::from(*status))
}

/// Explains why a conditional status update changed nothing.
async fn transition_failure<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
    to: VoucherStatus,
) -> LedgerError {
    match journal_header::Entity::find_by_id(voucher_no).one(db).await {
        Ok(Some(header)) => {
            let from = header.status.into();
            // A voucher that reached a source status after the update missed
            // it is still reported as it was read.
            VoucherWorkflow::transition(from, to)
                .err()
                .unwrap_or(LedgerError::InvalidTransition { from, to })
        }
        Ok(None) => LedgerError::VoucherNotFound(voucher_no.to_string()),
        Err(e) => db_err(e),
    }
}

pub(crate) async fn require_voucher<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
) -> Result<Voucher, LedgerError> {
    load_voucher(db, voucher_no)
        .await?
        .ok_or_else(|| LedgerError::VoucherNotFound(voucher_no.to_string()))
}

/// Loads a voucher header and its lines in line order.
pub(crate) async fn load_voucher<C: ConnectionTrait>(
    db: &C,
    voucher_no: &str,
) -> Result<Option<Voucher>, LedgerError> {
    let Some(header) = journal_header::Entity::find_by_id(voucher_no)
        .one(db)
        .await
        .map_err(db_err)?
    else {
        return Ok(None);
    };

    let lines = journal_details::Entity::find()
        .filter(journal_details::Column::VoucherNo.eq(voucher_no))
        .order_by_asc(journal_details::Column::LineNo)
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(model_to_line)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Some(header_to_voucher(header, lines)))
}

pub(crate) fn header_to_voucher(header: journal_header::Model, lines: Vec<JournalLine>) -> Voucher {
    Voucher {
        voucher_no: header.voucher_no,
        voucher_date: header.voucher_date,
        voucher_type: header.voucher_type.into(),
        status: header.status.into(),
        total_debit: header.total_debit,
        total_credit: header.total_credit,
        description: header.description,
        created_by: header.created_by,
        approved_by: header.approved_by,
        created_at: header.created_at,
        approved_at: header.approved_at,
        needs_manual_invoice: header.needs_manual_invoice,
        lines,
    }
}

fn model_to_line(model: journal_details::Model) -> Result<JournalLine, LedgerError> {
    Ok(JournalLine {
        line_no: to_u32(model.line_no, "line_no")?,
        account_code: model.account_code,
        debit_amount: model.debit_amount,
        credit_amount: model.credit_amount,
        cost_center: model.cost_center,
    })
}

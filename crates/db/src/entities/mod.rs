//! `SeaORM` entities for the ledger tables.
//!
//! Fields and variants mirror the table columns one to one and are not
//! documented individually.

#![allow(missing_docs)]

pub mod account_master;
pub mod budget_master;
pub mod closing_master;
pub mod depreciation_entry;
pub mod fixed_asset;
pub mod journal_details;
pub mod journal_header;
pub mod sea_orm_active_enums;
pub mod tax_invoice;
pub mod voucher_sequence;

//! Account repository for chart of accounts database operations.

use hoegye_core::LedgerError;
use hoegye_core::account::{Account, AccountCatalog, AccountType, NewAccount};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use super::error::{db_err, is_unique_violation, to_i32, to_u32};
use crate::entities::{account_master, sea_orm_active_enums};

/// Filter options for listing accounts.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    /// Only accounts of this type.
    pub account_type: Option<AccountType>,
    /// Only active accounts.
    pub active_only: bool,
    /// Only accounts that accept postings.
    pub postable_only: bool,
}

/// Account repository for chart of accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// - `MissingField` for a blank code or name
    /// - `DuplicateAccount` if the code exists
    /// - `InvalidParent` for a missing parent, a cycle or a type mismatch
    pub async fn create(&self, input: &NewAccount) -> Result<Account, LedgerError> {
        let catalog = load_catalog(&self.db).await?;
        let account = catalog.prepare(input)?;

        let model = account_master::ActiveModel {
            code: Set(account.code.clone()),
            name: Set(account.name.clone()),
            account_type: Set(account.account_type.into()),
            parent_code: Set(account.parent_code.clone()),
            level: Set(to_i32(account.level, "level")?),
            is_control: Set(account.is_control),
            is_active: Set(account.is_active),
        };
        model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                LedgerError::DuplicateAccount(account.code.clone())
            } else {
                db_err(e)
            }
        })?;

        info!(code = %account.code, level = account.level, "account added");
        Ok(account)
    }

    /// Marks an account inactive so it stops accepting postings.
    ///
    /// # Errors
    ///
    /// `AccountNotFound` for an unknown code.
    pub async fn deactivate(&self, code: &str) -> Result<Account, LedgerError> {
        let model = account_master::Entity::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;

        let mut active: account_master::ActiveModel = model.into();
        active.is_active = Set(false);
        let updated = active.update(&self.db).await.map_err(db_err)?;

        info!(code, "account deactivated");
        model_to_account(updated)
    }

    /// Finds an account by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<Account>, LedgerError> {
        account_master::Entity::find_by_id(code)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(model_to_account)
            .transpose()
    }

    /// Lists accounts in code order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, filter: &AccountFilter) -> Result<Vec<Account>, LedgerError> {
        let mut query = account_master::Entity::find();
        if let Some(account_type) = filter.account_type {
            query = query.filter(
                account_master::Column::AccountType
                    .eq(sea_orm_active_enums::AccountType::from(account_type)),
            );
        }
        if filter.active_only || filter.postable_only {
            query = query.filter(account_master::Column::IsActive.eq(true));
        }
        if filter.postable_only {
            query = query.filter(account_master::Column::IsControl.eq(false));
        }

        query
            .order_by_asc(account_master::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(model_to_account)
            .collect()
    }

    /// Loads the whole chart for validation.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn catalog(&self) -> Result<AccountCatalog, LedgerError> {
        load_catalog(&self.db).await
    }
}

/// Loads the chart of accounts into memory.
pub(crate) async fn load_catalog<C: ConnectionTrait>(db: &C) -> Result<AccountCatalog, LedgerError> {
    let accounts = account_master::Entity::find()
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(model_to_account)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(AccountCatalog::from_accounts(accounts))
}

fn model_to_account(model: account_master::Model) -> Result<Account, LedgerError> {
    Ok(Account {
        level: to_u32(model.level, "level")?,
        code: model.code,
        name: model.name,
        account_type: model.account_type.into(),
        parent_code: model.parent_code,
        is_control: model.is_control,
        is_active: model.is_active,
    })
}

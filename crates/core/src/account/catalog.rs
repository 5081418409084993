//! In-memory chart of accounts.

use std::collections::{BTreeMap, HashSet};

use super::types::{Account, AccountType, NewAccount};
use crate::error::LedgerError;

/// Chart of accounts keyed by code.
///
/// The repository loads the persisted chart into a catalog before validating
/// postings or new accounts, so every rule lives here rather than in SQL.
#[derive(Debug, Clone, Default)]
pub struct AccountCatalog {
    accounts: BTreeMap<String, Account>,
}

impl AccountCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog from already persisted accounts.
    #[must_use]
    pub fn from_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.code.clone(), account))
                .collect(),
        }
    }

    /// Validates a new account against the catalog and returns the account
    /// that would be stored, without inserting it.
    ///
    /// # Errors
    ///
    /// - `MissingField` when code or name is blank
    /// - `DuplicateAccount` when the code exists
    /// - `InvalidParent` when the parent is unknown, of a different type,
    ///   postable, or would make the account its own ancestor
    pub fn prepare(&self, input: &NewAccount) -> Result<Account, LedgerError> {
        let code = input.code.trim();
        if code.is_empty() {
            return Err(LedgerError::MissingField("code"));
        }
        if input.name.trim().is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        if self.accounts.contains_key(code) {
            return Err(LedgerError::DuplicateAccount(code.to_string()));
        }

        let parent_code = input
            .parent_code
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        let level = match parent_code {
            None => 1,
            Some(parent_code) => {
                let parent = self.check_parent(code, parent_code, input.account_type)?;
                parent.level + 1
            }
        };

        Ok(Account {
            code: code.to_string(),
            name: input.name.trim().to_string(),
            account_type: input.account_type,
            parent_code: parent_code.map(str::to_string),
            level,
            is_control: input.is_control,
            is_active: true,
        })
    }

    fn check_parent(
        &self,
        code: &str,
        parent_code: &str,
        account_type: AccountType,
    ) -> Result<&Account, LedgerError> {
        let invalid = |reason: String| LedgerError::InvalidParent {
            code: code.to_string(),
            reason,
        };

        if parent_code == code {
            return Err(invalid("an account cannot be its own parent".into()));
        }

        let parent = self
            .accounts
            .get(parent_code)
            .ok_or_else(|| invalid(format!("parent {parent_code} does not exist")))?;

        if parent.account_type != account_type {
            return Err(invalid(format!(
                "parent {parent_code} is {}, child is {account_type}",
                parent.account_type
            )));
        }

        // Postable accounts stay leaves.
        if !parent.is_control {
            return Err(invalid(format!(
                "parent {parent_code} is postable; only control accounts have children"
            )));
        }

        // Walk the ancestor chain; a corrupt chart could already loop.
        let mut seen = HashSet::new();
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node.code == code || !seen.insert(node.code.as_str()) {
                return Err(invalid(format!("parent {parent_code} would create a cycle")));
            }
            cursor = node
                .parent_code
                .as_deref()
                .and_then(|p| self.accounts.get(p));
        }

        Ok(parent)
    }

    /// Validates and inserts a new account.
    ///
    /// # Errors
    ///
    /// See [`AccountCatalog::prepare`].
    pub fn add(&mut self, input: &NewAccount) -> Result<Account, LedgerError> {
        let account = self.prepare(input)?;
        self.accounts.insert(account.code.clone(), account.clone());
        Ok(account)
    }

    /// Marks an account inactive.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for unknown codes.
    pub fn deactivate(&mut self, code: &str) -> Result<&Account, LedgerError> {
        let account = self
            .accounts
            .get_mut(code)
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        account.is_active = false;
        Ok(account)
    }

    /// Returns false for unknown, control or inactive accounts.
    #[must_use]
    pub fn is_postable(&self, code: &str) -> bool {
        self.accounts.get(code).is_some_and(Account::is_postable)
    }

    /// Looks up an account.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Account> {
        self.accounts.get(code)
    }

    /// Type of an account, if known.
    #[must_use]
    pub fn account_type(&self, code: &str) -> Option<AccountType> {
        self.accounts.get(code).map(|a| a.account_type)
    }

    /// Accounts in code order.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true when the catalog holds no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(code: &str, account_type: AccountType, parent: Option<&str>, control: bool) -> NewAccount {
        NewAccount {
            code: code.to_string(),
            name: format!("Account {code}"),
            account_type,
            parent_code: parent.map(str::to_string),
            is_control: control,
        }
    }

    fn sample_catalog() -> AccountCatalog {
        let mut catalog = AccountCatalog::new();
        catalog.add(&new_account("1", AccountType::Asset, None, true)).unwrap();
        catalog.add(&new_account("11", AccountType::Asset, Some("1"), true)).unwrap();
        catalog.add(&new_account("111", AccountType::Asset, Some("11"), false)).unwrap();
        catalog.add(&new_account("4", AccountType::Revenue, None, true)).unwrap();
        catalog.add(&new_account("410", AccountType::Revenue, Some("4"), false)).unwrap();
        catalog
    }

    #[test]
    fn test_levels_follow_parent_depth() {
        let catalog = sample_catalog();
        assert_eq!(catalog.get("1").unwrap().level, 1);
        assert_eq!(catalog.get("11").unwrap().level, 2);
        assert_eq!(catalog.get("111").unwrap().level, 3);
        assert_eq!(catalog.get("410").unwrap().level, 2);
    }

    #[test]
    fn test_postable_only_for_active_leaves() {
        let mut catalog = sample_catalog();
        assert!(catalog.is_postable("111"));
        assert!(!catalog.is_postable("11"));
        assert!(!catalog.is_postable("999"));

        catalog.deactivate("111").unwrap();
        assert!(!catalog.is_postable("111"));
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let catalog = sample_catalog();
        let err = catalog
            .prepare(&new_account("120", AccountType::Asset, Some("12"), false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParent { .. }));
    }

    #[test]
    fn test_self_parent_rejected() {
        let catalog = sample_catalog();
        let err = catalog
            .prepare(&new_account("120", AccountType::Asset, Some("120"), false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParent { .. }));
    }

    #[test]
    fn test_cyclic_chart_rejected() {
        // A chart loaded from storage with a loop between 7 and 8.
        let looped = |code: &str, parent: &str| Account {
            code: code.to_string(),
            name: code.to_string(),
            account_type: AccountType::Expense,
            parent_code: Some(parent.to_string()),
            level: 2,
            is_control: true,
            is_active: true,
        };
        let catalog = AccountCatalog::from_accounts([looped("7", "8"), looped("8", "7")]);
        let err = catalog
            .prepare(&new_account("70", AccountType::Expense, Some("7"), false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParent { .. }));
    }

    #[test]
    fn test_parent_type_mismatch_rejected() {
        let catalog = sample_catalog();
        let err = catalog
            .prepare(&new_account("412", AccountType::Expense, Some("4"), false))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidParent { .. }));
    }

    #[test]
    fn test_postable_parent_rejected() {
        let mut catalog = sample_catalog();
        let err = catalog
            .add(&new_account("1111", AccountType::Asset, Some("111"), false))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InvalidParent { ref code, ref reason }
                if code == "1111" && reason.contains("postable")
        ));
        assert!(catalog.is_postable("111"));
        assert!(catalog.get("1111").is_none());
    }

    #[test]
    fn test_duplicate_and_blank_codes() {
        let mut catalog = sample_catalog();
        assert!(matches!(
            catalog.add(&new_account("111", AccountType::Asset, Some("11"), false)),
            Err(LedgerError::DuplicateAccount(code)) if code == "111"
        ));
        assert!(matches!(
            catalog.add(&new_account("  ", AccountType::Asset, None, false)),
            Err(LedgerError::MissingField("code"))
        ));
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_iter_in_code_order() {
        let catalog = sample_catalog();
        let codes: Vec<_> = catalog.iter().map(|a| a.code.as_str()).collect();
        assert_eq!(codes, vec!["1", "11", "111", "4", "410"]);
    }
}

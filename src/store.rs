use std::collections::HashMap;

use crate::{Account, AccountId};

/// Possible errors to occur while persisting ledger state
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Account {0} is not known to the store")]
    UnknownAccount(AccountId),
    #[error("The store rejected the write: {0}")]
    Rejected(String),
}

/// Persistence of account balances
///
/// Lookups hand out owned copies. A copy only replaces the stored record
/// through [`LedgerStore::update_account_state`].
pub trait LedgerStore {
    fn find_account_by_id(&self, id: AccountId) -> Option<Account>;

    fn update_account_state(&mut self, account: &Account) -> Result<(), StoreError>;
}

/// A ledger store keeping all accounts in memory
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: HashMap<AccountId, Account>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::new(),
        }
    }

    /// Adds or replaces an account
    pub fn insert(&mut self, account: Account) {
        self.accounts.insert(account.id(), account);
    }

    /// The map of all current accounts
    pub fn accounts(&self) -> &HashMap<AccountId, Account> {
        &self.accounts
    }
}

impl FromIterator<Account> for MemoryLedger {
    fn from_iter<I: IntoIterator<Item = Account>>(iter: I) -> Self {
        Self {
            accounts: iter
                .into_iter()
                .map(|account| (account.id(), account))
                .collect(),
        }
    }
}

impl LedgerStore for MemoryLedger {
    fn find_account_by_id(&self, id: AccountId) -> Option<Account> {
        self.accounts.get(&id).cloned()
    }

    fn update_account_state(&mut self, account: &Account) -> Result<(), StoreError> {
        let stored = self.accounts
            .get_mut(&account.id())
            .ok_or(StoreError::UnknownAccount(account.id()))?;
        *stored = account.clone();

        Ok(())
    }
}

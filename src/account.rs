use fixed::types::I51F13;

use crate::user::UserId;

/// A monetary amount
///
/// Amounts are signed so that invalid (non-positive) requests can still be
/// expressed and rejected. Balances themselves never go below zero.
pub type Amount = I51F13;

/// Possible errors to occur during account operations
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("The account does not hold enough funds")]
    InsufficientFunds,
    #[error("The account balance would overflow")]
    Overflow,
    #[error("An account cannot be opened with a negative balance of {0}")]
    NegativeBalance(Amount),
}

/// The unique identifier of an account
#[derive(
    Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct AccountId(u32);

impl AccountId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A ledger account
///
/// Records are handed out by the ledger store as owned copies. Changes made
/// through [`Account::credit`] and [`Account::debit`] only become durable once
/// the account is persisted again.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Account {
    id: AccountId,
    owner: UserId,
    balance: Amount,
}

impl Account {
    /// Creates a new empty account owned by `owner`
    pub fn new(id: AccountId, owner: UserId) -> Self {
        Self {
            id,
            owner,
            balance: Amount::ZERO,
        }
    }

    /// Creates an account with an opening balance
    pub fn with_balance(
        id: AccountId,
        owner: UserId,
        balance: Amount,
    ) -> Result<Self, AccountError> {
        if balance < Amount::ZERO {
            return Err(AccountError::NegativeBalance(balance));
        }

        Ok(Self { id, owner, balance })
    }

    /// The identifier of the account
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The user owning the account
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// The current balance
    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Adds the specified amount to the balance
    pub fn credit(&mut self, amount: Amount) -> Result<(), AccountError> {
        let balance = self.balance
            .checked_add(amount)
            .ok_or(AccountError::Overflow)?;
        if balance < Amount::ZERO {
            return Err(AccountError::InsufficientFunds);
        }
        self.balance = balance;

        Ok(())
    }

    /// Takes the specified amount from the balance
    pub fn debit(&mut self, amount: Amount) -> Result<(), AccountError> {
        let balance = self.balance
            .checked_sub(amount)
            .ok_or(AccountError::Overflow)?;
        if balance < Amount::ZERO {
            return Err(AccountError::InsufficientFunds);
        }
        self.balance = balance;

        Ok(())
    }
}

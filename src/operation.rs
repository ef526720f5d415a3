use crate::{Account, AccountId, Amount, User, UserId};

/// The different kinds of operations recorded by the ledger
#[derive(Clone, Copy, Debug, serde::Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A credit to an account, including the credit leg of a transfer
    PaymentIn,
    /// A debit from an account, including the debit leg of a transfer
    Withdraw,
    /// Interest credited by the interest operator
    Interest,
    /// A login attempt
    LogIn,
    /// A logout
    LogOut,
}

/// An attempted operation
///
/// Operations are built once per attempt and never changed afterwards. They
/// are handed to the audit log together with the outcome of the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Operation {
    kind: OperationKind,
    /// The user performing the operation, absent for failed logins of unknown users
    user: Option<UserId>,
    /// The user the operation is performed on behalf of
    owner: Option<UserId>,
    amount: Amount,
    description: String,
    account: Option<AccountId>,
}

impl Operation {
    /// A credit of `amount` to `account`
    pub fn payment_in(
        user: &User,
        amount: Amount,
        description: impl Into<String>,
        account: &Account,
    ) -> Self {
        Self::on_account(OperationKind::PaymentIn, user, amount, description, account)
    }

    /// A debit of `amount` from `account`
    ///
    /// The declared owner is the owner of the account, so authorization can
    /// tell whether the acting user is taking their own money.
    pub fn withdraw(
        user: &User,
        amount: Amount,
        description: impl Into<String>,
        account: &Account,
    ) -> Self {
        Self::on_account(OperationKind::Withdraw, user, amount, description, account)
    }

    /// Interest of `amount` credited to `account`
    pub fn interest(
        user: &User,
        amount: Amount,
        description: impl Into<String>,
        account: &Account,
    ) -> Self {
        Self::on_account(OperationKind::Interest, user, amount, description, account)
    }

    pub fn log_in(user: Option<&User>, description: impl Into<String>) -> Self {
        let user = user.map(User::id);
        Self {
            kind: OperationKind::LogIn,
            user,
            owner: user,
            amount: Amount::ZERO,
            description: description.into(),
            account: None,
        }
    }

    pub fn log_out(user: &User) -> Self {
        Self {
            kind: OperationKind::LogOut,
            user: Some(user.id()),
            owner: Some(user.id()),
            amount: Amount::ZERO,
            description: String::from("Logout"),
            account: None,
        }
    }

    fn on_account(
        kind: OperationKind,
        user: &User,
        amount: Amount,
        description: impl Into<String>,
        account: &Account,
    ) -> Self {
        Self {
            kind,
            user: Some(user.id()),
            owner: Some(account.owner()),
            amount,
            description: description.into(),
            account: Some(account.id()),
        }
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The acting user
    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    /// The user the operation is performed on behalf of
    pub fn owner(&self) -> Option<UserId> {
        self.owner
    }

    /// The amount
    /// Zero for logins and logouts
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The account the operation targets, if any
    pub fn account(&self) -> Option<AccountId> {
        self.account
    }
}

use crate::{
    AccountId, Amount, AuditLog, Authorizer, EngineConfig, LedgerStore, Operation,
    TransactionEngine, TransactionError, UserDirectory, ValidationError,
};

const DESCRIPTION: &str = "Interest ...";
const BASIS_POINTS: i64 = 10_000;

/// Possible errors to occur while paying interest
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InterestError {
    #[error("The interest operator user {0:?} does not exist")]
    OperatorMissing(String),
    #[error("The interest for account {0} would overflow")]
    Overflow(AccountId),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Pays interest into accounts
///
/// Interest is computed from the current balance and credited through the
/// ordinary credit path, acting as a dedicated operator user. When and how
/// often this runs is up to the caller.
///
/// The rate is kept in basis points so that decimal rates like 20 % are
/// exact. Interest is `balance * rate_bps / 10_000`, rounded towards zero.
#[derive(Clone, Debug)]
pub struct InterestOperator {
    rate_bps: u32,
    operator: String,
}

impl InterestOperator {
    pub fn new(rate_bps: u32, operator: impl Into<String>) -> Self {
        Self {
            rate_bps,
            operator: operator.into(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.interest_rate_bps, config.interest_operator.clone())
    }

    /// The interest due on `balance`, or `None` on overflow
    pub fn interest_on(&self, balance: Amount) -> Option<Amount> {
        balance
            .checked_mul_int(i64::from(self.rate_bps))?
            .checked_div_int(BASIS_POINTS)
    }

    /// Credits interest to the account and returns the amount paid
    ///
    /// An account without balance earns nothing and leaves no trace in the
    /// audit log.
    pub fn apply<S, A, L>(
        &self,
        engine: &mut TransactionEngine<S, A, L>,
        directory: &impl UserDirectory,
        account_id: AccountId,
    ) -> Result<Amount, InterestError>
    where
        S: LedgerStore,
        A: Authorizer,
        L: AuditLog,
    {
        let operator = directory
            .find_user_by_name(&self.operator)
            .ok_or_else(|| InterestError::OperatorMissing(self.operator.clone()))?;
        let account = engine
            .ledger()
            .find_account_by_id(account_id)
            .ok_or(TransactionError::Validation(ValidationError::AccountNotFound(account_id)))?;
        let interest = self
            .interest_on(account.balance())
            .ok_or(InterestError::Overflow(account_id))?;
        if interest <= Amount::ZERO {
            tracing::debug!(account = %account_id, "no interest due");
            return Ok(Amount::ZERO);
        }

        let result = engine.credit_account(Some(&operator), interest, DESCRIPTION, account_id);
        let operation = Operation::interest(&operator, interest, DESCRIPTION, &account);
        engine.audit().log_operation(&operation, result.is_ok());
        result?;

        tracing::info!(account = %account_id, %interest, "interest paid");
        Ok(interest)
    }
}

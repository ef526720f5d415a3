use crate::{
    Account, AccountError, AccountId, Amount, AuditLog, Authorizer, LedgerStore, Operation,
    StoreError, User, UserId,
};

/// Input rejected before anything was attempted
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No acting user was given")]
    MissingUser,
    #[error("The amount must be greater than zero, got {0}")]
    NonPositiveAmount(Amount),
    #[error("Account {0} was not found")]
    AccountNotFound(AccountId),
    #[error("Cannot transfer from account {0} to itself")]
    SameAccount(AccountId),
}

/// Possible errors to occur during the execution of an operation
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User {user} is not allowed to withdraw from account {account}")]
    Unauthorized { user: UserId, account: AccountId },
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("Failed to persist account {account}")]
    Persistence {
        account: AccountId,
        #[source]
        source: StoreError,
    },
}

impl TransactionError {
    /// Whether the operation got past input validation
    ///
    /// `false` means nothing was attempted: no authorization, no balance
    /// change and no audit record.
    pub fn was_attempted(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

/// The central transaction engine
///
/// Moves money between accounts held by the ledger store, checks withdrawals
/// with the authorizer and reports attempts to the audit log. Every public
/// operation runs to completion before returning. There is no locking:
/// callers have to serialize access to the same account themselves.
#[derive(Debug)]
pub struct TransactionEngine<S, A, L> {
    ledger: S,
    authorizer: A,
    audit: L,
}

impl<S, A, L> TransactionEngine<S, A, L>
where
    S: LedgerStore,
    A: Authorizer,
    L: AuditLog,
{
    pub fn new(ledger: S, authorizer: A, audit: L) -> Self {
        Self {
            ledger,
            authorizer,
            audit,
        }
    }

    pub fn ledger(&self) -> &S {
        &self.ledger
    }

    pub fn audit(&self) -> &L {
        &self.audit
    }

    pub fn into_parts(self) -> (S, A, L) {
        (self.ledger, self.authorizer, self.audit)
    }

    /// Credits `amount` to the account
    ///
    /// Crediting is never restricted by the authorizer. A failing in-memory
    /// credit is recorded as a failed operation. A failing persist is rolled
    /// back and not recorded.
    pub fn credit_account(
        &mut self,
        user: Option<&User>,
        amount: Amount,
        description: &str,
        account_id: AccountId,
    ) -> Result<(), TransactionError> {
        let user = user.ok_or(ValidationError::MissingUser)?;
        check_amount(amount)?;
        let mut account = self.find_account(account_id)?;
        let operation = Operation::payment_in(user, amount, description, &account);

        if let Err(error) = account.credit(amount) {
            self.audit.log_operation(&operation, false);
            return Err(error.into());
        }
        if let Err(source) = self.ledger.update_account_state(&account) {
            tracing::warn!(
                account = %account_id,
                %source,
                "persisting credit failed, rolling back",
            );
            revert_credit(&mut account, amount);
            return Err(TransactionError::Persistence { account: account_id, source });
        }

        tracing::debug!(account = %account_id, %amount, "credited");
        self.audit.log_operation(&operation, true);
        Ok(())
    }

    /// Debits `amount` from the account
    ///
    /// Insufficient funds and failing persists are not recorded in the audit
    /// log; unauthorized attempts are.
    pub fn debit_account(
        &mut self,
        user: Option<&User>,
        amount: Amount,
        description: &str,
        account_id: AccountId,
    ) -> Result<(), TransactionError> {
        let user = user.ok_or(ValidationError::MissingUser)?;
        check_amount(amount)?;
        let mut account = self.find_account(account_id)?;
        let operation = Operation::withdraw(user, amount, description, &account);
        self.authorize(&operation, user, account_id)?;

        account.debit(amount)?;
        if let Err(source) = self.ledger.update_account_state(&account) {
            tracing::warn!(account = %account_id, %source, "persisting debit failed, rolling back");
            revert_debit(&mut account, amount);
            return Err(TransactionError::Persistence { account: account_id, source });
        }

        tracing::debug!(account = %account_id, %amount, "debited");
        self.audit.log_operation(&operation, true);
        Ok(())
    }

    /// Moves `amount` from one account to another
    ///
    /// Both accounts are looked up before either lookup is checked. Once
    /// authorization passed, the debit leg is always recorded with the
    /// overall outcome; the credit leg only when the whole transfer
    /// succeeded.
    pub fn transfer_internal(
        &mut self,
        user: Option<&User>,
        amount: Amount,
        description: &str,
        source_id: AccountId,
        destination_id: AccountId,
    ) -> Result<(), TransactionError> {
        let user = user.ok_or(ValidationError::MissingUser)?;
        check_amount(amount)?;
        if source_id == destination_id {
            return Err(ValidationError::SameAccount(source_id).into());
        }

        let source = self.ledger.find_account_by_id(source_id);
        let destination = self.ledger.find_account_by_id(destination_id);
        let (mut source, mut destination) = match (source, destination) {
            (Some(source), Some(destination)) => (source, destination),
            (None, _) => return Err(ValidationError::AccountNotFound(source_id).into()),
            (_, None) => return Err(ValidationError::AccountNotFound(destination_id).into()),
        };

        let withdraw = Operation::withdraw(user, amount, description, &source);
        let payment = Operation::payment_in(user, amount, description, &destination);
        self.authorize(&withdraw, user, source_id)?;

        let result = self.move_funds(&mut source, &mut destination, amount);
        self.audit.log_operation(&withdraw, result.is_ok());
        if result.is_ok() {
            tracing::debug!(
                source = %source_id,
                destination = %destination_id,
                %amount,
                "transferred",
            );
            self.audit.log_operation(&payment, true);
        }

        result
    }

    fn move_funds(
        &mut self,
        source: &mut Account,
        destination: &mut Account,
        amount: Amount,
    ) -> Result<(), TransactionError> {
        source.debit(amount)?;
        if let Err(error) = destination.credit(amount) {
            revert_debit(source, amount);
            return Err(error.into());
        }

        if let Err(error) = self.ledger.update_account_state(source) {
            tracing::warn!(
                account = %source.id(),
                %error,
                "persisting transfer source failed, rolling back",
            );
            revert_credit(destination, amount);
            revert_debit(source, amount);
            return Err(TransactionError::Persistence { account: source.id(), source: error });
        }
        if let Err(error) = self.ledger.update_account_state(destination) {
            tracing::warn!(
                account = %destination.id(),
                %error,
                "persisting transfer destination failed, rolling back",
            );
            revert_credit(destination, amount);
            revert_debit(source, amount);
            // the source was already written, restore it
            if let Err(compensation) = self.ledger.update_account_state(source) {
                tracing::error!(
                    account = %source.id(),
                    error = %compensation,
                    "failed to restore transfer source",
                );
            }
            return Err(TransactionError::Persistence { account: destination.id(), source: error });
        }

        Ok(())
    }

    fn find_account(&self, id: AccountId) -> Result<Account, ValidationError> {
        self.ledger
            .find_account_by_id(id)
            .ok_or(ValidationError::AccountNotFound(id))
    }

    fn authorize(
        &self,
        operation: &Operation,
        user: &User,
        account: AccountId,
    ) -> Result<(), TransactionError> {
        if self.authorizer.can_invoke_operation(operation, user) {
            return Ok(());
        }

        self.audit.log_unauthorized_operation(operation, false);
        Err(TransactionError::Unauthorized { user: user.id(), account })
    }
}

fn check_amount(amount: Amount) -> Result<(), ValidationError> {
    match amount > Amount::ZERO {
        true => Ok(()),
        false => Err(ValidationError::NonPositiveAmount(amount)),
    }
}

fn revert_credit(account: &mut Account, amount: Amount) {
    if let Err(error) = account.debit(amount) {
        tracing::error!(account = %account.id(), %error, "failed to revert credit");
    }
}

fn revert_debit(account: &mut Account, amount: Amount) {
    if let Err(error) = account.credit(amount) {
        tracing::error!(account = %account.id(), %error, "failed to revert debit");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;
    use crate::{
        AuditChannel, AuditRecord, History, MemoryLedger, MemoryOperationStore, OperationKind, Role,
        RoleAuthorizer,
    };

    const ALICE_ACCOUNT: AccountId = AccountId::new(1);
    const BOB_ACCOUNT: AccountId = AccountId::new(2);
    const FULL_ACCOUNT: AccountId = AccountId::new(3);
    const UNKNOWN_ACCOUNT: AccountId = AccountId::new(99);

    /// A ledger that remembers every call and fails writes on demand
    #[derive(Default)]
    struct TestLedger {
        inner: MemoryLedger,
        lookups: RefCell<Vec<AccountId>>,
        updates: Vec<AccountId>,
        failing: HashSet<AccountId>,
    }

    impl LedgerStore for TestLedger {
        fn find_account_by_id(&self, id: AccountId) -> Option<Account> {
            self.lookups.borrow_mut().push(id);
            self.inner.find_account_by_id(id)
        }

        fn update_account_state(&mut self, account: &Account) -> Result<(), StoreError> {
            self.updates.push(account.id());
            if self.failing.contains(&account.id()) {
                return Err(StoreError::Rejected(String::from("injected")));
            }
            self.inner.update_account_state(account)
        }
    }

    type Engine = TransactionEngine<TestLedger, RoleAuthorizer, History<MemoryOperationStore>>;

    fn alice() -> User {
        User::new(UserId::new(1), "alice", Role::new("User"))
    }

    fn bob() -> User {
        User::new(UserId::new(2), "bob", Role::new("User"))
    }

    fn admin() -> User {
        User::new(UserId::new(9), "admin", Role::new("Admin"))
    }

    fn amount(value: i32) -> Amount {
        Amount::from_num(value)
    }

    fn engine() -> Engine {
        let mut ledger = TestLedger::default();
        for (id, owner, balance) in [
            (ALICE_ACCOUNT, 1, amount(500)),
            (BOB_ACCOUNT, 2, amount(100)),
            (FULL_ACCOUNT, 1, Amount::MAX),
        ] {
            let account = Account::with_balance(id, UserId::new(owner), balance).unwrap();
            ledger.inner.insert(account);
        }

        TransactionEngine::new(
            ledger,
            RoleAuthorizer::default(),
            History::new(MemoryOperationStore::new()),
        )
    }

    fn failing(mut engine: Engine, account: AccountId) -> Engine {
        engine.ledger.failing.insert(account);
        engine
    }

    fn balance(engine: &Engine, account: AccountId) -> Amount {
        engine.ledger().inner.accounts()[&account].balance()
    }

    fn records(engine: &Engine) -> Vec<AuditRecord> {
        engine.audit().store().records()
    }

    fn summary(engine: &Engine) -> Vec<(AuditChannel, OperationKind, bool)> {
        records(engine)
            .iter()
            .map(|record| (record.channel, record.operation.kind(), record.success))
            .collect()
    }

    #[test]
    fn credit() {
        let mut engine = engine();
        engine.credit_account(Some(&bob()), amount(123), "deposit", ALICE_ACCOUNT).unwrap();

        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(623));
        assert_eq!(engine.ledger().updates, vec![ALICE_ACCOUNT]);
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::PaymentIn, true)],
        );
        let record = &records(&engine)[0];
        assert_eq!(record.operation.amount(), amount(123));
        assert_eq!(record.operation.description(), "deposit");
        assert_eq!(record.operation.account(), Some(ALICE_ACCOUNT));
    }

    #[test]
    fn credit_without_user() {
        let mut engine = engine();
        let result = engine.credit_account(None, amount(123), "deposit", ALICE_ACCOUNT);

        assert_eq!(result, Err(TransactionError::from(ValidationError::MissingUser)));
        assert!(engine.ledger().lookups.borrow().is_empty());
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn credit_unknown_account() {
        let mut engine = engine();
        let result = engine.credit_account(Some(&alice()), amount(123), "deposit", UNKNOWN_ACCOUNT);

        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::AccountNotFound(UNKNOWN_ACCOUNT))),
        );
        assert!(engine.ledger().updates.is_empty());
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn credit_persistence_failure_is_rolled_back() {
        let mut engine = failing(engine(), ALICE_ACCOUNT);
        let result = engine.credit_account(Some(&alice()), amount(123), "deposit", ALICE_ACCOUNT);

        assert!(matches!(
            result,
            Err(TransactionError::Persistence { account: ALICE_ACCOUNT, .. })
        ));
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert_eq!(engine.ledger().updates, vec![ALICE_ACCOUNT]);
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn credit_overflow_is_recorded_as_failure() {
        let mut engine = engine();
        let result = engine.credit_account(Some(&alice()), amount(1), "deposit", FULL_ACCOUNT);

        assert_eq!(result, Err(TransactionError::from(AccountError::Overflow)));
        assert_eq!(balance(&engine, FULL_ACCOUNT), Amount::MAX);
        assert!(engine.ledger().updates.is_empty());
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::PaymentIn, false)],
        );
    }

    #[test]
    fn debit_by_owner() {
        let mut engine = engine();
        engine.debit_account(Some(&alice()), amount(123), "cash", ALICE_ACCOUNT).unwrap();

        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(377));
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, true)],
        );
    }

    #[test]
    fn debit_by_admin_on_foreign_account() {
        let mut engine = engine();
        engine.debit_account(Some(&admin()), amount(100), "cash", BOB_ACCOUNT).unwrap();

        assert_eq!(balance(&engine, BOB_ACCOUNT), Amount::ZERO);
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, true)],
        );
    }

    #[test]
    fn debit_insufficient_funds_is_not_recorded() {
        let mut engine = engine();
        let result = engine.debit_account(Some(&bob()), amount(123), "cash", BOB_ACCOUNT);

        assert_eq!(result, Err(TransactionError::from(AccountError::InsufficientFunds)));
        assert_eq!(balance(&engine, BOB_ACCOUNT), amount(100));
        assert!(engine.ledger().updates.is_empty());
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn debit_on_foreign_account_is_unauthorized() {
        let mut engine = engine();
        let result = engine.debit_account(Some(&bob()), amount(50), "cash", ALICE_ACCOUNT);

        assert_eq!(
            result,
            Err(TransactionError::Unauthorized { user: UserId::new(2), account: ALICE_ACCOUNT }),
        );
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert!(engine.ledger().updates.is_empty());
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Unauthorized, OperationKind::Withdraw, false)],
        );
    }

    #[test]
    fn debit_rejects_invalid_input_before_lookup() {
        let mut engine = engine();

        let result = engine.debit_account(None, amount(10), "cash", ALICE_ACCOUNT);
        assert_eq!(result, Err(TransactionError::from(ValidationError::MissingUser)));
        let result = engine.debit_account(Some(&alice()), amount(0), "cash", ALICE_ACCOUNT);
        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::NonPositiveAmount(amount(0)))),
        );
        assert!(!result.unwrap_err().was_attempted());

        assert!(engine.ledger().lookups.borrow().is_empty());
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn debit_unknown_account() {
        let mut engine = engine();
        let result = engine.debit_account(Some(&alice()), amount(10), "cash", UNKNOWN_ACCOUNT);

        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::AccountNotFound(UNKNOWN_ACCOUNT))),
        );
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn debit_persistence_failure_is_rolled_back() {
        let mut engine = failing(engine(), ALICE_ACCOUNT);
        let result = engine.debit_account(Some(&alice()), amount(123), "cash", ALICE_ACCOUNT);

        let error = result.unwrap_err();
        assert!(error.was_attempted());
        assert!(matches!(error, TransactionError::Persistence { account: ALICE_ACCOUNT, .. }));
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn transfer() {
        let mut engine = engine();
        engine
            .transfer_internal(Some(&alice()), amount(123), "rent", ALICE_ACCOUNT, BOB_ACCOUNT)
            .unwrap();

        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(377));
        assert_eq!(balance(&engine, BOB_ACCOUNT), amount(223));
        assert_eq!(engine.ledger().updates, vec![ALICE_ACCOUNT, BOB_ACCOUNT]);
        assert_eq!(summary(&engine), vec![
            (AuditChannel::Operation, OperationKind::Withdraw, true),
            (AuditChannel::Operation, OperationKind::PaymentIn, true),
        ]);
        let records = records(&engine);
        assert_eq!(records[0].operation.account(), Some(ALICE_ACCOUNT));
        assert_eq!(records[1].operation.account(), Some(BOB_ACCOUNT));
    }

    #[test]
    fn transfer_insufficient_funds_records_only_the_debit_leg() {
        let mut engine = engine();
        let result =
            engine.transfer_internal(Some(&bob()), amount(123), "rent", BOB_ACCOUNT, ALICE_ACCOUNT);

        assert_eq!(result, Err(TransactionError::from(AccountError::InsufficientFunds)));
        assert_eq!(balance(&engine, BOB_ACCOUNT), amount(100));
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert!(engine.ledger().updates.is_empty());
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, false)],
        );
    }

    #[test]
    fn transfer_overflowing_destination() {
        let mut engine = engine();
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(1),
            "top up",
            ALICE_ACCOUNT,
            FULL_ACCOUNT,
        );

        assert_eq!(result, Err(TransactionError::from(AccountError::Overflow)));
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert!(engine.ledger().updates.is_empty());
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, false)],
        );
    }

    #[test]
    fn transfer_looks_up_both_accounts() {
        let mut engine = engine();
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(10),
            "rent",
            UNKNOWN_ACCOUNT,
            BOB_ACCOUNT,
        );

        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::AccountNotFound(UNKNOWN_ACCOUNT))),
        );
        assert_eq!(*engine.ledger().lookups.borrow(), vec![UNKNOWN_ACCOUNT, BOB_ACCOUNT]);
        assert!(records(&engine).is_empty());

        let mut engine = self::engine();
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(10),
            "rent",
            ALICE_ACCOUNT,
            UNKNOWN_ACCOUNT,
        );

        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::AccountNotFound(UNKNOWN_ACCOUNT))),
        );
        assert_eq!(*engine.ledger().lookups.borrow(), vec![ALICE_ACCOUNT, UNKNOWN_ACCOUNT]);
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn transfer_from_foreign_account_is_unauthorized() {
        let mut engine = engine();
        let result =
            engine.transfer_internal(Some(&bob()), amount(10), "rent", ALICE_ACCOUNT, BOB_ACCOUNT);

        assert_eq!(
            result,
            Err(TransactionError::Unauthorized { user: UserId::new(2), account: ALICE_ACCOUNT }),
        );
        assert!(engine.ledger().updates.is_empty());
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Unauthorized, OperationKind::Withdraw, false)],
        );
    }

    #[test]
    fn transfer_rejects_invalid_input() {
        let mut engine = engine();

        let result = engine.transfer_internal(None, amount(10), "rent", ALICE_ACCOUNT, BOB_ACCOUNT);
        assert_eq!(result, Err(TransactionError::from(ValidationError::MissingUser)));
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(-10),
            "rent",
            ALICE_ACCOUNT,
            BOB_ACCOUNT,
        );
        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::NonPositiveAmount(amount(-10)))),
        );
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(10),
            "rent",
            ALICE_ACCOUNT,
            ALICE_ACCOUNT,
        );
        assert_eq!(
            result,
            Err(TransactionError::from(ValidationError::SameAccount(ALICE_ACCOUNT))),
        );

        assert!(engine.ledger().lookups.borrow().is_empty());
        assert!(records(&engine).is_empty());
    }

    #[test]
    fn transfer_source_persistence_failure() {
        let mut engine = failing(engine(), ALICE_ACCOUNT);
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(123),
            "rent",
            ALICE_ACCOUNT,
            BOB_ACCOUNT,
        );

        assert!(matches!(
            result,
            Err(TransactionError::Persistence { account: ALICE_ACCOUNT, .. })
        ));
        assert_eq!(engine.ledger().updates, vec![ALICE_ACCOUNT]);
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert_eq!(balance(&engine, BOB_ACCOUNT), amount(100));
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, false)],
        );
    }

    #[test]
    fn transfer_destination_persistence_failure_restores_source() {
        let mut engine = failing(engine(), BOB_ACCOUNT);
        let result = engine.transfer_internal(
            Some(&alice()),
            amount(123),
            "rent",
            ALICE_ACCOUNT,
            BOB_ACCOUNT,
        );

        assert!(matches!(
            result,
            Err(TransactionError::Persistence { account: BOB_ACCOUNT, .. })
        ));
        assert_eq!(engine.ledger().updates, vec![ALICE_ACCOUNT, BOB_ACCOUNT, ALICE_ACCOUNT]);
        assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        assert_eq!(balance(&engine, BOB_ACCOUNT), amount(100));
        assert_eq!(
            summary(&engine),
            vec![(AuditChannel::Operation, OperationKind::Withdraw, false)],
        );
    }

    proptest! {
        #[test]
        fn non_positive_credit_never_reaches_the_store(value in i32::MIN..=0) {
            let mut engine = engine();
            let result =
                engine.credit_account(Some(&alice()), amount(value), "deposit", ALICE_ACCOUNT);

            prop_assert_eq!(
                result,
                Err(TransactionError::from(ValidationError::NonPositiveAmount(amount(value)))),
            );
            prop_assert!(engine.ledger().lookups.borrow().is_empty());
            prop_assert!(engine.ledger().updates.is_empty());
            prop_assert!(records(&engine).is_empty());
        }

        #[test]
        fn failed_credit_persist_has_no_net_effect(value in 1i32..1_000_000) {
            let mut engine = failing(engine(), ALICE_ACCOUNT);
            let result =
                engine.credit_account(Some(&alice()), amount(value), "deposit", ALICE_ACCOUNT);

            prop_assert!(result.is_err());
            prop_assert_eq!(balance(&engine, ALICE_ACCOUNT), amount(500));
        }

        #[test]
        fn transfers_conserve_money(value in 1i32..1_000) {
            let mut engine = engine();
            let before = balance(&engine, ALICE_ACCOUNT) + balance(&engine, BOB_ACCOUNT);
            let _ = engine.transfer_internal(
                Some(&alice()),
                amount(value),
                "rent",
                ALICE_ACCOUNT,
                BOB_ACCOUNT,
            );
            let after = balance(&engine, ALICE_ACCOUNT) + balance(&engine, BOB_ACCOUNT);

            prop_assert_eq!(before, after);
            prop_assert!(balance(&engine, ALICE_ACCOUNT) >= Amount::ZERO);
        }
    }
}

//! Audit trail of every attempted operation.
//!
//! [`AuditLog`] is the interface the engine and the authenticator write to.
//! [`History`] implements it on top of any append-only [`OperationStore`].

use std::cell::RefCell;

use crate::{Operation, StoreError, User};

/// Sink for attempted operations and their outcomes
///
/// Writing is infallible from the caller's point of view. Implementations
/// report their own storage problems.
pub trait AuditLog {
    fn log_operation(&self, operation: &Operation, success: bool);

    fn log_unauthorized_operation(&self, operation: &Operation, attempted: bool);

    fn log_login_success(&self, user: &User);

    fn log_login_failure(&self, user: Option<&User>, reason: &str);

    fn log_log_out(&self, user: &User);
}

impl<T: AuditLog + ?Sized> AuditLog for &T {
    fn log_operation(&self, operation: &Operation, success: bool) {
        (**self).log_operation(operation, success)
    }

    fn log_unauthorized_operation(&self, operation: &Operation, attempted: bool) {
        (**self).log_unauthorized_operation(operation, attempted)
    }

    fn log_login_success(&self, user: &User) {
        (**self).log_login_success(user)
    }

    fn log_login_failure(&self, user: Option<&User>, reason: &str) {
        (**self).log_login_failure(user, reason)
    }

    fn log_log_out(&self, user: &User) {
        (**self).log_log_out(user)
    }
}

/// The channel an audit record was written to
#[derive(Clone, Copy, Debug, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditChannel {
    Operation,
    Unauthorized,
}

/// One entry of the audit trail
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRecord {
    pub channel: AuditChannel,
    pub operation: Operation,
    pub success: bool,
}

/// Append-only persistence of audit records
pub trait OperationStore {
    fn append(&self, record: AuditRecord) -> Result<(), StoreError>;
}

/// The audit log adapter
///
/// Turns every audit call into one [`AuditRecord`] and appends it to the
/// underlying store.
#[derive(Debug, Default)]
pub struct History<S> {
    store: S,
}

impl<S: OperationStore> History<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn append(&self, channel: AuditChannel, operation: Operation, success: bool) {
        let kind = operation.kind();
        let record = AuditRecord {
            channel,
            operation,
            success,
        };
        if let Err(error) = self.store.append(record) {
            tracing::error!(?kind, %error, "failed to append audit record");
        }
    }
}

impl<S: OperationStore> AuditLog for History<S> {
    fn log_operation(&self, operation: &Operation, success: bool) {
        self.append(AuditChannel::Operation, operation.clone(), success);
    }

    fn log_unauthorized_operation(&self, operation: &Operation, attempted: bool) {
        tracing::warn!(
            kind = ?operation.kind(),
            user = ?operation.user(),
            owner = ?operation.owner(),
            "unauthorized operation",
        );
        self.append(AuditChannel::Unauthorized, operation.clone(), attempted);
    }

    fn log_login_success(&self, user: &User) {
        self.append(AuditChannel::Operation, Operation::log_in(Some(user), "Login success"), true);
    }

    fn log_login_failure(&self, user: Option<&User>, reason: &str) {
        self.append(AuditChannel::Operation, Operation::log_in(user, reason), false);
    }

    fn log_log_out(&self, user: &User) {
        self.append(AuditChannel::Operation, Operation::log_out(user), true);
    }
}

/// An operation store keeping all records in memory
#[derive(Debug, Default)]
pub struct MemoryOperationStore {
    records: RefCell<Vec<AuditRecord>>,
}

impl MemoryOperationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of all records, oldest first
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }
}

impl OperationStore for MemoryOperationStore {
    fn append(&self, record: AuditRecord) -> Result<(), StoreError> {
        self.records.borrow_mut().push(record);
        Ok(())
    }
}

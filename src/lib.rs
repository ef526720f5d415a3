pub use self::{
    account::{Account, AccountError, AccountId, Amount},
    audit::{AuditChannel, AuditLog, AuditRecord, History, MemoryOperationStore, OperationStore},
    authorizer::{Authorizer, RoleAuthorizer},
    config::EngineConfig,
    engine::{TransactionEngine, TransactionError, ValidationError},
    interest::{InterestError, InterestOperator},
    operation::{Operation, OperationKind},
    session::{AuthError, Authenticator, MemoryDirectory, Session, UserDirectory},
    store::{LedgerStore, MemoryLedger, StoreError},
    user::{Role, User, UserId},
};

pub mod config;

mod account;
mod audit;
mod authorizer;
mod engine;
mod interest;
mod operation;
mod session;
mod store;
mod user;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ledger_core::{
    config::{DEFAULT_ADMIN_ROLE, DEFAULT_INTEREST_OPERATOR, DEFAULT_INTEREST_RATE_BPS},
    Account, AccountId, Amount, AuditChannel, AuditLog, Authenticator, Authorizer, EngineConfig,
    History, InterestOperator, LedgerStore, MemoryDirectory, MemoryLedger, MemoryOperationStore,
    OperationKind, Role, RoleAuthorizer, Session, TransactionEngine, User, UserDirectory, UserId,
};

/// Replays an operation script against an in-memory ledger
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the operations CSV file
    operations: PathBuf,
    /// Users CSV file (id,name,role,password)
    #[clap(long)]
    users: PathBuf,
    /// Opening accounts CSV file (id,owner,balance)
    #[clap(long)]
    accounts: PathBuf,
    /// Where to write the audit trail as CSV
    #[clap(long)]
    audit: Option<PathBuf>,
    /// The role name granting unrestricted access
    #[clap(long, default_value = DEFAULT_ADMIN_ROLE)]
    admin_role: String,
    /// The interest rate in basis points, 2000 being 20 %
    #[clap(long, default_value_t = DEFAULT_INTEREST_RATE_BPS)]
    interest_bps: u32,
    /// The user the interest operator acts as
    #[clap(long, default_value = DEFAULT_INTEREST_OPERATOR)]
    interest_operator: String,
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig {
            admin_role: self.admin_role.clone(),
            interest_rate_bps: self.interest_bps,
            interest_operator: self.interest_operator.clone(),
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct UserRow {
    id: UserId,
    name: String,
    role: String,
    password: String,
}

#[derive(Debug, serde::Deserialize)]
struct AccountRow {
    id: AccountId,
    owner: UserId,
    balance: Amount,
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Account::with_balance(row.id, row.owner, row.balance)
            .with_context(|| format!("invalid opening state of account {}", row.id))
    }
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum OperationType {
    Login,
    Logout,
    Credit,
    Debit,
    Transfer,
    Interest,
}

#[derive(Debug, serde::Deserialize)]
struct OperationRow {
    #[serde(rename = "type")]
    operation_type: OperationType,
    user: String,
    amount: Option<Amount>,
    source: Option<AccountId>,
    dest: Option<AccountId>,
    #[serde(default)]
    description: String,
}

#[derive(Debug, serde::Serialize)]
struct AuditRow<'a> {
    channel: AuditChannel,
    kind: OperationKind,
    user: Option<UserId>,
    owner: Option<UserId>,
    account: Option<AccountId>,
    amount: Amount,
    description: &'a str,
    success: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();
    let config = args.config();

    let mut directory = MemoryDirectory::new();
    for row in reader(&args.users)?.deserialize::<UserRow>() {
        let row = row?;
        directory.insert(User::new(row.id, row.name, Role::new(row.role)), row.password);
    }
    let mut ledger = MemoryLedger::new();
    for row in reader(&args.accounts)?.deserialize::<AccountRow>() {
        ledger.insert(Account::try_from(row?)?);
    }

    let history = History::new(MemoryOperationStore::new());
    let authenticator = Authenticator::new(directory);
    let interest = InterestOperator::from_config(&config);
    let mut engine = TransactionEngine::new(
        ledger,
        RoleAuthorizer::new(Role::new(config.admin_role.clone())),
        &history,
    );
    let mut sessions = HashMap::new();

    for (line, row) in reader(&args.operations)?.deserialize::<OperationRow>().enumerate() {
        let row = row?;
        // failed operations are logged and skipped
        if let Err(error) = replay(&row, &mut engine, &authenticator, &interest, &mut sessions) {
            tracing::warn!(line = line + 1, user = %row.user, error = %error, "operation failed");
        }
    }

    let (ledger, _, _) = engine.into_parts();
    let mut accounts: Vec<_> = ledger.accounts().values().collect();
    accounts.sort_by_key(|account| account.id());

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(std::io::stdout());
    for account in accounts {
        writer.serialize(account)?;
    }
    writer.flush()?;

    if let Some(path) = &args.audit {
        write_audit(path, &history)?;
    }

    Ok(())
}

fn replay<S, A, L, D>(
    row: &OperationRow,
    engine: &mut TransactionEngine<S, A, L>,
    authenticator: &Authenticator<D>,
    interest: &InterestOperator,
    sessions: &mut HashMap<String, Session>,
) -> anyhow::Result<()>
where
    S: LedgerStore,
    A: Authorizer,
    L: AuditLog,
    D: UserDirectory,
{
    let user = sessions.get(&row.user).map(Session::user);
    let amount = || row.amount.context("missing amount");
    let source = || row.source.context("missing source account");

    match row.operation_type {
        OperationType::Login => {
            let session = authenticator.log_in(&row.user, &row.description, engine.audit())?;
            sessions.insert(row.user.clone(), session);
        }
        OperationType::Logout => {
            let session = sessions
                .remove(&row.user)
                .with_context(|| format!("{} is not logged in", row.user))?;
            authenticator.log_out(session, engine.audit());
        }
        OperationType::Credit => {
            engine.credit_account(user, amount()?, &row.description, source()?)?;
        }
        OperationType::Debit => {
            engine.debit_account(user, amount()?, &row.description, source()?)?;
        }
        OperationType::Transfer => {
            let dest = row.dest.context("missing destination account")?;
            engine.transfer_internal(user, amount()?, &row.description, source()?, dest)?;
        }
        OperationType::Interest => {
            interest.apply(engine, authenticator.directory(), source()?)?;
        }
    }

    Ok(())
}

fn reader(path: &Path) -> anyhow::Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))
}

fn write_audit(path: &Path, history: &History<MemoryOperationStore>) -> anyhow::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    for record in history.store().records() {
        let operation = &record.operation;
        writer.serialize(AuditRow {
            channel: record.channel,
            kind: operation.kind(),
            user: operation.user(),
            owner: operation.owner(),
            account: operation.account(),
            amount: operation.amount(),
            description: operation.description(),
            success: record.success,
        })?;
    }
    writer.flush()?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the account CSV
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

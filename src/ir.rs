use chrono::NaiveDateTime;
use rust_decimal::Decimal;

/// Synthetic equity account that opening balances are booked against
pub const OPENING_BALANCES: &str = "Opening Balances";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Assets,
    Equity,
    Income,
    Expenses,
}

impl AccountType {
    pub fn prefix(self) -> &'static str {
        match self {
            AccountType::Assets => "Assets",
            AccountType::Equity => "Equity",
            AccountType::Income => "Income",
            AccountType::Expenses => "Expenses",
        }
    }
}

/// An account as named by the export, together with its ledger account type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub ty: AccountType,
    pub name: String,
}

impl AccountRef {
    pub fn new(ty: AccountType, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }

    /// Display name used when the account has no entry in the mapping table
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.ty.prefix(), self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    OpeningBalance,
    Transfer,
    Income,
    Expense,
}

impl TransactionKind {
    /// Account type of the posting that carries the explicit amount
    pub fn debit_account_type(self) -> AccountType {
        match self {
            TransactionKind::OpeningBalance => AccountType::Assets,
            TransactionKind::Transfer => AccountType::Assets,
            TransactionKind::Income => AccountType::Assets,
            TransactionKind::Expense => AccountType::Expenses,
        }
    }

    /// Account type of the balancing posting, which has its amount implied
    pub fn credit_account_type(self) -> AccountType {
        match self {
            TransactionKind::OpeningBalance => AccountType::Equity,
            TransactionKind::Transfer => AccountType::Assets,
            TransactionKind::Income => AccountType::Income,
            TransactionKind::Expense => AccountType::Assets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub amount: Decimal,
    pub currency: String,
}

/// One normalized export record. Always renders as exactly two postings,
/// with the amount attached to the debit side only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub time: NaiveDateTime,
    pub kind: TransactionKind,
    pub payee: String,
    pub debit_account: AccountRef,
    pub credit_account: AccountRef,
    pub amount: Amount,
    pub status: Option<u8>,
    pub project: String,
    pub remark: String,
    pub uid: String,
}

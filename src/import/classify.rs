use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::Error;
use crate::import::row::RawRow;
use crate::ir::{AccountRef, Amount, Transaction, TransactionKind, OPENING_BALANCES};

/// Raw category of the opening-balance pseudo rows
const SYSTEM_CATEGORY: &str = "SYSTEM";
/// The only sub-category the export uses for SYSTEM rows
const INIT_AMOUNT: &str = "INIT_AMOUNT";

/// Classification rules that depend on observed export data rather than on
/// the format itself.
#[derive(Debug, Clone)]
pub struct ClassifyRules {
    /// "Investment" sub-categories that stay expenses instead of being
    /// reclassified as income. The defaults are the insurance and lottery
    /// categories observed in real exports; the set is locale-specific and
    /// almost certainly incomplete.
    // TODO Allow overriding this list from the command line
    pub investment_income_excludes: Vec<String>,
}

impl Default for ClassifyRules {
    fn default() -> Self {
        Self {
            investment_income_excludes: vec!["保險".to_string(), "樂透彩".to_string()],
        }
    }
}

/// Amounts at or below this threshold count as zero
fn near_zero() -> Decimal {
    Decimal::new(1, 6)
}

/// Result of classifying one row: the transaction to emit (if any) and the
/// carried date to thread into the next call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    pub transaction: Option<Transaction>,
    pub carried_date: NaiveDateTime,
}

/// Classify one raw row into a normalized transaction.
///
/// Opening-balance rows carry no meaningful date of their own, so they are
/// stamped with `carried_date`, the timestamp of the most recent real
/// transaction. Every other row advances the carried date to its own
/// timestamp. Zero-amount opening rows are dropped without advancing it.
pub fn classify(
    rules: &ClassifyRules,
    row: RawRow,
    carried_date: NaiveDateTime,
) -> Result<Classified, Error> {
    let status = parse_status(&row.status, row.line)?;

    if row.category == SYSTEM_CATEGORY {
        if row.sub_category != INIT_AMOUNT {
            return Err(Error::DataIntegrity {
                line: row.line,
                reason: format!(
                    "SYSTEM row with sub-category {:?} instead of {INIT_AMOUNT:?}",
                    row.sub_category
                ),
            });
        }
        if row.amount <= near_zero() {
            return Ok(Classified {
                transaction: None,
                carried_date,
            });
        }
        let kind = TransactionKind::OpeningBalance;
        let transaction = Transaction {
            time: carried_date,
            kind,
            payee: row.sub_category,
            debit_account: AccountRef::new(kind.debit_account_type(), row.to_account),
            credit_account: AccountRef::new(kind.credit_account_type(), OPENING_BALANCES),
            amount: Amount {
                amount: row.amount,
                currency: row.currency,
            },
            status,
            project: row.project,
            remark: row.remark,
            uid: row.uid,
        };
        return Ok(Classified {
            transaction: Some(transaction),
            carried_date,
        });
    }

    let carried_date = row.time;
    let (kind, payee, debit_name, credit_name) = match row.category.as_str() {
        "Transfer" => (
            TransactionKind::Transfer,
            row.sub_category,
            row.to_account,
            row.from_account,
        ),
        "Income" => (
            TransactionKind::Income,
            row.payee,
            row.to_account,
            row.sub_category,
        ),
        "Investment" if !rules.investment_income_excludes.contains(&row.sub_category) => (
            TransactionKind::Income,
            row.payee,
            row.to_account,
            format!("Investment:{}", row.sub_category),
        ),
        category => (
            TransactionKind::Expense,
            row.payee,
            format!("{category}:{}", row.sub_category),
            row.from_account,
        ),
    };
    let transaction = Transaction {
        time: row.time,
        kind,
        payee,
        debit_account: AccountRef::new(kind.debit_account_type(), debit_name),
        credit_account: AccountRef::new(kind.credit_account_type(), credit_name),
        amount: Amount {
            amount: row.amount,
            currency: row.currency,
        },
        status,
        project: row.project,
        remark: row.remark,
        uid: row.uid,
    };
    Ok(Classified {
        transaction: Some(transaction),
        carried_date,
    })
}

fn parse_status(status: &str, line: u64) -> Result<Option<u8>, Error> {
    match status {
        "" => Ok(None),
        "0" => Ok(Some(0)),
        "1" => Ok(Some(1)),
        other => Err(Error::DataIntegrity {
            line,
            reason: format!("status must be empty, 0 or 1, got {other:?}"),
        }),
    }
}

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs::File, io::BufReader, path::Path};

use crate::error::Error;
use crate::ir::{AccountRef, OPENING_BALANCES};

/// One entry of the account name mapping file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    pub name: String,
}

/// User-supplied mapping from raw export account names to ledger account
/// names, loaded from a JSON file of the form `{"Cash": {"name": "Assets:Wallet"}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountNames {
    accounts: HashMap<String, AccountEntry>,
}

impl AccountNames {
    pub fn new(accounts: HashMap<String, AccountEntry>) -> Self {
        Self { accounts }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open account name file {}", path.display()))?;
        let names: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse account name file {}", path.display()))?;
        Ok(names)
    }

    /// The synthetic opening-balances account always maps to its equity
    /// account, replacing any user-supplied entry.
    pub fn with_opening_balances(mut self) -> Self {
        self.accounts.insert(
            OPENING_BALANCES.to_string(),
            AccountEntry {
                name: format!("Equity:{OPENING_BALANCES}"),
            },
        );
        self
    }

    /// Resolve the display name for an account. Without `force`, accounts
    /// missing from the mapping fall back to their `Prefix:name` form.
    pub fn resolve(&self, account: &AccountRef, force: bool) -> Result<String, Error> {
        match self.accounts.get(&account.name) {
            Some(entry) => Ok(entry.name.clone()),
            None if force => Err(Error::UnmappedAccount {
                account: account.name.clone(),
            }),
            None => Ok(account.qualified_name()),
        }
    }
}

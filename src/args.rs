use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Import transactions from an AndroMoney CSV export and write them as a
/// plain-text ledger file
#[derive(Parser, Debug)]
pub struct Args {
    /// Path to the AndroMoney CSV export
    pub input: PathBuf,

    /// Output ledger file. Defaults to the input path with a `.ledger` extension
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Number of leading metadata rows to skip
    #[clap(long, default_value_t = 2)]
    pub ignore_row: usize,

    /// Date (YYYYMMDD) assigned to opening balances seen before the first dated transaction
    #[clap(long, default_value = "20160824", value_parser = parse_init_date)]
    pub init_date: NaiveDate,

    /// JSON file mapping raw account names to ledger account names
    #[clap(long)]
    pub account_name_file: Option<PathBuf>,

    /// Fail if any referenced account is missing from the account name mapping
    #[clap(long)]
    pub force_mapping_account_name: bool,
}

fn parse_init_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y%m%d")
        .map_err(|_| format!("{value:?} is not a date in YYYYMMDD format"))
}

pub fn parse() -> Args {
    Args::parse()
}

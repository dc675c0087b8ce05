use anyhow::{Context as _, Result};
use chrono::NaiveDateTime;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::args::Args;
use crate::config::AccountNames;
use crate::error::Error;
use crate::export::LedgerWriter;
use crate::import::{self, classify, ClassifyRules};

pub fn main(args: Args) -> Result<()> {
    let output = output_path(&args);
    let account_names = load_account_names(&args)?;
    check_extension(&args.input)?;

    log::info!(
        "Converting {} to {}...",
        args.input.display(),
        output.display()
    );
    let input = BufReader::new(
        File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input.display()))?,
    );
    let out = BufWriter::new(
        File::create(&output).with_context(|| format!("Failed to create {}", output.display()))?,
    );
    let options = Options {
        skip_rows: args.ignore_row,
        init_date: args.init_date.and_hms_opt(0, 0, 0).expect("midnight exists"),
        account_names,
        force_account_names: args.force_mapping_account_name,
        rules: ClassifyRules::default(),
    };
    let stats = convert(input, out, &options)?;
    log::info!(
        "Converting...done ({} entries written, {} rows dropped)",
        stats.entries,
        stats.dropped
    );
    Ok(())
}

pub(crate) struct Options {
    pub skip_rows: usize,
    pub init_date: NaiveDateTime,
    pub account_names: AccountNames,
    pub force_account_names: bool,
    pub rules: ClassifyRules,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Stats {
    pub entries: u64,
    pub dropped: u64,
}

/// Stream rows from the input, classify each one while threading the
/// carried date along, and write every resulting transaction immediately.
/// Any row error aborts the run; output written so far stays written.
pub(crate) fn convert(
    input: impl Read,
    output: impl Write,
    options: &Options,
) -> Result<Stats, Error> {
    let mut writer = LedgerWriter::new(output);
    let mut carried_date = options.init_date;
    let mut stats = Stats::default();
    for row in import::rows(input, options.skip_rows) {
        let classified = classify(&options.rules, row?, carried_date)?;
        carried_date = classified.carried_date;
        match classified.transaction {
            Some(transaction) => {
                writer.write_transaction(
                    &transaction,
                    &options.account_names,
                    options.force_account_names,
                )?;
                stats.entries += 1;
            }
            None => stats.dropped += 1,
        }
    }
    writer.flush()?;
    Ok(stats)
}

fn output_path(args: &Args) -> PathBuf {
    args.output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("ledger"))
}

fn load_account_names(args: &Args) -> Result<AccountNames> {
    let names = match &args.account_name_file {
        Some(path) => AccountNames::load(path)?,
        None if args.force_mapping_account_name => return Err(Error::MissingAccountNameFile.into()),
        None => AccountNames::default(),
    };
    Ok(names.with_opening_balances())
}

fn check_extension(path: &Path) -> Result<(), Error> {
    match path.extension().and_then(OsStr::to_str) {
        Some("csv") => Ok(()),
        extension => Err(Error::UnsupportedFormat {
            extension: extension.unwrap_or("").to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use std::io::Cursor;

    use super::*;

    const FIXTURE: &str = "\
AndroMoney,3.12.1
Id,Currency,Amount,Category,Sub-Category,Date,Expense(Transfer Out),Income(Transfer In),Note,Periodic,Project,Payee/Payer,uid,Time,Status
1,TWD,5000,SYSTEM,INIT_AMOUNT,20200101,,Cash,,,,,,0,
2,TWD,0,SYSTEM,INIT_AMOUNT,20200101,,Bank,,,,,,0,
3,TWD,120.50,Food,Lunch,20200315,Cash,,with colleagues,,ProjectX,Some Diner,abc-123,1230,1
4,TWD,30000,Income,Salary,20200401,,Bank,,,,ACME Corp,,900,0
5,TWD,2000,Transfer,ATM withdrawal,20200402,Bank,Cash,,,,,,1015,
6,TWD,150,Investment,股票,20200403,,Bank,dividend,,,Broker,,1400,
7,TWD,800,Investment,保險,20200404,Cash,,,,,Insurance Co,,800,
";

    const GOLDEN: &str = "\
2016-08-24 * INIT_AMOUNT
    Assets:Cash  5000 TWD
    Equity:Opening Balances
    ; :andromoney_time: 0000
    ; :andromoney_to_account: Cash
    ; :andromoney_from_account: Opening Balances

2020-03-15 * Some Diner
    Expenses:Food:Lunch  120.50 TWD
    Assets:Cash
    ; :andromoney_time: 1230
    ; :andromoney_status: 1
    ; :andromoney_project: ProjectX
    ; :andromoney_remark: with colleagues
    ; :andromoney_uid: abc-123
    ; :andromoney_to_account: Food:Lunch
    ; :andromoney_from_account: Cash

2020-04-01 * ACME Corp
    Assets:Bank  30000 TWD
    Income:Salary
    ; :andromoney_time: 0900
    ; :andromoney_status: 0
    ; :andromoney_to_account: Bank
    ; :andromoney_from_account: Salary

2020-04-02 * ATM withdrawal
    Assets:Cash  2000 TWD
    Assets:Bank
    ; :andromoney_time: 1015
    ; :andromoney_to_account: Cash
    ; :andromoney_from_account: Bank

2020-04-03 * Broker
    Assets:Bank  150 TWD
    Income:Investment:股票
    ; :andromoney_time: 1400
    ; :andromoney_remark: dividend
    ; :andromoney_to_account: Bank
    ; :andromoney_from_account: Investment:股票

2020-04-04 * Insurance Co
    Expenses:Investment:保險  800 TWD
    Assets:Cash
    ; :andromoney_time: 0800
    ; :andromoney_to_account: Investment:保險
    ; :andromoney_from_account: Cash

";

    fn options() -> Options {
        Options {
            skip_rows: 2,
            init_date: NaiveDate::from_ymd_opt(2016, 8, 24)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            account_names: AccountNames::default().with_opening_balances(),
            force_account_names: false,
            rules: ClassifyRules::default(),
        }
    }

    #[test]
    fn converts_fixture_to_golden_ledger() {
        let mut out = Vec::new();
        let stats = convert(Cursor::new(FIXTURE), &mut out, &options()).unwrap();
        assert_eq!(GOLDEN, String::from_utf8(out).unwrap());
        assert_eq!(Stats { entries: 6, dropped: 1 }, stats);
    }

    #[test]
    fn forced_mapping_aborts_on_first_unmapped_account() {
        let mut options = options();
        options.force_account_names = true;
        let mut out = Vec::new();
        let result = convert(Cursor::new(FIXTURE), &mut out, &options);
        assert!(matches!(result, Err(Error::UnmappedAccount { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_row_aborts_the_run() {
        let input = "skip\nskip\n1,TWD,not-a-number,Food,Lunch,20200315,Cash,,,,,Diner,,1230,1\n";
        let result = convert(Cursor::new(input), Vec::new(), &options());
        assert!(matches!(result, Err(Error::MalformedRow { line: 3, .. })));
    }

    #[test]
    fn main_writes_output_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        std::fs::write(&input, FIXTURE).unwrap();

        main(Args {
            input: input.clone(),
            output: None,
            ignore_row: 2,
            init_date: NaiveDate::from_ymd_opt(2016, 8, 24).unwrap(),
            account_name_file: None,
            force_mapping_account_name: false,
        })
        .unwrap();

        let written = std::fs::read_to_string(dir.path().join("export.ledger")).unwrap();
        assert_eq!(GOLDEN, written);
    }

    #[test]
    fn main_applies_the_account_name_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("export.csv");
        std::fs::write(&input, FIXTURE).unwrap();
        let mapping = dir.path().join("accounts.json");
        std::fs::write(&mapping, r#"{"Cash": {"name": "Assets:Wallet"}}"#).unwrap();

        main(Args {
            input: input.clone(),
            output: None,
            ignore_row: 2,
            init_date: NaiveDate::from_ymd_opt(2016, 8, 24).unwrap(),
            account_name_file: Some(mapping),
            force_mapping_account_name: false,
        })
        .unwrap();

        let written = std::fs::read_to_string(dir.path().join("export.ledger")).unwrap();
        assert!(written.contains("    Assets:Wallet  5000 TWD\n"));
        assert!(!written.contains("    Assets:Cash"));
    }

    #[test]
    fn non_csv_input_is_rejected() {
        let result = main(Args {
            input: PathBuf::from("export.xlsx"),
            output: None,
            ignore_row: 2,
            init_date: NaiveDate::from_ymd_opt(2016, 8, 24).unwrap(),
            account_name_file: None,
            force_mapping_account_name: false,
        });
        let error = result.unwrap_err().downcast::<Error>().unwrap();
        assert!(matches!(
            error,
            Error::UnsupportedFormat { extension } if extension == "xlsx"
        ));
    }

    #[test]
    fn forced_mapping_without_mapping_file_is_rejected() {
        let result = main(Args {
            input: PathBuf::from("export.csv"),
            output: None,
            ignore_row: 2,
            init_date: NaiveDate::from_ymd_opt(2016, 8, 24).unwrap(),
            account_name_file: None,
            force_mapping_account_name: true,
        });
        let error = result.unwrap_err().downcast::<Error>().unwrap();
        assert!(matches!(error, Error::MissingAccountNameFile));
    }
}

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::error::Error;

/// Number of columns in an AndroMoney export row
const FIELD_COUNT: usize = 15;

/// One export row with its fields parsed positionally.
///
/// The export stores the date (YYYYMMDD) and the time (HMM or HHMM) in
/// separate columns; they are combined into a single timestamp here, with
/// the time zero-padded to four digits. An empty time means midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRow {
    pub line: u64,
    pub id: u64,
    pub currency: String,
    pub amount: Decimal,
    pub category: String,
    pub sub_category: String,
    pub from_account: String,
    pub to_account: String,
    pub remark: String,
    pub periodic: String,
    pub project: String,
    pub payee: String,
    pub uid: String,
    pub time: NaiveDateTime,
    pub status: String,
}

impl RawRow {
    pub fn parse(record: &csv::StringRecord) -> Result<Self, Error> {
        let line = record.position().map_or(0, |position| position.line());
        if record.len() != FIELD_COUNT {
            return Err(Error::MalformedRow {
                line,
                reason: format!("expected {FIELD_COUNT} fields, got {}", record.len()),
            });
        }
        let id = record[0].parse::<u64>().map_err(|_| Error::MalformedRow {
            line,
            reason: format!("transaction id {:?} is not an integer", &record[0]),
        })?;
        let amount = Decimal::from_str_exact(&record[2]).map_err(|_| Error::MalformedRow {
            line,
            reason: format!("amount {:?} is not a number", &record[2]),
        })?;
        let time = parse_timestamp(&record[5], &record[13], line)?;
        Ok(Self {
            line,
            id,
            currency: record[1].to_string(),
            amount,
            category: record[3].to_string(),
            sub_category: record[4].to_string(),
            from_account: record[6].to_string(),
            to_account: record[7].to_string(),
            remark: record[8].to_string(),
            periodic: record[9].to_string(),
            project: record[10].to_string(),
            payee: record[11].to_string(),
            uid: record[12].to_string(),
            time,
            status: record[14].to_string(),
        })
    }
}

fn parse_timestamp(date: &str, time: &str, line: u64) -> Result<NaiveDateTime, Error> {
    let stamp = format!("{date}{time:0>4}");
    NaiveDateTime::parse_from_str(&stamp, "%Y%m%d%H%M").map_err(|_| Error::MalformedRow {
        line,
        reason: format!("invalid date {date:?} / time {time:?}"),
    })
}

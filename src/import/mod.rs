use std::io::Read;

use crate::error::Error;

mod classify;
mod row;

pub use classify::{classify, Classified, ClassifyRules};
pub use row::RawRow;

/// Stream raw rows from a CSV export, skipping the leading metadata rows.
///
/// The reader is forward-only and rows are produced lazily, so the whole
/// export never has to fit in memory.
pub fn rows(input: impl Read, skip_rows: usize) -> impl Iterator<Item = Result<RawRow, Error>> {
    let reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    reader
        .into_records()
        .skip(skip_rows)
        .map(|record| RawRow::parse(&record?))
}

use chrono::NaiveDate;
use std::io::Write;

use crate::config::AccountNames;
use crate::error::Error;
use crate::ir::{Amount, Transaction};

const INDENT: usize = 4;
const TAG_PREFIX: &str = "andromoney";

/// Writes ledger entries to an output stream, one blank-line-terminated
/// entry per transaction.
pub struct LedgerWriter<W> {
    out: W,
    indent: usize,
}

impl<W: Write> LedgerWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: INDENT,
        }
    }

    pub fn write_transaction(
        &mut self,
        transaction: &Transaction,
        names: &AccountNames,
        force_names: bool,
    ) -> Result<(), Error> {
        self.write_entry(&entry(transaction, names, force_names)?)
    }

    /// Write one entry: header line, one posting line per account, one
    /// comment line per tag, and a terminating blank line. Nothing is
    /// written if the entry fails validation.
    pub fn write_entry(&mut self, entry: &Entry) -> Result<(), Error> {
        if entry
            .postings
            .iter()
            .any(|posting| !posting.effective_dates.is_empty())
        {
            return Err(Error::EffectiveDateUnsupported);
        }
        write!(self.out, "{}", entry.date.format("%Y-%m-%d"))?;
        if let Some(effective_date) = entry.effective_date {
            write!(self.out, "={}", effective_date.format("%Y-%m-%d"))?;
        }
        writeln!(self.out, " * {}", entry.payee)?;
        for posting in &entry.postings {
            self.write_posting(posting)?;
        }
        for (tag, value) in &entry.tags {
            self.write_tag(tag, value)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_posting(&mut self, posting: &Posting) -> Result<(), Error> {
        let account = collapse_whitespace(&posting.account, " ");
        write!(self.out, "{:width$}{account}", "", width = self.indent)?;
        if let Some(amount) = &posting.amount {
            write!(self.out, "  {} {}", amount.amount, amount.currency)?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn write_tag(&mut self, tag: &str, value: &str) -> Result<(), Error> {
        let tag = collapse_whitespace(tag, "_");
        let value = value.split('\n').collect::<Vec<_>>().join(" ");
        writeln!(self.out, "{:width$}; :{tag}: {value}", "", width = self.indent)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), Error> {
        self.out.flush()?;
        Ok(())
    }
}

/// One textual ledger entry, ready to render.
///
/// `effective_date` renders as a `=YYYY-MM-DD` suffix on the header line.
/// Per-posting effective dates are representable but not renderable yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub date: NaiveDate,
    pub effective_date: Option<NaiveDate>,
    pub payee: String,
    pub postings: Vec<Posting>,
    pub tags: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    pub account: String,
    pub amount: Option<Amount>,
    pub effective_dates: Vec<NaiveDate>,
}

/// Build the entry for a transaction: resolve both account display names
/// and collect the metadata tags. Fails before anything is written when a
/// forced mapping is incomplete.
fn entry(
    transaction: &Transaction,
    names: &AccountNames,
    force_names: bool,
) -> Result<Entry, Error> {
    let debit = names.resolve(&transaction.debit_account, force_names)?;
    let credit = names.resolve(&transaction.credit_account, force_names)?;

    let mut tags = vec![(
        format!("{TAG_PREFIX}_time"),
        transaction.time.format("%H%M").to_string(),
    )];
    let status = transaction
        .status
        .map(|status| status.to_string())
        .unwrap_or_default();
    push_tag(&mut tags, "status", &status);
    push_tag(&mut tags, "project", &transaction.project);
    push_tag(&mut tags, "remark", &transaction.remark);
    push_tag(&mut tags, "uid", &transaction.uid);
    // The raw account names survive as tags so a remapped ledger can still
    // be traced back to the export
    push_tag(&mut tags, "to_account", &transaction.debit_account.name);
    push_tag(&mut tags, "from_account", &transaction.credit_account.name);

    Ok(Entry {
        date: transaction.time.date(),
        effective_date: None,
        payee: transaction.payee.clone(),
        postings: vec![
            Posting {
                account: debit,
                amount: Some(transaction.amount.clone()),
                effective_dates: Vec::new(),
            },
            Posting {
                account: credit,
                amount: None,
                effective_dates: Vec::new(),
            },
        ],
        tags,
    })
}

fn push_tag(tags: &mut Vec<(String, String)>, tag: &str, value: &str) {
    if !value.is_empty() {
        tags.push((format!("{TAG_PREFIX}_{tag}"), value.to_string()));
    }
}

fn collapse_whitespace(value: &str, joiner: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(joiner)
}

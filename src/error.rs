/// Error type that can be returned by fallible operations in this crate
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file is not a CSV export. Spreadsheet exports (xls/xlsx) land here too.
    #[error("Unsupported input format {extension:?}, expected a .csv export")]
    UnsupportedFormat { extension: String },
    /// A row had the wrong number of fields or a field that failed to parse
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: u64, reason: String },
    /// A row parsed fine but carried values the export format doesn't allow
    #[error("Bad data at line {line}: {reason}")]
    DataIntegrity { line: u64, reason: String },
    /// Account name mapping was forced but an account has no entry
    #[error("Account {account:?} is missing from the account name mapping")]
    UnmappedAccount { account: String },
    /// Per-posting effective dates are part of the entry model but have no renderer yet
    #[error("Per-posting effective dates are not supported")]
    EffectiveDateUnsupported,
    /// Forced account name mapping needs a mapping file to map from
    #[error("--force-mapping-account-name requires --account-name-file")]
    MissingAccountNameFile,
    /// Error reading the CSV input stream
    #[error("Error reading CSV input")]
    Csv(#[from] csv::Error),
    /// Error writing the ledger output
    #[error("Error writing ledger output")]
    Io(#[from] std::io::Error),
}

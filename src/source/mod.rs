use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use thiserror::Error;

pub mod google;
#[cfg(test)]
pub mod mock;
pub mod workbook;


pub use google::GoogleSheets;
pub use workbook::Workbook;

lazy_static! {
    static ref TABLE_ID_REGEX: Regex = Regex::new("^[A-Za-z0-9_-]+$").unwrap();
    static ref TABLE_URL_REGEX: Regex = Regex::new("/spreadsheets/d/([A-Za-z0-9_-]+)").unwrap();
}

/// One horizontal record of a sheet. Blank trailing cells may be absent.
pub type Row = Vec<String>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("{message}")]
    Unavailable {
        message: String,
        /// Upstream HTTP status, `None` when the service could not be reached at all.
        status: Option<u16>,
        details: Option<Value>,
    },
    #[error("access denied for {identity}")]
    AccessDenied {
        identity: String,
        details: Option<Value>,
    },
    #[error("{message}")]
    NotFound {
        message: String,
        details: Option<Value>,
    },
    #[error("invalid service credentials: {0}")]
    Credentials(String),
}

impl SourceError {
    pub fn unreachable<E: fmt::Display>(error: E) -> Self {
        SourceError::Unavailable {
            message: error.to_string(),
            status: None,
            details: None,
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        SourceError::NotFound {
            message: message.into(),
            details: None,
        }
    }

    pub fn details(&self) -> Option<&Value> {
        match self {
            SourceError::Unavailable { details, .. }
            | SourceError::AccessDenied { details, .. }
            | SourceError::NotFound { details, .. } => details.as_ref(),
            SourceError::Credentials(_) => None,
        }
    }

    pub fn is_unreachable(&self) -> bool {
        matches!(self, SourceError::Unavailable { status: None, .. })
    }
}

/// A sheet title plus a span of columns, zero-based and inclusive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SheetRange {
    pub sheet: String,
    pub first_column: u8,
    pub last_column: u8,
}

impl SheetRange {
    pub fn new<S: Into<String>>(sheet: S, first_column: u8, last_column: u8) -> Self {
        SheetRange {
            sheet: sheet.into(),
            first_column: first_column.min(25),
            last_column: last_column.clamp(first_column.min(25), 25),
        }
    }

    pub fn width(&self) -> usize {
        (self.last_column - self.first_column) as usize + 1
    }

    fn column_letter(index: u8) -> char {
        (b'A' + index) as char
    }
}

// A1 notation, with the sheet title always quoted so spaces and
// punctuation survive.
impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}'!{}:{}",
            self.sheet.replace('\'', "''"),
            Self::column_letter(self.first_column),
            Self::column_letter(self.last_column)
        )
    }
}

/// Read access to a spreadsheet-like collection of named sheets.
pub trait TableSource: Send + Sync + 'static {
    /// Identity the source reads as, quoted back to admins who need to share a table.
    fn identity(&self) -> String;

    fn authorize(&self) -> impl Future<Output = Result<(), SourceError>> + Send;

    fn read_range(
        &self,
        table_id: &str,
        range: &SheetRange,
    ) -> impl Future<Output = Result<Vec<Row>, SourceError>> + Send;

    fn sheet_names(
        &self,
        table_id: &str,
    ) -> impl Future<Output = Result<Vec<String>, SourceError>> + Send;
}

/// Accepts either a bare spreadsheet id or a full spreadsheet URL.
pub fn parse_table_id(input: &str) -> Option<String> {
    let input = input.trim();
    if TABLE_ID_REGEX.is_match(input) {
        return Some(input.to_owned());
    }
    TABLE_URL_REGEX
        .captures(input)
        .map(|captures| captures[1].to_owned())
}

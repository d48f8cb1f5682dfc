use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::source::{Row, SheetRange, SourceError, TableSource};

pub const MOCK_IDENTITY: &str = "quiz-reader@mock.iam.gserviceaccount.com";

type Sheets = Vec<(String, Vec<Row>)>;

#[derive(Clone, Default)]
pub struct MockSource {
    tables: Arc<RwLock<HashMap<String, Sheets>>>,
    denied: Arc<RwLock<HashSet<String>>>,
    offline: Arc<RwLock<bool>>,
}

impl MockSource {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_sheet(self, table_id: &str, sheet: &str, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect();
        self.tables
            .write()
            .entry(table_id.to_owned())
            .or_default()
            .push((sheet.to_owned(), rows));
        self
    }

    pub fn deny(self, table_id: &str) -> Self {
        self.denied.write().insert(table_id.to_owned());
        self
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.write() = offline;
    }

    fn check_access(&self, table_id: &str) -> Result<(), SourceError> {
        if *self.offline.read() {
            return Err(SourceError::unreachable("getaddrinfo ENOTFOUND"));
        }
        if self.denied.read().contains(table_id) {
            return Err(SourceError::AccessDenied {
                identity: MOCK_IDENTITY.to_owned(),
                details: None,
            });
        }
        Ok(())
    }
}

impl TableSource for MockSource {
    fn identity(&self) -> String {
        MOCK_IDENTITY.to_owned()
    }

    async fn authorize(&self) -> Result<(), SourceError> {
        if *self.offline.read() {
            return Err(SourceError::unreachable("getaddrinfo ENOTFOUND"));
        }
        Ok(())
    }

    async fn read_range(&self, table_id: &str, range: &SheetRange) -> Result<Vec<Row>, SourceError> {
        self.check_access(table_id)?;
        let tables = self.tables.read();
        let sheets = tables.get(table_id).ok_or_else(|| SourceError::Unavailable {
            message: "Requested entity was not found.".to_owned(),
            status: Some(404),
            details: None,
        })?;
        sheets
            .iter()
            .find(|(name, _)| *name == range.sheet)
            .map(|(_, rows)| rows.clone())
            .ok_or_else(|| SourceError::not_found(format!("Unable to parse range: {}", range)))
    }

    async fn sheet_names(&self, table_id: &str) -> Result<Vec<String>, SourceError> {
        self.check_access(table_id)?;
        Ok(self
            .tables
            .read()
            .get(table_id)
            .map(|sheets| sheets.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_default())
    }
}

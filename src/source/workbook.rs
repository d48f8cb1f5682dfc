use itertools::Itertools;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::source::{Row, SheetRange, SourceError, TableSource};


const SHEET_EXTENSION: &str = "csv";

/// Local workbooks: one directory per table, one CSV file per sheet.
#[derive(Debug)]
pub struct Workbook {
    root: PathBuf,
}

fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| c == '/' || c == '\\' || c == '\0')
}

async fn is_dir(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map_or(false, |metadata| metadata.is_dir())
}

impl Workbook {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Workbook { root: root.into() }
    }

    async fn table_dir(&self, table_id: &str) -> Result<PathBuf, SourceError> {
        if !is_safe_name(table_id) {
            return Err(SourceError::unreachable(format!(
                "invalid workbook id {:?}",
                table_id
            )));
        }
        let dir = self.root.join(table_id);
        if !is_dir(&dir).await {
            return Err(SourceError::unreachable(format!(
                "workbook {:?} does not exist",
                table_id
            )));
        }
        Ok(dir)
    }

    async fn sheet_path(&self, table_id: &str, sheet: &str) -> Result<PathBuf, SourceError> {
        let dir = self.table_dir(table_id).await?;
        if !is_safe_name(sheet) {
            return Err(SourceError::not_found(format!(
                "invalid sheet name {:?}",
                sheet
            )));
        }
        let path = dir.join(format!("{}.{}", sheet, SHEET_EXTENSION));
        let is_file = fs::metadata(&path)
            .await
            .map_or(false, |metadata| metadata.is_file());
        if !is_file {
            return Err(SourceError::not_found(format!(
                "Unable to parse range: {:?} is not a sheet of {:?}",
                sheet, table_id
            )));
        }
        Ok(path)
    }

    fn parse_sheet(content: &[u8], range: &SheetRange) -> Result<Vec<Row>, SourceError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content);

        let mut rows = Vec::new();
        for record in csv_reader.records() {
            let record = record.map_err(SourceError::unreachable)?;
            let row: Row = record
                .iter()
                .skip(range.first_column as usize)
                .take(range.width())
                .map(str::to_owned)
                .collect();
            rows.push(row);
        }
        Ok(rows)
    }
}

impl TableSource for Workbook {
    fn identity(&self) -> String {
        format!("the workbook directory {}", self.root.display())
    }

    async fn authorize(&self) -> Result<(), SourceError> {
        if is_dir(&self.root).await {
            Ok(())
        } else {
            Err(SourceError::unreachable(format!(
                "workbook root {} is not a directory",
                self.root.display()
            )))
        }
    }

    async fn read_range(&self, table_id: &str, range: &SheetRange) -> Result<Vec<Row>, SourceError> {
        let path = self.sheet_path(table_id, &range.sheet).await?;
        tracing::debug!(path = %path.display(), %range, "reading workbook sheet");
        let content = fs::read(&path).await.map_err(SourceError::unreachable)?;
        Self::parse_sheet(&content, range)
    }

    async fn sheet_names(&self, table_id: &str) -> Result<Vec<String>, SourceError> {
        let dir = self.table_dir(table_id).await?;
        let mut entries = fs::read_dir(&dir).await.map_err(SourceError::unreachable)?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(SourceError::unreachable)? {
            paths.push(entry.path());
        }
        let names = paths
            .into_iter()
            .filter(|path| path.extension().map_or(false, |ext| ext == SHEET_EXTENSION))
            .filter_map(|path| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
            })
            .sorted()
            .collect();
        Ok(names)
    }
}

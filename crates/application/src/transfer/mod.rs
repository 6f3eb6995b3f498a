//! Bulk import and export of the inventory tables.

pub mod assets_file;
pub mod export;
pub mod importer;
pub mod parse;
pub mod service;

pub use export::ExportManifest;
pub use service::TransferService;

use domain::Table;
use serde::Serialize;
use std::fmt;

/// Health given to imported assets whose file has no usable value
pub const DEFAULT_HEALTH: i32 = 100;

/// Legacy assets never carried a health column
pub const LEGACY_HEALTH: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Delete every row of the nine transfer tables before importing
    pub clear_existing: bool,
    pub default_health: i32,
}

impl ImportOptions {
    pub fn directory(clear_existing: bool) -> Self {
        Self {
            clear_existing,
            default_health: DEFAULT_HEALTH,
        }
    }

    pub fn legacy(clear_existing: bool) -> Self {
        Self {
            clear_existing,
            default_health: LEGACY_HEALTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    pub table: Table,
    pub imported: usize,
    pub skipped: usize,
    /// The source had no data for this table at all
    pub missing: bool,
}

impl TableReport {
    fn new(table: Table) -> Self {
        Self {
            table,
            imported: 0,
            skipped: 0,
            missing: false,
        }
    }
}

/// Outcome of one import run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub source: String,
    pub cleared: bool,
    pub tables: Vec<TableReport>,
    /// Parent records created because a row referenced them
    pub placeholders: Vec<String>,
}

impl ImportReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub(crate) fn table_mut(&mut self, table: Table) -> &mut TableReport {
        let index = match self.tables.iter().position(|t| t.table == table) {
            Some(index) => index,
            None => {
                self.tables.push(TableReport::new(table));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index]
    }

    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.iter().find(|t| t.table == table)
    }

    pub fn imported(&self, table: Table) -> usize {
        self.table(table).map_or(0, |t| t.imported)
    }

    pub fn skipped(&self, table: Table) -> usize {
        self.table(table).map_or(0, |t| t.skipped)
    }

    pub fn total_imported(&self) -> usize {
        self.tables.iter().map(|t| t.imported).sum()
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import from {}", self.source)?;
        if self.cleared {
            writeln!(f, "  existing data cleared")?;
        }
        for table in &self.tables {
            if table.missing {
                writeln!(f, "  {:<14} not present, skipped", table.table.as_str())?;
            } else {
                writeln!(
                    f,
                    "  {:<14} {} imported, {} skipped",
                    table.table.as_str(),
                    table.imported,
                    table.skipped
                )?;
            }
        }
        for placeholder in &self.placeholders {
            writeln!(f, "  created {placeholder}")?;
        }
        write!(f, "  total: {} records", self.total_imported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut report = ImportReport::new("test");
        report.table_mut(Table::Assets).imported += 2;
        report.table_mut(Table::Assets).skipped += 1;
        report.table_mut(Table::Farms).imported += 1;

        assert_eq!(report.tables.len(), 2);
        assert_eq!(report.imported(Table::Assets), 2);
        assert_eq!(report.skipped(Table::Assets), 1);
        assert_eq!(report.imported(Table::Companies), 0);
        assert_eq!(report.total_imported(), 3);
    }

    #[test]
    fn test_report_display() {
        let mut report = ImportReport::new("csv directory ./data");
        report.table_mut(Table::Companies).imported = 4;
        report.table_mut(Table::Locations).missing = true;
        report.placeholders.push("Company SYS-1".to_string());

        let text = report.to_string();
        assert!(text.contains("companies      4 imported, 0 skipped"));
        assert!(text.contains("locations      not present, skipped"));
        assert!(text.contains("created Company SYS-1"));
        assert!(text.ends_with("total: 4 records"));
    }

    #[test]
    fn test_options() {
        assert_eq!(ImportOptions::directory(true).default_health, 100);
        assert_eq!(ImportOptions::legacy(false).default_health, 50);
    }
}

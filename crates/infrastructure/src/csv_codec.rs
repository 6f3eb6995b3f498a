//! CSV files for bulk transfer, one file per table.
//!
//! Column order is fixed by `CsvRow::HEADERS`. On read, columns are matched by
//! header name, so extra columns are ignored and missing ones come back empty.

use async_trait::async_trait;
use domain::transfer::{
    AssetEventRecord, AssetRecord, AssetTypeRecord, CompanyRecord, FarmRecord, LocationRecord,
    LookupRecord, RecordSink, RecordSource,
};
use domain::{DomainError, Table};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, DomainError>;

/// A record type with a fixed CSV column order.
pub trait CsvRow: Serialize + DeserializeOwned + Send + 'static {
    const HEADERS: &'static [&'static str];
}

impl CsvRow for CompanyRecord {
    const HEADERS: &'static [&'static str] = &[
        "company_id",
        "name",
        "logo",
        "industry",
        "location_id",
        "established_date",
        "created_at",
    ];
}

impl CsvRow for LocationRecord {
    const HEADERS: &'static [&'static str] = &[
        "location_id",
        "name",
        "address",
        "city",
        "state",
        "zip_code",
        "country",
        "latitude",
        "longitude",
        "created_at",
    ];
}

impl CsvRow for AssetTypeRecord {
    const HEADERS: &'static [&'static str] = &["id", "name", "description", "code"];
}

impl CsvRow for LookupRecord {
    const HEADERS: &'static [&'static str] = &["id", "name", "description"];
}

impl CsvRow for FarmRecord {
    const HEADERS: &'static [&'static str] = &[
        "farm_id",
        "company_id",
        "location_id",
        "name",
        "description",
        "status",
        "created_at",
        "operational_since",
    ];
}

impl CsvRow for AssetRecord {
    const HEADERS: &'static [&'static str] = &[
        "asset_id",
        "company_id",
        "location_id",
        "farm_id",
        "name",
        "asset_type_id",
        "description",
        "installation_date",
        "manufactured_date",
        "commission_date",
        "decommission_date",
        "status",
        "created_at",
        "latitude",
        "longitude",
        "health",
        "capacity",
        "model_id",
        "current_volume",
        "diameter",
        "height",
        "material_id",
        "content_id",
    ];
}

impl CsvRow for AssetEventRecord {
    const HEADERS: &'static [&'static str] = &[
        "event_id",
        "asset_id",
        "title",
        "event_type_id",
        "start_date",
        "end_date",
        "event_status",
        "description",
        "performed_by",
        "created_at",
        "cost",
    ];
}

fn csv_err(path: &Path, e: impl std::fmt::Display) -> DomainError {
    DomainError::Source(format!("{}: {}", path.display(), e))
}

/// Parse CSV records from any reader (an uploaded file, a byte slice...).
pub fn parse_records<T: CsvRow, R: Read>(reader: R) -> std::result::Result<Vec<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    reader.deserialize().collect()
}

/// Read one CSV file. `Ok(None)` when the file does not exist.
pub fn read_file<T: CsvRow>(path: &Path) -> Result<Option<Vec<T>>> {
    if !path.is_file() {
        return Ok(None);
    }
    let file = std::fs::File::open(path).map_err(|e| csv_err(path, e))?;
    let rows = parse_records(file).map_err(|e| csv_err(path, e))?;
    debug!(file = %path.display(), rows = rows.len(), "Read CSV file");
    Ok(Some(rows))
}

/// Write records with a header row, even when there are none.
pub fn write_file<T: CsvRow>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| csv_err(path, e))?;
    writer
        .write_record(T::HEADERS)
        .map_err(|e| csv_err(path, e))?;
    for row in rows {
        writer.serialize(row).map_err(|e| csv_err(path, e))?;
    }
    writer.flush().map_err(|e| csv_err(path, e))?;
    debug!(file = %path.display(), rows = rows.len(), "Wrote CSV file");
    Ok(())
}

/// A directory holding `companies.csv`, `locations.csv`, ... `asset_events.csv`.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    root: PathBuf,
}

impl CsvDirectory {
    /// Open an existing directory for reading.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DomainError::Source(format!(
                "CSV directory not found: {}",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    /// Create (if needed) a directory for writing.
    pub fn create(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| csv_err(&root, e))?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, table: Table) -> PathBuf {
        let file = table
            .csv_file()
            .unwrap_or_else(|| format!("{}.csv", table.as_str()));
        self.root.join(file)
    }

    async fn read<T: CsvRow>(&self, table: Table) -> Result<Option<Vec<T>>> {
        let path = self.path_for(table);
        let rows = tokio::task::spawn_blocking(move || read_file::<T>(&path))
            .await
            .map_err(|e| DomainError::Source(format!("CSV reader task failed: {e}")))??;
        if rows.is_none() {
            info!("{} not found, skipping", self.path_for(table).display());
        }
        Ok(rows)
    }

    async fn write<T: CsvRow + Clone + Sync>(&self, table: Table, rows: &[T]) -> Result<()> {
        let path = self.path_for(table);
        let rows = rows.to_vec();
        tokio::task::spawn_blocking(move || write_file(&path, &rows))
            .await
            .map_err(|e| DomainError::Source(format!("CSV writer task failed: {e}")))?
    }
}

#[async_trait]
impl RecordSource for CsvDirectory {
    fn describe(&self) -> String {
        format!("CSV directory {}", self.root.display())
    }

    async fn companies(&self) -> Result<Option<Vec<CompanyRecord>>> {
        self.read(Table::Companies).await
    }

    async fn locations(&self) -> Result<Option<Vec<LocationRecord>>> {
        self.read(Table::Locations).await
    }

    async fn asset_types(&self) -> Result<Option<Vec<AssetTypeRecord>>> {
        self.read(Table::AssetTypes).await
    }

    async fn materials(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.read(Table::Materials).await
    }

    async fn contents(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.read(Table::Contents).await
    }

    async fn event_types(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.read(Table::EventTypes).await
    }

    async fn farms(&self) -> Result<Option<Vec<FarmRecord>>> {
        self.read(Table::Farms).await
    }

    async fn assets(&self) -> Result<Option<Vec<AssetRecord>>> {
        self.read(Table::Assets).await
    }

    async fn asset_events(&self) -> Result<Option<Vec<AssetEventRecord>>> {
        self.read(Table::AssetEvents).await
    }
}

#[async_trait]
impl RecordSink for CsvDirectory {
    async fn write_companies(&self, rows: &[CompanyRecord]) -> Result<()> {
        self.write(Table::Companies, rows).await
    }

    async fn write_locations(&self, rows: &[LocationRecord]) -> Result<()> {
        self.write(Table::Locations, rows).await
    }

    async fn write_asset_types(&self, rows: &[AssetTypeRecord]) -> Result<()> {
        self.write(Table::AssetTypes, rows).await
    }

    async fn write_materials(&self, rows: &[LookupRecord]) -> Result<()> {
        self.write(Table::Materials, rows).await
    }

    async fn write_contents(&self, rows: &[LookupRecord]) -> Result<()> {
        self.write(Table::Contents, rows).await
    }

    async fn write_event_types(&self, rows: &[LookupRecord]) -> Result<()> {
        self.write(Table::EventTypes, rows).await
    }

    async fn write_farms(&self, rows: &[FarmRecord]) -> Result<()> {
        self.write(Table::Farms, rows).await
    }

    async fn write_assets(&self, rows: &[AssetRecord]) -> Result<()> {
        self.write(Table::Assets, rows).await
    }

    async fn write_asset_events(&self, rows: &[AssetEventRecord]) -> Result<()> {
        self.write(Table::AssetEvents, rows).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_header_name() {
        let data = "name,company_id,unused\nAcme,SYS-1,x\n";
        let rows: Vec<CompanyRecord> = parse_records(data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].company_id, "SYS-1");
        assert_eq!(rows[0].name, "Acme");
        assert_eq!(rows[0].established_date, "");
    }

    #[test]
    fn test_write_keeps_column_order_and_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.csv");
        write_file::<LookupRecord>(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "id,name,description\n");

        let rows = vec![LookupRecord {
            id: "3".into(),
            name: "Steel, carbon".into(),
            description: String::new(),
        }];
        write_file(&path, &rows).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "id,name,description\n3,\"Steel, carbon\",\n"
        );
    }

    #[test]
    fn test_headers_match_record_fields() {
        let record = AssetRecord::default();
        let value = serde_json::to_value(&record).unwrap();
        let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
        let mut headers = AssetRecord::HEADERS.to_vec();
        headers.sort_unstable();
        let mut keys = keys;
        keys.sort_unstable();
        assert_eq!(keys, headers);
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = CsvDirectory::open(dir.path()).unwrap();
        assert!(source.companies().await.unwrap().is_none());
    }

    #[test]
    fn test_open_missing_directory() {
        assert!(CsvDirectory::open("/definitely/not/here").is_err());
    }
}

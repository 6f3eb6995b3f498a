//! Reader for the legacy SQLite database the inventory was first kept in.
//!
//! Tables carry the same names and mostly the same columns as the CSV
//! export, so every row is turned into text and fed through the same
//! record types. Columns the legacy schema lacks (e.g. `health`) stay empty.

use async_trait::async_trait;
use domain::DomainError;
use domain::transfer::{
    AssetEventRecord, AssetRecord, AssetTypeRecord, CompanyRecord, FarmRecord, LocationRecord,
    LookupRecord, RecordSource,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Pool, Row, Sqlite};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

type Result<T> = std::result::Result<T, DomainError>;

fn sql_err(e: sqlx::Error) -> DomainError {
    DomainError::Source(format!("Legacy database error: {e}"))
}

pub struct LegacyDatabase {
    pool: Pool<Sqlite>,
    path: PathBuf,
}

impl LegacyDatabase {
    /// Open the database file read-only. The file must exist.
    pub async fn open(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(DomainError::Source(format!(
                "Legacy database not found: {}",
                path.display()
            )));
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .read_only(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(sql_err)?;

        info!("Opened legacy database {}", path.display());
        Ok(Self {
            pool,
            path: path.to_path_buf(),
        })
    }

    async fn has_table(&self, table: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(sql_err)?;
        Ok(count > 0)
    }

    /// `SELECT *` from one table, every value rendered as text.
    async fn rows<T: DeserializeOwned>(&self, table: &str) -> Result<Option<Vec<T>>> {
        if !self.has_table(table).await? {
            info!("Legacy table {} not found, skipping", table);
            return Ok(None);
        }

        let rows = sqlx::query(&format!("SELECT * FROM \"{table}\""))
            .fetch_all(&self.pool)
            .await
            .map_err(sql_err)?;

        let records = rows
            .iter()
            .map(|row| {
                serde_json::from_value(Value::Object(row_as_text(row)))
                    .map_err(|e| DomainError::invalid_record("legacy", format!("{table}: {e}")))
            })
            .collect::<Result<Vec<T>>>()?;

        debug!(table, rows = records.len(), "Read legacy table");
        Ok(Some(records))
    }
}

fn row_as_text(row: &SqliteRow) -> Map<String, Value> {
    let mut map = Map::new();
    for column in row.columns() {
        // SQLite converts integers and reals to text on request
        let value: Option<String> = row.try_get_unchecked(column.ordinal()).unwrap_or(None);
        if let Some(value) = value {
            map.insert(column.name().to_string(), Value::String(value));
        }
    }
    map
}

#[async_trait]
impl RecordSource for LegacyDatabase {
    fn describe(&self) -> String {
        format!("legacy database {}", self.path.display())
    }

    async fn companies(&self) -> Result<Option<Vec<CompanyRecord>>> {
        self.rows("companies").await
    }

    async fn locations(&self) -> Result<Option<Vec<LocationRecord>>> {
        self.rows("locations").await
    }

    async fn asset_types(&self) -> Result<Option<Vec<AssetTypeRecord>>> {
        self.rows("asset_types").await
    }

    async fn materials(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.rows("materials").await
    }

    async fn contents(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.rows("contents").await
    }

    async fn event_types(&self) -> Result<Option<Vec<LookupRecord>>> {
        self.rows("event_types").await
    }

    async fn farms(&self) -> Result<Option<Vec<FarmRecord>>> {
        self.rows("farms").await
    }

    async fn assets(&self) -> Result<Option<Vec<AssetRecord>>> {
        self.rows("assets").await
    }

    async fn asset_events(&self) -> Result<Option<Vec<AssetEventRecord>>> {
        self.rows("asset_events").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn legacy_fixture(dir: &Path) -> PathBuf {
        let path = dir.join("legacy.db");
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE locations (location_id INTEGER PRIMARY KEY, name TEXT, city TEXT,
             latitude REAL, longitude REAL, created_at TEXT)",
        )
        .execute(&pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO locations VALUES (7, 'Midland Yard', NULL, 31.99, -102.07, '2023-04-01 08:30:00')",
        )
        .execute(&pool)
        .await
        .unwrap();
        pool.close().await;
        path
    }

    #[tokio::test]
    async fn test_reads_rows_as_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = legacy_fixture(dir.path()).await;

        let legacy = LegacyDatabase::open(&path).await.unwrap();
        let locations = legacy.locations().await.unwrap().unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].location_id, "7");
        assert_eq!(locations[0].name, "Midland Yard");
        assert_eq!(locations[0].city, "");
        assert_eq!(locations[0].latitude.parse::<f64>().unwrap(), 31.99);
        assert_eq!(locations[0].created_at, "2023-04-01 08:30:00");
    }

    #[tokio::test]
    async fn test_missing_table_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = legacy_fixture(dir.path()).await;

        let legacy = LegacyDatabase::open(&path).await.unwrap();
        assert!(legacy.companies().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = LegacyDatabase::open(Path::new("/no/such/legacy.db")).await;
        assert!(matches!(result, Err(DomainError::Source(_))));
    }
}

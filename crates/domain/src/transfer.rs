//! Interchange records for bulk import/export.
//!
//! Every field is kept as raw text exactly as it appears in a CSV cell; the
//! application layer decides how lenient parsing is. Field order is the CSV
//! column order and must not change.

use crate::error::Result;
use crate::table::Table;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyRecord {
    pub company_id: String,
    pub name: String,
    pub logo: String,
    pub industry: String,
    pub location_id: String,
    pub established_date: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationRecord {
    pub location_id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub latitude: String,
    pub longitude: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetTypeRecord {
    pub id: String,
    pub name: String,
    pub description: String,
    pub code: String,
}

/// Shape shared by `materials.csv`, `contents.csv` and `event_types.csv`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupRecord {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmRecord {
    pub farm_id: String,
    pub company_id: String,
    pub location_id: String,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
    pub operational_since: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetRecord {
    pub asset_id: String,
    pub company_id: String,
    pub location_id: String,
    pub farm_id: String,
    pub name: String,
    pub asset_type_id: String,
    pub description: String,
    pub installation_date: String,
    pub manufactured_date: String,
    pub commission_date: String,
    pub decommission_date: String,
    pub status: String,
    pub created_at: String,
    pub latitude: String,
    pub longitude: String,
    pub health: String,
    pub capacity: String,
    pub model_id: String,
    pub current_volume: String,
    pub diameter: String,
    pub height: String,
    pub material_id: String,
    pub content_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetEventRecord {
    pub event_id: String,
    pub asset_id: String,
    pub title: String,
    pub event_type_id: String,
    pub start_date: String,
    pub end_date: String,
    pub event_status: String,
    pub description: String,
    pub performed_by: String,
    pub created_at: String,
    pub cost: String,
}

/// A place records are read from (CSV directory, legacy database...).
///
/// `Ok(None)` means the source has no data for that table at all, which
/// importers treat as "skip", not as an empty table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    async fn companies(&self) -> Result<Option<Vec<CompanyRecord>>>;
    async fn locations(&self) -> Result<Option<Vec<LocationRecord>>>;
    async fn asset_types(&self) -> Result<Option<Vec<AssetTypeRecord>>>;
    async fn materials(&self) -> Result<Option<Vec<LookupRecord>>>;
    async fn contents(&self) -> Result<Option<Vec<LookupRecord>>>;
    async fn event_types(&self) -> Result<Option<Vec<LookupRecord>>>;
    async fn farms(&self) -> Result<Option<Vec<FarmRecord>>>;
    async fn assets(&self) -> Result<Option<Vec<AssetRecord>>>;
    async fn asset_events(&self) -> Result<Option<Vec<AssetEventRecord>>>;
}

/// A place records are written to on export.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn write_companies(&self, rows: &[CompanyRecord]) -> Result<()>;
    async fn write_locations(&self, rows: &[LocationRecord]) -> Result<()>;
    async fn write_asset_types(&self, rows: &[AssetTypeRecord]) -> Result<()>;
    async fn write_materials(&self, rows: &[LookupRecord]) -> Result<()>;
    async fn write_contents(&self, rows: &[LookupRecord]) -> Result<()>;
    async fn write_event_types(&self, rows: &[LookupRecord]) -> Result<()>;
    async fn write_farms(&self, rows: &[FarmRecord]) -> Result<()>;
    async fn write_assets(&self, rows: &[AssetRecord]) -> Result<()>;
    async fn write_asset_events(&self, rows: &[AssetEventRecord]) -> Result<()>;
}

/// Number of rows the source holds per table, `None` where the table is absent.
pub async fn row_counts(source: &dyn RecordSource) -> Result<Vec<(Table, Option<usize>)>> {
    let mut counts = Vec::with_capacity(Table::TRANSFER_ORDER.len());
    for table in Table::TRANSFER_ORDER {
        let count = match table {
            Table::Companies => source.companies().await?.map(|r| r.len()),
            Table::Locations => source.locations().await?.map(|r| r.len()),
            Table::AssetTypes => source.asset_types().await?.map(|r| r.len()),
            Table::Materials => source.materials().await?.map(|r| r.len()),
            Table::Contents => source.contents().await?.map(|r| r.len()),
            Table::EventTypes => source.event_types().await?.map(|r| r.len()),
            Table::Farms => source.farms().await?.map(|r| r.len()),
            Table::Assets => source.assets().await?.map(|r| r.len()),
            Table::AssetEvents => source.asset_events().await?.map(|r| r.len()),
            Table::AssetModels => None,
        };
        counts.push((table, count));
    }
    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DomainError;

    fn empty_source() -> MockRecordSource {
        let mut source = MockRecordSource::new();
        source.expect_companies().returning(|| Ok(None));
        source.expect_locations().returning(|| Ok(None));
        source.expect_asset_types().returning(|| Ok(None));
        source.expect_materials().returning(|| Ok(None));
        source.expect_contents().returning(|| Ok(None));
        source.expect_event_types().returning(|| Ok(None));
        source.expect_farms().returning(|| Ok(None));
        source.expect_assets().returning(|| Ok(None));
        source.expect_asset_events().returning(|| Ok(None));
        source
    }

    #[tokio::test]
    async fn test_row_counts_reports_missing_and_present_tables() {
        let mut source = MockRecordSource::new();
        source.expect_companies().returning(|| {
            Ok(Some(vec![
                CompanyRecord {
                    company_id: "SYS-1".into(),
                    ..Default::default()
                },
                CompanyRecord {
                    company_id: "SYS-2".into(),
                    ..Default::default()
                },
            ]))
        });
        source.expect_locations().returning(|| Ok(Some(vec![])));
        source.expect_asset_types().returning(|| Ok(None));
        source.expect_materials().returning(|| Ok(None));
        source.expect_contents().returning(|| Ok(None));
        source.expect_event_types().returning(|| Ok(None));
        source.expect_farms().returning(|| Ok(None));
        source.expect_assets().returning(|| Ok(None));
        source.expect_asset_events().returning(|| Ok(None));

        let counts = row_counts(&source).await.unwrap();
        assert_eq!(counts.len(), 9);
        assert_eq!(counts[0], (Table::Companies, Some(2)));
        assert_eq!(counts[1], (Table::Locations, Some(0)));
        assert_eq!(counts[2], (Table::AssetTypes, None));
    }

    #[tokio::test]
    async fn test_row_counts_all_missing() {
        let source = empty_source();
        let counts = row_counts(&source).await.unwrap();
        assert!(counts.iter().all(|(_, c)| c.is_none()));
    }

    #[tokio::test]
    async fn test_row_counts_propagates_source_error() {
        let mut source = MockRecordSource::new();
        source
            .expect_companies()
            .returning(|| Err(DomainError::Source("unreadable".into())));

        let result = row_counts(&source).await;
        assert_eq!(result.unwrap_err(), DomainError::Source("unreadable".into()));
    }
}

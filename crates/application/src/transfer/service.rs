//! Transactional entry points for every transfer workflow.

use super::export::{ExportManifest, export_records};
use super::{ImportOptions, ImportReport, assets_file, importer};
use anyhow::{Context, Result, anyhow};
use domain::transfer::{AssetRecord, RecordSource};
use domain::{DomainError, InventoryRepository};
use infrastructure::archive::{self, ARCHIVE_EXTENSION};
use infrastructure::csv_codec::{self, CsvDirectory};
use infrastructure::{LegacyDatabase, SeaOrmInventoryRepository};
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const MANIFEST_FILE: &str = "manifest.json";

/// Runs imports and exports against one database.
///
/// Every import runs in a single transaction: it either lands completely or
/// leaves the database as it was.
#[derive(Clone)]
pub struct TransferService {
    db: DatabaseConnection,
}

impl TransferService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<DatabaseTransaction> {
        self.db.begin().await.context("Failed to start transaction")
    }

    /// Commit a successful run and fix up sequences, or roll it back.
    async fn finish(&self, txn: DatabaseTransaction, outcome: Result<ImportReport>) -> Result<ImportReport> {
        match outcome {
            Ok(report) => {
                txn.commit().await.context("Failed to commit import")?;
                SeaOrmInventoryRepository::new(&self.db)
                    .resync_sequences()
                    .await
                    .context("Failed to resynchronise sequences")?;
                Ok(report)
            }
            Err(e) => {
                warn!("❌ Import failed, rolling back: {:#}", e);
                txn.rollback().await.context("Failed to roll back import")?;
                Err(e)
            }
        }
    }

    async fn import_from(&self, source: &dyn RecordSource, options: ImportOptions) -> Result<ImportReport> {
        let txn = self.begin().await?;
        let outcome = {
            let repo = SeaOrmInventoryRepository::new(&txn);
            importer::import_records(&repo, source, &options).await
        };
        self.finish(txn, outcome).await
    }

    /// Import the nine CSV files of `dir`. Absent files are skipped.
    pub async fn import_directory(&self, dir: &Path, clear_existing: bool) -> Result<ImportReport> {
        let source = CsvDirectory::open(dir)?;
        self.import_from(&source, ImportOptions::directory(clear_existing))
            .await
    }

    pub async fn import_legacy(&self, db_path: &Path, clear_existing: bool) -> Result<ImportReport> {
        let source = LegacyDatabase::open(db_path).await?;
        self.import_from(&source, ImportOptions::legacy(clear_existing))
            .await
    }

    async fn import_asset_records(
        &self,
        rows: &[AssetRecord],
        update_existing: bool,
        source: &str,
    ) -> Result<ImportReport> {
        let txn = self.begin().await?;
        let outcome = {
            let repo = SeaOrmInventoryRepository::new(&txn);
            assets_file::import_asset_rows(&repo, rows, update_existing, source).await
        };
        self.finish(txn, outcome).await
    }

    /// Import a single assets CSV, creating referenced parents as needed.
    pub async fn import_assets_file(&self, path: &Path, update_existing: bool) -> Result<ImportReport> {
        let rows = csv_codec::read_file::<AssetRecord>(path)?
            .ok_or_else(|| anyhow!("Assets file not found: {}", path.display()))?;
        self.import_asset_records(&rows, update_existing, &path.display().to_string())
            .await
    }

    /// Same as `import_assets_file` for an uploaded file.
    pub async fn import_assets_csv(
        &self,
        data: &[u8],
        update_existing: bool,
        file_name: &str,
    ) -> Result<ImportReport> {
        let rows = csv_codec::parse_records::<AssetRecord, _>(data)
            .map_err(|e| DomainError::Source(format!("Invalid CSV file {file_name}: {e}")))?;
        self.import_asset_records(&rows, update_existing, file_name)
            .await
    }

    /// Delete every row of the nine transfer tables.
    pub async fn clear_all(&self) -> Result<()> {
        let txn = self.begin().await?;
        SeaOrmInventoryRepository::new(&txn)
            .clear_transfer_tables()
            .await?;
        txn.commit().await.context("Failed to commit clear")?;
        info!("🧹 All inventory data cleared");
        Ok(())
    }

    pub async fn export_directory(&self, dir: &Path) -> Result<ExportManifest> {
        let sink = CsvDirectory::create(dir)?;
        let repo = SeaOrmInventoryRepository::new(&self.db);
        let manifest = export_records(&repo, &sink).await?;
        info!(
            "✅ Exported {} rows to {}",
            manifest.total_rows(),
            dir.display()
        );
        Ok(manifest)
    }

    /// Export everything into a compressed bundle at `archive_path`.
    pub async fn export_archive(&self, archive_path: &Path) -> Result<ExportManifest> {
        let staging = tempfile::tempdir().context("Failed to create staging directory")?;
        let manifest = self.export_directory(staging.path()).await?;

        let manifest_json = serde_json::to_vec_pretty(&manifest)?;
        tokio::fs::write(staging.path().join(MANIFEST_FILE), manifest_json)
            .await
            .context("Failed to write manifest")?;

        let folder = staging.path().to_path_buf();
        let target = archive_path.to_path_buf();
        let size = tokio::task::spawn_blocking(move || archive::pack_folder(&folder, &target))
            .await??;
        info!(
            "📦 Archive written to {} ({} bytes)",
            archive_path.display(),
            size
        );
        Ok(manifest)
    }

    /// Export into an in-memory bundle, for downloads.
    pub async fn export_archive_bytes(&self) -> Result<(Vec<u8>, ExportManifest)> {
        let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
        let path = scratch.path().join(format!("export.{ARCHIVE_EXTENSION}"));
        let manifest = self.export_archive(&path).await?;
        let data = tokio::fs::read(&path).await?;
        Ok((data, manifest))
    }

    /// Unpack a bundle into a scratch directory and import it.
    pub async fn import_archive(&self, archive_path: &Path, clear_existing: bool) -> Result<ImportReport> {
        if !archive_path.is_file() {
            return Err(anyhow!("Archive not found: {}", archive_path.display()));
        }
        let staging = tempfile::tempdir().context("Failed to create staging directory")?;
        let archive_file = archive_path.to_path_buf();
        let target: PathBuf = staging.path().to_path_buf();
        tokio::task::spawn_blocking(move || archive::unpack_archive(&archive_file, &target))
            .await?
            .map_err(|e| {
                DomainError::Source(format!("Failed to unpack {}: {e:#}", archive_path.display()))
            })?;

        if let Some(manifest) = read_manifest(staging.path()).await {
            info!(
                "📦 Bundle exported at {} with {} rows",
                manifest.exported_at,
                manifest.total_rows()
            );
        }

        let mut report = self
            .import_directory(staging.path(), clear_existing)
            .await?;
        report.source = format!("archive {}", archive_path.display());
        Ok(report)
    }

    /// Same as `import_archive` for an uploaded bundle.
    pub async fn import_archive_bytes(&self, data: &[u8], clear_existing: bool) -> Result<ImportReport> {
        let scratch = tempfile::tempdir().context("Failed to create scratch directory")?;
        let path = scratch.path().join(format!("upload.{ARCHIVE_EXTENSION}"));
        tokio::fs::write(&path, data).await?;
        self.import_archive(&path, clear_existing).await
    }
}

async fn read_manifest(dir: &Path) -> Option<ExportManifest> {
    let data = tokio::fs::read(dir.join(MANIFEST_FILE)).await.ok()?;
    match serde_json::from_slice(&data) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!("Ignoring unreadable manifest: {}", e);
            None
        }
    }
}

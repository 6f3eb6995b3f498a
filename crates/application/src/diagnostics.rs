//! Deployment self-checks behind `tank-admin diagnose`.

use domain::transfer::CompanyRecord;
use domain::{Company, InventoryRepository, Table};
use infrastructure::csv_codec;
use infrastructure::{MediaStorage, SeaOrmInventoryRepository, ServerConfig};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use serde::Serialize;
use std::io::Write;

const SAMPLE_CSV: &str = "company_id,name,logo,industry,location_id,established_date,created_at
TEST-001,Test Company,,Test Industry,,2020-01-01,2025-01-01 10:00:00
";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

impl Check {
    fn from_result(name: &'static str, result: anyhow::Result<String>) -> Self {
        match result {
            Ok(detail) => Self {
                name,
                ok: true,
                detail,
            },
            Err(e) => Self {
                name,
                ok: false,
                detail: format!("{e:#}"),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticReport {
    pub checks: Vec<Check>,
}

impl DiagnosticReport {
    pub fn all_ok(&self) -> bool {
        self.checks.iter().all(|c| c.ok)
    }
}

impl std::fmt::Display for DiagnosticReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "🔍 Diagnostic report")?;
        for check in &self.checks {
            let mark = if check.ok { "✅" } else { "❌" };
            writeln!(f, "{} {}: {}", mark, check.name, check.detail)?;
        }
        Ok(())
    }
}

async fn ping(db: &DatabaseConnection) -> anyhow::Result<String> {
    db.execute_unprepared("SELECT 1").await?;
    Ok(format!("{:?} backend reachable", db.get_database_backend()))
}

async fn company_count(db: &DatabaseConnection) -> anyhow::Result<String> {
    let count = SeaOrmInventoryRepository::new(db).count(Table::Companies).await?;
    Ok(format!("{count} companies"))
}

fn temp_file() -> anyhow::Result<String> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(b"test")?;
    let path = file.path().display().to_string();
    file.close()?;
    Ok(format!("created and removed {path}"))
}

async fn media_writable(storage: &MediaStorage) -> anyhow::Result<String> {
    let root = storage.check_writable().await?;
    Ok(format!("{} is writable", root.display()))
}

/// Parse a one-row companies CSV and save it inside a rolled-back transaction.
async fn sample_import(db: &DatabaseConnection) -> anyhow::Result<String> {
    let rows = csv_codec::parse_records::<CompanyRecord, _>(SAMPLE_CSV.as_bytes())?;
    let row = rows
        .first()
        .ok_or_else(|| anyhow::anyhow!("sample CSV produced no rows"))?;

    let txn = db.begin().await?;
    let saved = SeaOrmInventoryRepository::new(&txn)
        .save_company(&Company::new(row.company_id.clone(), row.name.clone()))
        .await;
    txn.rollback().await?;
    saved?;
    Ok(format!("parsed and saved {} (rolled back)", row.company_id))
}

fn upload_limits(config: &ServerConfig) -> String {
    format!(
        "max upload {} bytes ({:.1} MiB)",
        config.upload.max_bytes,
        config.upload.max_bytes as f64 / (1024.0 * 1024.0)
    )
}

/// Run every check. A failing check never stops the others.
pub async fn run_diagnostics(
    db: &DatabaseConnection,
    storage: &MediaStorage,
    config: &ServerConfig,
) -> DiagnosticReport {
    let checks = vec![
        Check::from_result("Database connection", ping(db).await),
        Check::from_result("Company count", company_count(db).await),
        Check::from_result("Temp file creation", temp_file()),
        Check::from_result("Media directory", media_writable(storage).await),
        Check::from_result("Sample CSV import", sample_import(db).await),
        Check::from_result("Upload limits", Ok(upload_limits(config))),
    ];
    DiagnosticReport { checks }
}

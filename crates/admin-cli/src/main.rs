use anyhow::{Result, bail};
use application::{TransferService, run_diagnostics, setup_model_files};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use infrastructure::database::{self, redact};
use infrastructure::{MediaStorage, ServerConfig};
use sea_orm::DatabaseConnection;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Tank inventory maintenance tool", long_about = None)]
struct Args {
    /// Path to config directory
    #[arg(long, default_value = "config", global = true)]
    config_dir: String,

    /// Override the database URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending schema migrations
    Migrate,

    /// Import an export directory of CSV files
    ImportCsv {
        #[arg(long)]
        csv_dir: PathBuf,
        /// Delete all inventory data first
        #[arg(long)]
        clear_existing: bool,
    },

    /// Import a single assets CSV, creating missing parents
    ImportAssets {
        #[arg(long)]
        csv_file: PathBuf,
        /// Overwrite assets that already exist
        #[arg(long)]
        update_existing: bool,
    },

    /// Import from a legacy SQLite database file
    ImportLegacy {
        #[arg(long)]
        legacy_db: PathBuf,
        #[arg(long)]
        clear_existing: bool,
    },

    /// Export every table as CSV files
    ExportCsv {
        #[arg(long, default_value = "./csv_exports")]
        output_dir: PathBuf,
    },

    /// Export every table into one compressed bundle
    ExportArchive {
        #[arg(long)]
        output: PathBuf,
    },

    /// Import a compressed bundle written by export-archive
    ImportArchive {
        #[arg(long)]
        archive: PathBuf,
        #[arg(long)]
        clear_existing: bool,
    },

    /// Copy .glb model files into the media and static directories
    SetupModelFiles {
        #[arg(long)]
        source_dir: PathBuf,
    },

    /// Check database, storage and upload settings
    Diagnose,
}

fn storage(config: &ServerConfig) -> MediaStorage {
    MediaStorage::new(
        config.storage.media_root.clone(),
        config.storage.static_root.clone(),
    )
}

async fn open(config: &ServerConfig) -> Result<(DatabaseConnection, TransferService)> {
    info!("Connecting to database {}...", redact(&config.database_url));
    let db = database::connect(&config.database_url).await?;
    database::migrate(&db).await?;
    let transfer = TransferService::new(db.clone());
    Ok((db, transfer))
}

async fn run(command: Command, config: ServerConfig) -> Result<()> {
    match command {
        Command::Migrate => {
            open(&config).await?;
            println!("✅ Migrations applied");
        }
        Command::ImportCsv {
            csv_dir,
            clear_existing,
        } => {
            let (_, transfer) = open(&config).await?;
            let report = transfer.import_directory(&csv_dir, clear_existing).await?;
            println!("{report}");
        }
        Command::ImportAssets {
            csv_file,
            update_existing,
        } => {
            let (_, transfer) = open(&config).await?;
            let report = transfer
                .import_assets_file(&csv_file, update_existing)
                .await?;
            println!("{report}");
        }
        Command::ImportLegacy {
            legacy_db,
            clear_existing,
        } => {
            let (_, transfer) = open(&config).await?;
            let report = transfer.import_legacy(&legacy_db, clear_existing).await?;
            println!("{report}");
        }
        Command::ExportCsv { output_dir } => {
            let (_, transfer) = open(&config).await?;
            let manifest = transfer.export_directory(&output_dir).await?;
            for (table, rows) in &manifest.rows {
                println!("  {:<14} {} rows", table, rows);
            }
            println!("✅ Exported to {}", output_dir.display());
        }
        Command::ExportArchive { output } => {
            let (_, transfer) = open(&config).await?;
            let manifest = transfer.export_archive(&output).await?;
            println!(
                "✅ Exported {} rows to {}",
                manifest.total_rows(),
                output.display()
            );
        }
        Command::ImportArchive {
            archive,
            clear_existing,
        } => {
            let (_, transfer) = open(&config).await?;
            let report = transfer.import_archive(&archive, clear_existing).await?;
            println!("{report}");
        }
        Command::SetupModelFiles { source_dir } => {
            let report = setup_model_files(&source_dir, &storage(&config)).await?;
            for file in &report.files {
                let note = if report.kept.contains(file) { " (kept existing)" } else { "" };
                println!("  {file}{note}");
            }
            println!(
                "✅ {} model files copied to {} and {}",
                report.files.len(),
                report.media_target.display(),
                report.static_target.display()
            );
        }
        Command::Diagnose => {
            let (db, _) = open(&config).await?;
            let report = run_diagnostics(&db, &storage(&config), &config).await;
            println!("{report}");
            if !report.all_ok() {
                bail!("Diagnostics found problems");
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,application=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = ServerConfig::load(&args.config_dir)?;
    if let Some(url) = &args.database_url {
        config.database_url = url.clone();
    }

    run(args.command, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_csv() {
        let args = Args::try_parse_from([
            "tank-admin",
            "import-csv",
            "--csv-dir",
            "exports",
            "--clear-existing",
            "--database-url",
            "sqlite::memory:",
        ])
        .unwrap();
        assert_eq!(args.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(args.config_dir, "config");
        match args.command {
            Command::ImportCsv {
                csv_dir,
                clear_existing,
            } => {
                assert_eq!(csv_dir, PathBuf::from("exports"));
                assert!(clear_existing);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_export_csv_default_dir() {
        let args = Args::try_parse_from(["tank-admin", "export-csv"]).unwrap();
        assert!(matches!(
            args.command,
            Command::ExportCsv { output_dir } if output_dir == PathBuf::from("./csv_exports")
        ));
    }

    #[test]
    fn test_required_arguments() {
        assert!(Args::try_parse_from(["tank-admin", "import-assets"]).is_err());
        assert!(Args::try_parse_from(["tank-admin", "unknown"]).is_err());
    }
}

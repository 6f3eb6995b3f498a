//! End-to-end import/export runs against an in-memory SQLite database.

use application::transfer::TransferService;
use application::{run_diagnostics, setup_model_files};
use domain::{Asset, Company, InventoryRepository, Table};
use infrastructure::database::connect_and_migrate;
use infrastructure::{MediaStorage, SeaOrmInventoryRepository, ServerConfig};
use sea_orm::DatabaseConnection;
use std::path::Path;

async fn test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

fn write(dir: &Path, file: &str, content: &str) {
    std::fs::write(dir.join(file), content).unwrap();
}

/// A small but complete export directory.
fn sample_directory(dir: &Path) {
    write(
        dir,
        "companies.csv",
        "company_id,name,logo,industry,location_id,established_date,created_at
SYS-1D3407DB,Permian Storage,,Oil & Gas,,2001-02-03,2024-01-05 10:00:00
",
    );
    write(
        dir,
        "locations.csv",
        "location_id,name,address,city,state,zip_code,country,latitude,longitude,created_at
7,Midland Yard,,Midland,TX,,USA,31.99,-102.07,2023-04-01 08:30:00.123456
",
    );
    write(
        dir,
        "asset_types.csv",
        "id,name,description,code
1,Fixed Roof Tank,,FRT
",
    );
    write(dir, "materials.csv", "id,name,description\n1,Carbon Steel,\n");
    write(dir, "contents.csv", "id,name,description\n1,Crude Oil,\n");
    write(dir, "event_types.csv", "id,name,description\n1,Inspection,\n");
    write(
        dir,
        "farms.csv",
        "farm_id,company_id,location_id,name,description,status,created_at,operational_since
SYS-1D3407DB-F-13083,SYS-1D3407DB,7,North Field,,active,2024-01-05T10:00:00+00:00,2015-04-12
SYS-1D3407DB-F-99999,SYS-1D3407DB,99,Lost Field,,active,,
",
    );
    write(
        dir,
        "assets.csv",
        "asset_id,company_id,location_id,farm_id,name,asset_type_id,description,installation_date,manufactured_date,commission_date,decommission_date,status,created_at,latitude,longitude,health,capacity,model_id,current_volume,diameter,height,material_id,content_id
SYS-1D3407DB-F-13083-A-06527,SYS-1D3407DB,7,SYS-1D3407DB-F-13083,Tank 7,1,,2019-06-01 00:00:00,,,,active,2024-01-05 10:00:00,31.99,-102.07,88,500.0,FR-400,120.5,12,8,1,1
SYS-1D3407DB-A-00001,SYS-1D3407DB,,NO-SUCH-FARM,Orphan Tank,5,,,,,,inactive,,,,,,,,,,,
",
    );
    write(
        dir,
        "asset_events.csv",
        "event_id,asset_id,title,event_type_id,start_date,end_date,event_status,description,performed_by,created_at,cost
E-1,SYS-1D3407DB-F-13083-A-06527,Annual inspection,1,2024-02-01 09:00:00,,completed,,J. Ortiz,2024-02-01 09:00:00,1500
E-2,NO-SUCH-ASSET,Ghost event,1,,,,,,,
E-3,,No asset,,,,,,,,
",
    );
}

#[tokio::test]
async fn test_import_directory_resolves_and_nulls_relations() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    sample_directory(dir.path());

    let report = TransferService::new(db.clone())
        .import_directory(dir.path(), false)
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Assets), 2);
    assert_eq!(report.imported(Table::AssetEvents), 1);
    assert_eq!(report.skipped(Table::AssetEvents), 2);

    let repo = SeaOrmInventoryRepository::new(&db);
    let farm = repo.find_farm("SYS-1D3407DB-F-13083").await.unwrap().unwrap();
    assert_eq!(farm.location_id, Some(7));
    let lost = repo.find_farm("SYS-1D3407DB-F-99999").await.unwrap().unwrap();
    assert_eq!(lost.location_id, None);

    let tank = repo
        .find_asset("SYS-1D3407DB-F-13083-A-06527")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tank.health, 88);
    assert_eq!(tank.asset_type_id, Some(1));
    assert_eq!(tank.capacity, Some(500.0));

    let orphan = repo
        .find_asset("SYS-1D3407DB-A-00001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphan.farm_id, None);
    assert_eq!(orphan.asset_type_id, None);
    assert_eq!(orphan.health, 100);
}

#[tokio::test]
async fn test_reimport_creates_no_duplicates() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    sample_directory(dir.path());
    let service = TransferService::new(db.clone());

    service.import_directory(dir.path(), false).await.unwrap();
    service.import_directory(dir.path(), false).await.unwrap();

    let repo = SeaOrmInventoryRepository::new(&db);
    assert_eq!(repo.count(Table::Companies).await.unwrap(), 1);
    assert_eq!(repo.count(Table::Locations).await.unwrap(), 1);
    assert_eq!(repo.count(Table::Farms).await.unwrap(), 2);
    assert_eq!(repo.count(Table::Assets).await.unwrap(), 2);
    assert_eq!(repo.count(Table::AssetEvents).await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_files_are_skipped() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "materials.csv", "id,name,description\n3,Fiberglass,\n");

    let report = TransferService::new(db.clone())
        .import_directory(dir.path(), false)
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Materials), 1);
    assert!(report.table(Table::Companies).unwrap().missing);
    assert!(report.table(Table::AssetEvents).unwrap().missing);
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let db = test_db().await;
    let result = TransferService::new(db)
        .import_directory(Path::new("/no/such/export"), false)
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_clear_existing_removes_old_rows() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    repo.save_company(&Company::new("OLD-1", "Old Co")).await.unwrap();
    repo.save_asset(&Asset::new("OLD-A-1", "OLD-1", "Old Tank", "active"))
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    sample_directory(dir.path());
    let report = TransferService::new(db.clone())
        .import_directory(dir.path(), true)
        .await
        .unwrap();
    assert!(report.cleared);

    assert!(repo.find_company("OLD-1").await.unwrap().is_none());
    assert!(repo.find_asset("OLD-A-1").await.unwrap().is_none());
    assert_eq!(repo.count(Table::Companies).await.unwrap(), 1);
}

#[tokio::test]
async fn test_fatal_row_rolls_back_the_run() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    repo.save_company(&Company::new("KEEP-1", "Kept Co")).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "companies.csv",
        "company_id,name,logo,industry,location_id,established_date,created_at\nNEW-1,New Co,,,,,\n",
    );
    write(
        dir.path(),
        "locations.csv",
        "location_id,name,address,city,state,zip_code,country,latitude,longitude,created_at\nabc,Broken,,,,,,,,\n",
    );

    let result = TransferService::new(db.clone())
        .import_directory(dir.path(), true)
        .await;
    assert!(result.is_err());

    assert!(repo.find_company("KEEP-1").await.unwrap().is_some());
    assert!(repo.find_company("NEW-1").await.unwrap().is_none());
    assert_eq!(repo.count(Table::Locations).await.unwrap(), 0);
}

#[tokio::test]
async fn test_reimport_keeps_uploaded_model() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    sample_directory(dir.path());
    let service = TransferService::new(db.clone());
    service.import_directory(dir.path(), false).await.unwrap();

    let repo = SeaOrmInventoryRepository::new(&db);
    let mut tank = repo
        .find_asset("SYS-1D3407DB-F-13083-A-06527")
        .await
        .unwrap()
        .unwrap();
    tank.model_file = Some("asset_models/SYS-1D3407DB-F-13083-A-06527.glb".to_string());
    tank.model_file_name = Some("tank.glb".to_string());
    repo.save_asset(&tank).await.unwrap();

    service.import_directory(dir.path(), false).await.unwrap();
    let tank = repo
        .find_asset("SYS-1D3407DB-F-13083-A-06527")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tank.model_file_name.as_deref(), Some("tank.glb"));
}

#[tokio::test]
async fn test_export_then_import_round_trip() {
    let db = test_db().await;
    let source = tempfile::tempdir().unwrap();
    sample_directory(source.path());
    let service = TransferService::new(db.clone());
    service.import_directory(source.path(), false).await.unwrap();

    let export = tempfile::tempdir().unwrap();
    let manifest = service.export_directory(export.path()).await.unwrap();
    assert_eq!(manifest.rows["assets"], 2);
    assert_eq!(manifest.rows["asset_events"], 1);

    let header = std::fs::read_to_string(export.path().join("farms.csv")).unwrap();
    assert!(header.starts_with(
        "farm_id,company_id,location_id,name,description,status,created_at,operational_since\n"
    ));
    assert!(header.contains("2015-04-12"));

    let fresh = test_db().await;
    TransferService::new(fresh.clone())
        .import_directory(export.path(), false)
        .await
        .unwrap();

    let before = SeaOrmInventoryRepository::new(&db);
    let after = SeaOrmInventoryRepository::new(&fresh);
    for table in Table::TRANSFER_ORDER {
        assert_eq!(
            before.count(table).await.unwrap(),
            after.count(table).await.unwrap(),
            "{table} differs"
        );
    }
    let original = before.list_assets().await.unwrap();
    let copied = after.list_assets().await.unwrap();
    let mut original_ids: Vec<_> = original.iter().map(|a| a.asset_id.clone()).collect();
    let mut copied_ids: Vec<_> = copied.iter().map(|a| a.asset_id.clone()).collect();
    original_ids.sort();
    copied_ids.sort();
    assert_eq!(original_ids, copied_ids);
}

#[tokio::test]
async fn test_archive_round_trip() {
    let db = test_db().await;
    let source = tempfile::tempdir().unwrap();
    sample_directory(source.path());
    let service = TransferService::new(db.clone());
    service.import_directory(source.path(), false).await.unwrap();

    let (bundle, manifest) = service.export_archive_bytes().await.unwrap();
    assert!(!bundle.is_empty());
    assert_eq!(manifest.rows["companies"], 1);

    let fresh = test_db().await;
    let report = TransferService::new(fresh.clone())
        .import_archive_bytes(&bundle, true)
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Farms), 2);
    assert!(report.source.starts_with("archive "));

    let repo = SeaOrmInventoryRepository::new(&fresh);
    assert_eq!(repo.count(Table::Assets).await.unwrap(), 2);
    assert_eq!(repo.count(Table::AssetEvents).await.unwrap(), 1);
}

#[tokio::test]
async fn test_import_archive_rejects_garbage() {
    let db = test_db().await;
    let result = TransferService::new(db)
        .import_archive_bytes(b"definitely not zstd", false)
        .await;
    assert!(result.is_err());
}

const ASSETS_FILE: &str = "asset_id,company_id,location_id,farm_id,name,asset_type_id,description,installation_date,manufactured_date,commission_date,decommission_date,status,created_at,latitude,longitude,health,capacity,model_id,current_volume,diameter,height,material_id,content_id
SYS-88627B0B-F-00001-A-00001,SYS-88627B0B,12,SYS-88627B0B-F-00001,Tank 1,4,,06/15/2019,,,,active,,32.1,-101.9,5,1000,,,,,2,3
,SYS-88627B0B,,,Nameless,,,,,,,,,,,,,,,,,,
";

#[tokio::test]
async fn test_assets_file_creates_placeholders() {
    let db = test_db().await;
    let report = TransferService::new(db.clone())
        .import_assets_csv(ASSETS_FILE.as_bytes(), false, "assets.csv")
        .await
        .unwrap();

    assert_eq!(report.imported(Table::Assets), 1);
    assert_eq!(report.skipped(Table::Assets), 1);
    assert_eq!(report.placeholders.len(), 6);

    let repo = SeaOrmInventoryRepository::new(&db);
    let company = repo.find_company("SYS-88627B0B").await.unwrap().unwrap();
    assert_eq!(company.name, "Company SYS-88627B0B");
    let location = repo.find_location(12).await.unwrap().unwrap();
    assert_eq!(location.city.as_deref(), Some("Unknown City"));
    assert_eq!(location.latitude, Some(32.1));
    let farm = repo
        .find_farm("SYS-88627B0B-F-00001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(farm.location_id, Some(12));
    assert_eq!(
        repo.find_asset_type(4).await.unwrap().unwrap().name,
        "Asset Type 4"
    );
    let material = repo.find_material(2).await.unwrap().unwrap();
    assert_eq!(material.description.as_deref(), Some("Auto-created material"));
    let content = repo.find_content(3).await.unwrap().unwrap();
    assert_eq!(content.description.as_deref(), Some("Auto-created content"));

    let asset = repo
        .find_asset("SYS-88627B0B-F-00001-A-00001")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(asset.health, 100);
    assert!(asset.installation_date.is_some());
}

#[tokio::test]
async fn test_assets_file_skips_existing_unless_updating() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    let mut existing = Asset::new("SYS-88627B0B-F-00001-A-00001", "SYS-88627B0B", "Old Name", "active");
    existing.health = 20;
    repo.save_asset(&existing).await.unwrap();
    let service = TransferService::new(db.clone());

    let report = service
        .import_assets_csv(ASSETS_FILE.as_bytes(), false, "assets.csv")
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Assets), 0);
    let asset = repo.find_asset(&existing.asset_id).await.unwrap().unwrap();
    assert_eq!(asset.name, "Old Name");

    service
        .import_assets_csv(ASSETS_FILE.as_bytes(), true, "assets.csv")
        .await
        .unwrap();
    let asset = repo.find_asset(&existing.asset_id).await.unwrap().unwrap();
    assert_eq!(asset.name, "Tank 1");
    assert_eq!(asset.health, 100);
}

#[tokio::test]
async fn test_assets_file_from_disk() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "assets.csv", ASSETS_FILE);
    let service = TransferService::new(db);

    let report = service
        .import_assets_file(&dir.path().join("assets.csv"), false)
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Assets), 1);

    assert!(
        service
            .import_assets_file(&dir.path().join("missing.csv"), false)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_diagnostics_pass_on_healthy_setup() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    let storage = MediaStorage::new(dir.path().join("media"), dir.path().join("static"));

    let report = run_diagnostics(&db, &storage, &ServerConfig::default()).await;
    assert!(report.all_ok(), "{report}");
    assert_eq!(report.checks.len(), 6);

    // The sample import is rolled back
    let repo = SeaOrmInventoryRepository::new(&db);
    assert!(repo.find_company("TEST-001").await.unwrap().is_none());
}

#[tokio::test]
async fn test_setup_model_files_into_storage() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("models");
    std::fs::create_dir(&source).unwrap();
    std::fs::write(source.join("HeatExchanger.glb"), b"glTF").unwrap();
    let storage = MediaStorage::new(dir.path().join("media"), dir.path().join("static"));

    let report = setup_model_files(&source, &storage).await.unwrap();
    assert_eq!(report.files, vec!["HeatExchanger.glb"]);
    assert!(dir.path().join("media/model_categories/HeatExchanger.glb").is_file());
}

/// A legacy database file: no `health` column, one dangling reference per table.
async fn legacy_database(dir: &Path) -> std::path::PathBuf {
    use sea_orm::ConnectionTrait;

    let path = dir.join("legacy.db");
    let legacy = sea_orm::Database::connect(format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap();
    for statement in [
        "CREATE TABLE companies (company_id TEXT PRIMARY KEY, name TEXT, industry TEXT)",
        "INSERT INTO companies VALUES ('SYS-OLD', 'Legacy Oil', 'Oil & Gas')",
        "CREATE TABLE farms (farm_id TEXT PRIMARY KEY, company_id TEXT, location_id INTEGER,
         name TEXT, status TEXT, created_at TEXT)",
        "INSERT INTO farms VALUES ('F-1', 'SYS-OLD', 42, 'Old Field', 'active', '2020-01-01 00:00:00')",
        "CREATE TABLE assets (asset_id TEXT PRIMARY KEY, company_id TEXT, farm_id TEXT,
         name TEXT, asset_type_id INTEGER, status TEXT, capacity REAL)",
        "INSERT INTO assets VALUES ('A-1', 'SYS-OLD', 'F-1', 'Old Tank', 5, 'active', 750.0)",
        "INSERT INTO assets VALUES ('A-2', 'SYS-OLD', 'F-404', 'Stray Tank', NULL, NULL, NULL)",
    ] {
        legacy.execute_unprepared(statement).await.unwrap();
    }
    legacy.close().await.unwrap();
    path
}

#[tokio::test]
async fn test_import_legacy_database() {
    let db = test_db().await;
    let dir = tempfile::tempdir().unwrap();
    let path = legacy_database(dir.path()).await;

    let report = TransferService::new(db.clone())
        .import_legacy(&path, false)
        .await
        .unwrap();
    assert_eq!(report.imported(Table::Companies), 1);
    assert_eq!(report.imported(Table::Farms), 1);
    assert_eq!(report.imported(Table::Assets), 2);
    assert!(report.table(Table::Locations).is_some_and(|t| t.missing));

    let repo = SeaOrmInventoryRepository::new(&db);
    let farm = repo.find_farm("F-1").await.unwrap().unwrap();
    assert_eq!(farm.location_id, None);
    assert_eq!(farm.name, "Old Field");

    let asset = repo.find_asset("A-1").await.unwrap().unwrap();
    assert_eq!(asset.health, 50);
    assert_eq!(asset.farm_id.as_deref(), Some("F-1"));
    assert_eq!(asset.asset_type_id, None);
    assert_eq!(asset.capacity, Some(750.0));

    let stray = repo.find_asset("A-2").await.unwrap().unwrap();
    assert_eq!(stray.farm_id, None);
    assert_eq!(stray.status, "active");
    assert_eq!(stray.health, 50);
}

//! Integration tests for SeaOrmInventoryRepository and browse listings
//!
//! Each test runs against a fresh in-memory SQLite database migrated with the
//! workspace migrations.

use domain::{
    Asset, AssetEvent, AssetModel, AssetType, Company, Farm, InventoryRepository, Location, Table,
};
use infrastructure::SeaOrmInventoryRepository;
use infrastructure::database::browse::{self, BrowseQuery};
use infrastructure::database::connect_and_migrate;
use sea_orm::{DatabaseConnection, TransactionTrait};

async fn test_db() -> DatabaseConnection {
    connect_and_migrate("sqlite::memory:")
        .await
        .expect("Failed to create test database")
}

async fn seed_asset_type(repo: &impl InventoryRepository, name: &str) -> i32 {
    let saved = repo
        .save_asset_type(&AssetType {
            id: None,
            name: name.to_string(),
            description: None,
            code: None,
        })
        .await
        .unwrap();
    saved.id.unwrap()
}

fn model(asset_type_id: i32, name: &str, is_default: bool) -> AssetModel {
    AssetModel {
        id: None,
        asset_type_id,
        name: name.to_string(),
        model_file: format!("model_categories/{name}.glb"),
        is_default,
        description: None,
        created_at: chrono::Utc::now(),
    }
}

#[tokio::test]
async fn test_save_company_is_upsert() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    let mut company = Company::new("SYS-1D3407DB", "Permian Storage");
    repo.save_company(&company).await.unwrap();
    company.industry = Some("Oil & Gas".to_string());
    repo.save_company(&company).await.unwrap();

    assert_eq!(repo.count(Table::Companies).await.unwrap(), 1);
    let found = repo.find_company("SYS-1D3407DB").await.unwrap().unwrap();
    assert_eq!(found.industry.as_deref(), Some("Oil & Gas"));
}

#[tokio::test]
async fn test_location_gets_generated_id() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    let first = repo
        .save_location(&Location::new(None, "Midland Yard"))
        .await
        .unwrap();
    let second = repo
        .save_location(&Location::new(None, "Odessa Yard"))
        .await
        .unwrap();

    let first_id = first.location_id.unwrap();
    let second_id = second.location_id.unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(
        repo.find_location(second_id).await.unwrap().unwrap().name,
        "Odessa Yard"
    );
}

#[tokio::test]
async fn test_explicit_id_upsert() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    repo.save_location(&Location::placeholder(42, Some(31.9), Some(-102.1)))
        .await
        .unwrap();
    let mut renamed = Location::placeholder(42, None, None);
    renamed.name = "Renamed".to_string();
    repo.save_location(&renamed).await.unwrap();

    let found = repo.find_location(42).await.unwrap().unwrap();
    assert_eq!(found.name, "Renamed");
    assert_eq!(repo.count(Table::Locations).await.unwrap(), 1);
}

#[tokio::test]
async fn test_default_model_is_unique_per_type() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    let tank = seed_asset_type(&repo, "Tank").await;
    let pump = seed_asset_type(&repo, "Pump").await;

    let first = repo.save_asset_model(&model(tank, "fixed-roof", true)).await.unwrap();
    repo.save_asset_model(&model(pump, "centrifugal", true)).await.unwrap();
    let second = repo.save_asset_model(&model(tank, "floating-roof", true)).await.unwrap();

    let default = repo.default_model_for_type(tank).await.unwrap().unwrap();
    assert_eq!(default.id, second.id);
    let first = repo.find_asset_model(first.id.unwrap()).await.unwrap().unwrap();
    assert!(!first.is_default);

    // Other types keep their default
    assert!(repo.default_model_for_type(pump).await.unwrap().is_some());
}

#[tokio::test]
async fn test_asset_queries() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    let tank = seed_asset_type(&repo, "Storage Tank").await;

    repo.save_farm(&Farm::new("F-1", "SYS-1", "North Field", "active"))
        .await
        .unwrap();

    let mut a1 = Asset::new("A-1", "SYS-1", "Tank 7", "active");
    a1.farm_id = Some("F-1".to_string());
    a1.asset_type_id = Some(tank);
    a1.model_id = Some("FR-400".to_string());
    repo.save_asset(&a1).await.unwrap();

    let a2 = Asset::new("A-2", "SYS-1", "Separator", "inactive");
    repo.save_asset(&a2).await.unwrap();

    assert_eq!(repo.assets_by_farm("F-1").await.unwrap().len(), 1);
    assert_eq!(repo.assets_by_name("tank 7").await.unwrap().len(), 1);
    assert_eq!(repo.assets_by_model_id("FR-400").await.unwrap().len(), 1);
    assert_eq!(repo.assets_by_types(&[tank]).await.unwrap().len(), 1);
    assert!(repo.assets_by_types(&[]).await.unwrap().is_empty());

    let types = repo.search_asset_types("TANK").await.unwrap();
    assert_eq!(types.len(), 1);
    assert!(repo.find_asset_type_by_name("storage tank").await.unwrap().is_some());
    assert!(repo.find_asset_type_by_name("storage").await.unwrap().is_none());
}

#[tokio::test]
async fn test_deleting_farm_clears_asset_relation() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    repo.save_farm(&Farm::new("F-1", "SYS-1", "North Field", "active"))
        .await
        .unwrap();
    let mut asset = Asset::new("A-1", "SYS-1", "Tank 7", "active");
    asset.farm_id = Some("F-1".to_string());
    repo.save_asset(&asset).await.unwrap();

    assert!(repo.delete(Table::Farms, "F-1").await.unwrap());
    assert!(!repo.delete(Table::Farms, "F-1").await.unwrap());

    let asset = repo.find_asset("A-1").await.unwrap().unwrap();
    assert!(asset.farm_id.is_none());
}

#[tokio::test]
async fn test_deleting_asset_removes_events() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    repo.save_asset(&Asset::new("A-1", "SYS-1", "Tank 7", "active"))
        .await
        .unwrap();
    repo.save_asset_event(&AssetEvent::new("A-1-E-00001", "A-1", "Inspection"))
        .await
        .unwrap();
    assert_eq!(repo.events_by_asset("A-1").await.unwrap().len(), 1);

    repo.delete(Table::Assets, "A-1").await.unwrap();
    assert_eq!(repo.count(Table::AssetEvents).await.unwrap(), 0);
}

#[tokio::test]
async fn test_delete_with_bad_integer_key() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    assert!(repo.delete(Table::Materials, "abc").await.is_err());
}

#[tokio::test]
async fn test_clear_transfer_tables() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);

    repo.save_company(&Company::new("SYS-1", "Acme")).await.unwrap();
    let location = repo
        .save_location(&Location::new(None, "Yard"))
        .await
        .unwrap();
    let mut farm = Farm::new("F-1", "SYS-1", "North Field", "active");
    farm.location_id = location.location_id;
    repo.save_farm(&farm).await.unwrap();
    repo.save_asset(&Asset::new("A-1", "SYS-1", "Tank", "active"))
        .await
        .unwrap();
    repo.save_asset_event(&AssetEvent::new("E-1", "A-1", "Inspection"))
        .await
        .unwrap();

    repo.clear_transfer_tables().await.unwrap();

    for table in Table::TRANSFER_ORDER {
        assert_eq!(repo.count(table).await.unwrap(), 0, "{table} not empty");
    }
}

#[tokio::test]
async fn test_rolled_back_transaction_leaves_no_rows() {
    let db = test_db().await;

    let txn = db.begin().await.unwrap();
    {
        let repo = SeaOrmInventoryRepository::new(&txn);
        repo.save_company(&Company::new("SYS-1", "Acme")).await.unwrap();
        assert_eq!(repo.count(Table::Companies).await.unwrap(), 1);
    }
    txn.rollback().await.unwrap();

    let repo = SeaOrmInventoryRepository::new(&db);
    assert_eq!(repo.count(Table::Companies).await.unwrap(), 0);
}

#[tokio::test]
async fn test_browse_pagination_search_and_ordering() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    for (id, name, health) in [("A-1", "Tank 1", 90), ("A-2", "Tank 2", 10), ("A-3", "Pump", 50)] {
        let mut asset = Asset::new(id, "SYS-1", name, "active");
        asset.health = health;
        repo.save_asset(&asset).await.unwrap();
    }

    let page = browse::browse(
        &db,
        Table::Assets,
        &BrowseQuery {
            page: Some(1),
            page_size: Some(2),
            ..Default::default()
        },
        20,
    )
    .await
    .unwrap();
    assert_eq!(page.count, 3);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0]["asset_id"], "A-1");

    let page = browse::browse(
        &db,
        Table::Assets,
        &BrowseQuery {
            search: Some("tank".to_string()),
            ordering: Some("-health".to_string()),
            ..Default::default()
        },
        20,
    )
    .await
    .unwrap();
    assert_eq!(page.count, 2);
    assert_eq!(page.results[0]["asset_id"], "A-1");
    assert_eq!(page.results[1]["asset_id"], "A-2");

    let err = browse::browse(
        &db,
        Table::Assets,
        &BrowseQuery {
            ordering: Some("colour".to_string()),
            ..Default::default()
        },
        20,
    )
    .await;
    assert!(err.is_err());
}

#[tokio::test]
async fn test_fetch_record() {
    let db = test_db().await;
    let repo = SeaOrmInventoryRepository::new(&db);
    repo.save_company(&Company::new("SYS-1", "Acme")).await.unwrap();

    let record = browse::fetch_record(&db, Table::Companies, "SYS-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record["name"], "Acme");
    assert!(
        browse::fetch_record(&db, Table::Companies, "SYS-2")
            .await
            .unwrap()
            .is_none()
    );
}

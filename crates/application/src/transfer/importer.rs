//! Directory and legacy import pipeline.
//!
//! Tables are loaded parents first. A reference to a parent that does not
//! exist becomes null, except for events, which are dropped when their asset
//! is missing. Any error aborts the run; the caller owns the transaction.

use super::parse::{self, float, int, int_key, text, timestamp, timestamp_or_now};
use super::{ImportOptions, ImportReport};
use anyhow::{Context, Result};
use domain::ids::require_key;
use domain::transfer::{AssetEventRecord, AssetRecord, FarmRecord, LookupRecord, RecordSource};
use domain::{
    Asset, AssetEvent, AssetType, Company, Content, EventType, Farm, InventoryRepository,
    Location, Material, Table,
};
use std::collections::HashSet;
use std::hash::Hash;
use tracing::{debug, info};

/// Keep `value` only when it names an existing row.
fn known<T: Eq + Hash>(value: Option<T>, existing: &HashSet<T>) -> Option<T> {
    value.filter(|v| existing.contains(v))
}

fn ids<T, K: Eq + Hash>(rows: Vec<T>, key: impl Fn(T) -> Option<K>) -> HashSet<K> {
    rows.into_iter().filter_map(key).collect()
}

fn skip_missing(report: &mut ImportReport, table: Table) {
    info!("⏭️  No {} data in source, skipping", table.as_str());
    report.table_mut(table).missing = true;
}

/// Load every table `source` provides into `repo`.
pub async fn import_records(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    options: &ImportOptions,
) -> Result<ImportReport> {
    let mut report = ImportReport::new(source.describe());
    info!("📥 Importing from {}", report.source);

    if options.clear_existing {
        repo.clear_transfer_tables()
            .await
            .context("Failed to clear existing data")?;
        report.cleared = true;
        info!("🧹 Cleared existing data");
    }

    import_companies(repo, source, &mut report).await?;
    import_locations(repo, source, &mut report).await?;
    import_asset_types(repo, source, &mut report).await?;
    import_lookups(repo, source, Table::Materials, &mut report).await?;
    import_lookups(repo, source, Table::Contents, &mut report).await?;
    import_lookups(repo, source, Table::EventTypes, &mut report).await?;
    import_farms(repo, source, &mut report).await?;
    import_assets(repo, source, options, &mut report).await?;
    import_asset_events(repo, source, &mut report).await?;

    info!(
        "✅ Import from {} finished: {} records",
        report.source,
        report.total_imported()
    );
    Ok(report)
}

async fn import_companies(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.companies().await? else {
        skip_missing(report, Table::Companies);
        return Ok(());
    };

    for row in &rows {
        let company = Company {
            company_id: require_key("companies", &row.company_id)?,
            name: text(&row.name).unwrap_or_default(),
            logo: text(&row.logo),
            industry: text(&row.industry),
            location_id: text(&row.location_id),
            established_date: parse::date(&row.established_date),
            created_at: timestamp_or_now(&row.created_at),
        };
        repo.save_company(&company)
            .await
            .with_context(|| format!("Failed to save company {}", company.company_id))?;
        report.table_mut(Table::Companies).imported += 1;
    }
    debug!(rows = rows.len(), "Imported companies");
    Ok(())
}

async fn import_locations(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.locations().await? else {
        skip_missing(report, Table::Locations);
        return Ok(());
    };

    for row in &rows {
        let location = Location {
            location_id: Some(int_key("locations", &row.location_id)?),
            name: text(&row.name).unwrap_or_default(),
            address: text(&row.address),
            city: text(&row.city),
            state: text(&row.state),
            zip_code: text(&row.zip_code),
            country: text(&row.country),
            latitude: float(&row.latitude),
            longitude: float(&row.longitude),
            created_at: timestamp_or_now(&row.created_at),
        };
        repo.save_location(&location).await?;
        report.table_mut(Table::Locations).imported += 1;
    }
    debug!(rows = rows.len(), "Imported locations");
    Ok(())
}

async fn import_asset_types(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.asset_types().await? else {
        skip_missing(report, Table::AssetTypes);
        return Ok(());
    };

    for row in &rows {
        let asset_type = AssetType {
            id: Some(int_key("asset_types", &row.id)?),
            name: text(&row.name).unwrap_or_default(),
            description: text(&row.description),
            code: text(&row.code),
        };
        repo.save_asset_type(&asset_type).await?;
        report.table_mut(Table::AssetTypes).imported += 1;
    }
    debug!(rows = rows.len(), "Imported asset types");
    Ok(())
}

/// Materials, contents and event types share one file shape.
async fn import_lookups(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    table: Table,
    report: &mut ImportReport,
) -> Result<()> {
    let rows: Option<Vec<LookupRecord>> = match table {
        Table::Materials => source.materials().await?,
        Table::Contents => source.contents().await?,
        _ => source.event_types().await?,
    };
    let Some(rows) = rows else {
        skip_missing(report, table);
        return Ok(());
    };

    for row in &rows {
        let id = Some(int_key(table.as_str(), &row.id)?);
        let name = text(&row.name).unwrap_or_default();
        let description = text(&row.description);
        match table {
            Table::Materials => {
                repo.save_material(&Material { id, name, description }).await?;
            }
            Table::Contents => {
                repo.save_content(&Content { id, name, description }).await?;
            }
            _ => {
                repo.save_event_type(&EventType { id, name, description })
                    .await?;
            }
        }
        report.table_mut(table).imported += 1;
    }
    debug!(table = table.as_str(), rows = rows.len(), "Imported lookup table");
    Ok(())
}

fn farm_from_record(row: &FarmRecord, locations: &HashSet<i32>) -> Result<Farm> {
    Ok(Farm {
        farm_id: require_key("farms", &row.farm_id)?,
        company_id: text(&row.company_id).unwrap_or_default(),
        location_id: known(int(&row.location_id), locations),
        name: text(&row.name).unwrap_or_default(),
        description: text(&row.description),
        status: text(&row.status).unwrap_or_else(|| "active".to_string()),
        created_at: timestamp_or_now(&row.created_at),
        operational_since: parse::date(&row.operational_since),
        layout_pdf: None,
        site_model_file: None,
        site_model_file_name: None,
        site_model_uploaded_at: None,
    })
}

async fn import_farms(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.farms().await? else {
        skip_missing(report, Table::Farms);
        return Ok(());
    };
    let locations = ids(repo.list_locations().await?, |l| l.location_id);

    for row in &rows {
        let mut farm = farm_from_record(row, &locations)?;
        if let Some(stored) = repo.find_farm(&farm.farm_id).await? {
            farm.keep_attachments_from(&stored);
        }
        repo.save_farm(&farm)
            .await
            .with_context(|| format!("Failed to save farm {}", farm.farm_id))?;
        report.table_mut(Table::Farms).imported += 1;
    }
    debug!(rows = rows.len(), "Imported farms");
    Ok(())
}

/// Ids of every parent an asset row may point at.
struct AssetParents {
    locations: HashSet<i32>,
    farms: HashSet<String>,
    asset_types: HashSet<i32>,
    materials: HashSet<i32>,
    contents: HashSet<i32>,
}

impl AssetParents {
    async fn load(repo: &dyn InventoryRepository) -> Result<Self> {
        Ok(Self {
            locations: ids(repo.list_locations().await?, |l| l.location_id),
            farms: ids(repo.list_farms().await?, |f| Some(f.farm_id)),
            asset_types: ids(repo.list_asset_types().await?, |t| t.id),
            materials: ids(repo.list_materials().await?, |m| m.id),
            contents: ids(repo.list_contents().await?, |c| c.id),
        })
    }
}

fn asset_from_record(row: &AssetRecord, parents: &AssetParents, default_health: i32) -> Result<Asset> {
    Ok(Asset {
        asset_id: require_key("assets", &row.asset_id)?,
        company_id: text(&row.company_id).unwrap_or_default(),
        location_id: known(int(&row.location_id), &parents.locations),
        farm_id: known(text(&row.farm_id), &parents.farms),
        name: text(&row.name).unwrap_or_default(),
        asset_type_id: known(int(&row.asset_type_id), &parents.asset_types),
        description: text(&row.description),
        installation_date: timestamp(&row.installation_date),
        manufactured_date: timestamp(&row.manufactured_date),
        commission_date: timestamp(&row.commission_date),
        decommission_date: timestamp(&row.decommission_date),
        status: text(&row.status).unwrap_or_else(|| "active".to_string()),
        created_at: timestamp_or_now(&row.created_at),
        latitude: float(&row.latitude),
        longitude: float(&row.longitude),
        health: int(&row.health).unwrap_or(default_health),
        capacity: float(&row.capacity),
        model_id: text(&row.model_id),
        current_volume: float(&row.current_volume),
        diameter: float(&row.diameter),
        height: float(&row.height),
        model_file: None,
        model_file_name: None,
        model_uploaded_at: None,
        material_id: known(int(&row.material_id), &parents.materials),
        content_id: known(int(&row.content_id), &parents.contents),
    })
}

async fn import_assets(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    options: &ImportOptions,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.assets().await? else {
        skip_missing(report, Table::Assets);
        return Ok(());
    };
    let parents = AssetParents::load(repo).await?;

    for row in &rows {
        let mut asset = asset_from_record(row, &parents, options.default_health)?;
        if let Some(stored) = repo.find_asset(&asset.asset_id).await? {
            asset.keep_attachments_from(&stored);
        }
        repo.save_asset(&asset)
            .await
            .with_context(|| format!("Failed to save asset {}", asset.asset_id))?;
        report.table_mut(Table::Assets).imported += 1;
    }
    debug!(rows = rows.len(), "Imported assets");
    Ok(())
}

fn event_from_record(row: &AssetEventRecord, asset_id: String, event_types: &HashSet<i32>) -> Result<AssetEvent> {
    Ok(AssetEvent {
        event_id: require_key("asset_events", &row.event_id)?,
        asset_id,
        title: text(&row.title).unwrap_or_default(),
        event_type_id: known(int(&row.event_type_id), event_types),
        start_date: timestamp(&row.start_date),
        end_date: timestamp(&row.end_date),
        event_status: text(&row.event_status).unwrap_or_default(),
        description: text(&row.description),
        performed_by: text(&row.performed_by),
        created_at: timestamp_or_now(&row.created_at),
        cost: text(&row.cost),
    })
}

async fn import_asset_events(
    repo: &dyn InventoryRepository,
    source: &dyn RecordSource,
    report: &mut ImportReport,
) -> Result<()> {
    let Some(rows) = source.asset_events().await? else {
        skip_missing(report, Table::AssetEvents);
        return Ok(());
    };
    let assets = ids(repo.list_assets().await?, |a| Some(a.asset_id));
    let event_types = ids(repo.list_event_types().await?, |t| t.id);

    for row in &rows {
        let Some(asset_id) = known(text(&row.asset_id), &assets) else {
            debug!(event_id = %row.event_id, asset_id = %row.asset_id, "Event without asset, skipped");
            report.table_mut(Table::AssetEvents).skipped += 1;
            continue;
        };
        let event = event_from_record(row, asset_id, &event_types)?;
        repo.save_asset_event(&event)
            .await
            .with_context(|| format!("Failed to save event {}", event.event_id))?;
        report.table_mut(Table::AssetEvents).imported += 1;
    }

    let skipped = report.skipped(Table::AssetEvents);
    if skipped > 0 {
        info!("⚠️  Skipped {} events whose asset does not exist", skipped);
    }
    Ok(())
}

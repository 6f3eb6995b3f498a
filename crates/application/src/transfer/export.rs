//! Export of the nine transfer tables as text records.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use domain::transfer::{
    AssetEventRecord, AssetRecord, AssetTypeRecord, CompanyRecord, FarmRecord, LocationRecord,
    LookupRecord, RecordSink,
};
use domain::{
    Asset, AssetEvent, AssetType, Company, Farm, InventoryRepository, Location, Table,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Written next to the CSV files in an archive bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportManifest {
    pub exported_at: String,
    /// Row count per table name
    pub rows: BTreeMap<String, usize>,
}

impl ExportManifest {
    pub fn total_rows(&self) -> usize {
        self.rows.values().sum()
    }
}

fn ts(value: &DateTime<Utc>) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

fn opt_ts(value: &Option<DateTime<Utc>>) -> String {
    value.as_ref().map(ts).unwrap_or_default()
}

fn opt_date(value: &Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn company_record(c: &Company) -> CompanyRecord {
    CompanyRecord {
        company_id: c.company_id.clone(),
        name: c.name.clone(),
        logo: opt(&c.logo),
        industry: opt(&c.industry),
        location_id: opt(&c.location_id),
        established_date: opt_date(&c.established_date),
        created_at: ts(&c.created_at),
    }
}

fn location_record(l: &Location) -> LocationRecord {
    LocationRecord {
        location_id: opt(&l.location_id),
        name: l.name.clone(),
        address: opt(&l.address),
        city: opt(&l.city),
        state: opt(&l.state),
        zip_code: opt(&l.zip_code),
        country: opt(&l.country),
        latitude: opt(&l.latitude),
        longitude: opt(&l.longitude),
        created_at: ts(&l.created_at),
    }
}

fn asset_type_record(t: &AssetType) -> AssetTypeRecord {
    AssetTypeRecord {
        id: opt(&t.id),
        name: t.name.clone(),
        description: opt(&t.description),
        code: opt(&t.code),
    }
}

fn lookup(id: Option<i32>, name: &str, description: &Option<String>) -> LookupRecord {
    LookupRecord {
        id: opt(&id),
        name: name.to_string(),
        description: opt(description),
    }
}

fn farm_record(f: &Farm) -> FarmRecord {
    FarmRecord {
        farm_id: f.farm_id.clone(),
        company_id: f.company_id.clone(),
        location_id: opt(&f.location_id),
        name: f.name.clone(),
        description: opt(&f.description),
        status: f.status.clone(),
        created_at: ts(&f.created_at),
        operational_since: opt_date(&f.operational_since),
    }
}

fn asset_record(a: &Asset) -> AssetRecord {
    AssetRecord {
        asset_id: a.asset_id.clone(),
        company_id: a.company_id.clone(),
        location_id: opt(&a.location_id),
        farm_id: opt(&a.farm_id),
        name: a.name.clone(),
        asset_type_id: opt(&a.asset_type_id),
        description: opt(&a.description),
        installation_date: opt_ts(&a.installation_date),
        manufactured_date: opt_ts(&a.manufactured_date),
        commission_date: opt_ts(&a.commission_date),
        decommission_date: opt_ts(&a.decommission_date),
        status: a.status.clone(),
        created_at: ts(&a.created_at),
        latitude: opt(&a.latitude),
        longitude: opt(&a.longitude),
        health: a.health.to_string(),
        capacity: opt(&a.capacity),
        model_id: opt(&a.model_id),
        current_volume: opt(&a.current_volume),
        diameter: opt(&a.diameter),
        height: opt(&a.height),
        material_id: opt(&a.material_id),
        content_id: opt(&a.content_id),
    }
}

fn asset_event_record(e: &AssetEvent) -> AssetEventRecord {
    AssetEventRecord {
        event_id: e.event_id.clone(),
        asset_id: e.asset_id.clone(),
        title: e.title.clone(),
        event_type_id: opt(&e.event_type_id),
        start_date: opt_ts(&e.start_date),
        end_date: opt_ts(&e.end_date),
        event_status: e.event_status.clone(),
        description: opt(&e.description),
        performed_by: opt(&e.performed_by),
        created_at: ts(&e.created_at),
        cost: opt(&e.cost),
    }
}

fn records<T, R>(rows: &[T], to_record: fn(&T) -> R) -> Vec<R> {
    rows.iter().map(to_record).collect()
}

/// Write every transfer table from `repo` into `sink`, parents first.
pub async fn export_records(
    repo: &dyn InventoryRepository,
    sink: &dyn RecordSink,
) -> Result<ExportManifest> {
    let mut rows = BTreeMap::new();
    let mut written = |table: Table, count: usize| {
        info!("📤 Exported {} {}", count, table.as_str());
        rows.insert(table.as_str().to_string(), count);
    };

    let companies: Vec<CompanyRecord> = records(&repo.list_companies().await?, company_record);
    sink.write_companies(&companies).await?;
    written(Table::Companies, companies.len());

    let locations: Vec<LocationRecord> = records(&repo.list_locations().await?, location_record);
    sink.write_locations(&locations).await?;
    written(Table::Locations, locations.len());

    let asset_types: Vec<AssetTypeRecord> = records(&repo.list_asset_types().await?, asset_type_record);
    sink.write_asset_types(&asset_types).await?;
    written(Table::AssetTypes, asset_types.len());

    let materials: Vec<LookupRecord> = repo
        .list_materials()
        .await?
        .iter()
        .map(|m| lookup(m.id, &m.name, &m.description))
        .collect();
    sink.write_materials(&materials).await?;
    written(Table::Materials, materials.len());

    let contents: Vec<LookupRecord> = repo
        .list_contents()
        .await?
        .iter()
        .map(|c| lookup(c.id, &c.name, &c.description))
        .collect();
    sink.write_contents(&contents).await?;
    written(Table::Contents, contents.len());

    let event_types: Vec<LookupRecord> = repo
        .list_event_types()
        .await?
        .iter()
        .map(|t| lookup(t.id, &t.name, &t.description))
        .collect();
    sink.write_event_types(&event_types).await?;
    written(Table::EventTypes, event_types.len());

    let farms: Vec<FarmRecord> = records(&repo.list_farms().await?, farm_record);
    sink.write_farms(&farms).await?;
    written(Table::Farms, farms.len());

    let assets: Vec<AssetRecord> = records(&repo.list_assets().await?, asset_record);
    sink.write_assets(&assets).await?;
    written(Table::Assets, assets.len());

    let events: Vec<AssetEventRecord> = records(&repo.list_asset_events().await?, asset_event_record);
    sink.write_asset_events(&events).await?;
    written(Table::AssetEvents, events.len());

    Ok(ExportManifest {
        exported_at: ts(&Utc::now()),
        rows,
    })
}

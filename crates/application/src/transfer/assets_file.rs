//! Import of a single assets spreadsheet.
//!
//! Unlike the directory import, parents referenced by a row are created on
//! the fly when they do not exist yet, so a bare `assets.csv` is enough to
//! populate an empty database.

use super::parse::{float, int, loose_date, text, timestamp_or_now};
use super::{DEFAULT_HEALTH, ImportReport};
use anyhow::{Context, Result};
use domain::transfer::AssetRecord;
use domain::{
    Asset, AssetType, Company, Content, Farm, InventoryRepository, Location, Material, Table,
};
use tracing::{debug, info};

/// Creates missing parents and remembers what it created.
struct Placeholders<'a> {
    repo: &'a dyn InventoryRepository,
    report: &'a mut ImportReport,
}

impl Placeholders<'_> {
    fn created(&mut self, table: Table, label: String) {
        info!("➕ Created {}", label);
        self.report.placeholders.push(label);
        self.report.table_mut(table).imported += 1;
    }

    async fn company(&mut self, company_id: &str) -> Result<()> {
        if self.repo.find_company(company_id).await?.is_none() {
            let company = self.repo.save_company(&Company::placeholder(company_id)).await?;
            self.created(Table::Companies, format!("Company {}", company.company_id));
        }
        Ok(())
    }

    async fn location(&mut self, id: i32, latitude: Option<f64>, longitude: Option<f64>) -> Result<()> {
        if self.repo.find_location(id).await?.is_none() {
            self.repo
                .save_location(&Location::placeholder(id, latitude, longitude))
                .await?;
            self.created(Table::Locations, format!("Location {id}"));
        }
        Ok(())
    }

    async fn farm(&mut self, farm_id: &str, company_id: &str, location_id: Option<i32>) -> Result<()> {
        if self.repo.find_farm(farm_id).await?.is_none() {
            self.repo
                .save_farm(&Farm::placeholder(farm_id, company_id, location_id))
                .await?;
            self.created(Table::Farms, format!("Farm {farm_id}"));
        }
        Ok(())
    }

    async fn asset_type(&mut self, id: i32) -> Result<()> {
        if self.repo.find_asset_type(id).await?.is_none() {
            self.repo.save_asset_type(&AssetType::placeholder(id)).await?;
            self.created(Table::AssetTypes, format!("Asset Type {id}"));
        }
        Ok(())
    }

    async fn material(&mut self, id: i32) -> Result<()> {
        if self.repo.find_material(id).await?.is_none() {
            self.repo.save_material(&Material::placeholder(id)).await?;
            self.created(Table::Materials, format!("Material {id}"));
        }
        Ok(())
    }

    async fn content(&mut self, id: i32) -> Result<()> {
        if self.repo.find_content(id).await?.is_none() {
            self.repo.save_content(&Content::placeholder(id)).await?;
            self.created(Table::Contents, format!("Content {id}"));
        }
        Ok(())
    }
}

fn asset_from_row(asset_id: String, row: &AssetRecord) -> Asset {
    Asset {
        asset_id,
        company_id: text(&row.company_id).unwrap_or_default(),
        location_id: int(&row.location_id),
        farm_id: text(&row.farm_id),
        name: text(&row.name).unwrap_or_default(),
        asset_type_id: int(&row.asset_type_id),
        description: text(&row.description),
        installation_date: loose_date(&row.installation_date),
        manufactured_date: loose_date(&row.manufactured_date),
        commission_date: loose_date(&row.commission_date),
        decommission_date: loose_date(&row.decommission_date),
        status: text(&row.status).unwrap_or_else(|| "active".to_string()),
        created_at: timestamp_or_now(&row.created_at),
        latitude: float(&row.latitude),
        longitude: float(&row.longitude),
        health: DEFAULT_HEALTH,
        capacity: float(&row.capacity),
        model_id: text(&row.model_id),
        current_volume: float(&row.current_volume),
        diameter: float(&row.diameter),
        height: float(&row.height),
        model_file: None,
        model_file_name: None,
        model_uploaded_at: None,
        material_id: int(&row.material_id),
        content_id: int(&row.content_id),
    }
}

/// Import asset rows, creating any parent they reference.
///
/// Rows without an `asset_id` are skipped, as are rows for assets that
/// already exist unless `update_existing` is set.
pub async fn import_asset_rows(
    repo: &dyn InventoryRepository,
    rows: &[AssetRecord],
    update_existing: bool,
    source: &str,
) -> Result<ImportReport> {
    let mut report = ImportReport::new(source);
    info!("📥 Importing {} asset rows from {}", rows.len(), source);

    for (line, row) in rows.iter().enumerate() {
        let Some(asset_id) = text(&row.asset_id) else {
            debug!(line = line + 2, "Row without asset_id, skipped");
            report.table_mut(Table::Assets).skipped += 1;
            continue;
        };

        let stored = repo.find_asset(&asset_id).await?;
        if stored.is_some() && !update_existing {
            debug!(%asset_id, "Asset exists, skipped");
            report.table_mut(Table::Assets).skipped += 1;
            continue;
        }

        let mut asset = asset_from_row(asset_id, row);
        let mut parents = Placeholders {
            repo,
            report: &mut report,
        };
        if !asset.company_id.is_empty() {
            parents.company(&asset.company_id).await?;
        }
        if let Some(id) = asset.location_id {
            parents.location(id, asset.latitude, asset.longitude).await?;
        }
        if let Some(farm_id) = &asset.farm_id {
            parents
                .farm(farm_id, &asset.company_id, asset.location_id)
                .await?;
        }
        if let Some(id) = asset.asset_type_id {
            parents.asset_type(id).await?;
        }
        if let Some(id) = asset.material_id {
            parents.material(id).await?;
        }
        if let Some(id) = asset.content_id {
            parents.content(id).await?;
        }

        if let Some(stored) = &stored {
            asset.keep_attachments_from(stored);
        }
        repo.save_asset(&asset)
            .await
            .with_context(|| format!("Failed to save asset {}", asset.asset_id))?;
        report.table_mut(Table::Assets).imported += 1;
    }

    info!(
        "✅ Assets file imported: {} assets, {} skipped, {} placeholders",
        report.imported(Table::Assets),
        report.skipped(Table::Assets),
        report.placeholders.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_row_uses_loose_dates_and_full_health() {
        let row = AssetRecord {
            asset_id: "A-1".into(),
            name: "Tank".into(),
            installation_date: "06/15/2019".into(),
            manufactured_date: "2018-01-31".into(),
            commission_date: "31/01/2019".into(),
            decommission_date: "soon".into(),
            health: "12".into(),
            ..Default::default()
        };
        let asset = asset_from_row("A-1".to_string(), &row);

        let installed = asset.installation_date.unwrap();
        assert_eq!(installed.date_naive(), NaiveDate::from_ymd_opt(2019, 6, 15).unwrap());
        assert_eq!(installed.hour(), 0);
        assert!(asset.manufactured_date.is_some());
        assert_eq!(
            asset.commission_date.unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2019, 1, 31).unwrap()
        );
        assert!(asset.decommission_date.is_none());
        assert_eq!(asset.health, 100);
    }
}

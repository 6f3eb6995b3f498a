use crate::ids;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tracked physical unit (tank, compressor, pump...).
///
/// Relations to farm, location, type, material and content are optional and
/// are cleared when the referenced row is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub asset_id: String,
    pub company_id: String,
    pub location_id: Option<i32>,
    pub farm_id: Option<String>,
    pub name: String,
    pub asset_type_id: Option<i32>,
    pub description: Option<String>,

    pub installation_date: Option<DateTime<Utc>>,
    pub manufactured_date: Option<DateTime<Utc>>,
    pub commission_date: Option<DateTime<Utc>>,
    pub decommission_date: Option<DateTime<Utc>>,

    pub status: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "ids::random_health")]
    pub health: i32,

    // Tank specifications
    pub capacity: Option<f64>,
    pub model_id: Option<String>,
    pub current_volume: Option<f64>,
    pub diameter: Option<f64>,
    pub height: Option<f64>,

    /// Path of the asset's own 3D model, relative to the media root
    pub model_file: Option<String>,
    pub model_file_name: Option<String>,
    pub model_uploaded_at: Option<DateTime<Utc>>,

    pub material_id: Option<i32>,
    pub content_id: Option<i32>,
}

impl Asset {
    pub fn new(
        asset_id: impl Into<String>,
        company_id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            asset_id: asset_id.into(),
            company_id: company_id.into(),
            location_id: None,
            farm_id: None,
            name: name.into(),
            asset_type_id: None,
            description: None,
            installation_date: None,
            manufactured_date: None,
            commission_date: None,
            decommission_date: None,
            status: status.into(),
            created_at: Utc::now(),
            latitude: None,
            longitude: None,
            health: ids::random_health(),
            capacity: None,
            model_id: None,
            current_volume: None,
            diameter: None,
            height: None,
            model_file: None,
            model_file_name: None,
            model_uploaded_at: None,
            material_id: None,
            content_id: None,
        }
    }

    pub fn ensure_id(&mut self) {
        if self.asset_id.trim().is_empty() {
            self.asset_id = ids::asset_id(self.farm_id.as_deref(), &self.company_id);
        }
    }

    /// Keep attachment columns that an import row does not carry.
    pub fn keep_attachments_from(&mut self, stored: &Asset) {
        if self.model_file.is_none() {
            self.model_file = stored.model_file.clone();
            self.model_file_name = stored.model_file_name.clone();
            self.model_uploaded_at = stored.model_uploaded_at;
        }
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.asset_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_id_generated_from_farm() {
        let mut asset = Asset::new("", "SYS-1", "Tank 7", "active");
        asset.farm_id = Some("SYS-1-F-13083".to_string());
        asset.ensure_id();
        assert!(asset.asset_id.starts_with("SYS-1-F-13083-A-"));
    }

    #[test]
    fn test_health_defaults_when_missing() {
        let asset: Asset = serde_json::from_str(
            r#"{"company_id": "SYS-1", "name": "Tank", "status": "active"}"#,
        )
        .unwrap();
        assert!((0..=100).contains(&asset.health));
        assert!(asset.farm_id.is_none());
    }

    #[test]
    fn test_keep_attachments_from_stored() {
        let mut stored = Asset::new("A-1", "SYS-1", "Tank", "active");
        stored.model_file = Some("asset_models/A-1.glb".to_string());
        stored.model_file_name = Some("tank.glb".to_string());

        let mut incoming = Asset::new("A-1", "SYS-1", "Tank v2", "active");
        incoming.keep_attachments_from(&stored);
        assert_eq!(incoming.model_file.as_deref(), Some("asset_models/A-1.glb"));
        assert_eq!(incoming.model_file_name.as_deref(), Some("tank.glb"));
    }
}

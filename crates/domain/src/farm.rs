use crate::ids;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A facility grouping one or more assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    #[serde(default)]
    pub farm_id: String,
    pub company_id: String,
    pub location_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    /// active, inactive, under construction
    pub status: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    pub operational_since: Option<NaiveDate>,

    // Site-level attachments, paths relative to the media root
    pub layout_pdf: Option<String>,
    pub site_model_file: Option<String>,
    pub site_model_file_name: Option<String>,
    pub site_model_uploaded_at: Option<DateTime<Utc>>,
}

impl Farm {
    pub fn new(
        farm_id: impl Into<String>,
        company_id: impl Into<String>,
        name: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            farm_id: farm_id.into(),
            company_id: company_id.into(),
            location_id: None,
            name: name.into(),
            description: None,
            status: status.into(),
            created_at: Utc::now(),
            operational_since: None,
            layout_pdf: None,
            site_model_file: None,
            site_model_file_name: None,
            site_model_uploaded_at: None,
        }
    }

    pub fn placeholder(farm_id: &str, company_id: &str, location_id: Option<i32>) -> Self {
        let mut farm = Self::new(farm_id, company_id, format!("Farm {farm_id}"), "active");
        farm.description = Some(format!("Auto-created farm for {farm_id}"));
        farm.location_id = location_id;
        farm
    }

    pub fn ensure_id(&mut self) {
        if self.farm_id.trim().is_empty() {
            self.farm_id = ids::farm_id(&self.company_id);
        }
    }

    /// Keep uploaded site files that an import row does not carry.
    pub fn keep_attachments_from(&mut self, stored: &Farm) {
        if self.layout_pdf.is_none() {
            self.layout_pdf = stored.layout_pdf.clone();
        }
        if self.site_model_file.is_none() {
            self.site_model_file = stored.site_model_file.clone();
            self.site_model_file_name = stored.site_model_file_name.clone();
            self.site_model_uploaded_at = stored.site_model_uploaded_at;
        }
    }
}

impl std::fmt::Display for Farm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.farm_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_farm_id_uses_company() {
        let mut farm = Farm::new("", "SYS-1D3407DB", "North Field", "active");
        farm.ensure_id();
        assert!(farm.farm_id.starts_with("SYS-1D3407DB-F-"));
    }

    #[test]
    fn test_keep_attachments_from_stored() {
        let mut stored = Farm::new("F-1", "SYS-1", "North Field", "active");
        stored.layout_pdf = Some("farm_layouts/F-1.pdf".to_string());

        let mut incoming = Farm::new("F-1", "SYS-1", "North Field v2", "active");
        incoming.keep_attachments_from(&stored);
        assert_eq!(incoming.layout_pdf.as_deref(), Some("farm_layouts/F-1.pdf"));
        assert!(incoming.site_model_file.is_none());
    }

    #[test]
    fn test_placeholder_farm() {
        let farm = Farm::placeholder("F-9", "SYS-1", Some(4));
        assert_eq!(farm.name, "Farm F-9");
        assert_eq!(farm.status, "active");
        assert_eq!(farm.location_id, Some(4));
        assert_eq!(farm.description.as_deref(), Some("Auto-created farm for F-9"));
    }
}

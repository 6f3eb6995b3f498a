use crate::ids;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A maintenance or lifecycle event tied to exactly one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetEvent {
    #[serde(default)]
    pub event_id: String,
    pub asset_id: String,
    pub title: String,
    pub event_type_id: Option<i32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub event_status: String,
    pub description: Option<String>,
    pub performed_by: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    pub cost: Option<String>,
}

impl AssetEvent {
    pub fn new(
        event_id: impl Into<String>,
        asset_id: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            asset_id: asset_id.into(),
            title: title.into(),
            event_type_id: None,
            start_date: None,
            end_date: None,
            event_status: String::new(),
            description: None,
            performed_by: None,
            created_at: Utc::now(),
            cost: None,
        }
    }

    pub fn ensure_id(&mut self) {
        if self.event_id.trim().is_empty() {
            self.event_id = ids::event_id(&self.asset_id);
        }
    }
}

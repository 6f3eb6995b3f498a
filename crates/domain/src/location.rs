use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A physical site. `location_id` is assigned by the database when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub location_id: Option<i32>,
    pub name: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(location_id: Option<i32>, name: impl Into<String>) -> Self {
        Self {
            location_id,
            name: name.into(),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
        }
    }

    pub fn placeholder(location_id: i32, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let mut location = Self::new(Some(location_id), format!("Location {location_id}"));
        location.city = Some("Unknown City".to_string());
        location.country = Some("Unknown Country".to_string());
        location.latitude = latitude;
        location.longitude = longitude;
        location
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.city.as_deref().unwrap_or(""))
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic 3D model for an asset type, used when an asset has no model of its own.
///
/// At most one model per asset type is the default; the repository clears the
/// flag on siblings when a default model is saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetModel {
    #[serde(default)]
    pub id: Option<i32>,
    pub asset_type_id: i32,
    /// Display name, e.g. "Standard Fixed Roof Tank"
    pub name: String,
    /// Path of the `.glb` file relative to the media root
    pub model_file: String,
    #[serde(default)]
    pub is_default: bool,
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

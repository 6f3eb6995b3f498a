//! Lookup tables referenced by assets and events.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetType {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub code: Option<String>,
}

impl AssetType {
    pub fn placeholder(id: i32) -> Self {
        Self {
            id: Some(id),
            name: format!("Asset Type {id}"),
            description: Some("Auto-created asset type".to_string()),
            code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

impl Material {
    pub fn placeholder(id: i32) -> Self {
        Self {
            id: Some(id),
            name: format!("Material {id}"),
            description: Some("Auto-created material".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

impl Content {
    pub fn placeholder(id: i32) -> Self {
        Self {
            id: Some(id),
            name: format!("Content {id}"),
            description: Some("Auto-created content".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    #[serde(default)]
    pub id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
}

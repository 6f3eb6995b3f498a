use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inventory tables, in foreign-key dependency order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Table {
    Companies,
    Locations,
    AssetTypes,
    Materials,
    Contents,
    EventTypes,
    Farms,
    Assets,
    AssetEvents,
    AssetModels,
}

impl Table {
    /// The nine tables moved by import/export, parents first.
    pub const TRANSFER_ORDER: [Table; 9] = [
        Table::Companies,
        Table::Locations,
        Table::AssetTypes,
        Table::Materials,
        Table::Contents,
        Table::EventTypes,
        Table::Farms,
        Table::Assets,
        Table::AssetEvents,
    ];

    pub const ALL: [Table; 10] = [
        Table::Companies,
        Table::Locations,
        Table::AssetTypes,
        Table::Materials,
        Table::Contents,
        Table::EventTypes,
        Table::Farms,
        Table::Assets,
        Table::AssetEvents,
        Table::AssetModels,
    ];

    /// SQL table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Locations => "locations",
            Self::AssetTypes => "asset_types",
            Self::Materials => "materials",
            Self::Contents => "contents",
            Self::EventTypes => "event_types",
            Self::Farms => "farms",
            Self::Assets => "assets",
            Self::AssetEvents => "asset_events",
            Self::AssetModels => "asset_models",
        }
    }

    /// URL segment used by the browse and admin endpoints
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Locations => "locations",
            Self::AssetTypes => "asset-types",
            Self::Materials => "materials",
            Self::Contents => "contents",
            Self::EventTypes => "event-types",
            Self::Farms => "farms",
            Self::Assets => "assets",
            Self::AssetEvents => "asset-events",
            Self::AssetModels => "asset-models",
        }
    }

    /// CSV file carrying this table in an export directory
    pub fn csv_file(&self) -> Option<String> {
        match self {
            Self::AssetModels => None,
            other => Some(format!("{}.csv", other.as_str())),
        }
    }

    /// Singular label used in messages
    pub fn entity_name(&self) -> &'static str {
        match self {
            Self::Companies => "Company",
            Self::Locations => "Location",
            Self::AssetTypes => "Asset type",
            Self::Materials => "Material",
            Self::Contents => "Content",
            Self::EventTypes => "Event type",
            Self::Farms => "Farm",
            Self::Assets => "Asset",
            Self::AssetEvents => "Asset event",
            Self::AssetModels => "Asset model",
        }
    }

    /// Whether the primary key is assigned by the database
    pub fn has_generated_key(&self) -> bool {
        !matches!(
            self,
            Self::Companies | Self::Farms | Self::Assets | Self::AssetEvents
        )
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Table {
    type Err = DomainError;

    /// Accepts either the URL slug or the SQL table name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Table::ALL
            .into_iter()
            .find(|t| t.slug() == s || t.as_str() == s)
            .ok_or_else(|| DomainError::not_found("Resource", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_order_parents_first() {
        let pos = |t: Table| Table::TRANSFER_ORDER.iter().position(|x| *x == t).unwrap();
        assert!(pos(Table::Companies) < pos(Table::Farms));
        assert!(pos(Table::Locations) < pos(Table::Farms));
        assert!(pos(Table::Farms) < pos(Table::Assets));
        assert!(pos(Table::Assets) < pos(Table::AssetEvents));
        assert!(!Table::TRANSFER_ORDER.contains(&Table::AssetModels));
    }

    #[test]
    fn test_csv_files() {
        assert_eq!(Table::AssetEvents.csv_file().as_deref(), Some("asset_events.csv"));
        assert_eq!(Table::AssetModels.csv_file(), None);
    }

    #[test]
    fn test_from_str_accepts_slug_and_name() {
        assert_eq!("asset-types".parse::<Table>().unwrap(), Table::AssetTypes);
        assert_eq!("asset_types".parse::<Table>().unwrap(), Table::AssetTypes);
        assert!("widgets".parse::<Table>().is_err());
    }
}

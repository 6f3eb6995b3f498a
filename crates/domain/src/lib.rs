//! Domain layer - Inventory entities and contracts with no external dependencies
//!
//! This crate contains:
//! - Entities (Company, Location, Farm, Asset, AssetEvent, AssetModel, lookups)
//! - Identifier generation rules
//! - Attachment kinds and the table catalogue
//! - Interchange records for import/export
//! - Repository, record source and record sink interfaces (traits)

pub mod asset;
pub mod asset_event;
pub mod asset_model;
pub mod attachment;
pub mod catalog;
pub mod company;
pub mod error;
pub mod farm;
pub mod ids;
pub mod location;
pub mod repository;
pub mod table;
pub mod transfer;

// Re-export commonly used types
pub use asset::Asset;
pub use asset_event::AssetEvent;
pub use asset_model::AssetModel;
pub use attachment::AttachmentKind;
pub use catalog::{AssetType, Content, EventType, Material};
pub use company::Company;
pub use error::DomainError;
pub use farm::Farm;
pub use location::Location;
pub use repository::InventoryRepository;
pub use table::Table;
pub use transfer::{RecordSink, RecordSource};

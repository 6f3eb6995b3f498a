pub mod asset_events;
pub mod asset_models;
pub mod asset_types;
pub mod assets;
pub mod companies;
pub mod contents;
pub mod event_types;
pub mod farms;
pub mod locations;
pub mod materials;

use crate::{
    Asset, AssetEvent, AssetModel, AssetType, Company, Content, DomainError, EventType, Farm,
    Location, Material, Table,
};
use async_trait::async_trait;

type Result<T> = std::result::Result<T, DomainError>;

/// Repository interface for the inventory tables
///
/// `save_*` is update-or-create keyed by the natural primary key. For tables
/// with database-assigned keys a record without an id is inserted and the
/// stored record (with its new id) is returned.
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    async fn save_company(&self, company: &Company) -> Result<Company>;
    async fn find_company(&self, company_id: &str) -> Result<Option<Company>>;
    async fn list_companies(&self) -> Result<Vec<Company>>;

    async fn save_location(&self, location: &Location) -> Result<Location>;
    async fn find_location(&self, location_id: i32) -> Result<Option<Location>>;
    async fn list_locations(&self) -> Result<Vec<Location>>;

    async fn save_asset_type(&self, asset_type: &AssetType) -> Result<AssetType>;
    async fn find_asset_type(&self, id: i32) -> Result<Option<AssetType>>;
    async fn list_asset_types(&self) -> Result<Vec<AssetType>>;
    /// Case-insensitive exact match on the type name
    async fn find_asset_type_by_name(&self, name: &str) -> Result<Option<AssetType>>;
    /// Case-insensitive substring match on the type name
    async fn search_asset_types(&self, fragment: &str) -> Result<Vec<AssetType>>;

    async fn save_material(&self, material: &Material) -> Result<Material>;
    async fn find_material(&self, id: i32) -> Result<Option<Material>>;
    async fn list_materials(&self) -> Result<Vec<Material>>;

    async fn save_content(&self, content: &Content) -> Result<Content>;
    async fn find_content(&self, id: i32) -> Result<Option<Content>>;
    async fn list_contents(&self) -> Result<Vec<Content>>;

    async fn save_event_type(&self, event_type: &EventType) -> Result<EventType>;
    async fn find_event_type(&self, id: i32) -> Result<Option<EventType>>;
    async fn list_event_types(&self) -> Result<Vec<EventType>>;

    async fn save_farm(&self, farm: &Farm) -> Result<Farm>;
    async fn find_farm(&self, farm_id: &str) -> Result<Option<Farm>>;
    async fn list_farms(&self) -> Result<Vec<Farm>>;

    async fn save_asset(&self, asset: &Asset) -> Result<Asset>;
    async fn find_asset(&self, asset_id: &str) -> Result<Option<Asset>>;
    async fn list_assets(&self) -> Result<Vec<Asset>>;
    async fn assets_by_farm(&self, farm_id: &str) -> Result<Vec<Asset>>;
    /// Case-insensitive exact match on the asset name
    async fn assets_by_name(&self, name: &str) -> Result<Vec<Asset>>;
    async fn assets_by_model_id(&self, model_id: &str) -> Result<Vec<Asset>>;
    async fn assets_by_types(&self, asset_type_ids: &[i32]) -> Result<Vec<Asset>>;

    async fn save_asset_event(&self, event: &AssetEvent) -> Result<AssetEvent>;
    async fn find_asset_event(&self, event_id: &str) -> Result<Option<AssetEvent>>;
    async fn list_asset_events(&self) -> Result<Vec<AssetEvent>>;
    async fn events_by_asset(&self, asset_id: &str) -> Result<Vec<AssetEvent>>;

    /// Saving a default model clears the default flag on the other models of its type.
    async fn save_asset_model(&self, model: &AssetModel) -> Result<AssetModel>;
    async fn find_asset_model(&self, id: i32) -> Result<Option<AssetModel>>;
    async fn list_asset_models(&self) -> Result<Vec<AssetModel>>;
    async fn default_model_for_type(&self, asset_type_id: i32) -> Result<Option<AssetModel>>;

    /// Delete one row by its primary key (rendered as text). Returns false when absent.
    async fn delete(&self, table: Table, key: &str) -> Result<bool>;

    async fn count(&self, table: Table) -> Result<u64>;

    /// Remove every row of the nine transfer tables, children first.
    async fn clear_transfer_tables(&self) -> Result<()>;

    /// Realign generated-key sequences after rows were written with explicit ids.
    async fn resync_sequences(&self) -> Result<()>;
}

use crate::database::entities::{
    asset_events, asset_models, asset_types, assets, companies, contents, event_types, farms,
    locations, materials,
};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use domain::{
    Asset, AssetEvent, AssetModel, AssetType, Company, Content, DomainError, EventType, Farm,
    InventoryRepository, Location, Material, Table,
};
use sea_orm::sea_query::{Expr, Func, OnConflict};
use sea_orm::{
    ActiveValue, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

/// Inventory repository over any sea-orm connection.
///
/// Holding a borrowed connection lets the same repository run against a
/// `DatabaseConnection` or inside a `DatabaseTransaction`.
pub struct SeaOrmInventoryRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> SeaOrmInventoryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }
}

pub(crate) fn db_err(e: DbErr) -> DomainError {
    DomainError::Database(e.to_string())
}

fn to_offset(dt: DateTime<Utc>) -> DateTime<FixedOffset> {
    dt.fixed_offset()
}

fn to_utc(dt: DateTime<FixedOffset>) -> DateTime<Utc> {
    dt.with_timezone(&Utc)
}

fn generated<V>(id: Option<V>) -> ActiveValue<V>
where
    V: Into<sea_orm::Value>,
{
    match id {
        Some(v) => Set(v),
        None => NotSet,
    }
}

pub(crate) fn int_key(table: Table, key: &str) -> Result<i32, DomainError> {
    key.trim().parse().map_err(|_| {
        DomainError::invalid_record(table.as_str(), format!("'{key}' is not a valid id"))
    })
}

/// Tables whose integer keys come from a sequence, with their key column
const SEQUENCED: [(&str, &str); 6] = [
    ("locations", "location_id"),
    ("asset_types", "id"),
    ("materials", "id"),
    ("contents", "id"),
    ("event_types", "id"),
    ("asset_models", "id"),
];

// Model -> domain conversions

impl From<companies::Model> for Company {
    fn from(m: companies::Model) -> Self {
        Self {
            company_id: m.company_id,
            name: m.name,
            logo: m.logo,
            industry: m.industry,
            location_id: m.location_id,
            established_date: m.established_date,
            created_at: to_utc(m.created_at),
        }
    }
}

impl From<locations::Model> for Location {
    fn from(m: locations::Model) -> Self {
        Self {
            location_id: Some(m.location_id),
            name: m.name,
            address: m.address,
            city: m.city,
            state: m.state,
            zip_code: m.zip_code,
            country: m.country,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: to_utc(m.created_at),
        }
    }
}

impl From<asset_types::Model> for AssetType {
    fn from(m: asset_types::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
            code: m.code,
        }
    }
}

impl From<materials::Model> for Material {
    fn from(m: materials::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
        }
    }
}

impl From<contents::Model> for Content {
    fn from(m: contents::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
        }
    }
}

impl From<event_types::Model> for EventType {
    fn from(m: event_types::Model) -> Self {
        Self {
            id: Some(m.id),
            name: m.name,
            description: m.description,
        }
    }
}

impl From<farms::Model> for Farm {
    fn from(m: farms::Model) -> Self {
        Self {
            farm_id: m.farm_id,
            company_id: m.company_id,
            location_id: m.location_id,
            name: m.name,
            description: m.description,
            status: m.status,
            created_at: to_utc(m.created_at),
            operational_since: m.operational_since,
            layout_pdf: m.layout_pdf,
            site_model_file: m.site_model_file,
            site_model_file_name: m.site_model_file_name,
            site_model_uploaded_at: m.site_model_uploaded_at.map(to_utc),
        }
    }
}

impl From<assets::Model> for Asset {
    fn from(m: assets::Model) -> Self {
        Self {
            asset_id: m.asset_id,
            company_id: m.company_id,
            location_id: m.location_id,
            farm_id: m.farm_id,
            name: m.name,
            asset_type_id: m.asset_type_id,
            description: m.description,
            installation_date: m.installation_date.map(to_utc),
            manufactured_date: m.manufactured_date.map(to_utc),
            commission_date: m.commission_date.map(to_utc),
            decommission_date: m.decommission_date.map(to_utc),
            status: m.status,
            created_at: to_utc(m.created_at),
            latitude: m.latitude,
            longitude: m.longitude,
            health: m.health,
            capacity: m.capacity,
            model_id: m.model_id,
            current_volume: m.current_volume,
            diameter: m.diameter,
            height: m.height,
            model_file: m.model_file,
            model_file_name: m.model_file_name,
            model_uploaded_at: m.model_uploaded_at.map(to_utc),
            material_id: m.material_id,
            content_id: m.content_id,
        }
    }
}

impl From<asset_events::Model> for AssetEvent {
    fn from(m: asset_events::Model) -> Self {
        Self {
            event_id: m.event_id,
            asset_id: m.asset_id,
            title: m.title,
            event_type_id: m.event_type_id,
            start_date: m.start_date.map(to_utc),
            end_date: m.end_date.map(to_utc),
            event_status: m.event_status,
            description: m.description,
            performed_by: m.performed_by,
            created_at: to_utc(m.created_at),
            cost: m.cost,
        }
    }
}

impl From<asset_models::Model> for AssetModel {
    fn from(m: asset_models::Model) -> Self {
        Self {
            id: Some(m.id),
            asset_type_id: m.asset_type_id,
            name: m.name,
            model_file: m.model_file,
            is_default: m.is_default,
            description: m.description,
            created_at: to_utc(m.created_at),
        }
    }
}

fn models_into<M, T: From<M>>(models: Vec<M>) -> Vec<T> {
    models.into_iter().map(T::from).collect()
}

#[async_trait]
impl<'a, C> InventoryRepository for SeaOrmInventoryRepository<'a, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn save_company(&self, company: &Company) -> Result<Company, DomainError> {
        let active_model = companies::ActiveModel {
            company_id: Set(company.company_id.clone()),
            name: Set(company.name.clone()),
            logo: Set(company.logo.clone()),
            industry: Set(company.industry.clone()),
            location_id: Set(company.location_id.clone()),
            established_date: Set(company.established_date),
            created_at: Set(to_offset(company.created_at)),
        };

        companies::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(companies::Column::CompanyId)
                    .update_columns([
                        companies::Column::Name,
                        companies::Column::Logo,
                        companies::Column::Industry,
                        companies::Column::LocationId,
                        companies::Column::EstablishedDate,
                        companies::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        Ok(company.clone())
    }

    async fn find_company(&self, company_id: &str) -> Result<Option<Company>, DomainError> {
        let model = companies::Entity::find_by_id(company_id.to_string())
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Company::from))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, DomainError> {
        let models = companies::Entity::find()
            .order_by_asc(companies::Column::CompanyId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_location(&self, location: &Location) -> Result<Location, DomainError> {
        let active_model = locations::ActiveModel {
            location_id: generated(location.location_id),
            name: Set(location.name.clone()),
            address: Set(location.address.clone()),
            city: Set(location.city.clone()),
            state: Set(location.state.clone()),
            zip_code: Set(location.zip_code.clone()),
            country: Set(location.country.clone()),
            latitude: Set(location.latitude),
            longitude: Set(location.longitude),
            created_at: Set(to_offset(location.created_at)),
        };

        let result = locations::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(locations::Column::LocationId)
                    .update_columns([
                        locations::Column::Name,
                        locations::Column::Address,
                        locations::Column::City,
                        locations::Column::State,
                        locations::Column::ZipCode,
                        locations::Column::Country,
                        locations::Column::Latitude,
                        locations::Column::Longitude,
                        locations::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = location.clone();
        saved.location_id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_location(&self, location_id: i32) -> Result<Option<Location>, DomainError> {
        let model = locations::Entity::find_by_id(location_id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Location::from))
    }

    async fn list_locations(&self) -> Result<Vec<Location>, DomainError> {
        let models = locations::Entity::find()
            .order_by_asc(locations::Column::LocationId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_asset_type(&self, asset_type: &AssetType) -> Result<AssetType, DomainError> {
        let active_model = asset_types::ActiveModel {
            id: generated(asset_type.id),
            name: Set(asset_type.name.clone()),
            description: Set(asset_type.description.clone()),
            code: Set(asset_type.code.clone()),
        };

        let result = asset_types::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(asset_types::Column::Id)
                    .update_columns([
                        asset_types::Column::Name,
                        asset_types::Column::Description,
                        asset_types::Column::Code,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = asset_type.clone();
        saved.id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_asset_type(&self, id: i32) -> Result<Option<AssetType>, DomainError> {
        let model = asset_types::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(AssetType::from))
    }

    async fn list_asset_types(&self) -> Result<Vec<AssetType>, DomainError> {
        let models = asset_types::Entity::find()
            .order_by_asc(asset_types::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn find_asset_type_by_name(&self, name: &str) -> Result<Option<AssetType>, DomainError> {
        let model = asset_types::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(asset_types::Column::Name)))
                    .eq(name.to_lowercase()),
            )
            .order_by_asc(asset_types::Column::Id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(AssetType::from))
    }

    async fn search_asset_types(&self, fragment: &str) -> Result<Vec<AssetType>, DomainError> {
        let models = asset_types::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(asset_types::Column::Name)))
                    .like(format!("%{}%", fragment.to_lowercase())),
            )
            .order_by_asc(asset_types::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_material(&self, material: &Material) -> Result<Material, DomainError> {
        let active_model = materials::ActiveModel {
            id: generated(material.id),
            name: Set(material.name.clone()),
            description: Set(material.description.clone()),
        };

        let result = materials::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(materials::Column::Id)
                    .update_columns([materials::Column::Name, materials::Column::Description])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = material.clone();
        saved.id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_material(&self, id: i32) -> Result<Option<Material>, DomainError> {
        let model = materials::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Material::from))
    }

    async fn list_materials(&self) -> Result<Vec<Material>, DomainError> {
        let models = materials::Entity::find()
            .order_by_asc(materials::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_content(&self, content: &Content) -> Result<Content, DomainError> {
        let active_model = contents::ActiveModel {
            id: generated(content.id),
            name: Set(content.name.clone()),
            description: Set(content.description.clone()),
        };

        let result = contents::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(contents::Column::Id)
                    .update_columns([contents::Column::Name, contents::Column::Description])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = content.clone();
        saved.id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_content(&self, id: i32) -> Result<Option<Content>, DomainError> {
        let model = contents::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Content::from))
    }

    async fn list_contents(&self) -> Result<Vec<Content>, DomainError> {
        let models = contents::Entity::find()
            .order_by_asc(contents::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_event_type(&self, event_type: &EventType) -> Result<EventType, DomainError> {
        let active_model = event_types::ActiveModel {
            id: generated(event_type.id),
            name: Set(event_type.name.clone()),
            description: Set(event_type.description.clone()),
        };

        let result = event_types::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(event_types::Column::Id)
                    .update_columns([event_types::Column::Name, event_types::Column::Description])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = event_type.clone();
        saved.id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_event_type(&self, id: i32) -> Result<Option<EventType>, DomainError> {
        let model = event_types::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(EventType::from))
    }

    async fn list_event_types(&self) -> Result<Vec<EventType>, DomainError> {
        let models = event_types::Entity::find()
            .order_by_asc(event_types::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_farm(&self, farm: &Farm) -> Result<Farm, DomainError> {
        let active_model = farms::ActiveModel {
            farm_id: Set(farm.farm_id.clone()),
            company_id: Set(farm.company_id.clone()),
            location_id: Set(farm.location_id),
            name: Set(farm.name.clone()),
            description: Set(farm.description.clone()),
            status: Set(farm.status.clone()),
            created_at: Set(to_offset(farm.created_at)),
            operational_since: Set(farm.operational_since),
            layout_pdf: Set(farm.layout_pdf.clone()),
            site_model_file: Set(farm.site_model_file.clone()),
            site_model_file_name: Set(farm.site_model_file_name.clone()),
            site_model_uploaded_at: Set(farm.site_model_uploaded_at.map(to_offset)),
        };

        farms::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(farms::Column::FarmId)
                    .update_columns([
                        farms::Column::CompanyId,
                        farms::Column::LocationId,
                        farms::Column::Name,
                        farms::Column::Description,
                        farms::Column::Status,
                        farms::Column::CreatedAt,
                        farms::Column::OperationalSince,
                        farms::Column::LayoutPdf,
                        farms::Column::SiteModelFile,
                        farms::Column::SiteModelFileName,
                        farms::Column::SiteModelUploadedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        Ok(farm.clone())
    }

    async fn find_farm(&self, farm_id: &str) -> Result<Option<Farm>, DomainError> {
        let model = farms::Entity::find_by_id(farm_id.to_string())
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Farm::from))
    }

    async fn list_farms(&self) -> Result<Vec<Farm>, DomainError> {
        let models = farms::Entity::find()
            .order_by_asc(farms::Column::FarmId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_asset(&self, asset: &Asset) -> Result<Asset, DomainError> {
        let active_model = assets::ActiveModel {
            asset_id: Set(asset.asset_id.clone()),
            company_id: Set(asset.company_id.clone()),
            location_id: Set(asset.location_id),
            farm_id: Set(asset.farm_id.clone()),
            name: Set(asset.name.clone()),
            asset_type_id: Set(asset.asset_type_id),
            description: Set(asset.description.clone()),
            installation_date: Set(asset.installation_date.map(to_offset)),
            manufactured_date: Set(asset.manufactured_date.map(to_offset)),
            commission_date: Set(asset.commission_date.map(to_offset)),
            decommission_date: Set(asset.decommission_date.map(to_offset)),
            status: Set(asset.status.clone()),
            created_at: Set(to_offset(asset.created_at)),
            latitude: Set(asset.latitude),
            longitude: Set(asset.longitude),
            health: Set(asset.health),
            capacity: Set(asset.capacity),
            model_id: Set(asset.model_id.clone()),
            current_volume: Set(asset.current_volume),
            diameter: Set(asset.diameter),
            height: Set(asset.height),
            model_file: Set(asset.model_file.clone()),
            model_file_name: Set(asset.model_file_name.clone()),
            model_uploaded_at: Set(asset.model_uploaded_at.map(to_offset)),
            material_id: Set(asset.material_id),
            content_id: Set(asset.content_id),
        };

        assets::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(assets::Column::AssetId)
                    .update_columns([
                        assets::Column::CompanyId,
                        assets::Column::LocationId,
                        assets::Column::FarmId,
                        assets::Column::Name,
                        assets::Column::AssetTypeId,
                        assets::Column::Description,
                        assets::Column::InstallationDate,
                        assets::Column::ManufacturedDate,
                        assets::Column::CommissionDate,
                        assets::Column::DecommissionDate,
                        assets::Column::Status,
                        assets::Column::CreatedAt,
                        assets::Column::Latitude,
                        assets::Column::Longitude,
                        assets::Column::Health,
                        assets::Column::Capacity,
                        assets::Column::ModelId,
                        assets::Column::CurrentVolume,
                        assets::Column::Diameter,
                        assets::Column::Height,
                        assets::Column::ModelFile,
                        assets::Column::ModelFileName,
                        assets::Column::ModelUploadedAt,
                        assets::Column::MaterialId,
                        assets::Column::ContentId,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        Ok(asset.clone())
    }

    async fn find_asset(&self, asset_id: &str) -> Result<Option<Asset>, DomainError> {
        let model = assets::Entity::find_by_id(asset_id.to_string())
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(Asset::from))
    }

    async fn list_assets(&self) -> Result<Vec<Asset>, DomainError> {
        let models = assets::Entity::find()
            .order_by_asc(assets::Column::AssetId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn assets_by_farm(&self, farm_id: &str) -> Result<Vec<Asset>, DomainError> {
        let models = assets::Entity::find()
            .filter(assets::Column::FarmId.eq(farm_id))
            .order_by_asc(assets::Column::Name)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn assets_by_name(&self, name: &str) -> Result<Vec<Asset>, DomainError> {
        let models = assets::Entity::find()
            .filter(Expr::expr(Func::lower(Expr::col(assets::Column::Name))).eq(name.to_lowercase()))
            .order_by_asc(assets::Column::AssetId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn assets_by_model_id(&self, model_id: &str) -> Result<Vec<Asset>, DomainError> {
        let models = assets::Entity::find()
            .filter(assets::Column::ModelId.eq(model_id))
            .order_by_asc(assets::Column::AssetId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn assets_by_types(&self, asset_type_ids: &[i32]) -> Result<Vec<Asset>, DomainError> {
        if asset_type_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = assets::Entity::find()
            .filter(assets::Column::AssetTypeId.is_in(asset_type_ids.to_vec()))
            .order_by_asc(assets::Column::AssetId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_asset_event(&self, event: &AssetEvent) -> Result<AssetEvent, DomainError> {
        let active_model = asset_events::ActiveModel {
            event_id: Set(event.event_id.clone()),
            asset_id: Set(event.asset_id.clone()),
            title: Set(event.title.clone()),
            event_type_id: Set(event.event_type_id),
            start_date: Set(event.start_date.map(to_offset)),
            end_date: Set(event.end_date.map(to_offset)),
            event_status: Set(event.event_status.clone()),
            description: Set(event.description.clone()),
            performed_by: Set(event.performed_by.clone()),
            created_at: Set(to_offset(event.created_at)),
            cost: Set(event.cost.clone()),
        };

        asset_events::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(asset_events::Column::EventId)
                    .update_columns([
                        asset_events::Column::AssetId,
                        asset_events::Column::Title,
                        asset_events::Column::EventTypeId,
                        asset_events::Column::StartDate,
                        asset_events::Column::EndDate,
                        asset_events::Column::EventStatus,
                        asset_events::Column::Description,
                        asset_events::Column::PerformedBy,
                        asset_events::Column::CreatedAt,
                        asset_events::Column::Cost,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        Ok(event.clone())
    }

    async fn find_asset_event(&self, event_id: &str) -> Result<Option<AssetEvent>, DomainError> {
        let model = asset_events::Entity::find_by_id(event_id.to_string())
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(AssetEvent::from))
    }

    async fn list_asset_events(&self) -> Result<Vec<AssetEvent>, DomainError> {
        let models = asset_events::Entity::find()
            .order_by_asc(asset_events::Column::EventId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn events_by_asset(&self, asset_id: &str) -> Result<Vec<AssetEvent>, DomainError> {
        let models = asset_events::Entity::find()
            .filter(asset_events::Column::AssetId.eq(asset_id))
            .order_by_desc(asset_events::Column::StartDate)
            .order_by_asc(asset_events::Column::EventId)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn save_asset_model(&self, model: &AssetModel) -> Result<AssetModel, DomainError> {
        if model.is_default {
            let mut clear = asset_models::Entity::update_many()
                .col_expr(asset_models::Column::IsDefault, Expr::value(false))
                .filter(asset_models::Column::AssetTypeId.eq(model.asset_type_id))
                .filter(asset_models::Column::IsDefault.eq(true));
            if let Some(id) = model.id {
                clear = clear.filter(asset_models::Column::Id.ne(id));
            }
            let cleared = clear.exec(self.db).await.map_err(db_err)?;
            debug!(
                asset_type_id = model.asset_type_id,
                cleared = cleared.rows_affected,
                "Cleared previous default asset models"
            );
        }

        let active_model = asset_models::ActiveModel {
            id: generated(model.id),
            asset_type_id: Set(model.asset_type_id),
            name: Set(model.name.clone()),
            model_file: Set(model.model_file.clone()),
            is_default: Set(model.is_default),
            description: Set(model.description.clone()),
            created_at: Set(to_offset(model.created_at)),
        };

        let result = asset_models::Entity::insert(active_model)
            .on_conflict(
                OnConflict::column(asset_models::Column::Id)
                    .update_columns([
                        asset_models::Column::AssetTypeId,
                        asset_models::Column::Name,
                        asset_models::Column::ModelFile,
                        asset_models::Column::IsDefault,
                        asset_models::Column::Description,
                        asset_models::Column::CreatedAt,
                    ])
                    .to_owned(),
            )
            .exec(self.db)
            .await
            .map_err(db_err)?;

        let mut saved = model.clone();
        saved.id = Some(result.last_insert_id);
        Ok(saved)
    }

    async fn find_asset_model(&self, id: i32) -> Result<Option<AssetModel>, DomainError> {
        let model = asset_models::Entity::find_by_id(id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(AssetModel::from))
    }

    async fn list_asset_models(&self) -> Result<Vec<AssetModel>, DomainError> {
        let models = asset_models::Entity::find()
            .order_by_asc(asset_models::Column::Id)
            .all(self.db)
            .await
            .map_err(db_err)?;
        Ok(models_into(models))
    }

    async fn default_model_for_type(
        &self,
        asset_type_id: i32,
    ) -> Result<Option<AssetModel>, DomainError> {
        let model = asset_models::Entity::find()
            .filter(asset_models::Column::AssetTypeId.eq(asset_type_id))
            .filter(asset_models::Column::IsDefault.eq(true))
            .order_by_asc(asset_models::Column::Id)
            .one(self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(AssetModel::from))
    }

    async fn delete(&self, table: Table, key: &str) -> Result<bool, DomainError> {
        let result = match table {
            Table::Companies => {
                companies::Entity::delete_by_id(key.to_string())
                    .exec(self.db)
                    .await
            }
            Table::Locations => {
                locations::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
            Table::AssetTypes => {
                asset_types::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
            Table::Materials => {
                materials::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
            Table::Contents => {
                contents::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
            Table::EventTypes => {
                event_types::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
            Table::Farms => farms::Entity::delete_by_id(key.to_string()).exec(self.db).await,
            Table::Assets => assets::Entity::delete_by_id(key.to_string()).exec(self.db).await,
            Table::AssetEvents => {
                asset_events::Entity::delete_by_id(key.to_string())
                    .exec(self.db)
                    .await
            }
            Table::AssetModels => {
                asset_models::Entity::delete_by_id(int_key(table, key)?)
                    .exec(self.db)
                    .await
            }
        }
        .map_err(db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn count(&self, table: Table) -> Result<u64, DomainError> {
        let count = match table {
            Table::Companies => companies::Entity::find().count(self.db).await,
            Table::Locations => locations::Entity::find().count(self.db).await,
            Table::AssetTypes => asset_types::Entity::find().count(self.db).await,
            Table::Materials => materials::Entity::find().count(self.db).await,
            Table::Contents => contents::Entity::find().count(self.db).await,
            Table::EventTypes => event_types::Entity::find().count(self.db).await,
            Table::Farms => farms::Entity::find().count(self.db).await,
            Table::Assets => assets::Entity::find().count(self.db).await,
            Table::AssetEvents => asset_events::Entity::find().count(self.db).await,
            Table::AssetModels => asset_models::Entity::find().count(self.db).await,
        }
        .map_err(db_err)?;
        Ok(count)
    }

    async fn clear_transfer_tables(&self) -> Result<(), DomainError> {
        for table in Table::TRANSFER_ORDER.into_iter().rev() {
            let result = match table {
                Table::AssetEvents => asset_events::Entity::delete_many().exec(self.db).await,
                Table::Assets => assets::Entity::delete_many().exec(self.db).await,
                Table::Farms => farms::Entity::delete_many().exec(self.db).await,
                Table::EventTypes => event_types::Entity::delete_many().exec(self.db).await,
                Table::Contents => contents::Entity::delete_many().exec(self.db).await,
                Table::Materials => materials::Entity::delete_many().exec(self.db).await,
                Table::AssetTypes => asset_types::Entity::delete_many().exec(self.db).await,
                Table::Locations => locations::Entity::delete_many().exec(self.db).await,
                Table::Companies => companies::Entity::delete_many().exec(self.db).await,
                Table::AssetModels => continue,
            }
            .map_err(db_err)?;
            debug!(table = %table, deleted = result.rows_affected, "Cleared table");
        }
        Ok(())
    }

    async fn resync_sequences(&self) -> Result<(), DomainError> {
        if self.db.get_database_backend() != DbBackend::Postgres {
            return Ok(());
        }

        for (table, key) in SEQUENCED {
            let sql = format!(
                "SELECT setval(pg_get_serial_sequence('{table}', '{key}'), \
                 COALESCE((SELECT MAX({key}) FROM {table}), 1), \
                 (SELECT MAX({key}) FROM {table}) IS NOT NULL)"
            );
            self.db.execute_unprepared(&sql).await.map_err(db_err)?;
            debug!(table, "Sequence resynchronised");
        }
        Ok(())
    }
}

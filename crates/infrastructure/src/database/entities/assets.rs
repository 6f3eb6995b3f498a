use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub asset_id: String,
    pub company_id: String,
    pub location_id: Option<i32>,
    pub farm_id: Option<String>,
    pub name: String,
    pub asset_type_id: Option<i32>,
    pub description: Option<String>,
    pub installation_date: Option<DateTimeWithTimeZone>,
    pub manufactured_date: Option<DateTimeWithTimeZone>,
    pub commission_date: Option<DateTimeWithTimeZone>,
    pub decommission_date: Option<DateTimeWithTimeZone>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub health: i32,
    pub capacity: Option<f64>,
    pub model_id: Option<String>,
    pub current_volume: Option<f64>,
    pub diameter: Option<f64>,
    pub height: Option<f64>,
    pub model_file: Option<String>,
    pub model_file_name: Option<String>,
    pub model_uploaded_at: Option<DateTimeWithTimeZone>,
    pub material_id: Option<i32>,
    pub content_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::farms::Entity",
        from = "Column::FarmId",
        to = "super::farms::Column::FarmId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Farm,
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::LocationId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(
        belongs_to = "super::asset_types::Entity",
        from = "Column::AssetTypeId",
        to = "super::asset_types::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    AssetType,
    #[sea_orm(has_many = "super::asset_events::Entity")]
    Events,
}

impl Related<super::farms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Farm.def()
    }
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::asset_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetType.def()
    }
}

impl Related<super::asset_events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Events.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

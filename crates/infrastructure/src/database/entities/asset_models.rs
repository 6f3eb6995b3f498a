use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "asset_models")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub asset_type_id: i32,
    pub name: String,
    pub model_file: String,
    pub is_default: bool,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::asset_types::Entity",
        from = "Column::AssetTypeId",
        to = "super::asset_types::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    AssetType,
}

impl Related<super::asset_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssetType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "farms")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub farm_id: String,
    pub company_id: String,
    pub location_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: DateTimeWithTimeZone,
    pub operational_since: Option<Date>,
    pub layout_pdf: Option<String>,
    pub site_model_file: Option<String>,
    pub site_model_file_name: Option<String>,
    pub site_model_uploaded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::LocationId",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Location,
    #[sea_orm(has_many = "super::assets::Entity")]
    Assets,
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::assets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

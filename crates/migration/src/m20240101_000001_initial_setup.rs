use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create companies table
        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Companies::CompanyId)
                            .string_len(200)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Companies::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Companies::Logo).string())
                    .col(ColumnDef::new(Companies::Industry).string_len(100))
                    .col(ColumnDef::new(Companies::LocationId).string())
                    .col(ColumnDef::new(Companies::EstablishedDate).date())
                    .col(
                        ColumnDef::new(Companies::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create locations table
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Locations::LocationId)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Locations::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Locations::Address).string())
                    .col(ColumnDef::new(Locations::City).string_len(100))
                    .col(ColumnDef::new(Locations::State).string_len(100))
                    .col(ColumnDef::new(Locations::ZipCode).string_len(20))
                    .col(ColumnDef::new(Locations::Country).string_len(100))
                    .col(ColumnDef::new(Locations::Latitude).double())
                    .col(ColumnDef::new(Locations::Longitude).double())
                    .col(
                        ColumnDef::new(Locations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup tables share one shape
        manager
            .create_table(
                Table::create()
                    .table(AssetTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetTypes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetTypes::Name).string_len(100).not_null())
                    .col(ColumnDef::new(AssetTypes::Description).text())
                    .col(ColumnDef::new(AssetTypes::Code).string_len(50))
                    .to_owned(),
            )
            .await?;

        for table in [Lookup::Materials, Lookup::Contents, Lookup::EventTypes] {
            manager
                .create_table(
                    Table::create()
                        .table(table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Lookup::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Lookup::Name).string_len(100).not_null())
                        .col(ColumnDef::new(Lookup::Description).text())
                        .to_owned(),
                )
                .await?;
        }

        // Create farms table
        manager
            .create_table(
                Table::create()
                    .table(Farms::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Farms::FarmId)
                            .string_len(200)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Farms::CompanyId).string_len(200).not_null())
                    .col(ColumnDef::new(Farms::LocationId).integer())
                    .col(ColumnDef::new(Farms::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Farms::Description).text())
                    .col(
                        ColumnDef::new(Farms::Status)
                            .string_len(50)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Farms::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Farms::OperationalSince).date())
                    .col(ColumnDef::new(Farms::LayoutPdf).string())
                    .col(ColumnDef::new(Farms::SiteModelFile).string())
                    .col(ColumnDef::new(Farms::SiteModelFileName).string())
                    .col(ColumnDef::new(Farms::SiteModelUploadedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_farm_location")
                            .from(Farms::Table, Farms::LocationId)
                            .to(Locations::Table, Locations::LocationId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create assets table
        manager
            .create_table(
                Table::create()
                    .table(Assets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assets::AssetId)
                            .string_len(200)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assets::CompanyId).string_len(200).not_null())
                    .col(ColumnDef::new(Assets::LocationId).integer())
                    .col(ColumnDef::new(Assets::FarmId).string_len(200))
                    .col(ColumnDef::new(Assets::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Assets::AssetTypeId).integer())
                    .col(ColumnDef::new(Assets::Description).text())
                    .col(ColumnDef::new(Assets::InstallationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Assets::ManufacturedDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Assets::CommissionDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Assets::DecommissionDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Assets::Status)
                            .string_len(50)
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Assets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Assets::Latitude).double())
                    .col(ColumnDef::new(Assets::Longitude).double())
                    .col(
                        ColumnDef::new(Assets::Health)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(Assets::Capacity).double())
                    .col(ColumnDef::new(Assets::ModelId).string_len(100))
                    .col(ColumnDef::new(Assets::CurrentVolume).double())
                    .col(ColumnDef::new(Assets::Diameter).double())
                    .col(ColumnDef::new(Assets::Height).double())
                    .col(ColumnDef::new(Assets::ModelFile).string())
                    .col(ColumnDef::new(Assets::ModelFileName).string())
                    .col(ColumnDef::new(Assets::ModelUploadedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Assets::MaterialId).integer())
                    .col(ColumnDef::new(Assets::ContentId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_location")
                            .from(Assets::Table, Assets::LocationId)
                            .to(Locations::Table, Locations::LocationId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_farm")
                            .from(Assets::Table, Assets::FarmId)
                            .to(Farms::Table, Farms::FarmId)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_type")
                            .from(Assets::Table, Assets::AssetTypeId)
                            .to(AssetTypes::Table, AssetTypes::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_material")
                            .from(Assets::Table, Assets::MaterialId)
                            .to(Lookup::Materials, Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_content")
                            .from(Assets::Table, Assets::ContentId)
                            .to(Lookup::Contents, Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create asset_events table
        manager
            .create_table(
                Table::create()
                    .table(AssetEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetEvents::EventId)
                            .string_len(200)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetEvents::AssetId).string_len(200).not_null())
                    .col(ColumnDef::new(AssetEvents::Title).string_len(200).not_null())
                    .col(ColumnDef::new(AssetEvents::EventTypeId).integer())
                    .col(ColumnDef::new(AssetEvents::StartDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(AssetEvents::EndDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(AssetEvents::EventStatus)
                            .string_len(50)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(AssetEvents::Description).text())
                    .col(ColumnDef::new(AssetEvents::PerformedBy).string_len(200))
                    .col(
                        ColumnDef::new(AssetEvents::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(AssetEvents::Cost).string_len(50))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_asset")
                            .from(AssetEvents::Table, AssetEvents::AssetId)
                            .to(Assets::Table, Assets::AssetId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_type")
                            .from(AssetEvents::Table, AssetEvents::EventTypeId)
                            .to(Lookup::EventTypes, Lookup::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Create asset_models table
        manager
            .create_table(
                Table::create()
                    .table(AssetModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssetModels::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AssetModels::AssetTypeId).integer().not_null())
                    .col(ColumnDef::new(AssetModels::Name).string_len(100).not_null())
                    .col(ColumnDef::new(AssetModels::ModelFile).string().not_null())
                    .col(
                        ColumnDef::new(AssetModels::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AssetModels::Description).text())
                    .col(
                        ColumnDef::new(AssetModels::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_asset_model_type")
                            .from(AssetModels::Table, AssetModels::AssetTypeId)
                            .to(AssetTypes::Table, AssetTypes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Lookup indexes used by the read endpoints
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assets_farm")
                    .table(Assets::Table)
                    .col(Assets::FarmId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_assets_model_id")
                    .table(Assets::Table)
                    .col(Assets::ModelId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_asset_events_asset")
                    .table(AssetEvents::Table)
                    .col(AssetEvents::AssetId)
                    .col(AssetEvents::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_asset_models_type")
                    .table(AssetModels::Table)
                    .col(AssetModels::AssetTypeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssetModels::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(AssetEvents::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assets::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Farms::Table).to_owned())
            .await?;

        for table in [Lookup::EventTypes, Lookup::Contents, Lookup::Materials] {
            manager.drop_table(Table::drop().table(table).to_owned()).await?;
        }

        manager
            .drop_table(Table::drop().table(AssetTypes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Locations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    CompanyId,
    Name,
    Logo,
    Industry,
    LocationId, // Free text, not a foreign key
    EstablishedDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    LocationId,
    Name,
    Address,
    City,
    State,
    ZipCode,
    Country,
    Latitude,
    Longitude,
    CreatedAt,
}

#[derive(DeriveIden)]
enum AssetTypes {
    Table,
    Id,
    Name,
    Description,
    Code,
}

/// materials, contents and event_types
#[derive(DeriveIden, Clone, Copy)]
enum Lookup {
    Materials,
    Contents,
    EventTypes,
    Id,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum Farms {
    Table,
    FarmId,
    CompanyId,
    LocationId,
    Name,
    Description,
    Status,
    CreatedAt,
    OperationalSince,
    LayoutPdf,
    SiteModelFile,
    SiteModelFileName,
    SiteModelUploadedAt,
}

#[derive(DeriveIden)]
enum Assets {
    Table,
    AssetId,
    CompanyId,
    LocationId,
    FarmId,
    Name,
    AssetTypeId,
    Description,
    InstallationDate,
    ManufacturedDate,
    CommissionDate,
    DecommissionDate,
    Status,
    CreatedAt,
    Latitude,
    Longitude,
    Health,
    Capacity,
    ModelId,
    CurrentVolume,
    Diameter,
    Height,
    ModelFile,
    ModelFileName,
    ModelUploadedAt,
    MaterialId,
    ContentId,
}

#[derive(DeriveIden)]
enum AssetEvents {
    Table,
    EventId,
    AssetId,
    Title,
    EventTypeId,
    StartDate,
    EndDate,
    EventStatus,
    Description,
    PerformedBy,
    CreatedAt,
    Cost,
}

#[derive(DeriveIden)]
enum AssetModels {
    Table,
    Id,
    AssetTypeId,
    Name,
    ModelFile,
    IsDefault,
    Description,
    CreatedAt,
}

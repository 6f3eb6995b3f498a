//! Record editing and bulk data tools.

use super::inventory::resource;
use super::upload::UploadForm;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use domain::{
    Asset, AssetEvent, AssetModel, AssetType, Company, Content, EventType, Farm,
    InventoryRepository, Location, Material, Table,
};
use infrastructure::archive::{ARCHIVE_EXTENSION, ARCHIVE_MIME_TYPE};
use infrastructure::database::browse::{self as listing, BrowseQuery};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub async fn list_records(
    Path(resource_name): Path<String>,
    Query(query): Query<BrowseQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<listing::BrowsePage>> {
    let table = resource(&resource_name)?;
    let page = listing::browse(&state.db, table, &query, state.config.browse.page_size).await?;
    Ok(Json(page))
}

pub async fn get_record(
    Path((resource_name, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let table = resource(&resource_name)?;
    let record = listing::fetch_record(&state.db, table, &id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("{} not found: {id}", table.entity_name())))?;
    Ok(Json(record))
}

fn decode<T: DeserializeOwned>(body: Value) -> ApiResult<T> {
    serde_json::from_value(body).map_err(|e| ApiError::bad_request(format!("Invalid record: {e}")))
}

fn int_id(table: Table, key: &str) -> ApiResult<i32> {
    key.trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id: {key}", table.entity_name())))
}

fn missing_parent(table: Table, key: impl std::fmt::Display) -> ApiError {
    ApiError::bad_request(format!("{} does not exist: {key}", table.entity_name()))
}

/// Reject references to rows that do not exist before they reach the database.
async fn check_parent(repo: &dyn InventoryRepository, table: Table, key: Option<&str>) -> ApiResult<()> {
    let Some(key) = key else {
        return Ok(());
    };
    let exists = match table {
        Table::Farms => repo.find_farm(key).await?.is_some(),
        Table::Assets => repo.find_asset(key).await?.is_some(),
        Table::Locations => repo.find_location(int_id(table, key)?).await?.is_some(),
        Table::AssetTypes => repo.find_asset_type(int_id(table, key)?).await?.is_some(),
        Table::Materials => repo.find_material(int_id(table, key)?).await?.is_some(),
        Table::Contents => repo.find_content(int_id(table, key)?).await?.is_some(),
        Table::EventTypes => repo.find_event_type(int_id(table, key)?).await?.is_some(),
        Table::Companies | Table::AssetEvents | Table::AssetModels => true,
    };
    if exists { Ok(()) } else { Err(missing_parent(table, key)) }
}

fn id_text(id: Option<i32>) -> Option<String> {
    id.map(|id| id.to_string())
}

/// Create or update one record of `table`. `key` comes from the URL and wins
/// over any id in the body.
async fn save_record(
    repo: &dyn InventoryRepository,
    table: Table,
    key: Option<&str>,
    body: Value,
) -> ApiResult<Value> {
    let saved = match table {
        Table::Companies => {
            let mut company: Company = decode(body)?;
            if let Some(key) = key {
                company.company_id = key.to_string();
            }
            company.ensure_id();
            serde_json::to_value(repo.save_company(&company).await?)
        }
        Table::Locations => {
            let mut location: Location = decode(body)?;
            if let Some(key) = key {
                location.location_id = Some(int_id(table, key)?);
            }
            serde_json::to_value(repo.save_location(&location).await?)
        }
        Table::AssetTypes => {
            let mut asset_type: AssetType = decode(body)?;
            if let Some(key) = key {
                asset_type.id = Some(int_id(table, key)?);
            }
            serde_json::to_value(repo.save_asset_type(&asset_type).await?)
        }
        Table::Materials => {
            let mut material: Material = decode(body)?;
            if let Some(key) = key {
                material.id = Some(int_id(table, key)?);
            }
            serde_json::to_value(repo.save_material(&material).await?)
        }
        Table::Contents => {
            let mut content: Content = decode(body)?;
            if let Some(key) = key {
                content.id = Some(int_id(table, key)?);
            }
            serde_json::to_value(repo.save_content(&content).await?)
        }
        Table::EventTypes => {
            let mut event_type: EventType = decode(body)?;
            if let Some(key) = key {
                event_type.id = Some(int_id(table, key)?);
            }
            serde_json::to_value(repo.save_event_type(&event_type).await?)
        }
        Table::Farms => {
            let mut farm: Farm = decode(body)?;
            if let Some(key) = key {
                farm.farm_id = key.to_string();
            }
            farm.ensure_id();
            check_parent(repo, Table::Locations, id_text(farm.location_id).as_deref()).await?;
            if let Some(stored) = repo.find_farm(&farm.farm_id).await? {
                farm.keep_attachments_from(&stored);
            }
            serde_json::to_value(repo.save_farm(&farm).await?)
        }
        Table::Assets => {
            let mut asset: Asset = decode(body)?;
            if let Some(key) = key {
                asset.asset_id = key.to_string();
            }
            asset.ensure_id();
            check_parent(repo, Table::Farms, asset.farm_id.as_deref()).await?;
            check_parent(repo, Table::Locations, id_text(asset.location_id).as_deref()).await?;
            check_parent(repo, Table::AssetTypes, id_text(asset.asset_type_id).as_deref()).await?;
            check_parent(repo, Table::Materials, id_text(asset.material_id).as_deref()).await?;
            check_parent(repo, Table::Contents, id_text(asset.content_id).as_deref()).await?;
            if let Some(stored) = repo.find_asset(&asset.asset_id).await? {
                asset.keep_attachments_from(&stored);
            }
            serde_json::to_value(repo.save_asset(&asset).await?)
        }
        Table::AssetEvents => {
            let mut event: AssetEvent = decode(body)?;
            if let Some(key) = key {
                event.event_id = key.to_string();
            }
            check_parent(repo, Table::Assets, Some(&event.asset_id)).await?;
            check_parent(repo, Table::EventTypes, id_text(event.event_type_id).as_deref()).await?;
            event.ensure_id();
            serde_json::to_value(repo.save_asset_event(&event).await?)
        }
        Table::AssetModels => {
            let mut model: AssetModel = decode(body)?;
            if let Some(key) = key {
                model.id = Some(int_id(table, key)?);
            }
            check_parent(repo, Table::AssetTypes, Some(&model.asset_type_id.to_string())).await?;
            serde_json::to_value(repo.save_asset_model(&model).await?)
        }
    };
    saved.map_err(|e| ApiError::Internal(e.into()))
}

pub async fn create_record(
    Path(resource_name): Path<String>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let table = resource(&resource_name)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let saved = save_record(&state.repo(), table, None, body).await?;
    info!("📝 Created {} record", table.as_str());
    Ok((StatusCode::CREATED, Json(saved)))
}

pub async fn update_record(
    Path((resource_name, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let table = resource(&resource_name)?;
    let Json(body) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let saved = save_record(&state.repo(), table, Some(&id), body).await?;
    info!("📝 Saved {} record {}", table.as_str(), id);
    Ok(Json(saved))
}

pub async fn delete_record(
    Path((resource_name, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let table = resource(&resource_name)?;
    if !state.repo().delete(table, &id).await? {
        return Err(ApiError::not_found(format!(
            "{} not found: {id}",
            table.entity_name()
        )));
    }
    info!("🗑️  Deleted {} record {}", table.as_str(), id);
    Ok(StatusCode::NO_CONTENT)
}

/// Single assets CSV upload. Missing parents are created.
pub async fn upload_assets_csv(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<application::ImportReport>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    let is_csv = std::path::Path::new(&file.file_name)
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ApiError::bad_request("Please upload a .csv file"));
    }

    let report = state
        .transfer
        .import_assets_csv(&file.data, form.flag("update_existing"), &file.file_name)
        .await?;
    Ok(Json(report))
}

pub async fn export_archive(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let (data, manifest) = state.transfer.export_archive_bytes().await?;
    let file_name = format!(
        "inventory_export_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        ARCHIVE_EXTENSION
    );
    info!(
        "📦 Export bundle downloaded ({} rows)",
        manifest.total_rows()
    );
    Ok((
        [
            (header::CONTENT_TYPE, ARCHIVE_MIME_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        data,
    )
        .into_response())
}

pub async fn import_archive(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<application::ImportReport>> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    let report = state
        .transfer
        .import_archive_bytes(&file.data, form.flag("clear_existing"))
        .await?;
    Ok(Json(report))
}

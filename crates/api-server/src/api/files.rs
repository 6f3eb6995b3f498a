//! 3D model and layout downloads and uploads.

use super::upload::{UploadForm, UploadedFile};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use domain::{AssetModel, AttachmentKind, InventoryRepository};
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

async fn send_file(state: &AppState, kind: AttachmentKind, path: PathBuf) -> ApiResult<Response> {
    let data = state.storage.read(&path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok((
        [
            (header::CONTENT_TYPE, kind.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("inline; filename=\"{file_name}\""),
            ),
        ],
        data,
    )
        .into_response())
}

/// Default model of a type, if it has one and its file is on disk.
async fn default_model_path(state: &AppState, asset_type_id: i32) -> ApiResult<Option<PathBuf>> {
    let model = state.repo().default_model_for_type(asset_type_id).await?;
    Ok(model.and_then(|m| state.storage.stored(&m.model_file)))
}

pub async fn asset_type_model(
    Path(asset_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let mut path = None;
    if let Some(id) = state
        .repo()
        .find_asset_type_by_name(&asset_type)
        .await?
        .and_then(|t| t.id)
    {
        path = default_model_path(&state, id).await?;
    }
    let path = path
        .or_else(|| state.storage.fallback(AttachmentKind::ModelCategory, &asset_type))
        .ok_or_else(|| ApiError::not_found("Asset model not found"))?;
    send_file(&state, AttachmentKind::ModelCategory, path).await
}

pub async fn farm_model(
    Path(farm_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let stored = state
        .repo()
        .find_farm(&farm_id)
        .await?
        .and_then(|f| f.site_model_file)
        .and_then(|file| state.storage.stored(&file));
    let path = stored
        .or_else(|| state.storage.fallback(AttachmentKind::FarmSiteModel, &farm_id))
        .ok_or_else(|| ApiError::not_found("Model not found"))?;
    send_file(&state, AttachmentKind::FarmSiteModel, path).await
}

/// The asset's own upload, else the default model of its type.
pub async fn asset_model(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let repo = state.repo();
    let asset = repo
        .find_asset(&asset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;

    if let Some(path) = asset
        .model_file
        .as_deref()
        .and_then(|file| state.storage.stored(file))
    {
        return send_file(&state, AttachmentKind::AssetModel, path).await;
    }

    let Some(asset_type) = (match asset.asset_type_id {
        Some(id) => repo.find_asset_type(id).await?,
        None => None,
    }) else {
        return Err(ApiError::not_found("Asset model not found"));
    };
    let mut path = None;
    if let Some(id) = asset_type.id {
        path = default_model_path(&state, id).await?;
    }
    let path = path
        .or_else(|| state.storage.fallback(AttachmentKind::ModelCategory, &asset_type.name))
        .ok_or_else(|| ApiError::not_found("Asset model not found"))?;
    send_file(&state, AttachmentKind::ModelCategory, path).await
}

pub async fn farm_layout(
    Path(farm_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let stored = state
        .repo()
        .find_farm(&farm_id)
        .await?
        .and_then(|f| f.layout_pdf)
        .and_then(|file| state.storage.stored(&file));
    let path = stored
        .or_else(|| state.storage.fallback(AttachmentKind::FarmLayout, &farm_id))
        .ok_or_else(|| ApiError::not_found("Layout not found"))?;
    send_file(&state, AttachmentKind::FarmLayout, path).await
}

/// Read the `file` part of an upload and check its extension.
async fn checked_upload(multipart: Multipart, kind: AttachmentKind) -> ApiResult<(UploadForm, UploadedFile)> {
    let mut form = UploadForm::read(multipart).await?;
    let file = form.take_file()?;
    kind.validate_file_name(&file.file_name)?;
    Ok((form, file))
}

pub async fn upload_asset_model(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let repo = state.repo();
    let mut asset = repo
        .find_asset(&asset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;
    let (_, file) = checked_upload(multipart, AttachmentKind::AssetModel).await?;

    let stored = state
        .storage
        .save(AttachmentKind::AssetModel, &asset.asset_id, &file.data)
        .await?;
    asset.model_file = Some(stored.clone());
    asset.model_file_name = Some(file.file_name);
    asset.model_uploaded_at = Some(Utc::now());
    let asset = repo.save_asset(&asset).await?;
    info!("📤 Model uploaded for asset {}", asset.asset_id);

    Ok(Json(json!({
        "message": "Model uploaded",
        "asset_id": asset.asset_id,
        "model_file": stored,
        "model_file_name": asset.model_file_name,
        "model_uploaded_at": asset.model_uploaded_at,
    })))
}

pub async fn upload_farm_site_model(
    Path(farm_id): Path<String>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let repo = state.repo();
    let mut farm = repo
        .find_farm(&farm_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Farm not found"))?;
    let (_, file) = checked_upload(multipart, AttachmentKind::FarmSiteModel).await?;

    let stored = state
        .storage
        .save(AttachmentKind::FarmSiteModel, &farm.farm_id, &file.data)
        .await?;
    farm.site_model_file = Some(stored.clone());
    farm.site_model_file_name = Some(file.file_name);
    farm.site_model_uploaded_at = Some(Utc::now());
    let farm = repo.save_farm(&farm).await?;
    info!("📤 Site model uploaded for farm {}", farm.farm_id);

    Ok(Json(json!({
        "message": "Site model uploaded",
        "farm_id": farm.farm_id,
        "site_model_file": stored,
        "site_model_file_name": farm.site_model_file_name,
        "site_model_uploaded_at": farm.site_model_uploaded_at,
    })))
}

pub async fn upload_farm_layout(
    Path(farm_id): Path<String>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let repo = state.repo();
    let mut farm = repo
        .find_farm(&farm_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Farm not found"))?;
    let (_, file) = checked_upload(multipart, AttachmentKind::FarmLayout).await?;

    let stored = state
        .storage
        .save(AttachmentKind::FarmLayout, &farm.farm_id, &file.data)
        .await?;
    farm.layout_pdf = Some(stored.clone());
    let farm = repo.save_farm(&farm).await?;
    info!("📤 Layout uploaded for farm {}", farm.farm_id);

    Ok(Json(json!({
        "message": "Layout uploaded",
        "farm_id": farm.farm_id,
        "layout_pdf": stored,
    })))
}

/// File stem reduced to characters safe in a storage path.
fn sanitized_stem(file_name: &str) -> String {
    let stem = std::path::Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let clean: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if clean.is_empty() { "model".to_string() } else { clean }
}

pub async fn upload_asset_type_model(
    Path(asset_type_id): Path<i32>,
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> ApiResult<(StatusCode, Json<AssetModel>)> {
    let repo = state.repo();
    let asset_type = repo
        .find_asset_type(asset_type_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset type not found"))?;
    let (form, file) = checked_upload(multipart, AttachmentKind::ModelCategory).await?;

    let stem = sanitized_stem(&file.file_name);
    let owner = format!("{asset_type_id}-{stem}");
    let stored = state
        .storage
        .save(AttachmentKind::ModelCategory, &owner, &file.data)
        .await?;

    let model = AssetModel {
        id: None,
        asset_type_id,
        name: form.text("name").map(str::to_string).unwrap_or(stem),
        model_file: stored,
        is_default: form.flag("is_default"),
        description: form.text("description").map(str::to_string),
        created_at: Utc::now(),
    };
    let model = repo.save_asset_model(&model).await?;
    info!(
        "📤 Model {} added to asset type {}",
        model.name, asset_type.name
    );
    Ok((StatusCode::CREATED, Json(model)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitized_stem() {
        assert_eq!(sanitized_stem("Fixed Roof Tank.glb"), "Fixed_Roof_Tank");
        assert_eq!(sanitized_stem("pump-v2.glb"), "pump-v2");
        assert_eq!(sanitized_stem(".glb"), "_glb");
        assert_eq!(sanitized_stem(""), "model");
    }
}

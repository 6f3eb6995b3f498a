use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::views;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use domain::{AttachmentKind, InventoryRepository, Table};
use infrastructure::database::browse::{self as listing, BrowseQuery};
use sea_orm::ConnectionTrait;
use serde_json::{Value, json};
use std::sync::Arc;

pub async fn api_root() -> impl IntoResponse {
    let resources: Vec<&str> = Table::ALL.iter().map(|t| t.slug()).collect();
    Json(json!({
        "farms": {
            "farm_assets": "Use: /farm/{farm_id}/assets",
            "farm_model": "Use: /api/farm-model/{farm_id}",
            "farm_layout": "Use: /api/farm/{farm_id}/layout",
        },
        "assets": {
            "asset_details": "Use: /api/asset/{asset_id}",
            "asset_model": "Use: /api/asset-model/{asset_type}",
            "by_name": "Use: /api/assets/by-name/{name}",
            "by_model": "Use: /api/assets/by-model/{model_id}",
            "by_type": "Use: /api/assets/by-type/{asset_type}",
        },
        "browse": {
            "listing": "Use: /api/browse/{resource}?page=&page_size=&search=&ordering=",
            "resources": resources,
        },
        "sample_data": {
            "sample_farm_id": "SYS-1D3407DB-F-13083",
            "sample_asset_id": "SYS-1D3407DB-F-13083-A-06527",
        },
        "links": {
            "health": "/health",
            "admin": "/admin/records/{resource}",
            "export": "/admin/export",
        },
    }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.db.execute_unprepared("SELECT 1").await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "database": "ok" })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "degraded", "database": e.to_string() })),
            )
        }
    }
}

pub async fn farm_assets(
    Path(farm_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let repo = state.repo();
    let farm = repo
        .find_farm(&farm_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Farm not found"))?;

    let assets = repo.assets_by_farm(&farm.farm_id).await?;
    let mut asset_views = Vec::with_capacity(assets.len());
    for asset in &assets {
        asset_views.push(views::farm_asset(&repo, asset).await?);
    }

    let pdf_url = match farm.layout_pdf.as_deref() {
        Some(path) if state.storage.stored(path).is_some() => Some(format!("/media/{path}")),
        _ => state
            .storage
            .fallback(AttachmentKind::FarmLayout, &farm.farm_id)
            .map(|_| format!("/static/uploads/farm_layouts/{}.pdf", farm.farm_id)),
    };
    let location = match farm.location_id {
        Some(id) => repo.find_location(id).await?.map(|l| views::location_dict(&l)),
        None => None,
    };

    Ok(Json(json!({
        "farm_id": farm.farm_id,
        "farm_name": farm.name,
        "assets_count": asset_views.len(),
        "assets": asset_views,
        "farm_description": farm.description,
        "pdf_url": pdf_url,
        "location": location.unwrap_or_else(|| json!({})),
    })))
}

pub async fn asset_details(
    Path(asset_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Value>> {
    let repo = state.repo();
    let asset = repo
        .find_asset(&asset_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Asset not found"))?;
    Ok(Json(views::asset_detail(&repo, &asset).await?))
}

pub async fn assets_by_name(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Value>>> {
    let repo = state.repo();
    let assets = repo.assets_by_name(&name).await?;
    if assets.is_empty() {
        return Err(ApiError::not_found(format!("No assets named {name}")));
    }
    Ok(Json(views::asset_details(&repo, &assets).await?))
}

pub async fn assets_by_model(
    Path(model_id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Value>>> {
    let repo = state.repo();
    let assets = repo.assets_by_model_id(&model_id).await?;
    if assets.is_empty() {
        return Err(ApiError::not_found(format!(
            "No assets with model_id {model_id}"
        )));
    }
    Ok(Json(views::asset_details(&repo, &assets).await?))
}

/// A number is an asset type id; anything else matches type names.
pub async fn assets_by_type(
    Path(asset_type): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Value>>> {
    let repo = state.repo();
    let type_ids: Vec<i32> = match asset_type.trim().parse::<i32>() {
        Ok(id) => repo
            .find_asset_type(id)
            .await?
            .and_then(|t| t.id)
            .into_iter()
            .collect(),
        Err(_) => repo
            .search_asset_types(asset_type.trim())
            .await?
            .into_iter()
            .filter_map(|t| t.id)
            .collect(),
    };
    if type_ids.is_empty() {
        return Err(ApiError::not_found(format!(
            "Asset type not found: {asset_type}"
        )));
    }

    let assets = repo.assets_by_types(&type_ids).await?;
    Ok(Json(views::asset_details(&repo, &assets).await?))
}

pub(crate) fn resource(name: &str) -> ApiResult<Table> {
    name.parse::<Table>()
        .map_err(|_| ApiError::bad_request(format!("Unknown resource: {name}")))
}

pub async fn browse(
    Path(resource_name): Path<String>,
    Query(query): Query<BrowseQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<listing::BrowsePage>> {
    let table = resource(&resource_name)?;
    let page = listing::browse(&state.db, table, &query, state.config.browse.page_size).await?;
    Ok(Json(page))
}

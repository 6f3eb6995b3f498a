mod admin;
mod files;
mod inventory;
mod upload;

use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let media = ServeDir::new(&state.config.storage.media_root);
    let statics = ServeDir::new(&state.config.storage.static_root);
    let body_limit = DefaultBodyLimit::max(state.config.upload.max_bytes);

    Router::new()
        .route("/", get(inventory::api_root))
        .route("/health", get(inventory::health))
        .route("/farm/{farm_id}/assets", get(inventory::farm_assets))
        .route("/api/asset/{asset_id}", get(inventory::asset_details))
        .route("/api/assets/by-name/{name}", get(inventory::assets_by_name))
        .route("/api/assets/by-model/{model_id}", get(inventory::assets_by_model))
        .route("/api/assets/by-type/{asset_type}", get(inventory::assets_by_type))
        .route("/api/browse/{resource}", get(inventory::browse))
        .route("/api/asset-model/{asset_type}", get(files::asset_type_model))
        .route("/api/farm-model/{farm_id}", get(files::farm_model))
        .route(
            "/api/asset/{asset_id}/model",
            get(files::asset_model).post(files::upload_asset_model),
        )
        .route("/api/farm/{farm_id}/site-model", post(files::upload_farm_site_model))
        .route(
            "/api/farm/{farm_id}/layout",
            get(files::farm_layout).post(files::upload_farm_layout),
        )
        .route("/api/asset-types/{id}/models", post(files::upload_asset_type_model))
        .route(
            "/admin/records/{resource}",
            get(admin::list_records).post(admin::create_record),
        )
        .route(
            "/admin/records/{resource}/{id}",
            get(admin::get_record)
                .put(admin::update_record)
                .delete(admin::delete_record),
        )
        .route("/admin/upload-csv", post(admin::upload_assets_csv))
        .route("/admin/export", get(admin::export_archive))
        .route("/admin/import", post(admin::import_archive))
        .nest_service("/media", media)
        .nest_service("/static", statics)
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

//! JSON shapes returned by the read endpoints.

use domain::error::Result;
use domain::{Asset, AssetEvent, AssetType, Content, Farm, InventoryRepository, Location, Material};
use serde_json::{Value, json};

/// Rows an asset points at, loaded once per asset.
struct Related {
    asset_type: Option<AssetType>,
    location: Option<Location>,
    farm: Option<Farm>,
    material: Option<Material>,
    content: Option<Content>,
    events: Vec<AssetEvent>,
}

impl Related {
    async fn load(repo: &dyn InventoryRepository, asset: &Asset) -> Result<Self> {
        Ok(Self {
            asset_type: match asset.asset_type_id {
                Some(id) => repo.find_asset_type(id).await?,
                None => None,
            },
            location: match asset.location_id {
                Some(id) => repo.find_location(id).await?,
                None => None,
            },
            farm: match &asset.farm_id {
                Some(id) => repo.find_farm(id).await?,
                None => None,
            },
            material: match asset.material_id {
                Some(id) => repo.find_material(id).await?,
                None => None,
            },
            content: match asset.content_id {
                Some(id) => repo.find_content(id).await?,
                None => None,
            },
            events: repo.events_by_asset(&asset.asset_id).await?,
        })
    }

    fn type_json(&self) -> Value {
        self.asset_type.as_ref().map_or(Value::Null, |t| {
            json!({ "id": t.id, "name": t.name, "description": t.description })
        })
    }

    fn location_json(&self) -> Value {
        self.location.as_ref().map_or(Value::Null, |l| {
            json!({
                "id": l.location_id,
                "name": l.name,
                "address": l.address,
                "city": l.city,
                "country": l.country,
                "coordinates": { "latitude": l.latitude, "longitude": l.longitude },
            })
        })
    }

    fn specifications(&self, asset: &Asset) -> Value {
        json!({
            "capacity": asset.capacity,
            "current_volume": asset.current_volume,
            "diameter": asset.diameter,
            "height": asset.height,
            "material": self.material.as_ref().map(|m| &m.name),
            "content": self.content.as_ref().map(|c| &c.name),
        })
    }
}

fn dates(asset: &Asset) -> Value {
    json!({
        "installation": asset.installation_date,
        "manufactured": asset.manufactured_date,
        "commission": asset.commission_date,
        "decommission": asset.decommission_date,
        "created": asset.created_at,
    })
}

/// Location as stored, used for the farm itself.
pub fn location_dict(location: &Location) -> Value {
    json!({
        "id": location.location_id,
        "name": location.name,
        "address": location.address,
        "city": location.city,
        "country": location.country,
        "latitude": location.latitude,
        "longitude": location.longitude,
        "state": location.state,
    })
}

/// Asset entry of `/farm/{farm_id}/assets`.
pub async fn farm_asset(repo: &dyn InventoryRepository, asset: &Asset) -> Result<Value> {
    let related = Related::load(repo, asset).await?;
    let events: Vec<Value> = related
        .events
        .iter()
        .map(|e| {
            json!({
                "event_id": e.event_id,
                "title": e.title,
                "type_id": e.event_type_id,
                "start_date": e.start_date,
                "end_date": e.end_date,
                "event_status": e.event_status,
                "description": e.description,
                "performed_by": e.performed_by,
                "created_at": e.created_at,
                "cost": e.cost,
            })
        })
        .collect();

    Ok(json!({
        "asset_id": asset.asset_id,
        "name": asset.name,
        "latitude": asset.latitude,
        "longitude": asset.longitude,
        "description": asset.description,
        "status": asset.status,
        "type": related.type_json(),
        "location": related.location_json(),
        "dates": dates(asset),
        "specifications": related.specifications(asset),
        "events": events,
    }))
}

/// Full asset view of `/api/asset/{asset_id}` and the asset searches.
pub async fn asset_detail(repo: &dyn InventoryRepository, asset: &Asset) -> Result<Value> {
    let related = Related::load(repo, asset).await?;
    let events: Vec<Value> = related
        .events
        .iter()
        .map(|e| {
            json!({
                "id": e.event_id,
                "type_id": e.event_type_id,
                "status": e.event_status,
                "start_date": e.start_date,
                "end_date": e.end_date,
                "description": e.description,
                "performed_by": e.performed_by,
                "created_at": e.created_at,
            })
        })
        .collect();
    let farm = related
        .farm
        .as_ref()
        .map_or(Value::Null, |f| json!({ "id": f.farm_id, "name": f.name }));

    Ok(json!({
        "id": asset.asset_id,
        "name": asset.name,
        "latitude": asset.latitude,
        "longitude": asset.longitude,
        "health": asset.health,
        "type": related.type_json(),
        "description": asset.description,
        "status": asset.status,
        "model_id": asset.model_id,
        "farm": farm,
        "location": related.location_json(),
        "dates": dates(asset),
        "specifications": related.specifications(asset),
        "events": events,
        "related_assets": [],
    }))
}

pub async fn asset_details(repo: &dyn InventoryRepository, assets: &[Asset]) -> Result<Vec<Value>> {
    let mut views = Vec::with_capacity(assets.len());
    for asset in assets {
        views.push(asset_detail(repo, asset).await?);
    }
    Ok(views)
}

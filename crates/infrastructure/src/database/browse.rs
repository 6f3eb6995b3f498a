//! Generic paginated listings over the inventory tables.
//!
//! Rows are returned as JSON objects straight from the database so every
//! resource shares one code path: optional case-insensitive substring search
//! over a fixed set of text columns, ordering by any column name (prefix `-`
//! for descending), 1-based pages.

use crate::database::entities::{
    asset_events, asset_models, asset_types, assets, companies, contents, event_types, farms,
    locations, materials,
};
use crate::database::repository::{db_err, int_key};
use domain::{DomainError, Table};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    Condition, ConnectionTrait, EntityTrait, IdenStatic, JsonValue, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const MAX_PAGE_SIZE: u64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrowseQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub ordering: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub count: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
    pub results: Vec<JsonValue>,
}

pub async fn browse<C: ConnectionTrait>(
    db: &C,
    table: Table,
    query: &BrowseQuery,
    default_page_size: u64,
) -> Result<BrowsePage, DomainError> {
    let page_size = query
        .page_size
        .unwrap_or(default_page_size)
        .clamp(1, MAX_PAGE_SIZE);
    let page = page_number(query.page, page_size)?;
    let query = Listing {
        page,
        page_size,
        search: query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        ordering: query.ordering.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    };

    use asset_events::Column as Ev;
    use assets::Column as As;
    use companies::Column as Co;
    use farms::Column as Fa;
    use locations::Column as Lo;

    match table {
        Table::Companies => {
            list::<companies::Entity, _>(
                db,
                &[Co::CompanyId, Co::Name, Co::Industry],
                Co::CompanyId,
                &query,
            )
            .await
        }
        Table::Locations => {
            list::<locations::Entity, _>(
                db,
                &[Lo::Name, Lo::City, Lo::State, Lo::Country],
                Lo::LocationId,
                &query,
            )
            .await
        }
        Table::AssetTypes => {
            list::<asset_types::Entity, _>(
                db,
                &[
                    asset_types::Column::Name,
                    asset_types::Column::Code,
                    asset_types::Column::Description,
                ],
                asset_types::Column::Id,
                &query,
            )
            .await
        }
        Table::Materials => {
            list::<materials::Entity, _>(
                db,
                &[materials::Column::Name, materials::Column::Description],
                materials::Column::Id,
                &query,
            )
            .await
        }
        Table::Contents => {
            list::<contents::Entity, _>(
                db,
                &[contents::Column::Name, contents::Column::Description],
                contents::Column::Id,
                &query,
            )
            .await
        }
        Table::EventTypes => {
            list::<event_types::Entity, _>(
                db,
                &[event_types::Column::Name, event_types::Column::Description],
                event_types::Column::Id,
                &query,
            )
            .await
        }
        Table::Farms => {
            list::<farms::Entity, _>(
                db,
                &[Fa::FarmId, Fa::Name, Fa::CompanyId, Fa::Status],
                Fa::FarmId,
                &query,
            )
            .await
        }
        Table::Assets => {
            list::<assets::Entity, _>(
                db,
                &[As::AssetId, As::Name, As::ModelId, As::Status, As::CompanyId],
                As::AssetId,
                &query,
            )
            .await
        }
        Table::AssetEvents => {
            list::<asset_events::Entity, _>(
                db,
                &[Ev::EventId, Ev::Title, Ev::AssetId, Ev::EventStatus],
                Ev::EventId,
                &query,
            )
            .await
        }
        Table::AssetModels => {
            list::<asset_models::Entity, _>(
                db,
                &[asset_models::Column::Name, asset_models::Column::Description],
                asset_models::Column::Id,
                &query,
            )
            .await
        }
    }
}

/// One row as JSON, looked up by its primary key rendered as text.
pub async fn fetch_record<C: ConnectionTrait>(
    db: &C,
    table: Table,
    key: &str,
) -> Result<Option<JsonValue>, DomainError> {
    let record = match table {
        Table::Companies => {
            companies::Entity::find_by_id(key.to_string())
                .into_json()
                .one(db)
                .await
        }
        Table::Locations => {
            locations::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
        Table::AssetTypes => {
            asset_types::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
        Table::Materials => {
            materials::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
        Table::Contents => {
            contents::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
        Table::EventTypes => {
            event_types::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
        Table::Farms => farms::Entity::find_by_id(key.to_string()).into_json().one(db).await,
        Table::Assets => assets::Entity::find_by_id(key.to_string()).into_json().one(db).await,
        Table::AssetEvents => {
            asset_events::Entity::find_by_id(key.to_string())
                .into_json()
                .one(db)
                .await
        }
        Table::AssetModels => {
            asset_models::Entity::find_by_id(int_key(table, key)?)
                .into_json()
                .one(db)
                .await
        }
    }
    .map_err(db_err)?;

    Ok(record)
}

struct Listing<'q> {
    page: u64,
    page_size: u64,
    search: Option<&'q str>,
    ordering: Option<&'q str>,
}

async fn list<E, C>(
    db: &C,
    search_columns: &[E::Column],
    default_order: E::Column,
    query: &Listing<'_>,
) -> Result<BrowsePage, DomainError>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let mut select = E::find();

    if let Some(term) = query.search {
        let pattern = format!("%{}%", term.to_lowercase());
        let condition = search_columns
            .iter()
            .fold(Condition::any(), |condition, column| {
                condition.add(Expr::expr(Func::lower(Expr::col(*column))).like(pattern.as_str()))
            });
        select = select.filter(condition);
    }

    let (column, descending) = parse_ordering::<E>(query.ordering, default_order)?;
    select = if descending {
        select.order_by_desc(column)
    } else {
        select.order_by_asc(column)
    };
    if column.as_str() != default_order.as_str() {
        // Stable pages when the ordering column has duplicates
        select = select.order_by_asc(default_order);
    }

    let paginator = select.into_json().paginate(db, query.page_size);
    let totals = paginator.num_items_and_pages().await.map_err(db_err)?;
    let results = paginator.fetch_page(query.page - 1).await.map_err(db_err)?;

    Ok(BrowsePage {
        count: totals.number_of_items,
        page: query.page,
        page_size: query.page_size,
        total_pages: totals.number_of_pages,
        results,
    })
}

/// 1-based page, rejected when its row offset does not fit a SQL integer.
fn page_number(page: Option<u64>, page_size: u64) -> Result<u64, DomainError> {
    let page = page.unwrap_or(1).max(1);
    if page > i64::MAX as u64 / page_size {
        return Err(DomainError::InvalidQuery(format!("Page out of range: {page}")));
    }
    Ok(page)
}

fn parse_ordering<E: EntityTrait>(
    raw: Option<&str>,
    default_order: E::Column,
) -> Result<(E::Column, bool), DomainError> {
    let Some(raw) = raw else {
        return Ok((default_order, false));
    };
    let (name, descending) = match raw.strip_prefix('-') {
        Some(name) => (name, true),
        None => (raw, false),
    };
    let column = E::Column::from_str(name)
        .map_err(|_| DomainError::InvalidQuery(format!("Unknown ordering column: {name}")))?;
    Ok((column, descending))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ordering() {
        let (column, descending) =
            parse_ordering::<assets::Entity>(Some("-health"), assets::Column::AssetId).unwrap();
        assert_eq!(column.as_str(), "health");
        assert!(descending);

        let (column, descending) =
            parse_ordering::<assets::Entity>(None, assets::Column::AssetId).unwrap();
        assert_eq!(column.as_str(), "asset_id");
        assert!(!descending);

        let err = parse_ordering::<assets::Entity>(Some("colour"), assets::Column::AssetId)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuery(_)));
    }

    #[test]
    fn test_page_number_bounds() {
        assert_eq!(page_number(None, 20).unwrap(), 1);
        assert_eq!(page_number(Some(0), 20).unwrap(), 1);
        assert_eq!(page_number(Some(3), 20).unwrap(), 3);
        assert!(matches!(
            page_number(Some(u64::MAX), MAX_PAGE_SIZE),
            Err(DomainError::InvalidQuery(_))
        ));
        assert!(page_number(Some(i64::MAX as u64 / MAX_PAGE_SIZE), MAX_PAGE_SIZE).is_ok());
    }
}

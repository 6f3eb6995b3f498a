//! Identifier generation for the text-keyed tables.
//!
//! Rules:
//! - Company: `COMP-XXXXXXXX`
//! - Farm: `<company_id>-F-XXXXX`
//! - Asset: `<farm_id or company_id>-A-XXXXX`, `X` when neither is known
//! - Asset event: `<asset_id>-E-XXXXX`
//! - Random parts are upper-case hex taken from a v4 UUID
//! - Natural keys are non-empty and at most 200 characters

use crate::error::{DomainError, Result};
use uuid::Uuid;

pub const MAX_KEY_LEN: usize = 200;

fn unique_part(len: usize) -> String {
    let mut hex = Uuid::new_v4().simple().to_string();
    hex.truncate(len);
    hex.to_uppercase()
}

pub fn company_id() -> String {
    format!("COMP-{}", unique_part(8))
}

pub fn farm_id(company_id: &str) -> String {
    format!("{}-F-{}", company_id, unique_part(5))
}

pub fn asset_id(farm_id: Option<&str>, company_id: &str) -> String {
    let prefix = farm_id
        .filter(|id| !id.is_empty())
        .or(Some(company_id).filter(|id| !id.is_empty()))
        .unwrap_or("X");
    format!("{}-A-{}", prefix, unique_part(5))
}

pub fn event_id(asset_id: &str) -> String {
    format!("{}-E-{}", asset_id, unique_part(5))
}

/// Health score for assets created without one, uniform over 0..=100.
pub fn random_health() -> i32 {
    (Uuid::new_v4().as_u128() % 101) as i32
}

/// Validate a natural key read from an external source.
pub fn require_key(table: &'static str, raw: &str) -> Result<String> {
    let key = raw.trim();
    if key.is_empty() {
        return Err(DomainError::invalid_record(table, "empty primary key"));
    }
    if key.len() > MAX_KEY_LEN {
        return Err(DomainError::invalid_record(
            table,
            format!("primary key too long: {} chars (max {MAX_KEY_LEN})", key.len()),
        ));
    }
    Ok(key.to_string())
}

pub mod browse;
pub mod entities;
pub mod repository;

pub use browse::{BrowsePage, BrowseQuery};
pub use repository::SeaOrmInventoryRepository;

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// Open a pooled connection. SQLite URLs get a single connection.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);
    if database_url.starts_with("sqlite:") {
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options)
        .await
        .with_context(|| format!("Failed to connect to database {}", redact(database_url)))?;
    info!("Connected to database {}", redact(database_url));
    Ok(db)
}

/// Apply every pending migration.
pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
    Migrator::up(db, None)
        .await
        .context("Failed to apply migrations")?;
    info!("Database schema is up to date");
    Ok(())
}

pub async fn connect_and_migrate(database_url: &str) -> Result<DatabaseConnection> {
    let db = connect(database_url).await?;
    migrate(&db).await?;
    Ok(db)
}

/// Hide the password part of a connection URL for logs.
pub fn redact(database_url: &str) -> String {
    match (database_url.find("://"), database_url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            let credentials = &database_url[scheme_end + 3..at];
            match credentials.split_once(':') {
                Some((user, _)) => format!(
                    "{}{}:***{}",
                    &database_url[..scheme_end + 3],
                    user,
                    &database_url[at..]
                ),
                None => database_url.to_string(),
            }
        }
        _ => database_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_hides_password() {
        assert_eq!(
            redact("postgres://tanks:s3cret@db:5432/tanks"),
            "postgres://tanks:***@db:5432/tanks"
        );
        assert_eq!(redact("sqlite::memory:"), "sqlite::memory:");
        assert_eq!(redact("postgres://tanks@db/tanks"), "postgres://tanks@db/tanks");
    }
}

use application::TransferService;
use infrastructure::{MediaStorage, SeaOrmInventoryRepository, ServerConfig};
use sea_orm::DatabaseConnection;

pub struct AppState {
    pub db: DatabaseConnection,
    pub config: ServerConfig,
    pub storage: MediaStorage,
    pub transfer: TransferService,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: ServerConfig) -> Self {
        let storage = MediaStorage::new(
            config.storage.media_root.clone(),
            config.storage.static_root.clone(),
        );
        Self {
            transfer: TransferService::new(db.clone()),
            db,
            config,
            storage,
        }
    }

    pub fn repo(&self) -> SeaOrmInventoryRepository<'_, DatabaseConnection> {
        SeaOrmInventoryRepository::new(&self.db)
    }
}

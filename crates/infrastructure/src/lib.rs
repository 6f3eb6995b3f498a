//! Infrastructure layer - Database, files and configuration

pub mod archive;
pub mod config;
pub mod csv_codec;
pub mod database;
pub mod legacy;
pub mod storage;

pub use config::ServerConfig;
pub use csv_codec::CsvDirectory;
pub use database::SeaOrmInventoryRepository;
pub use legacy::LegacyDatabase;
pub use storage::MediaStorage;

pub mod connection;
pub mod entities;
pub mod repositories;
pub mod storage;

pub use repositories::StateRepository;
pub use storage::{GameStorage, MemoryStateStorage, StateStorage};

use migration::{Migrator, MigratorTrait};
use sea_orm::{DatabaseConnection, DbErr};
use tracing::info;

pub struct DatabaseManager {
    connection: DatabaseConnection,
}

impl DatabaseManager {
    /// Open the database and bring its schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self, DbErr> {
        let connection = connection::connect_to_database(database_url).await?;
        Migrator::up(&connection, None).await?;
        info!("Database ready at {}", database_url);
        Ok(Self { connection })
    }

    pub fn get_connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    pub fn state_repository(&self) -> StateRepository {
        StateRepository::new(self.connection.clone())
    }
}

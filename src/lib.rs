pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use sea_orm::DatabaseConnection;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Shared per-request state. The connection sits behind an `Arc` because
/// `DatabaseConnection` itself is not cloneable under every backend.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: Config,
}

#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::*;

    #[test]
    fn test_app_state_clones_with_a_mock_connection() {
        let state = AppState {
            db: Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection()),
            config: Config {
                database_url: "postgres://localhost/test".to_string(),
                jwt_secret: "secret".to_string(),
                jwt_expiration_hours: 24,
                server_host: "127.0.0.1".to_string(),
                server_port: 3000,
                release_seat_on_cancel: false,
            },
        };

        let copy = state.clone();
        assert_eq!(copy.config.server_port, 3000);
    }
}

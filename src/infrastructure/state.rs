//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, CopyRepository, UserRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmCopyRepository, SeaOrmUserRepository};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection, handed explicitly to the lending services
    db: DatabaseConnection,
    /// User repository
    pub user_repo: Arc<dyn UserRepository>,
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Copy repository
    pub copy_repo: Arc<dyn CopyRepository>,
    /// Whether lifecycle calls must name the acting user
    pub require_actor: bool,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_config(db, &Config::default())
    }

    pub fn with_config(db: DatabaseConnection, config: &Config) -> Self {
        let user_repo = Arc::new(SeaOrmUserRepository::new(db.clone()));
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let copy_repo = Arc::new(SeaOrmCopyRepository::new(db.clone()));

        Self {
            db,
            user_repo,
            book_repo,
            copy_repo,
            require_actor: config.require_actor,
        }
    }

    /// Get the database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

// Implement FromRef to allow extracting DatabaseConnection from AppState
impl axum::extract::FromRef<AppState> for DatabaseConnection {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

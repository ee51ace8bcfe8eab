//! Account service for registering users, checking credentials and
//! tracking login sessions

pub mod service;
pub mod repository;
pub mod session;
pub mod password;
pub mod config;

pub use service::AccountService;
pub use service::RepositoryType;
pub use repository::{UserRepository, InMemoryUserRepository, SqliteUserRepository};
pub use session::{SessionStore, InMemorySessionStore, SqliteSessionStore};
pub use config::AccountServiceConfig;

//! Movies API: CRUD over movies, directors and genres on SQLite.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod migration;
pub mod response;
pub mod routes;
pub mod schema;
pub mod service;
pub mod sql;
pub mod state;
pub mod store;

pub use config::{resolve, FullConfig, ResolvedEntity, ResolvedModel, ServerConfig};
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use routes::{app, common_routes, entity_routes};
pub use schema::EntitySchema;
pub use service::CrudService;
pub use state::AppState;
pub use store::{connect, connect_options, connect_with};

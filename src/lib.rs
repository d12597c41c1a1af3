//! Coral: REST backend for an expert marketplace. Integrations, their members
//! (experts included) and payment transactions, stored in MySQL.

pub mod access;
pub mod case;
pub mod config;
pub mod dao;
pub mod delegate;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;
pub mod utils;
pub mod validation;

pub use access::{AccessControl, AccessRule, AllowAll, HeaderRoleAccess};
pub use config::Config;
pub use error::{AppError, ConfigError};
pub use routes::{app, common_routes, expert_routes, integration_routes, transaction_routes};
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_tables};

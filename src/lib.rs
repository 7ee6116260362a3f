//! tooldb: a searchable, voteable directory of developer tools.
//!
//! The server half serves the JSON API over PostgreSQL (or an in-memory store);
//! the client half models the search table that consumes it.

pub mod client;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod search;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;
pub mod view;

pub use client::{ApiClient, ClientError, TableSession};
pub use error::{AppError, ConfigError};
pub use models::{Category, Tool, ToolCategory, VoteOutcome, Voter};
pub use pagination::{page_count, Page, PAGE_SIZE};
pub use response::{CategoryBody, EntriesBody};
pub use routes::{api_routes, app, common_routes};
pub use settings::Settings;
pub use state::AppState;
pub use store::{ensure_database_exists, ensure_schema, MemoryStore, NewTool, PgToolStore, ToolStore};
pub use view::EntriesView;

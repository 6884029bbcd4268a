//! Web TODO list: a route table of actix-web handlers over a single SQLite
//! table, rendered with askama templates.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod templates;

pub use db::TodoStore;
pub use error::AppError;
pub use model::Todo;

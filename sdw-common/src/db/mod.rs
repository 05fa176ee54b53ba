//! Database connections, schema and row models

pub mod init;
pub mod models;
pub mod schema;

pub use init::*;
pub use models::*;
pub use schema::*;

pub mod context;
pub mod dialect;
pub mod env;
pub mod error;
pub mod init;
pub mod schema;
pub mod sql_value;
pub mod state;

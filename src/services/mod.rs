pub mod billing;
pub mod database;

pub use database::Database;

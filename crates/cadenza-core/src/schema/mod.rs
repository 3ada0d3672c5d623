pub mod db;
pub mod migrations;
pub mod query;

pub use db::Database;
pub use query::CompositionPredicate;

pub mod composer;
pub mod composition;
pub mod config;
pub mod serve;
pub mod status;

pub use serve::run_server;
pub use status::show_status;

use anyhow::{Context, Result};
use std::path::Path;

use cadenza_core::schema::Database;
use cadenza_core::Catalog;

/// Open the catalog at `db_path`, creating its directory on first use.
pub fn open_catalog(db_path: &Path) -> Result<Catalog> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }
    let db = Database::open(db_path)
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;
    Ok(Catalog::new(db))
}

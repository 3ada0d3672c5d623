use anyhow::Result;
use std::path::Path;

use super::open_catalog;

pub fn show_status(db_path: &Path) -> Result<()> {
    let catalog = open_catalog(db_path)?;
    let db = catalog.database();

    let composers = db.count_composers()?;
    let compositions = db.count_compositions()?;

    println!("\n📊 Cadenza Status\n");
    println!("  Database: {}", db_path.display());
    println!("  Composers: {composers}");
    println!("  Compositions: {compositions}");

    if compositions == 0 {
        println!("\n  Run `cadenza composition add` to catalog a work");
    }

    Ok(())
}

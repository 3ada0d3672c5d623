use anyhow::Result;

use cadenza_core::model::ComposerId;
use cadenza_core::Catalog;

pub fn list(catalog: &Catalog) -> Result<()> {
    let composers = catalog.list_composers()?;

    if composers.is_empty() {
        println!("No composers in the catalog.");
        return Ok(());
    }

    for composer in &composers {
        println!("{}  {}", composer.id, composer.name);
    }
    println!("\n{} composer(s)", composers.len());

    Ok(())
}

pub fn remove(catalog: &Catalog, id: ComposerId) -> Result<()> {
    if catalog.delete_composer(id)? {
        println!("✓ Removed composer {id} and its compositions");
        Ok(())
    } else {
        anyhow::bail!("Composer not found: {id}")
    }
}

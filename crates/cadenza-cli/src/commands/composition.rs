use anyhow::Result;

use cadenza_core::model::{Composition, CompositionFilter, CompositionId, CompositionRequest};
use cadenza_core::registry::display_name_of;
use cadenza_core::Catalog;
use cadenza_server::api::types::CompositionResponse;

pub fn add(catalog: &Catalog, request: &CompositionRequest) -> Result<()> {
    let composition = catalog.create_composition(request)?;
    println!("✓ Added composition {}", composition.id);
    print_composition(&composition);
    Ok(())
}

pub fn edit(catalog: &Catalog, id: CompositionId, request: &CompositionRequest) -> Result<()> {
    let composition = catalog.update_composition(id, request)?;
    println!("✓ Updated composition {}", composition.id);
    print_composition(&composition);
    Ok(())
}

pub fn remove(catalog: &Catalog, id: CompositionId) -> Result<()> {
    if catalog.delete_composition(id)? {
        println!("✓ Removed composition {id}");
        Ok(())
    } else {
        anyhow::bail!("Composition not found: {id}")
    }
}

pub fn show(catalog: &Catalog, id: CompositionId, json: bool) -> Result<()> {
    let Some(composition) = catalog.get_composition(id)? else {
        anyhow::bail!("Composition not found: {id}");
    };

    if json {
        let response = CompositionResponse::from(&composition);
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        print_composition(&composition);
    }
    Ok(())
}

pub fn list(catalog: &Catalog, filter: &CompositionFilter, json: bool) -> Result<()> {
    let compositions = catalog.list_compositions(filter)?;

    if json {
        let responses: Vec<CompositionResponse> =
            compositions.iter().map(CompositionResponse::from).collect();
        println!("{}", serde_json::to_string_pretty(&responses)?);
        return Ok(());
    }

    if compositions.is_empty() {
        println!("No compositions match.");
        return Ok(());
    }

    for composition in &compositions {
        println!(
            "{}  {} in {} ({}, {} mvt) by {}",
            composition.id,
            composition.name,
            display_name_of(composition.key_signature),
            display_name_of(composition.format),
            composition.movements,
            composition.composer.name,
        );
    }
    println!("\n{} composition(s)", compositions.len());

    Ok(())
}

fn print_composition(composition: &Composition) {
    println!("  Name:      {}", composition.name);
    println!("  Key:       {}", display_name_of(composition.key_signature));
    println!("  Format:    {}", display_name_of(composition.format));
    println!("  Movements: {}", composition.movements);
    println!(
        "  Composer:  {} ({})",
        composition.composer.name, composition.composer.id
    );
}

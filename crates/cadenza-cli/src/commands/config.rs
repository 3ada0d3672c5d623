use anyhow::{Context, Result};
use toml_edit::{value, DocumentMut};

use cadenza_server::{config, Config};

const VALID_KEYS: &str = "database_path, listen_addr";

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;
    let config_path = config::config_file_path();

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config_path.display());
    let exists = config_path.exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  listen_addr: {}", config.listen_addr);

    println!("\nPriority: CLI args > ENV vars (CADENZA_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or the whole file when no key is given.
pub fn get_config(key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();
        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{contents}");
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'cadenza config init' to create it.");
        }
        return Ok(());
    };

    let config = Config::load()?;
    match key.as_str() {
        "database_path" => println!("{}", config.database_path.display()),
        "listen_addr" => println!("{}", config.listen_addr),
        _ => anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}"),
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file intact.
pub fn set_config(key: &str, new_value: &str) -> Result<()> {
    if !matches!(key, "database_path" | "listen_addr") {
        anyhow::bail!("Unknown config key: {key}\n\nValid keys: {VALID_KEYS}");
    }

    let config_path = config::config_file_path();
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, new_value)?;
    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {key} = {new_value}");
    println!("  in {}", config_path.display());

    Ok(())
}

fn set_value(contents: &str, key: &str, new_value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Config file is not valid TOML")?;
    doc[key] = value(new_value);
    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure cadenza.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_replaces_existing_key() {
        let updated = set_value(config::example_config(), "listen_addr", "0.0.0.0:9000").unwrap();
        assert!(updated.contains("listen_addr = \"0.0.0.0:9000\""));
        assert!(!updated.contains("listen_addr = \"127.0.0.1:5080\""));
        assert!(updated.starts_with("# Cadenza Configuration File"));
    }

    #[test]
    fn test_set_value_adds_missing_key() {
        let updated = set_value("", "database_path", "/tmp/cadenza.db").unwrap();
        assert_eq!(updated.trim(), "database_path = \"/tmp/cadenza.db\"");
    }

    #[test]
    fn test_set_value_rejects_invalid_toml() {
        assert!(set_value("not = [valid", "listen_addr", "x").is_err());
    }
}

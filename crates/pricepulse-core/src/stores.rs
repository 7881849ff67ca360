use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A retailer listed in the partner store directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerStore {
    pub name: String,
    /// Accent colour as `#rrggbb`.
    pub color: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoresFile {
    pub stores: Vec<PartnerStore>,
}

impl StoresFile {
    /// The six retailers the catalog tracks, used when no stores file exists.
    #[must_use]
    pub fn builtin() -> Self {
        let store = |name: &str, color: &str, description: &str| PartnerStore {
            name: name.to_string(),
            color: color.to_string(),
            description: description.to_string(),
        };
        Self {
            stores: vec![
                store(
                    "Jalal Sons",
                    "#bf1e2e",
                    "Premium quality groceries across Lahore.",
                ),
                store("Metro Pakistan", "#003a70", "Wholesale prices for everyone."),
                store("Al-Fatah", "#81bc06", "Premium shopping experience."),
                store(
                    "GrocerApp",
                    "#f48020",
                    "Fresh groceries delivered to your doorstep.",
                ),
                store(
                    "Rahim Store",
                    "#059669",
                    "Reliable grocery shopping since decades.",
                ),
                store("Green Valley", "#0d9488", "Hypermarket with global standards."),
            ],
        }
    }
}

/// Load and validate the partner store directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_stores(path: &Path) -> Result<StoresFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::StoresFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let stores_file: StoresFile = serde_yaml::from_str(&content)?;

    validate_stores(&stores_file)?;

    Ok(stores_file)
}

fn validate_stores(stores_file: &StoresFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for store in &stores_file.stores {
        if store.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "store name must be non-empty".to_string(),
            ));
        }

        if !is_hex_color(&store.color) {
            return Err(ConfigError::Validation(format!(
                "store '{}' has invalid color '{}'; expected #rrggbb",
                store.name, store.color
            )));
        }

        if !seen_names.insert(store.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate store name: '{}'",
                store.name
            )));
        }
    }

    Ok(())
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use runway_core::{Group, Taxonomy};
use serde::{Deserialize, Serialize};

/// External inputs the core does not own: the CAC customer count and
/// user-defined category extensions. Loaded from TOML; a missing file is
/// just the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// New customers acquired over the reporting period.
    #[serde(default)]
    pub customers: u32,

    /// User-defined categories, e.g.
    /// `[[categories]] name = "Equipment" group = "opex"`.
    #[serde(default)]
    pub categories: Vec<CustomCategory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCategory {
    pub name: String,
    pub group: Group,
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Build the session taxonomy from the built-ins plus the config's
/// extensions. Duplicate or blank names are configuration errors.
pub fn build_taxonomy(config: &Config) -> Result<Taxonomy> {
    let mut taxonomy = Taxonomy::new();
    for category in &config.categories {
        taxonomy
            .add_custom(&category.name, category.group)
            .with_context(|| format!("custom category {:?}", category.name))?;
    }
    Ok(taxonomy)
}

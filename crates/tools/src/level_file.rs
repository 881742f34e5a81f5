use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungen::LevelConfig;
use serde::{Deserialize, Serialize};

/// TOML level description: an optional run seed plus a `[level]` table
/// tagged by `algorithm`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LevelFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub level: LevelConfig,
}

impl LevelFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read level file: {}", path.display()))?;
        let file: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse level file: {}", path.display()))?;
        file.level
            .validate()
            .with_context(|| format!("Invalid level configuration in {}", path.display()))?;
        Ok(file)
    }

    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        let content = toml::to_string_pretty(self).context("Failed to encode level file")?;

        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, path)
            .with_context(|| format!("Failed to write level file: {}", path.display()))?;
        Ok(())
    }
}

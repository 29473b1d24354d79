//! CLI Configuration

use anyhow::{anyhow, Context, Result};
use form_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    pub store_dir: Option<PathBuf>,
    pub default_format: Option<String>,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    pub fn load(profile: Option<&str>) -> Result<Self> {
        let path = Self::config_path(profile)?;
        if path.exists() {
            let content = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, profile: Option<&str>) -> Result<PathBuf> {
        let path = Self::config_path(profile)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(path)
    }

    /// Directory of the template store, `~/.formctl/templates` unless configured
    pub fn store_dir(&self) -> Result<PathBuf> {
        match &self.store_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::base_dir()?.join("templates")),
        }
    }

    fn config_path(profile: Option<&str>) -> Result<PathBuf> {
        let filename = match profile {
            Some(p) => format!("config.{}.toml", p),
            None => "config.toml".to_string(),
        };
        Ok(Self::base_dir()?.join(filename))
    }

    fn base_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| anyhow!("cannot find home directory"))?;
        Ok(home.join(".formctl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use form_engine::FieldWidth;

    #[test]
    fn test_engine_table() {
        let config: Config = toml::from_str(
            r#"
            store_dir = "/var/lib/forms"

            [engine]
            copy_suffix = " - copy"
            default_width = 50
            "#,
        )
        .unwrap();
        assert_eq!(config.store_dir, Some(PathBuf::from("/var/lib/forms")));
        assert_eq!(config.engine.copy_suffix, " - copy");
        assert_eq!(config.engine.default_width, FieldWidth::Half);
    }
}

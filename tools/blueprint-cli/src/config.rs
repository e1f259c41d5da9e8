//! blueprint.toml configuration
//!
//! Every section is optional. A missing file means built-in defaults.
//!
//! ```toml
//! [format]
//! payload_tag = "blPt"
//! max_chunk_len = 1048576
//!
//! [service]
//! url = "http://localhost:8080/parse"
//! timeout_secs = 120
//!
//! [limits]
//! max_input_bytes = 33554432
//!
//! [catalog]
//! path = "items.json"
//! ```

use anyhow::{Context, Result};
use blueprint_shared::{BLUEPRINT_FORMAT, BlueprintFormat, ItemCatalog};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working and config directories
pub const CONFIG_FILE: &str = "blueprint.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub format: FormatSection,
    #[serde(default)]
    pub service: ServiceSection,
    #[serde(default)]
    pub limits: LimitsSection,
    #[serde(default)]
    pub catalog: CatalogSection,

    /// Directory of the loaded file, for resolving relative paths
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Overrides for the container format. Unset fields keep the standard values.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormatSection {
    pub payload_tag: Option<String>,
    pub max_chunk_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSection {
    pub url: Option<String>,
    /// Whole-parse timeout; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitsSection {
    /// Inputs larger than this are rejected before scanning
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

fn default_max_input_bytes() -> u64 {
    32 * 1024 * 1024
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSection {
    /// JSON item catalog (class name -> display name and category)
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load from an explicit path, or the first of `./blueprint.toml` and the
    /// user config directory that exists.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidates = [Some(PathBuf::from(CONFIG_FILE)), user_config_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Self::load(&path);
            }
        }

        tracing::debug!("No {CONFIG_FILE} found, using defaults");
        Ok(Self::default())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let mut config = Self::parse(&content)
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse blueprint.toml")
    }

    /// Standard format with this file's overrides applied
    pub fn format(&self) -> Result<BlueprintFormat> {
        let mut format = BLUEPRINT_FORMAT;
        if let Some(tag) = &self.format.payload_tag {
            format.payload_tag = tag
                .as_bytes()
                .try_into()
                .map_err(|_| anyhow::anyhow!("payload_tag {tag:?} must be exactly 4 characters"))?;
        }
        if let Some(limit) = self.format.max_chunk_len {
            format.max_chunk_len = limit;
        }
        format.validate()?;
        Ok(format)
    }

    /// Load the configured item catalog, or an empty one
    pub fn catalog(&self) -> Result<ItemCatalog> {
        let Some(path) = &self.catalog.path else {
            return Ok(ItemCatalog::new());
        };
        let path = self.resolve(path);
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read item catalog: {}", path.display()))?;
        let catalog = ItemCatalog::from_json(&json)
            .with_context(|| format!("Invalid item catalog: {}", path.display()))?;
        tracing::debug!(entries = catalog.len(), "Loaded item catalog");
        Ok(catalog)
    }

    /// Parsing service URL, from `--url` or the config file
    pub fn service_url(&self, override_url: Option<&str>) -> Result<String> {
        override_url
            .map(str::to_string)
            .or_else(|| self.service.url.clone())
            .context("No parsing service URL: pass --url or set [service] url in blueprint.toml")
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// `blueprint.toml` in the platform config directory
fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.blueprint", "", "Blueprint")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Read an input file, refusing anything over `max_bytes`.
pub fn read_input(path: &Path, max_bytes: u64) -> Result<Vec<u8>> {
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .len();
    if size > max_bytes {
        anyhow::bail!(
            "{} is {} bytes, over the {} byte limit (see [limits] max_input_bytes)",
            path.display(),
            size,
            max_bytes
        );
    }
    std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_shared::ItemCategory;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.format().unwrap(), BLUEPRINT_FORMAT);
        assert_eq!(config.service.timeout_secs, 120);
        assert_eq!(config.limits.max_input_bytes, 32 * 1024 * 1024);
        assert!(config.catalog().unwrap().is_empty());
    }

    #[test]
    fn test_format_overrides() {
        let config = Config::parse(
            r#"
[format]
payload_tag = "abCd"
max_chunk_len = 4096
"#,
        )
        .unwrap();
        let format = config.format().unwrap();
        assert_eq!(&format.payload_tag, b"abCd");
        assert_eq!(format.max_chunk_len, 4096);
        assert_eq!(format.preview_suffix, BLUEPRINT_FORMAT.preview_suffix);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let config = Config::parse("[format]\npayload_tag = \"toolong\"\n").unwrap();
        assert!(config.format().is_err());

        let config = Config::parse("[format]\npayload_tag = \"ab1d\"\n").unwrap();
        assert!(config.format().is_err());

        let config = Config::parse("[format]\nmax_chunk_len = 0\n").unwrap();
        assert!(config.format().is_err());

        let config = Config::parse("[format]\npayload_tag = \"IDAT\"\n").unwrap();
        assert!(config.format().is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(Config::parse("[service]\nadress = \"x\"\n").is_err());
    }

    #[test]
    fn test_service_url_precedence() {
        let config = Config::parse("[service]\nurl = \"http://a/parse\"\n").unwrap();
        assert_eq!(config.service_url(None).unwrap(), "http://a/parse");
        assert_eq!(config.service_url(Some("http://b/parse")).unwrap(), "http://b/parse");
        assert!(Config::default().service_url(None).is_err());
    }

    #[test]
    fn test_catalog_path_relative_to_config() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("items.json"),
            r#"{"Desc_IronPlate_C": {"name": "Iron Plate", "category": "material"}}"#,
        )
        .unwrap();
        let config_path = dir.path().join(CONFIG_FILE);
        std::fs::write(&config_path, "[catalog]\npath = \"items.json\"\n").unwrap();

        let config = Config::discover(Some(&config_path)).unwrap();
        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.display_name("Desc_IronPlate_C"), "Iron Plate");
        assert_eq!(catalog.category("Desc_IronPlate_C"), ItemCategory::Material);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(Config::discover(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_read_input_limit() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();

        assert_eq!(read_input(&path, 64).unwrap().len(), 64);
        assert!(read_input(&path, 63).is_err());
    }
}

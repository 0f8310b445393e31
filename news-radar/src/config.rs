use crate::processing::DEFAULT_TRUSTED_PREFIXES;
use crate::types::{FetchConfig, RadarError, Result, SourceSpec, DIGEST_ITEM_LIMIT};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";
pub const DEFAULT_SUBJECT: &str = "Radar da Reforma Tributária";

/// The run configuration document.
#[derive(Debug, Clone, Deserialize)]
pub struct RadarConfig {
    pub keywords: Vec<String>,
    pub feeds: Vec<SourceSpec>,
    #[serde(default)]
    pub listings: Vec<SourceSpec>,
    /// Replaces the built-in list of trusted source prefixes when present.
    #[serde(default)]
    pub trusted_sources: Option<Vec<String>>,
    #[serde(default)]
    pub digest: DigestSettings,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DigestSettings {
    pub subject: String,
    pub max_items: usize,
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            subject: DEFAULT_SUBJECT.to_string(),
            max_items: DIGEST_ITEM_LIMIT,
        }
    }
}

impl RadarConfig {
    /// Load and validate a YAML configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RadarError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: RadarConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(RadarError::Config("at least one keyword is required".to_string()));
        }

        for spec in self.feeds.iter().chain(self.listings.iter()) {
            if spec.name.trim().is_empty() || spec.url.trim().is_empty() {
                return Err(RadarError::Config(format!(
                    "source entries need a name and a url (got name='{}', url='{}')",
                    spec.name, spec.url
                )));
            }
        }

        if self.digest.max_items == 0 {
            return Err(RadarError::Config("digest.max_items must be positive".to_string()));
        }

        Ok(())
    }

    pub fn trusted_prefixes(&self) -> Vec<String> {
        match &self.trusted_sources {
            Some(list) => list.clone(),
            None => DEFAULT_TRUSTED_PREFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

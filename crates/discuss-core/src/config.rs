//! Configuration management for discuss

use crate::error::{DiscussError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Default maximum comment depth below the root resource
pub const DEFAULT_MAX_DEPTH: u32 = 3;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Thread shape and body limits
    pub threads: ThreadConfig,
    /// Markup allow-lists
    pub sanitizer: SanitizerConfig,
    /// Rendering pipeline settings
    pub formatting: FormatConfig,
    /// Persistence settings
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Parse a TOML document
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| DiscussError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("Failed to load {}", path.display())))
    }

    /// Render as pretty TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| DiscussError::Toml(e.to_string()))
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.threads.min_body_length > self.threads.max_body_length {
            return Err(DiscussError::Config(format!(
                "min_body_length ({}) exceeds max_body_length ({})",
                self.threads.min_body_length, self.threads.max_body_length
            )));
        }

        let tag = &self.formatting.container_tag;
        if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DiscussError::Config(format!(
                "container_tag must be a plain tag name, got '{}'",
                tag
            )));
        }

        let formatting = &self.formatting;
        for (field, value) in [
            ("quote_class", &formatting.quote_class),
            ("link.target", &formatting.link.target),
            ("link.rel", &formatting.link.rel),
        ] {
            if !is_token_list(value) {
                return Err(DiscussError::Config(format!(
                    "{} must be space separated words of letters, digits, '-' or '_', got '{}'",
                    field, value
                )));
            }
        }

        let mut seen = HashSet::new();
        for kind in &self.formatting.processors {
            if !seen.insert(kind) {
                return Err(DiscussError::Config(format!(
                    "processor '{}' is listed more than once",
                    kind.name()
                )));
            }
        }

        Ok(())
    }
}

/// Attribute values copied into rendered markup
fn is_token_list(value: &str) -> bool {
    value.split(' ').all(|token| {
        !token.is_empty()
            && token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    })
}

/// Thread-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadConfig {
    /// Deepest depth that still accepts replies
    pub max_depth: u32,
    /// Maximum body length in characters
    pub max_body_length: usize,
    /// Minimum body length in characters (after trimming)
    pub min_body_length: usize,
}

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_body_length: 1000,
            min_body_length: 1,
        }
    }
}

/// Sanitizer allow-lists
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SanitizerConfig {
    /// Tags kept in user input
    pub allowed_tags: Vec<String>,
    /// Attributes kept on allowed tags
    pub allowed_attributes: Vec<String>,
}

impl Default for SanitizerConfig {
    fn default() -> Self {
        Self {
            allowed_tags: vec![
                "em".to_string(),
                "strong".to_string(),
                "code".to_string(),
                "br".to_string(),
            ],
            allowed_attributes: vec!["title".to_string()],
        }
    }
}

/// Rendering pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Element wrapping the whole rendered body
    pub container_tag: String,
    /// CSS class of rendered quote blocks
    pub quote_class: String,
    /// Built-in processors, applied in this order
    pub processors: Vec<ProcessorKind>,
    /// Link processor settings
    pub link: LinkConfig,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            container_tag: "div".to_string(),
            quote_class: "comment__quote".to_string(),
            processors: vec![ProcessorKind::Link],
            link: LinkConfig::default(),
        }
    }
}

/// Built-in content processors selectable from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessorKind {
    /// Bare URLs to anchors
    Link,
}

impl ProcessorKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProcessorKind::Link => "link",
        }
    }
}

/// Link processor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Anchor target attribute
    pub target: String,
    /// Anchor rel attribute
    pub rel: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            target: "_blank".to_string(),
            rel: "nofollow noopener".to_string(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory; a platform default is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

//! Settings and service wiring shared by the commands

use anyhow::{Context, Result};
use discuss_core::capability::{Commentable, CommentableResolver, NoModeration, StaticResource};
use discuss_core::comment::CommentTree;
use discuss_core::config::EngineConfig;
use discuss_core::format::CommentFormatter;
use discuss_core::notify::NotificationRecipients;
use discuss_core::store::CommentStore;
use discuss_core::types::ResourceRef;
use discuss_core::vote::VoteLedger;
use discuss_storage::FileSystemStore;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Engine configuration plus the CLI-only `[cli]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(flatten)]
    pub engine: EngineConfig,
    pub cli: CliSettings,
}

/// How the CLI stands in for a host application
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// Prefix of resource URLs
    pub base_url: String,
    /// Resource kinds that accept comments
    pub commentable_kinds: BTreeSet<String>,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost".to_string(),
            commentable_kinds: BTreeSet::from(["resource".to_string()]),
        }
    }
}

impl Settings {
    /// Load from an explicit path, else the user config file if present,
    /// else defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            debug!("No configuration file, using defaults");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        debug!("Loaded configuration from {:?}", path);
        Ok(settings)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let settings: Self = toml::from_str(s)?;
        settings.engine.validate()?;
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn formatter(&self) -> CommentFormatter {
        CommentFormatter::from_config(&self.engine)
    }

    /// Resolve the data directory: flag, then config, then platform default
    pub fn data_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.engine.storage.data_dir.clone())
            .unwrap_or_else(FileSystemStore::default_dir)
    }

    /// Open the store and wire up the services
    pub fn open(&self, data_dir: Option<PathBuf>) -> Result<Services> {
        let dir = self.data_dir(data_dir);
        let store: Arc<dyn CommentStore> = Arc::new(
            FileSystemStore::new(&dir)
                .with_context(|| format!("Failed to open data directory {}", dir.display()))?,
        );
        let tree = Arc::new(CommentTree::new(
            Arc::clone(&store),
            Arc::new(KindResolver::new(&self.cli)),
            Arc::new(NoModeration),
            &self.engine.threads,
        ));

        Ok(Services {
            ledger: VoteLedger::new(store),
            recipients: NotificationRecipients::new(Arc::clone(&tree)),
            tree,
            formatter: self.formatter(),
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "discuss", "discuss")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Everything a command needs to work on stored threads
pub struct Services {
    pub tree: Arc<CommentTree>,
    pub ledger: VoteLedger,
    pub recipients: NotificationRecipients,
    pub formatter: CommentFormatter,
}

/// Treats every resource of a configured kind as existing and open
pub struct KindResolver {
    kinds: BTreeSet<String>,
    base_url: String,
}

impl KindResolver {
    pub fn new(settings: &CliSettings) -> Self {
        Self {
            kinds: settings.commentable_kinds.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl CommentableResolver for KindResolver {
    fn supports_comments(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }

    fn resolve(&self, resource: &ResourceRef) -> Option<Arc<dyn Commentable>> {
        if !self.supports_comments(&resource.kind) {
            return None;
        }
        let url = format!("{}/{}/{}", self.base_url, resource.kind, resource.id);
        Some(Arc::new(StaticResource::new(resource.clone(), url)))
    }
}

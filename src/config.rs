// contact-deck/src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}, sync::Arc};
use tokio::sync::broadcast;
use tracing::warn;

use crate::export::EXPORT_FILE_NAME;

pub const DEFAULT_SOURCE_URL: &str = "https://randomuser.me/api/";
pub const DEFAULT_SOURCE_RESULTS: u32 = 10;

/// Config is merged: system -> user -> workspace -> runtime (ephemeral)
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub source: SourceConfig,
    pub export: ExportConfig,
    pub stats: StatsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub dir: Option<PathBuf>,   // defaults to <data_dir>/store
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct SourceConfig {
    pub url: Option<String>,
    pub results: Option<u32>,
}

impl SourceConfig {
    pub fn url(&self) -> &str { self.url.as_deref().unwrap_or(DEFAULT_SOURCE_URL) }
    pub fn results(&self) -> u32 { self.results.unwrap_or(DEFAULT_SOURCE_RESULTS) }
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub path: Option<PathBuf>,  // defaults to <data_dir>/favorites.json
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct StatsConfig {
    /// Offset used for weekday bucketing; unset means the local zone.
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: Option<String>, // RUST_LOG wins when set
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scope { System, User, Workspace, Runtime }

fn merge(a: &mut Config, b: &Config) {
    fn overlay<T: Clone>(dst: &mut Option<T>, src: &Option<T>) { if src.is_some() { *dst = src.clone(); } }
    overlay(&mut a.storage.dir, &b.storage.dir);
    overlay(&mut a.source.url, &b.source.url);
    overlay(&mut a.source.results, &b.source.results);
    overlay(&mut a.export.path, &b.export.path);
    overlay(&mut a.stats.utc_offset_minutes, &b.stats.utc_offset_minutes);
    overlay(&mut a.logging.filter, &b.logging.filter);
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("org", "contact-deck", "contact-deck").context("ProjectDirs not available")
}

fn config_paths(workspace_root: &Path) -> Result<(PathBuf, PathBuf, PathBuf)> {
    let user = project_dirs()?.config_dir().join("config.toml");
    let system = if cfg!(target_os = "windows") {
        PathBuf::from(r"C:\ProgramData\ContactDeck\config.toml")
    } else {
        PathBuf::from("/etc/contact-deck/config.toml")
    };
    let workspace = workspace_root.join(".contact-deck").join("config.toml");
    Ok((system, user, workspace))
}

#[derive(Clone)]
pub struct ConfigManager {
    inner: Arc<RwLock<Config>>,
    tx: broadcast::Sender<Config>,
    system_path: PathBuf,
    user_path: PathBuf,
    workspace_path: PathBuf,
    runtime_overlay: Arc<RwLock<Config>>,
}

impl ConfigManager {
    pub fn load(workspace_root: impl AsRef<Path>) -> Result<Self> {
        let (system, user, workspace) = config_paths(workspace_root.as_ref())?;
        Ok(Self::with_paths(system, user, workspace))
    }

    /// Explicit layer files; missing files are simply skipped.
    pub fn with_paths(system_path: PathBuf, user_path: PathBuf, workspace_path: PathBuf) -> Self {
        let cm = Self {
            inner: Arc::new(RwLock::new(Config::default())),
            tx: broadcast::channel(16).0,
            system_path, user_path, workspace_path,
            runtime_overlay: Arc::new(RwLock::new(Config::default())),
        };
        cm.reload_all();
        cm
    }

    fn read_file(path: &Path) -> Option<Config> {
        let text = fs::read_to_string(path).ok()?;
        match toml::from_str(&text) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping malformed config");
                None
            }
        }
    }

    pub fn reload_all(&self) {
        let mut merged = Config::default();
        for p in [&self.system_path, &self.user_path, &self.workspace_path] {
            if let Some(layer) = Self::read_file(p) { merge(&mut merged, &layer); }
        }
        let rt = self.runtime_overlay.read().clone();
        merge(&mut merged, &rt);
        *self.inner.write() = merged.clone();
        let _ = self.tx.send(merged);
    }

    pub fn get(&self) -> Config { self.inner.read().clone() }
    pub fn subscribe(&self) -> broadcast::Receiver<Config> { self.tx.subscribe() }

    pub fn apply_runtime_overlay(&self, patch: Config) {
        merge(&mut self.runtime_overlay.write(), &patch);
        self.reload_all();
    }

    pub fn write_patch(&self, scope: Scope, patch: &Config) -> Result<()> {
        let path = match scope {
            Scope::System    => &self.system_path,
            Scope::User      => &self.user_path,
            Scope::Workspace => &self.workspace_path,
            Scope::Runtime   => anyhow::bail!("Runtime scope is ephemeral; cannot persist"),
        };
        if let Some(dir) = path.parent() { fs::create_dir_all(dir)?; }
        let mut merged = Self::read_file(path).unwrap_or_default();
        merge(&mut merged, patch);
        let text = toml::to_string_pretty(&merged).context("serialize toml")?;
        fs::write(path, text).with_context(|| format!("write {}", path.display()))?;
        self.reload_all();
        Ok(())
    }
}

impl Config {
    pub fn storage_dir(&self) -> Result<PathBuf> {
        match &self.storage.dir {
            Some(d) => Ok(d.clone()),
            None => Ok(project_dirs()?.data_dir().join("store")),
        }
    }

    pub fn export_path(&self) -> Result<PathBuf> {
        match &self.export.path {
            Some(p) => Ok(p.clone()),
            None => Ok(project_dirs()?.data_dir().join(EXPORT_FILE_NAME)),
        }
    }
}

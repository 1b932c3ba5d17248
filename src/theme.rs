// contact-deck/src/theme.rs

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr, sync::Arc};
use tokio::sync::broadcast;
use tracing::warn;

use crate::blob::{keys, BlobStore};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the platform appearance.
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ThemePreference {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => anyhow::bail!("unknown theme preference: {other:?}"),
        }
    }
}

pub fn effective_is_dark(pref: ThemePreference, system_is_dark: bool) -> bool {
    match pref {
        ThemePreference::System => system_is_dark,
        p => p == ThemePreference::Dark,
    }
}

/// What a renderer needs; passed explicitly rather than pulled from ambient state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThemeContext {
    pub preference: ThemePreference,
    pub is_dark: bool,
}

impl ThemeContext {
    pub fn resolve(preference: ThemePreference, system_is_dark: bool) -> Self {
        Self { preference, is_dark: effective_is_dark(preference, system_is_dark) }
    }
}

/// Theme preference persisted as a bare string, with an in-memory current value.
#[derive(Clone)]
pub struct ThemeStore {
    blobs: Arc<dyn BlobStore>,
    current: Arc<RwLock<ThemePreference>>,
    tx: broadcast::Sender<ThemePreference>,
}

impl ThemeStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            current: Arc::new(RwLock::new(ThemePreference::default())),
            tx: broadcast::channel(16).0,
        }
    }

    /// Reads the stored preference, falling back to `System`, and refreshes `current()`.
    pub async fn get(&self) -> ThemePreference {
        let pref = match self.blobs.get(keys::THEME).await {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(key = keys::THEME, error = %e, "ignoring stored theme");
                ThemePreference::System
            }),
            Ok(None) => ThemePreference::System,
            Err(e) => {
                warn!(key = keys::THEME, error = %e, "theme read failed");
                ThemePreference::System
            }
        };
        *self.current.write() = pref;
        pref
    }

    /// Best effort: a failed write is logged and the in-memory value still changes.
    pub async fn set(&self, pref: ThemePreference) {
        if let Err(e) = self.blobs.set(keys::THEME, pref.as_str().to_string()).await {
            warn!(key = keys::THEME, error = %e, "theme write failed");
        }
        *self.current.write() = pref;
        let _ = self.tx.send(pref);
    }

    pub fn current(&self) -> ThemePreference { *self.current.read() }

    pub fn context(&self, system_is_dark: bool) -> ThemeContext {
        ThemeContext::resolve(self.current(), system_is_dark)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThemePreference> { self.tx.subscribe() }
}

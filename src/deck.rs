// contact-deck/src/deck.rs

use anyhow::Result;
use std::{path::{Path, PathBuf}, sync::Arc};
use tracing::info;

use crate::{
    blob::{BlobStore, FileBlobStore, KeyLocks},
    clock::{Clock, SystemClock},
    config::Config,
    contacts::{Contact, ContactStore},
    export,
    favorites::{resolve_with, FavoritesStore},
    interactions::InteractionTracker,
    source::ContactSource,
    stats::{StatsAggregator, WeekdayZone},
    theme::ThemeStore,
};

/// Every store wired over one blob store, sharing one set of key locks.
#[derive(Clone)]
pub struct ContactDeck {
    pub contacts: ContactStore,
    pub favorites: FavoritesStore,
    pub interactions: InteractionTracker,
    pub theme: ThemeStore,
    pub stats: StatsAggregator,
}

impl ContactDeck {
    pub fn new(blobs: Arc<dyn BlobStore>, clock: Arc<dyn Clock>, zone: WeekdayZone) -> Self {
        let locks = Arc::new(KeyLocks::new());
        let contacts = ContactStore::new(blobs.clone());
        let favorites = FavoritesStore::new(blobs.clone(), locks.clone());
        let interactions = InteractionTracker::new(blobs.clone(), locks, clock.clone());
        let stats = StatsAggregator::new(contacts.clone(), favorites.clone(), interactions.clone(), clock, zone);
        Self { contacts, favorites, interactions, theme: ThemeStore::new(blobs), stats }
    }

    /// File-backed deck rooted at the configured storage directory.
    pub fn open(cfg: &Config) -> Result<Self> {
        let dir = cfg.storage_dir()?;
        info!(dir = %dir.display(), "opening contact deck");
        Ok(Self::new(
            Arc::new(FileBlobStore::new(dir)),
            Arc::new(SystemClock),
            WeekdayZone::from_offset_minutes(cfg.stats.utc_offset_minutes),
        ))
    }

    /// Fetches a fresh collection and replaces the cache with it.
    /// A failed fetch leaves the cache as it was.
    pub async fn refresh(&self, source: &dyn ContactSource) -> Result<Vec<Contact>> {
        let fetched = source.fetch().await?;
        self.contacts.save(&fetched).await?;
        Ok(fetched)
    }

    pub async fn favorite_contacts(&self) -> Vec<Contact> {
        let (contacts, ids) = futures::join!(self.contacts.load(), self.favorites.list());
        resolve_with(&contacts, &ids)
    }

    pub async fn export_favorites(&self, path: &Path) -> Result<PathBuf> {
        export::export_favorites(&self.favorite_contacts().await, path).await
    }
}

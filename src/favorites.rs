// contact-deck/src/favorites.rs

use std::sync::Arc;
use tracing::debug;

use crate::{
    blob::{keys, read_json_or_default, write_json, BlobStore, KeyLocks},
    contacts::Contact,
    error::StoreResult,
};

/// Favorited contact ids, persisted as a JSON array in insertion order.
#[derive(Clone)]
pub struct FavoritesStore {
    blobs: Arc<dyn BlobStore>,
    locks: Arc<KeyLocks>,
}

impl FavoritesStore {
    pub fn new(blobs: Arc<dyn BlobStore>, locks: Arc<KeyLocks>) -> Self { Self { blobs, locks } }

    pub async fn list(&self) -> Vec<String> {
        read_json_or_default(self.blobs.as_ref(), keys::FAVORITES).await
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.list().await.iter().any(|f| f == id)
    }

    /// Flips membership of `id` and returns the new state.
    pub async fn toggle(&self, id: &str) -> StoreResult<bool> {
        let _guard = self.locks.lock(keys::FAVORITES).await;
        let mut ids = self.list().await;
        let now_favorite = if ids.iter().any(|f| f == id) {
            ids.retain(|f| f != id);
            false
        } else {
            ids.push(id.to_string());
            true
        };
        write_json(self.blobs.as_ref(), keys::FAVORITES, &ids).await?;
        debug!(id, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }

    /// `contacts` filtered down to favorites, in `contacts` order.
    pub async fn resolve(&self, contacts: &[Contact]) -> Vec<Contact> {
        let ids = self.list().await;
        resolve_with(contacts, &ids)
    }
}

pub(crate) fn resolve_with(contacts: &[Contact], ids: &[String]) -> Vec<Contact> {
    contacts.iter().filter(|c| ids.iter().any(|f| *f == c.id)).cloned().collect()
}

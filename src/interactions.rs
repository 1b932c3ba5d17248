// contact-deck/src/interactions.rs

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::{
    blob::{keys, read_json_or_default, write_json, BlobStore, KeyLocks},
    clock::Clock,
    error::StoreResult,
};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub contact_id: String,
    /// Epoch milliseconds of the most recent interaction.
    pub last_interaction: i64,
    pub interaction_count: u32,
}

/// Per-contact interaction counters. Records are created on first use and never removed.
#[derive(Clone)]
pub struct InteractionTracker {
    blobs: Arc<dyn BlobStore>,
    locks: Arc<KeyLocks>,
    clock: Arc<dyn Clock>,
}

impl InteractionTracker {
    pub fn new(blobs: Arc<dyn BlobStore>, locks: Arc<KeyLocks>, clock: Arc<dyn Clock>) -> Self {
        Self { blobs, locks, clock }
    }

    pub async fn record(&self, contact_id: &str) -> StoreResult<()> {
        let _guard = self.locks.lock(keys::INTERACTIONS).await;
        let mut records = self.list().await;
        let now = self.clock.now_ms();
        match records.iter_mut().find(|r| r.contact_id == contact_id) {
            Some(r) => {
                r.last_interaction = now;
                r.interaction_count = r.interaction_count.saturating_add(1);
            }
            None => records.push(InteractionRecord {
                contact_id: contact_id.to_string(),
                last_interaction: now,
                interaction_count: 1,
            }),
        }
        write_json(self.blobs.as_ref(), keys::INTERACTIONS, &records).await?;
        debug!(contact_id, "interaction recorded");
        Ok(())
    }

    pub async fn list(&self) -> Vec<InteractionRecord> {
        read_json_or_default(self.blobs.as_ref(), keys::INTERACTIONS).await
    }

    pub async fn get(&self, contact_id: &str) -> Option<InteractionRecord> {
        self.list().await.into_iter().find(|r| r.contact_id == contact_id)
    }
}

// contact-deck/src/stats.rs

use chrono::{Datelike, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    clock::Clock,
    contacts::ContactStore,
    favorites::FavoritesStore,
    interactions::{InteractionRecord, InteractionTracker},
};

pub const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
pub const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Zone used to decide which weekday a timestamp falls on.
#[derive(Clone, Copy, Debug, Default)]
pub enum WeekdayZone {
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl WeekdayZone {
    /// `None` or an out-of-range offset falls back to local time.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        match minutes.and_then(|m| FixedOffset::east_opt(m.checked_mul(60)?)) {
            Some(off) => Self::Fixed(off),
            None => Self::Local,
        }
    }

    /// Monday-first index 0..=6.
    pub fn weekday_index(&self, epoch_ms: i64) -> Option<usize> {
        match self {
            Self::Local => weekday_in(&Local, epoch_ms),
            Self::Fixed(off) => weekday_in(off, epoch_ms),
        }
    }
}

fn weekday_in<Tz: TimeZone>(tz: &Tz, epoch_ms: i64) -> Option<usize> {
    tz.timestamp_millis_opt(epoch_ms).single().map(|d| d.weekday().num_days_from_monday() as usize)
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsReport {
    pub total_contacts: usize,
    pub total_favorites: usize,
    pub most_interacted: u32,
    pub last_week_interactions: usize,
    /// Monday-first count of records by the weekday of their *last* interaction, all time.
    pub weekly_histogram: [u32; 7],
}

impl StatisticsReport {
    pub fn from_snapshot(
        total_contacts: usize,
        total_favorites: usize,
        records: &[InteractionRecord],
        now_ms: i64,
        zone: WeekdayZone,
    ) -> Self {
        let since = now_ms.saturating_sub(WEEK_MS);
        let mut weekly_histogram = [0u32; 7];
        for r in records {
            if let Some(i) = zone.weekday_index(r.last_interaction) { weekly_histogram[i] += 1; }
        }
        Self {
            total_contacts,
            total_favorites,
            most_interacted: records.iter().map(|r| r.interaction_count).max().unwrap_or(0),
            last_week_interactions: records.iter().filter(|r| r.last_interaction >= since).count(),
            weekly_histogram,
        }
    }

    /// Histogram paired with its day label, for chart rendering.
    pub fn labelled_histogram(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        WEEKDAY_LABELS.iter().copied().zip(self.weekly_histogram.iter().copied())
    }
}

/// Read-only view over the three data stores.
#[derive(Clone)]
pub struct StatsAggregator {
    contacts: ContactStore,
    favorites: FavoritesStore,
    interactions: InteractionTracker,
    clock: Arc<dyn Clock>,
    zone: WeekdayZone,
}

impl StatsAggregator {
    pub fn new(
        contacts: ContactStore,
        favorites: FavoritesStore,
        interactions: InteractionTracker,
        clock: Arc<dyn Clock>,
        zone: WeekdayZone,
    ) -> Self {
        Self { contacts, favorites, interactions, clock, zone }
    }

    /// Never fails: degraded reads simply aggregate as empty.
    pub async fn compute(&self) -> StatisticsReport {
        let (contacts, favorites, records) = futures::join!(
            self.contacts.load(),
            self.favorites.list(),
            self.interactions.list(),
        );
        StatisticsReport::from_snapshot(contacts.len(), favorites.len(), &records, self.clock.now_ms(), self.zone)
    }
}

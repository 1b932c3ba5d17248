// contact-deck/src/lib.rs

pub mod blob;
pub mod clock;
pub mod config;
pub mod contacts;
pub mod deck;
pub mod error;
pub mod export;
pub mod favorites;
pub mod interactions;
pub mod logging;
pub mod source;
pub mod stats;
pub mod theme;

pub use blob::{BlobStore, FileBlobStore, KeyLocks, MemoryBlobStore};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ConfigManager, Scope};
pub use contacts::{filter_by_name, Contact, ContactName, ContactStore, Picture};
pub use deck::ContactDeck;
pub use error::{StoreError, StoreResult};
pub use export::{export_favorites, ExportEntry};
pub use favorites::FavoritesStore;
pub use interactions::{InteractionRecord, InteractionTracker};
pub use source::{ContactSource, HttpContactSource};
pub use stats::{StatisticsReport, StatsAggregator, WeekdayZone, WEEKDAY_LABELS};
pub use theme::{effective_is_dark, ThemeContext, ThemePreference, ThemeStore};

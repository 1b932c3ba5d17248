// contact-deck/src/error.rs

use thiserror::Error;

/// Failures surfaced by strict store writes.
///
/// Reads never return this: they log and fall back to an empty value.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence failed for key {key}: {source}")]
    Persistence {
        key: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error("stored value under {key} does not have the expected shape: {source}")]
    Parse {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not encode value for {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Persistence { key, .. } | Self::Parse { key, .. } | Self::Encode { key, .. } => key,
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

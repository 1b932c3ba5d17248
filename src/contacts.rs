// contact-deck/src/contacts.rs

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    blob::{keys, read_json_or_default, write_json, BlobStore},
    error::StoreResult,
};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContactName {
    pub first: String,
    pub last: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Picture {
    pub thumbnail: String,
    pub medium: String,
    pub large: String,
}

/// A fetched contact. Immutable once cached.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    /// Stored as `{"value": "<id>"}` to keep the upstream nesting.
    #[serde(with = "id_value")]
    pub id: String,
    pub name: ContactName,
    pub email: String,
    pub phone: String,
    pub picture: Picture,
}

impl Contact {
    pub fn full_name(&self) -> String { format!("{} {}", self.name.first, self.name.last) }
}

mod id_value {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize)]
    struct IdRef<'a> { value: &'a str }

    #[derive(Deserialize)]
    struct IdOwned { value: String }

    pub fn serialize<S: Serializer>(id: &str, s: S) -> Result<S::Ok, S::Error> {
        IdRef { value: id }.serialize(s)
    }
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        IdOwned::deserialize(d).map(|w| w.value)
    }
}

/// The cached contact collection, replaced wholesale on each fetch.
#[derive(Clone)]
pub struct ContactStore {
    blobs: Arc<dyn BlobStore>,
}

impl ContactStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self { Self { blobs } }

    pub async fn save(&self, contacts: &[Contact]) -> StoreResult<()> {
        write_json(self.blobs.as_ref(), keys::CONTACTS, contacts).await
    }

    /// Empty when nothing is cached or the cached blob cannot be read.
    pub async fn load(&self) -> Vec<Contact> {
        read_json_or_default(self.blobs.as_ref(), keys::CONTACTS).await
    }
}

/// Case-insensitive substring search over "first last". A blank query keeps everything.
pub fn filter_by_name<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    if query.trim().is_empty() { return contacts.iter().collect(); }
    let q = query.to_lowercase();
    contacts.iter().filter(|c| c.full_name().to_lowercase().contains(&q)).collect()
}

#[cfg(test)]
pub(crate) fn contact(id: &str, first: &str, last: &str) -> Contact {
    Contact {
        id: id.into(),
        name: ContactName { first: first.into(), last: last.into() },
        email: format!("{}@example.com", first.to_lowercase()),
        phone: "555-0100".into(),
        picture: Picture::default(),
    }
}

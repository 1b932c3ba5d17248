// contact-deck/src/export.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::contacts::Contact;

pub const EXPORT_FILE_NAME: &str = "favorites.json";

/// One row of the human-readable favorites export.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExportEntry {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Contact> for ExportEntry {
    fn from(c: &Contact) -> Self {
        Self { name: c.full_name(), email: c.email.clone(), phone: c.phone.clone() }
    }
}

/// Writes `favorites` as a pretty-printed JSON array and returns the path written.
pub async fn export_favorites(favorites: &[Contact], path: &Path) -> Result<PathBuf> {
    let rows: Vec<ExportEntry> = favorites.iter().map(ExportEntry::from).collect();
    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir).await.with_context(|| format!("create {}", dir.display()))?;
    }
    tokio::fs::write(path, serde_json::to_string_pretty(&rows)?).await
        .with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), count = rows.len(), "favorites exported");
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::contact;

    #[tokio::test]
    async fn writes_name_email_phone_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(EXPORT_FILE_NAME);
        let favs = vec![contact("a", "Ann", "Lee"), contact("b", "Bo", "Ray")];
        let written = export_favorites(&favs, &path).await.unwrap();
        assert_eq!(written, path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {"), "expected indented output");
        let rows: Vec<ExportEntry> = serde_json::from_str(&text).unwrap();
        assert_eq!(rows[1], ExportEntry { name: "Bo Ray".into(), email: "bo@example.com".into(), phone: "555-0100".into() });
    }

    #[tokio::test]
    async fn empty_favorites_export_empty_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE_NAME);
        export_favorites(&[], &path).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}

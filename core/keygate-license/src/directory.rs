//! The key directory: canonical product key to owner record.
//!
//! Request handling only ever reads from a directory. [`StaticKeyDirectory`]
//! is the in-memory table used by default; anything implementing
//! [`KeyDirectory`] can be injected in its place.

use crate::error::{LicenseError, LicenseResult};
use crate::key::normalize;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::debug;

/// The owner record bound to a canonical product key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductKeyRecord {
    /// Canonical (dash-free) product key.
    pub canonical_key: String,
    /// User the key belongs to.
    pub owner_user: String,
    /// Calendar expiry of the key itself.
    ///
    /// Carried for reference only. Token validity is governed by the token's
    /// own window and this date is not checked.
    pub expires: NaiveDate,
}

/// Read-only lookup of product key records.
#[async_trait]
pub trait KeyDirectory: Send + Sync {
    /// Looks up a record by canonical key.
    ///
    /// Returns `Ok(None)` when the key is unknown; errors are reserved for
    /// backend failures.
    async fn lookup(&self, canonical_key: &str) -> LicenseResult<Option<ProductKeyRecord>>;
}

/// On-disk shape of a single key table entry.
#[derive(Debug, Deserialize)]
struct KeyEntry {
    user: String,
    expires: NaiveDate,
}

/// In-memory key directory.
#[derive(Debug, Clone, Default)]
pub struct StaticKeyDirectory {
    records: HashMap<String, ProductKeyRecord>,
}

impl StaticKeyDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the table shipped with the service.
    #[must_use]
    pub fn builtin() -> Self {
        let expires = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();
        let mut dir = Self::new();
        dir.insert("123456789101", "User1", expires);
        dir.insert("111122223333", "User2", expires);
        dir
    }

    /// Parses a JSON key table of the form
    /// `{"<key>": {"user": "...", "expires": "YYYY-MM-DD"}}`.
    ///
    /// Keys are normalized on load, so dashed keys in the table are accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, or if two entries collapse
    /// to the same canonical key.
    pub fn from_json_str(json: &str) -> LicenseResult<Self> {
        let entries: BTreeMap<String, KeyEntry> = serde_json::from_str(json)?;
        let mut dir = Self::new();
        for (raw, entry) in entries {
            let canonical = normalize(&raw);
            if dir.records.contains_key(&canonical) {
                return Err(LicenseError::Directory(format!(
                    "duplicate product key after normalization: {canonical}"
                )));
            }
            dir.insert(&canonical, entry.user, entry.expires);
        }
        debug!("Loaded {} product keys", dir.len());
        Ok(dir)
    }

    /// Reads and parses a JSON key table from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> LicenseResult<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Adds or replaces a record. The key is normalized first.
    pub fn insert(&mut self, key: &str, owner_user: impl Into<String>, expires: NaiveDate) {
        let canonical_key = normalize(key);
        self.records.insert(
            canonical_key.clone(),
            ProductKeyRecord {
                canonical_key,
                owner_user: owner_user.into(),
                expires,
            },
        );
    }

    /// Removes a record, returning it if it existed.
    pub fn remove(&mut self, key: &str) -> Option<ProductKeyRecord> {
        self.records.remove(&normalize(key))
    }

    /// Returns the record for a canonical key.
    #[must_use]
    pub fn get(&self, canonical_key: &str) -> Option<&ProductKeyRecord> {
        self.records.get(canonical_key)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the directory holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl KeyDirectory for StaticKeyDirectory {
    async fn lookup(&self, canonical_key: &str) -> LicenseResult<Option<ProductKeyRecord>> {
        Ok(self.get(canonical_key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_both_keys() {
        let dir = StaticKeyDirectory::builtin();
        assert_eq!(dir.len(), 2);
        assert_eq!(dir.get("123456789101").unwrap().owner_user, "User1");
        assert_eq!(dir.get("111122223333").unwrap().owner_user, "User2");
    }

    #[test]
    fn lookup_is_exact_on_canonical_key() {
        let dir = StaticKeyDirectory::builtin();
        assert!(dir.get("1111-2222-3333").is_none());
    }

    #[test]
    fn insert_normalizes() {
        let mut dir = StaticKeyDirectory::new();
        dir.insert("9999-0000", "User9", NaiveDate::from_ymd_opt(2030, 1, 1).unwrap());
        assert_eq!(dir.get("99990000").unwrap().canonical_key, "99990000");
        assert!(dir.remove("9999-0000").is_some());
        assert!(dir.is_empty());
    }
}

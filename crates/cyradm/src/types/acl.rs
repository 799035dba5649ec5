//! Access-control listings.

use std::collections::BTreeMap;

/// The full rights superset granted by default: lookup, read, seen, write,
/// insert, post, create, delete, administer.
pub const FULL_RIGHTS: &str = "lrswipcda";

/// Access-control snapshot for one mailbox: principal → rights string.
///
/// A rights string is an unordered set of single-character permission flags.
/// Keys are unique; ordering carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControl {
    entries: BTreeMap<String, String>,
}

impl AccessControl {
    /// Creates an empty listing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the rights for a principal.
    pub fn insert(&mut self, principal: impl Into<String>, rights: impl Into<String>) {
        self.entries.insert(principal.into(), rights.into());
    }

    /// Returns the rights string for a principal, if present.
    #[must_use]
    pub fn rights(&self, principal: &str) -> Option<&str> {
        self.entries.get(principal).map(String::as_str)
    }

    /// Returns the number of principals in the listing.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no principal is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over (principal, rights) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AccessControl {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_lookup() {
        let mut acl = AccessControl::new();
        acl.insert("alice", "lrs");
        acl.insert("bob", "lrwi");
        assert_eq!(acl.rights("alice"), Some("lrs"));
        assert_eq!(acl.rights("bob"), Some("lrwi"));
        assert_eq!(acl.rights("carol"), None);
        assert_eq!(acl.len(), 2);
    }

    #[test]
    fn duplicate_principal_keeps_last_rights() {
        let mut acl = AccessControl::new();
        acl.insert("alice", "lrs");
        acl.insert("alice", "lrswipcda");
        assert_eq!(acl.rights("alice"), Some(FULL_RIGHTS));
        assert_eq!(acl.len(), 1);
    }
}

//! Server identity information.

use std::collections::BTreeMap;

/// Identity fields reported by the server's `id` command.
///
/// Keys are unique; ordering carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerIdentity {
    fields: BTreeMap<String, String>,
}

impl ServerIdentity {
    /// Creates an empty identity map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an identity field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the value of an identity field, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns the leading whitespace-delimited token of the `version`
    /// field, if reported.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.field("version")
            .and_then(|v| v.split_whitespace().next())
    }

    /// Returns the number of reported fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no field was reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, String)> for ServerIdentity {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

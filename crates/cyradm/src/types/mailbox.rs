//! Validated mailbox names.

use crate::{Error, Result};

/// A validated mailbox identifier.
///
/// Only ASCII letters and underscores are accepted; anything else is
/// rejected before a command referencing the name reaches the wire. The
/// server-side path is derived by prefixing the configured namespace
/// (typically `user.`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailboxName(String);

impl MailboxName {
    /// Validates and wraps a mailbox name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidMailboxName`] if the name is empty or
    /// contains anything other than ASCII letters and underscores.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic() || c == '_') {
            return Err(Error::NoValidMailboxName(name));
        }
        Ok(Self(name))
    }

    /// Returns the bare name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the server-side path under the given namespace prefix.
    #[must_use]
    pub fn qualified(&self, namespace: &str) -> String {
        format!("{namespace}{}", self.0)
    }
}

impl std::fmt::Display for MailboxName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for MailboxName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn accepts_letters_and_underscore() {
        assert!(MailboxName::new("alice").is_ok());
        assert!(MailboxName::new("mail_archive").is_ok());
        assert!(MailboxName::new("ABC").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            MailboxName::new(""),
            Err(Error::NoValidMailboxName(_))
        ));
    }

    #[test]
    fn rejects_digits_punctuation_whitespace() {
        for bad in ["alice1", "a.b", "a b", "a-b", "über", "a/b", "a\"b"] {
            assert!(
                matches!(MailboxName::new(bad), Err(Error::NoValidMailboxName(_))),
                "{bad} should be invalid"
            );
        }
    }

    #[test]
    fn qualified_prefixes_namespace() {
        let name = MailboxName::new("alice").unwrap();
        assert_eq!(name.qualified("user."), "user.alice");
    }

    proptest! {
        #[test]
        fn valid_grammar_always_accepted(name in "[A-Za-z_]{1,32}") {
            prop_assert!(MailboxName::new(name).is_ok());
        }

        #[test]
        fn names_with_other_chars_always_rejected(
            prefix in "[A-Za-z_]{0,8}",
            bad in "[0-9 .!@/-]{1,4}",
            suffix in "[A-Za-z_]{0,8}",
        ) {
            let name = format!("{prefix}{bad}{suffix}");
            prop_assert!(MailboxName::new(name).is_err());
        }
    }
}

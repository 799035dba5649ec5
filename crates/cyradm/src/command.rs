//! Command builders and wire serialization.
//!
//! Every command leads with the fixed tag literal `.` followed by
//! space-separated arguments, quoted where the protocol expects quoting.

/// The fixed command tag.
pub const TAG: &str = ".";

/// Administrative commands understood by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Authenticate the administrator.
    Login {
        /// Administrator login name.
        administrator: String,
        /// Administrator credential.
        credential: String,
    },
    /// Query the server capability list.
    Capability,
    /// List the access control entries of a mailbox.
    GetAcl {
        /// Fully qualified mailbox path.
        mailbox: String,
    },
    /// Grant or replace one principal's rights on a mailbox.
    SetAcl {
        /// Fully qualified mailbox path.
        mailbox: String,
        /// Principal whose rights are set.
        principal: String,
        /// Rights string to grant.
        rights: String,
    },
    /// Remove one principal's rights from a mailbox.
    DeleteAcl {
        /// Fully qualified mailbox path.
        mailbox: String,
        /// Principal whose rights are removed.
        principal: String,
    },
    /// Query the storage quota of a mailbox.
    GetQuota {
        /// Fully qualified mailbox path.
        mailbox: String,
    },
    /// Set the storage quota limit of a mailbox.
    SetQuota {
        /// Fully qualified mailbox path.
        mailbox: String,
        /// New byte limit.
        limit: u64,
    },
    /// Create a mailbox.
    Create {
        /// Fully qualified mailbox path.
        mailbox: String,
    },
    /// Delete a mailbox.
    Delete {
        /// Fully qualified mailbox path.
        mailbox: String,
    },
    /// Query the server identity.
    Id,
    /// End the session.
    Logout,
}

impl Command {
    /// Serializes the command to its wire form, without line terminator.
    #[must_use]
    pub fn serialize(&self) -> String {
        match self {
            Self::Login {
                administrator,
                credential,
            } => format!("{TAG} login {} {}", quoted(administrator), quoted(credential)),
            Self::Capability => format!("{TAG} capability"),
            Self::GetAcl { mailbox } => format!("{TAG} getacl {}", quoted(mailbox)),
            Self::SetAcl {
                mailbox,
                principal,
                rights,
            } => format!("{TAG} setacl {} {principal} {rights}", quoted(mailbox)),
            Self::DeleteAcl { mailbox, principal } => {
                format!("{TAG} deleteacl {} {principal}", quoted(mailbox))
            }
            Self::GetQuota { mailbox } => format!("{TAG} getquota {}", quoted(mailbox)),
            Self::SetQuota { mailbox, limit } => {
                format!("{TAG} setquota {} (STORAGE {limit})", quoted(mailbox))
            }
            Self::Create { mailbox } => format!("{TAG} create {}", quoted(mailbox)),
            Self::Delete { mailbox } => format!("{TAG} delete {}", quoted(mailbox)),
            Self::Id => format!("{TAG} id NIL"),
            Self::Logout => format!("{TAG} logout"),
        }
    }
}

/// Wraps an argument in double quotes, escaping embedded quotes and
/// backslashes.
fn quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

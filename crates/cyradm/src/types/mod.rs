//! Core types for mailbox administration.

mod acl;
mod identity;
mod mailbox;
mod quota;

pub use acl::{AccessControl, FULL_RIGHTS};
pub use identity::ServerIdentity;
pub use mailbox::MailboxName;
pub use quota::QuotaSnapshot;

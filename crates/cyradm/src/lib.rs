//! # cyradm
//!
//! An administrative client for Cyrus-style IMAP servers: create and delete
//! mailboxes, manage access rights, query and set storage quotas, and read
//! the server identity over the line-oriented admin protocol.
//!
//! ## Quick Start
//!
//! ```ignore
//! use cyradm::{Config, Security, Session};
//!
//! #[tokio::main]
//! async fn main() -> cyradm::Result<()> {
//!     let config = Config::builder()
//!         .host("mail.example.com")
//!         .security(Security::Tls)
//!         .credentials("cyrus", "secret")
//!         .build();
//!
//!     let mut session = Session::new(config);
//!     session.connect().await?;
//!     println!("banner: {:?}", session.welcome_banner());
//!
//!     session.login().await?;
//!
//!     session.create_mailbox("alice").await?;
//!     session.set_quota("alice", 10240).await?;
//!     let quota = session.get_quota("alice").await?;
//!     println!("load: {:.2}%", quota.load());
//!
//!     session.logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Session States
//!
//! State transitions are tracked at runtime:
//!
//! ```text
//! Disconnected ── connect() ──→ Connected ── login() ──→ Authenticated
//!       ↑                            │                         │
//!       └──── disconnect()/logout() ─┴─────────────────────────┘
//! ```
//!
//! A failed login leaves the session connected so a retry is possible.
//! Operations on a released transport fail with
//! [`Error::NoServerStream`].
//!
//! ## Half-duplex contract
//!
//! The protocol has no framing beyond newline-terminated text; every
//! operation writes exactly one command line and consumes its full set of
//! reply lines before returning. All operations take `&mut self`, so one
//! session can never have two commands in flight.
//!
//! ## Modules
//!
//! - [`answers`]: expected-answer lookup injected into the session
//! - [`classify`]: reply classification (literal, pattern, prefix)
//! - [`command`]: command builders and wire serialization
//! - [`connection`]: stream types, line framing, configuration
//! - [`parser`]: reply payload parsers (ACL, quota, identity)
//! - [`session`]: the protocol engine
//! - [`types`]: mailbox names, ACLs, quota snapshots, server identity

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod answers;
pub mod classify;
pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod session;
pub mod types;

pub use answers::{AnswerLookup, Answers};
pub use classify::ResponseClassifier;
pub use command::Command;
pub use connection::{AdminStream, Config, ConfigBuilder, LineStream, Security};
pub use error::{Error, Result};
pub use session::Session;
pub use types::{AccessControl, FULL_RIGHTS, MailboxName, QuotaSnapshot, ServerIdentity};

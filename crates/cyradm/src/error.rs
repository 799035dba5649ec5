//! Error types for the admin client.

use thiserror::Error;

/// Errors that can occur during administrative operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Socket establishment failure.
    #[error("connection failed: {0}")]
    Connection(#[source] std::io::Error),

    /// TLS handshake or encryption error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Invalid DNS name for TLS.
    #[error("invalid DNS name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// An expected reply line was absent: the stream ended or the read
    /// failed mid-exchange.
    #[error("no server response: {0}")]
    NoServerResponse(String),

    /// Operation attempted on a transport that was already released.
    #[error("no server stream")]
    NoServerStream,

    /// A reply line matched neither its required literal/pattern nor any
    /// recognized named error.
    #[error("unexpected server answer: {0:?}")]
    UnexpectedServerAnswer(String),

    /// Login reply matched the configured failure literal.
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Mailbox argument failed name validation; nothing was sent.
    #[error("invalid mailbox name: {0:?}")]
    NoValidMailboxName(String),

    /// Server reported that the mailbox to create already exists.
    #[error("mailbox already exists: {0}")]
    MailboxExists(String),

    /// Server reported that the mailbox does not exist.
    #[error("no such mailbox: {0}")]
    NoMailbox(String),

    /// Server reported that the mailbox has no quota root.
    #[error("no quota root: {0}")]
    NoQuota(String),

    /// Server rejected the command due to unexpected extra arguments.
    #[error("unexpected extra arguments")]
    UnexpectedExtraArguments,

    /// Quota accessor called before a successful quota query.
    #[error("quota not initialized")]
    QuotaNotInitialized,

    /// Server reported a zero byte limit; the load is undefined.
    #[error("quota limit is zero")]
    ZeroQuotaLimit,

    /// A reply passed classification but lacks the structure the parser
    /// requires (parentheses, minimum token count, paired tokens).
    #[error("parse error: {0}")]
    Parse(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

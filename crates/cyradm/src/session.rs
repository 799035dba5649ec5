//! The protocol engine: session lifecycle and administrative operations.
//!
//! A [`Session`] sequences connect → login → {command}* → logout →
//! disconnect over a single transport, exchanging one command line for a
//! fixed number of reply lines per operation. The protocol is strictly
//! half-duplex; every operation takes `&mut self` and consumes its full
//! reply before returning, so a second command can never be issued
//! mid-exchange. A `Session` has a single owner and is not meant to be
//! shared across concurrent callers.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::answers::{
    ANSWER_ACL, ANSWER_CREATE_EXISTS, ANSWER_LOGIN, ANSWER_LOGIN_FAILED, ANSWER_LOGOUT, ANSWER_OK,
    ANSWER_QUOTA, ANSWER_QUOTA_EXTRA_ARGS, ANSWER_QUOTA_NO_MAILBOX, ANSWER_QUOTA_NO_ROOT,
    AnswerLookup, Answers,
};
use crate::classify::ResponseClassifier;
use crate::command::Command;
use crate::connection::{AdminStream, Config, LineStream, Security, connect_plain, connect_tls};
use crate::parser;
use crate::types::{AccessControl, FULL_RIGHTS, MailboxName, QuotaSnapshot, ServerIdentity};
use crate::{Error, Result};

/// Runtime connection state; the transport lives inside the state.
enum SessionState<S> {
    /// No transport.
    Disconnected,
    /// Transport open, administrator not yet authenticated.
    Connected(LineStream<S>),
    /// Administrator authenticated.
    Authenticated(LineStream<S>),
}

/// Administrative session with a mailbox server.
pub struct Session<S = AdminStream> {
    config: Config,
    classifier: ResponseClassifier,
    state: SessionState<S>,
    default_rights: String,
    welcome: Option<String>,
    acl: Option<AccessControl>,
    quota: Option<QuotaSnapshot>,
    identity: Option<ServerIdentity>,
}

impl<S> Session<S> {
    /// Creates a disconnected session with the stock answer table.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self::with_answers(config, Arc::new(Answers::default()))
    }

    /// Creates a disconnected session with an injected answer lookup.
    #[must_use]
    pub fn with_answers(config: Config, answers: Arc<dyn AnswerLookup>) -> Self {
        Self {
            config,
            classifier: ResponseClassifier::new(answers),
            state: SessionState::Disconnected,
            default_rights: FULL_RIGHTS.to_string(),
            welcome: None,
            acl: None,
            quota: None,
            identity: None,
        }
    }

    /// Returns true if a transport is open.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        !matches!(self.state, SessionState::Disconnected)
    }

    /// Returns true if the administrator is authenticated.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    /// The welcome banner captured on connect, if connected since.
    #[must_use]
    pub fn welcome_banner(&self) -> Option<&str> {
        self.welcome.as_deref()
    }

    /// The default rights string granted in the delete pre-step.
    #[must_use]
    pub fn default_rights(&self) -> &str {
        &self.default_rights
    }

    /// The ACL snapshot of the most recent successful [`Self::get_acl`].
    #[must_use]
    pub fn acl_snapshot(&self) -> Option<&AccessControl> {
        self.acl.as_ref()
    }

    /// The identity map of the most recent successful [`Self::id`].
    #[must_use]
    pub fn server_identity(&self) -> Option<&ServerIdentity> {
        self.identity.as_ref()
    }

    /// The quota snapshot of the most recent successful [`Self::get_quota`].
    ///
    /// # Errors
    ///
    /// [`Error::QuotaNotInitialized`] when no quota query has succeeded
    /// since the last connect.
    pub fn quota_snapshot(&self) -> Result<QuotaSnapshot> {
        self.quota.ok_or(Error::QuotaNotInitialized)
    }

    /// Bytes used per the current quota snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::QuotaNotInitialized`] when no quota query has succeeded
    /// since the last connect.
    pub fn used(&self) -> Result<u64> {
        Ok(self.quota_snapshot()?.used())
    }

    /// Byte limit per the current quota snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::QuotaNotInitialized`] when no quota query has succeeded
    /// since the last connect.
    pub fn quota_limit(&self) -> Result<u64> {
        Ok(self.quota_snapshot()?.limit())
    }

    /// Quota load percentage per the current quota snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::QuotaNotInitialized`] when no quota query has succeeded
    /// since the last connect.
    pub fn load(&self) -> Result<f64> {
        Ok(self.quota_snapshot()?.load())
    }

    /// Releases the transport and clears all per-connection state.
    ///
    /// # Errors
    ///
    /// [`Error::NoServerStream`] when the transport was already released.
    pub fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NoServerStream);
        }
        self.reset();
        Ok(())
    }

    fn reset(&mut self) {
        self.state = SessionState::Disconnected;
        self.welcome = None;
        self.acl = None;
        self.quota = None;
        self.identity = None;
    }

    fn qualified(&self, mailbox: &str) -> Result<String> {
        Ok(MailboxName::new(mailbox)?.qualified(&self.config.namespace))
    }
}

impl Session<AdminStream> {
    /// Opens the transport per the configured security mode and captures
    /// the welcome banner. Any previously open transport is released first.
    ///
    /// # Errors
    ///
    /// [`Error::Connection`] (or a TLS error) when the stream cannot be
    /// established, [`Error::NoServerResponse`] when the banner never
    /// arrives.
    pub async fn connect(&mut self) -> Result<()> {
        self.reset();
        let stream = match self.config.security {
            Security::Plain => connect_plain(&self.config.host, self.config.port).await?,
            Security::Tls => connect_tls(&self.config.host, self.config.port).await?,
        };
        self.attach(stream).await
    }
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Adopts an already-connected stream and captures the welcome banner.
    ///
    /// This is how sessions are driven in tests; [`Session::connect`] uses
    /// it after establishing the socket.
    ///
    /// # Errors
    ///
    /// [`Error::NoServerResponse`] when the banner never arrives.
    pub async fn attach(&mut self, stream: S) -> Result<()> {
        self.reset();
        let mut line_stream = LineStream::new(stream);
        let banner = line_stream.read_line().await?;
        tracing::debug!(line = %banner, "server");
        self.welcome = Some(banner);
        self.state = SessionState::Connected(line_stream);
        Ok(())
    }

    /// Authenticates the configured administrator.
    ///
    /// On the configured failure literal the transport stays open in the
    /// connected state, so a retry is permitted.
    ///
    /// # Errors
    ///
    /// [`Error::AuthenticationFailure`] on the failure literal,
    /// [`Error::UnexpectedServerAnswer`] on anything else,
    /// [`Error::NoServerStream`] before connect.
    pub async fn login(&mut self) -> Result<()> {
        // The serialized line carries the credential, so log only the name.
        tracing::trace!(administrator = %self.config.administrator, "client login");
        let cmd = Command::Login {
            administrator: self.config.administrator.clone(),
            credential: self.config.credential.clone(),
        };
        let stream = self.stream_mut()?;
        stream.write_line(&cmd.serialize()).await?;
        let line = stream.read_line().await?;
        tracing::debug!(line = %line, "server");

        if self.classifier.matches_pattern(&line, ANSWER_LOGIN) {
            self.state = match std::mem::replace(&mut self.state, SessionState::Disconnected) {
                SessionState::Connected(s) | SessionState::Authenticated(s) => {
                    SessionState::Authenticated(s)
                }
                SessionState::Disconnected => SessionState::Disconnected,
            };
            Ok(())
        } else if self.classifier.matches_literal(&line, ANSWER_LOGIN_FAILED) {
            Err(Error::AuthenticationFailure)
        } else {
            Err(Error::UnexpectedServerAnswer(line))
        }
    }

    /// Ends the session: expects the logout acknowledgement followed by the
    /// generic OK, then releases the transport.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedServerAnswer`] on a deviating reply,
    /// [`Error::NoServerStream`] when the transport was already released.
    pub async fn logout(&mut self) -> Result<()> {
        self.send(&Command::Logout).await?;
        let first = self.read_reply().await?;
        if !self.classifier.matches_pattern(&first, ANSWER_LOGOUT) {
            return Err(Error::UnexpectedServerAnswer(first));
        }
        let second = self.read_reply().await?;
        if !self.classifier.matches_literal(&second, ANSWER_OK) {
            return Err(Error::UnexpectedServerAnswer(second));
        }
        self.reset();
        Ok(())
    }

    /// Queries the server capability list.
    ///
    /// Both reply lines are read and logged but not interpreted; the
    /// default rights string is set to the full superset rather than being
    /// derived from the advertised capabilities. Known limitation.
    ///
    /// # Errors
    ///
    /// [`Error::NoServerResponse`] when a reply line is absent,
    /// [`Error::NoServerStream`] before connect.
    pub async fn capability(&mut self) -> Result<()> {
        self.send(&Command::Capability).await?;
        self.read_reply().await?;
        self.read_reply().await?;
        self.default_rights = FULL_RIGHTS.to_string();
        Ok(())
    }

    /// Lists the access control entries of a mailbox and stores the result
    /// as the session's current ACL snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMailboxName`] before anything is sent,
    /// [`Error::UnexpectedServerAnswer`] when either reply line deviates,
    /// [`Error::Parse`] on a structurally malformed listing.
    pub async fn get_acl(&mut self, mailbox: &str) -> Result<AccessControl> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::GetAcl { mailbox: path }).await?;

        let listing = self.read_reply().await?;
        if !self.classifier.matches_pattern(&listing, ANSWER_ACL) {
            return Err(Error::UnexpectedServerAnswer(listing));
        }
        let acl = parser::parse_acl(&listing)?;

        let ack = self.read_reply().await?;
        if !self.classifier.matches_literal(&ack, ANSWER_OK) {
            return Err(Error::UnexpectedServerAnswer(ack));
        }

        self.acl = Some(acl.clone());
        Ok(acl)
    }

    /// Grants or replaces one principal's rights on a mailbox.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMailboxName`] before anything is sent,
    /// [`Error::UnexpectedServerAnswer`] when the reply is not the OK
    /// literal.
    pub async fn set_acl(&mut self, mailbox: &str, principal: &str, rights: &str) -> Result<()> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::SetAcl {
            mailbox: path,
            principal: principal.to_string(),
            rights: rights.to_string(),
        })
        .await?;
        self.expect_ok().await
    }

    /// Removes one principal's rights from a mailbox.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMailboxName`] before anything is sent,
    /// [`Error::UnexpectedServerAnswer`] when the reply is not the OK
    /// literal.
    pub async fn delete_acl(&mut self, mailbox: &str, principal: &str) -> Result<()> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::DeleteAcl {
            mailbox: path,
            principal: principal.to_string(),
        })
        .await?;
        self.expect_ok().await
    }

    /// Queries the storage quota of a mailbox and stores the result as the
    /// session's current quota snapshot.
    ///
    /// # Errors
    ///
    /// [`Error::NoMailbox`], [`Error::NoQuota`] or
    /// [`Error::UnexpectedExtraArguments`] on the named error replies,
    /// [`Error::UnexpectedServerAnswer`] when the reply lacks the quota
    /// marker or the closing acknowledgement, [`Error::ZeroQuotaLimit`] on
    /// a zero byte limit.
    pub async fn get_quota(&mut self, mailbox: &str) -> Result<QuotaSnapshot> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::GetQuota { mailbox: path }).await?;

        let line = self.read_reply().await?;
        if self.classifier.has_prefix(&line, ANSWER_QUOTA_NO_MAILBOX) {
            return Err(Error::NoMailbox(mailbox.to_string()));
        }
        if self.classifier.has_prefix(&line, ANSWER_QUOTA_NO_ROOT) {
            return Err(Error::NoQuota(mailbox.to_string()));
        }
        if self.classifier.has_prefix(&line, ANSWER_QUOTA_EXTRA_ARGS) {
            return Err(Error::UnexpectedExtraArguments);
        }
        if !self.classifier.has_prefix(&line, ANSWER_QUOTA) {
            return Err(Error::UnexpectedServerAnswer(line));
        }
        let snapshot = parser::parse_quota(&line)?;

        let ack = self.read_reply().await?;
        if !self.classifier.has_ok_prefix(&ack) {
            return Err(Error::UnexpectedServerAnswer(ack));
        }

        self.quota = Some(snapshot);
        Ok(snapshot)
    }

    /// Sets the storage quota limit of a mailbox, in bytes.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMailboxName`] before anything is sent,
    /// [`Error::UnexpectedServerAnswer`] when the reply is not the OK
    /// literal.
    pub async fn set_quota(&mut self, mailbox: &str, limit: u64) -> Result<()> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::SetQuota {
            mailbox: path,
            limit,
        })
        .await?;
        self.expect_ok().await
    }

    /// Creates a mailbox under the configured namespace.
    ///
    /// # Errors
    ///
    /// [`Error::MailboxExists`] when the server reports the mailbox is
    /// already present, [`Error::NoServerResponse`] when no reply arrives.
    pub async fn create_mailbox(&mut self, mailbox: &str) -> Result<()> {
        let path = self.qualified(mailbox)?;
        self.send(&Command::Create { mailbox: path }).await?;

        let line = self.read_reply().await?;
        if self.classifier.has_prefix(&line, ANSWER_CREATE_EXISTS) {
            return Err(Error::MailboxExists(mailbox.to_string()));
        }
        Ok(())
    }

    /// Deletes a mailbox under the configured namespace.
    ///
    /// Best-effort pre-step: the administrator is first granted the default
    /// rights on the mailbox so the server will accept the delete. A
    /// failure of that grant is logged and swallowed by documented policy;
    /// the delete is attempted regardless.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMailboxName`] before anything is sent,
    /// [`Error::NoServerResponse`] when the delete reply is absent.
    pub async fn delete_mailbox(&mut self, mailbox: &str) -> Result<()> {
        let path = self.qualified(mailbox)?;

        let administrator = self.config.administrator.clone();
        let rights = self.default_rights.clone();
        if let Err(e) = self.set_acl(mailbox, &administrator, &rights).await {
            tracing::warn!(?e, mailbox = %path, "rights grant before delete failed");
        }

        self.send(&Command::Delete { mailbox: path }).await?;
        self.read_reply().await?;
        Ok(())
    }

    /// Queries the server identity and stores it as the session's identity
    /// map.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] on a malformed identity reply,
    /// [`Error::NoServerResponse`] when a reply line is absent.
    pub async fn id(&mut self) -> Result<ServerIdentity> {
        self.send(&Command::Id).await?;
        let line = self.read_reply().await?;
        let identity = parser::parse_identity(&line)?;
        self.read_reply().await?;
        self.identity = Some(identity.clone());
        Ok(identity)
    }

    /// Returns the server's reported version: the leading token of the
    /// identity `version` field.
    ///
    /// # Errors
    ///
    /// [`Error::Parse`] when the identity reply carries no version field,
    /// plus everything [`Self::id`] can fail with.
    pub async fn version(&mut self) -> Result<String> {
        let identity = self.id().await?;
        identity
            .version()
            .map(str::to_string)
            .ok_or_else(|| Error::Parse("identity reply has no version field".to_string()))
    }

    fn stream_mut(&mut self) -> Result<&mut LineStream<S>> {
        match &mut self.state {
            SessionState::Disconnected => Err(Error::NoServerStream),
            SessionState::Connected(s) | SessionState::Authenticated(s) => Ok(s),
        }
    }

    async fn send(&mut self, cmd: &Command) -> Result<()> {
        let line = cmd.serialize();
        tracing::trace!(line = %line, "client");
        self.stream_mut()?.write_line(&line).await
    }

    async fn read_reply(&mut self) -> Result<String> {
        let line = self.stream_mut()?.read_line().await?;
        tracing::debug!(line = %line, "server");
        Ok(line)
    }

    async fn expect_ok(&mut self) -> Result<()> {
        let line = self.read_reply().await?;
        if self.classifier.matches_literal(&line, ANSWER_OK) {
            Ok(())
        } else {
            Err(Error::UnexpectedServerAnswer(line))
        }
    }
}

impl<S> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("host", &self.config.host)
            .field("connected", &self.is_connected())
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

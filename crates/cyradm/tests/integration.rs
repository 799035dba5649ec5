//! Integration tests for the admin client.
//!
//! These tests use a mock stream to simulate server replies without
//! requiring a real server connection.

#![allow(clippy::unwrap_used)]

use std::io::{self, Cursor};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

use cyradm::{Config, Error, Security, Session};

/// Shared capture of everything the client wrote.
#[derive(Clone, Default)]
struct SentLog(Arc<Mutex<Vec<u8>>>);

impl SentLog {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

/// Mock stream that returns predefined reply lines in order.
struct MockStream {
    responses: Cursor<Vec<u8>>,
    sent: SentLog,
}

impl MockStream {
    fn new(responses: &str) -> (Self, SentLog) {
        let sent = SentLog::default();
        (
            Self {
                responses: Cursor::new(responses.as_bytes().to_vec()),
                sent: sent.clone(),
            },
            sent,
        )
    }
}

impl AsyncRead for MockStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let pos = usize::try_from(self.responses.position()).unwrap();
        let data = self.responses.get_ref();

        if pos >= data.len() {
            return Poll::Ready(Ok(()));
        }

        let remaining = &data[pos..];
        let to_read = remaining.len().min(buf.remaining());
        buf.put_slice(&remaining[..to_read]);
        self.responses.set_position((pos + to_read) as u64);

        Poll::Ready(Ok(()))
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        self.sent.0.lock().unwrap().extend_from_slice(buf);
        Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}

const BANNER: &str = "* OK Cyrus IMAP4 v2.4.17 server ready\r\n";

fn test_config() -> Config {
    Config::builder()
        .host("localhost")
        .security(Security::Plain)
        .credentials("cyrus", "secret")
        .build()
}

/// Builds a connected session over a scripted mock stream.
async fn connected_session(responses: &str) -> (Session<MockStream>, SentLog) {
    let (stream, sent) = MockStream::new(responses);
    let mut session = Session::new(test_config());
    session.attach(stream).await.unwrap();
    (session, sent)
}

/// Builds an authenticated session; script must start with the login reply.
async fn authenticated_session(responses: &str) -> (Session<MockStream>, SentLog) {
    let script = format!("{BANNER}. OK User logged in\r\n{responses}");
    let (mut session, sent) = connected_session(&script).await;
    session.login().await.unwrap();
    (session, sent)
}

#[tokio::test]
async fn scenario_a_banner_and_double_disconnect() {
    let (mut session, _sent) = connected_session(BANNER).await;

    assert!(session.is_connected());
    assert_eq!(
        session.welcome_banner(),
        Some("* OK Cyrus IMAP4 v2.4.17 server ready")
    );

    session.disconnect().unwrap();
    assert!(!session.is_connected());
    assert!(session.welcome_banner().is_none());

    assert!(matches!(session.disconnect(), Err(Error::NoServerStream)));
}

#[tokio::test]
async fn login_before_connect_is_rejected() {
    let mut session: Session<MockStream> = Session::new(test_config());
    assert!(matches!(session.login().await, Err(Error::NoServerStream)));
}

#[tokio::test]
async fn scenario_b_login_failure_permits_retry() {
    let script = format!("{BANNER}. NO Login failed.\r\n. OK User logged in\r\n");
    let (mut session, _sent) = connected_session(&script).await;

    assert!(matches!(
        session.login().await,
        Err(Error::AuthenticationFailure)
    ));
    assert!(session.is_connected());
    assert!(!session.is_authenticated());

    session.login().await.unwrap();
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn login_with_unrecognized_reply_is_unexpected_answer() {
    let script = format!("{BANNER}* GARBAGE\r\n");
    let (mut session, _sent) = connected_session(&script).await;

    assert!(matches!(
        session.login().await,
        Err(Error::UnexpectedServerAnswer(line)) if line == "* GARBAGE"
    ));
    assert!(session.is_connected());
}

#[tokio::test]
async fn logout_releases_transport_once() {
    let script = "* BYE LOGOUT received\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.logout().await.unwrap();
    assert!(!session.is_connected());
    assert!(sent.text().ends_with(". logout\r\n"));

    // No transport left; a second logout is rejected.
    assert!(matches!(session.logout().await, Err(Error::NoServerStream)));
}

#[tokio::test]
async fn logout_with_deviating_ack_fails() {
    let script = "* BYE LOGOUT received\r\n. NO not today\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.logout().await,
        Err(Error::UnexpectedServerAnswer(_))
    ));
}

#[tokio::test]
async fn scenario_c_quota_on_missing_mailbox() {
    let script = ". NO Mailbox does not exist\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.get_quota("alice").await,
        Err(Error::NoMailbox(name)) if name == "alice"
    ));
    // Snapshot stays unset, so the accessors reject the stale read.
    assert!(matches!(session.used(), Err(Error::QuotaNotInitialized)));
    assert!(matches!(session.load(), Err(Error::QuotaNotInitialized)));
}

#[tokio::test]
async fn get_quota_success_populates_snapshot() {
    let script = "* QUOTA user.alice (STORAGE 50 200)\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    let quota = session.get_quota("alice").await.unwrap();
    assert_eq!(quota.used(), 50);
    assert_eq!(quota.limit(), 200);
    assert!((quota.load() - 25.00).abs() < f64::EPSILON);

    assert_eq!(session.used().unwrap(), 50);
    assert_eq!(session.quota_limit().unwrap(), 200);
    assert!(sent.text().ends_with(". getquota \"user.alice\"\r\n"));
}

#[tokio::test]
async fn get_quota_named_error_prefixes() {
    let script = ". NO Quota root does not exist\r\n";
    let (mut session, _sent) = authenticated_session(script).await;
    assert!(matches!(
        session.get_quota("alice").await,
        Err(Error::NoQuota(_))
    ));

    let script = ". BAD Unexpected extra arguments\r\n";
    let (mut session, _sent) = authenticated_session(script).await;
    assert!(matches!(
        session.get_quota("alice").await,
        Err(Error::UnexpectedExtraArguments)
    ));
}

#[tokio::test]
async fn get_quota_without_marker_is_reported() {
    let script = "* FOO user.alice (STORAGE 50 200)\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.get_quota("alice").await,
        Err(Error::UnexpectedServerAnswer(_))
    ));
}

#[tokio::test]
async fn set_quota_reply_is_validated() {
    let script = ". OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;
    session.set_quota("alice", 10240).await.unwrap();
    assert!(
        sent.text()
            .ends_with(". setquota \"user.alice\" (STORAGE 10240)\r\n")
    );

    let script = ". NO Permission denied\r\n";
    let (mut session, _sent) = authenticated_session(script).await;
    assert!(matches!(
        session.set_quota("alice", 10240).await,
        Err(Error::UnexpectedServerAnswer(_))
    ));
}

#[tokio::test]
async fn scenario_d_create_existing_mailbox() {
    let script = ". NO Mailbox already exists\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.create_mailbox("alice").await,
        Err(Error::MailboxExists(name)) if name == "alice"
    ));
}

#[tokio::test]
async fn create_mailbox_success() {
    let script = ". OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.create_mailbox("alice").await.unwrap();
    assert!(sent.text().ends_with(". create \"user.alice\"\r\n"));
}

#[tokio::test]
async fn invalid_mailbox_name_never_reaches_the_wire() {
    let (mut session, sent) = authenticated_session("").await;
    let before = sent.text();

    assert!(matches!(
        session.create_mailbox("alice1").await,
        Err(Error::NoValidMailboxName(_))
    ));
    assert!(matches!(
        session.get_quota("a b").await,
        Err(Error::NoValidMailboxName(_))
    ));
    assert!(matches!(
        session.get_acl("a.b").await,
        Err(Error::NoValidMailboxName(_))
    ));

    assert_eq!(sent.text(), before);
}

#[tokio::test]
async fn get_acl_stores_snapshot() {
    let script = "* ACL user.alice (alice lrs bob lrwi)\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    let acl = session.get_acl("alice").await.unwrap();
    assert_eq!(acl.rights("alice"), Some("lrs"));
    assert_eq!(acl.rights("bob"), Some("lrwi"));
    assert_eq!(session.acl_snapshot().unwrap().len(), 2);
    assert!(sent.text().ends_with(". getacl \"user.alice\"\r\n"));
}

#[tokio::test]
async fn get_acl_rejects_bad_closing_ack() {
    let script = "* ACL user.alice (alice lrs)\r\n. NO nope\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.get_acl("alice").await,
        Err(Error::UnexpectedServerAnswer(_))
    ));
}

#[tokio::test]
async fn get_acl_rejects_non_listing_reply() {
    let script = ". NO no such mailbox\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.get_acl("alice").await,
        Err(Error::UnexpectedServerAnswer(_))
    ));
}

#[tokio::test]
async fn set_and_delete_acl() {
    let script = ". OK Completed\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.set_acl("alice", "bob", "lrs").await.unwrap();
    session.delete_acl("alice", "bob").await.unwrap();

    let text = sent.text();
    assert!(text.contains(". setacl \"user.alice\" bob lrs\r\n"));
    assert!(text.ends_with(". deleteacl \"user.alice\" bob\r\n"));
}

#[tokio::test]
async fn delete_mailbox_grants_rights_first() {
    let script = ". OK Completed\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.delete_mailbox("alice").await.unwrap();

    let text = sent.text();
    assert!(text.contains(". setacl \"user.alice\" cyrus lrswipcda\r\n"));
    assert!(text.ends_with(". delete \"user.alice\"\r\n"));
}

#[tokio::test]
async fn delete_mailbox_survives_failed_rights_grant() {
    // The pre-step grant is best-effort: a NO reply is logged and swallowed.
    let script = ". NO Permission denied\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.delete_mailbox("alice").await.unwrap();
    assert!(sent.text().ends_with(". delete \"user.alice\"\r\n"));
}

#[tokio::test]
async fn id_and_version() {
    let script = "* ID (\"name\" \"Cyrus IMAPD\" \"version\" \"2.4.17 2012-02-07\")\r\n\
                  . OK Completed\r\n\
                  * ID (\"name\" \"Cyrus IMAPD\" \"version\" \"2.4.17 2012-02-07\")\r\n\
                  . OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    let identity = session.id().await.unwrap();
    assert_eq!(identity.field("name"), Some("Cyrus IMAPD"));
    assert_eq!(session.server_identity().unwrap().len(), 2);

    let version = session.version().await.unwrap();
    assert_eq!(version, "2.4.17");
    assert!(sent.text().contains(". id NIL\r\n"));
}

#[tokio::test]
async fn capability_reads_two_lines_and_sets_rights() {
    let script = "* CAPABILITY IMAP4rev1 QUOTA ACL\r\n. OK Completed\r\n";
    let (mut session, sent) = authenticated_session(script).await;

    session.capability().await.unwrap();
    assert_eq!(session.default_rights(), "lrswipcda");
    assert!(sent.text().ends_with(". capability\r\n"));
}

#[tokio::test]
async fn missing_reply_line_is_no_server_response() {
    // Quota listing arrives but the closing acknowledgement never does.
    let script = "* QUOTA user.alice (STORAGE 50 200)\r\n";
    let (mut session, _sent) = authenticated_session(script).await;

    assert!(matches!(
        session.get_quota("alice").await,
        Err(Error::NoServerResponse(_))
    ));
}

#[tokio::test]
async fn snapshots_reset_on_reconnect() {
    let script = "* QUOTA user.alice (STORAGE 50 200)\r\n. OK Completed\r\n";
    let (mut session, _sent) = authenticated_session(script).await;
    session.get_quota("alice").await.unwrap();
    assert!(session.quota_snapshot().is_ok());

    let (stream, _sent2) = MockStream::new(BANNER);
    session.attach(stream).await.unwrap();
    assert!(matches!(
        session.quota_snapshot(),
        Err(Error::QuotaNotInitialized)
    ));
    assert!(session.acl_snapshot().is_none());
}

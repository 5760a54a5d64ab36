use std::time::Duration;

use tracing::level_filters::LevelFilter;

use crate::error::SessionError;
use crate::stanza::Stanza;

/// Everything needed to construct a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSettings {
    pub username: String,
    pub password: String,
    pub host: String,
    pub secure: bool,
    /// Verbosity of the session's own diagnostics.
    pub log_level: LevelFilter,
    pub port: u16,
    pub resource: String,
    /// Upper bound for a single [`XmppSession::wait`].
    pub wait_timeout: Duration,
}

impl SessionSettings {
    /// The full JID this session signs in as.
    ///
    /// A username that already contains a domain is used as-is, otherwise
    /// the host supplies it.
    pub fn jid(&self) -> String {
        if self.username.contains('@') {
            format!("{}/{}", self.username, self.resource)
        } else {
            format!("{}@{}/{}", self.username, self.host, self.resource)
        }
    }
}

/// A synchronous XMPP client session.
///
/// The handshake steps are called once each, in declaration order, by the
/// connection adapter. After that the session serves outbound writes and
/// blocking waits until [`disconnect`](XmppSession::disconnect).
#[cfg_attr(test, mockall::automock)]
pub trait XmppSession {
    fn open(settings: SessionSettings) -> Result<Self, SessionError>
    where
        Self: Sized;

    fn connect(&mut self) -> Result<(), SessionError>;

    fn authenticate(&mut self) -> Result<(), SessionError>;

    fn bind(&mut self) -> Result<(), SessionError>;

    fn establish_session(&mut self) -> Result<(), SessionError>;

    /// Announce initial availability.
    fn presence(&mut self) -> Result<(), SessionError>;

    fn message(&mut self, to: &str, body: &str) -> Result<(), SessionError>;

    fn join(&mut self, room: &str, nick: &str, history: bool) -> Result<(), SessionError>;

    fn ping(&mut self) -> Result<(), SessionError>;

    fn disconnect(&mut self) -> Result<(), SessionError>;

    /// Whether the stream is still open. Turns false once the server closes
    /// it or after `disconnect`.
    fn is_connected(&self) -> bool;

    /// Block until the next stanza arrives.
    ///
    /// `Ok(None)` means the wait ended without a stanza.
    fn wait(&mut self) -> Result<Option<Stanza>, SessionError>;
}

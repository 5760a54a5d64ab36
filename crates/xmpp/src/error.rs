use thiserror::Error;

/// Failures reported by an [`XmppSession`](crate::session::XmppSession).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to construct session: {0}")]
    Construction(String),

    #[error("invalid XMPP address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("resource binding failed: {0}")]
    Bind(String),

    #[error("session is not connected")]
    NotConnected,
}

/// Errors that cross the driver boundary into the host framework.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The session object could not be constructed. Not retried here.
    #[error("unable to connect: {0}")]
    ConnectionAttemptFailed(String),

    /// A handshake step or an outbound write failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no XMPP session; call connect first")]
    NotConnected,
}

#[derive(Debug, Error)]
pub enum StanzaError {
    #[error("stanza parse failed: {0}")]
    ParseFailed(String),
}

pub mod connection;
pub mod driver;
pub mod error;
pub mod hostmask;
pub mod session;
pub mod stanza;
pub mod translator;
pub mod transport;

pub use connection::{establish, session_settings, SESSION_LOG_LEVEL};
pub use driver::{XmppDriver, DEFAULT_WAIT_TIMEOUT};
pub use error::{DriverError, SessionError, StanzaError};
pub use session::{SessionSettings, XmppSession};
pub use stanza::{MessageKind, Stanza, StanzaType};
pub use translator::{EventTranslator, Identity};

#[cfg(feature = "native")]
pub use transport::TokioXmppSession;

/// The driver wired to a real tokio-xmpp session.
#[cfg(feature = "native")]
pub type NativeDriver = XmppDriver<TokioXmppSession>;

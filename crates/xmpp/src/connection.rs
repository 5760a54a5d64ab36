//! Session construction and the fixed handshake sequence.

use std::time::Duration;

use perch_core::ConnectionParams;
use tracing::{info, level_filters::LevelFilter};

use crate::error::DriverError;
use crate::session::{SessionSettings, XmppSession};

/// Sessions only report failures; their chatter never reaches the host.
pub const SESSION_LOG_LEVEL: LevelFilter = LevelFilter::ERROR;

pub fn session_settings(params: &ConnectionParams, wait_timeout: Duration) -> SessionSettings {
    SessionSettings {
        username: params.username.clone(),
        password: params.password.clone(),
        host: params.host.clone(),
        secure: params.is_secure(),
        log_level: SESSION_LOG_LEVEL,
        port: params.port,
        resource: params.resource.clone(),
        wait_timeout,
    }
}

/// Construct a session and run it through connect, authenticate, bind,
/// establish-session and presence.
///
/// The first failing step aborts the sequence and its error is returned
/// unchanged; the half-built session is dropped.
pub fn establish<S: XmppSession>(settings: SessionSettings) -> Result<S, DriverError> {
    let host = settings.host.clone();
    let port = settings.port;
    let secure = settings.secure;

    let mut session =
        S::open(settings).map_err(|e| DriverError::ConnectionAttemptFailed(e.to_string()))?;

    session.connect()?;
    session.authenticate()?;
    session.bind()?;
    session.establish_session()?;
    session.presence()?;

    info!(%host, port, secure, "XMPP session established");
    Ok(session)
}

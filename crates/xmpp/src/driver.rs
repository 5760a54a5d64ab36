use std::time::Duration;

use perch_core::{ConnectionParams, Driver, Event};
use tracing::{debug, info, warn};

use crate::connection::{establish, session_settings};
use crate::error::DriverError;
use crate::session::XmppSession;
use crate::translator::{EventTranslator, Identity};

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(1);

/// An IRC-shaped [`Driver`] backed by an XMPP session.
pub struct XmppDriver<S: XmppSession> {
    params: ConnectionParams,
    identity: Identity,
    wait_timeout: Duration,
    session: Option<S>,
    translator: EventTranslator,
}

impl<S: XmppSession> XmppDriver<S> {
    pub fn new(params: ConnectionParams) -> Self {
        Self {
            identity: Identity::from_params(&params),
            params,
            wait_timeout: DEFAULT_WAIT_TIMEOUT,
            session: None,
            translator: EventTranslator::new(),
        }
    }

    /// Wrap an already established session.
    pub fn with_session(params: ConnectionParams, session: S) -> Self {
        let mut driver = Self::new(params);
        driver.session = Some(session);
        driver
    }

    pub fn with_wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = wait_timeout;
        self
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    fn session(&mut self) -> Result<&mut S, DriverError> {
        self.session.as_mut().ok_or(DriverError::NotConnected)
    }

    fn ignore(&self, command: &str) -> Result<(), DriverError> {
        debug!(command, "command has no XMPP equivalent; ignoring");
        Ok(())
    }
}

impl<S: XmppSession> Driver for XmppDriver<S> {
    type Error = DriverError;

    fn connect(&mut self) -> Result<(), DriverError> {
        if let Some(mut previous) = self.session.take() {
            if let Err(error) = previous.disconnect() {
                warn!(%error, "failed to close previous session");
            }
        }

        let settings = session_settings(&self.params, self.wait_timeout);
        self.session = Some(establish(settings)?);
        Ok(())
    }

    fn action(&mut self, target: &str, text: &str) -> Result<(), DriverError> {
        let body = format!("/me {text}");
        self.session()?.message(target, &body)?;
        Ok(())
    }

    fn notice(&mut self, target: &str, text: &str) -> Result<(), DriverError> {
        self.session()?.message(target, text)?;
        Ok(())
    }

    fn privmsg(&mut self, target: &str, text: &str) -> Result<(), DriverError> {
        self.session()?.message(target, text)?;
        Ok(())
    }

    fn join(&mut self, channels: &str, _keys: Option<&str>) -> Result<(), DriverError> {
        let nick = self.params.nick.clone();
        let session = self.session()?;
        for room in channels.split(',').map(str::trim).filter(|room| !room.is_empty()) {
            session.join(room, &nick, true)?;
        }
        Ok(())
    }

    fn ping(&mut self, _nick: &str, _hash: &str) -> Result<(), DriverError> {
        self.session()?.ping()?;
        Ok(())
    }

    fn quit(&mut self, _reason: Option<&str>) -> Result<(), DriverError> {
        let mut session = self.session.take().ok_or(DriverError::NotConnected)?;
        session.disconnect()?;
        info!("XMPP session closed");
        Ok(())
    }

    fn finger(&mut self, _nick: &str, _finger: Option<&str>) -> Result<(), DriverError> {
        self.ignore("finger")
    }

    fn invite(&mut self, _nick: &str, _channel: &str) -> Result<(), DriverError> {
        self.ignore("invite")
    }

    fn kick(
        &mut self,
        _nick: &str,
        _channel: &str,
        _reason: Option<&str>,
    ) -> Result<(), DriverError> {
        self.ignore("kick")
    }

    fn list(&mut self, _channels: Option<&str>) -> Result<(), DriverError> {
        self.ignore("list")
    }

    fn mode(
        &mut self,
        _target: &str,
        _mode: Option<&str>,
        _param: Option<&str>,
    ) -> Result<(), DriverError> {
        self.ignore("mode")
    }

    fn names(&mut self, _channels: &str) -> Result<(), DriverError> {
        self.ignore("names")
    }

    fn nick(&mut self, _nick: &str) -> Result<(), DriverError> {
        self.ignore("nick")
    }

    fn part(&mut self, _channels: &str) -> Result<(), DriverError> {
        self.ignore("part")
    }

    fn pong(&mut self, _daemon: &str) -> Result<(), DriverError> {
        self.ignore("pong")
    }

    fn raw(&mut self, _line: &str) -> Result<(), DriverError> {
        self.ignore("raw")
    }

    fn time(&mut self, _nick: &str, _time: Option<&str>) -> Result<(), DriverError> {
        self.ignore("time")
    }

    fn topic(&mut self, _channel: &str, _topic: Option<&str>) -> Result<(), DriverError> {
        self.ignore("topic")
    }

    fn version(&mut self, _nick: &str, _version: Option<&str>) -> Result<(), DriverError> {
        self.ignore("version")
    }

    fn whois(&mut self, _nick: &str) -> Result<(), DriverError> {
        self.ignore("whois")
    }

    fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.is_connected())
    }

    fn next_event(&mut self) -> Option<Event> {
        self.translator.poll(self.session.as_mut(), &self.identity)
    }
}

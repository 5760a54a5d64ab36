//! Scripted in-memory session for driving the XMPP driver end to end.
//!
//! The script lives in a thread local so that `XmppSession::open`, which has
//! no receiver, can pick it up. Every test runs on its own thread.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use perch_test_support::fixtures;
use perch_xmpp::{SessionError, SessionSettings, Stanza, XmppSession};

/// What the next session will do, and what it saw.
#[derive(Default)]
pub struct Script {
    /// Fail construction with this message.
    pub refuse_open: Option<String>,
    /// Fail the named call with a transport error.
    pub fail_on: Option<&'static str>,
    /// The peer has closed the stream.
    pub closed: bool,
    /// Results handed out by `wait`, front first. Empty means `Ok(None)`.
    pub inbound: VecDeque<Result<Option<Stanza>, SessionError>>,
    pub opened_with: Option<SessionSettings>,
    pub calls: Vec<String>,
}

thread_local! {
    static SCRIPT: RefCell<Script> = RefCell::new(Script::default());
}

pub fn reset() {
    SCRIPT.with(|script| *script.borrow_mut() = Script::default());
}

pub fn script(edit: impl FnOnce(&mut Script)) {
    SCRIPT.with(|script| edit(&mut script.borrow_mut()));
}

pub fn calls() -> Vec<String> {
    SCRIPT.with(|script| script.borrow().calls.clone())
}

pub fn opened_with() -> Option<SessionSettings> {
    SCRIPT.with(|script| script.borrow().opened_with.clone())
}

/// Queue a fixture stanza for delivery.
pub fn deliver(fixture: &str) {
    let stanza = Stanza::parse(fixtures::stanza(fixture).as_bytes())
        .unwrap_or_else(|e| panic!("fixture {fixture} does not parse: {e}"));
    script(|s| s.inbound.push_back(Ok(Some(stanza))));
}

pub fn deliver_error(message: &str) {
    let error = SessionError::Transport(message.to_string());
    script(|s| s.inbound.push_back(Err(error)));
}

pub struct FakeSession;

impl FakeSession {
    fn record(&self, call: String) -> Result<(), SessionError> {
        let name = call.split('(').next().unwrap_or_default().to_string();
        SCRIPT.with(|script| {
            let mut script = script.borrow_mut();
            script.calls.push(call);
            if script.fail_on == Some(name.as_str()) {
                Err(SessionError::Transport(format!("{name} refused")))
            } else {
                Ok(())
            }
        })
    }
}

impl XmppSession for FakeSession {
    fn open(settings: SessionSettings) -> Result<Self, SessionError> {
        SCRIPT.with(|script| {
            let mut script = script.borrow_mut();
            script.calls.push("open".to_string());
            script.opened_with = Some(settings);
            match script.refuse_open.clone() {
                Some(message) => Err(SessionError::Construction(message)),
                None => Ok(FakeSession),
            }
        })
    }

    fn connect(&mut self) -> Result<(), SessionError> {
        self.record("connect".to_string())
    }

    fn authenticate(&mut self) -> Result<(), SessionError> {
        self.record("authenticate".to_string())
    }

    fn bind(&mut self) -> Result<(), SessionError> {
        self.record("bind".to_string())
    }

    fn establish_session(&mut self) -> Result<(), SessionError> {
        self.record("establish_session".to_string())
    }

    fn presence(&mut self) -> Result<(), SessionError> {
        self.record("presence".to_string())
    }

    fn message(&mut self, to: &str, body: &str) -> Result<(), SessionError> {
        self.record(format!("message({to}, {body})"))
    }

    fn join(&mut self, room: &str, nick: &str, history: bool) -> Result<(), SessionError> {
        self.record(format!("join({room}, {nick}, {history})"))
    }

    fn ping(&mut self) -> Result<(), SessionError> {
        self.record("ping".to_string())
    }

    fn disconnect(&mut self) -> Result<(), SessionError> {
        self.record("disconnect".to_string())
    }

    fn is_connected(&self) -> bool {
        SCRIPT.with(|script| !script.borrow().closed)
    }

    fn wait(&mut self) -> Result<Option<Stanza>, SessionError> {
        self.record("wait".to_string())?;
        SCRIPT.with(|script| {
            script
                .borrow_mut()
                .inbound
                .pop_front()
                .unwrap_or(Ok(None))
        })
    }
}

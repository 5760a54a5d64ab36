//! Turns inbound stanzas into normalized events.

use perch_core::{ConnectionParams, Event, RequestCommand, RequestEvent};
use tracing::{debug, warn};

use crate::hostmask;
use crate::session::XmppSession;
use crate::stanza::{IqStanza, MessageStanza, Stanza, StanzaType};

/// The bot's own identity, used to drop echoes of its own traffic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub nick: String,
    /// Localpart only; hostmask usernames never carry a domain.
    pub username: String,
}

impl Identity {
    pub fn new(nick: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            username: username.into(),
        }
    }

    pub fn from_params(params: &ConnectionParams) -> Self {
        let username = params
            .username
            .split_once('@')
            .map_or(params.username.as_str(), |(local, _)| local);
        Self::new(params.nick.clone(), username)
    }

    fn is_self(&self, request: &RequestEvent, kind: StanzaType) -> bool {
        (kind.is_groupchat() && request.hostmask.nick == self.nick)
            || request.hostmask.username == self.username
    }
}

/// Poll state machine: one synthetic start event, then live traffic.
#[derive(Debug, Default)]
pub struct EventTranslator {
    bootstrapped: bool,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Produce at most one event.
    ///
    /// The very first call returns the `ERR_NOMOTD` response without looking
    /// at the session. Every later call blocks on the session for a single
    /// stanza. Transport failures are logged and reported as no event.
    pub fn poll<S: XmppSession>(
        &mut self,
        session: Option<&mut S>,
        own: &Identity,
    ) -> Option<Event> {
        if !self.bootstrapped {
            self.bootstrapped = true;
            debug!("emitting session start signal");
            return Some(Event::no_motd());
        }

        let Some(session) = session else {
            debug!("poll without a session");
            return None;
        };

        let stanza = match session.wait() {
            Ok(Some(stanza)) => stanza,
            Ok(None) => return None,
            Err(error) => {
                warn!(%error, "wait on XMPP session failed");
                return None;
            }
        };

        translate(&stanza, own)
    }
}

/// Map one stanza to a request event, or to nothing.
pub fn translate(stanza: &Stanza, own: &Identity) -> Option<Event> {
    let (request, kind) = match stanza {
        Stanza::Message(message) => from_message(message)?,
        Stanza::Iq(iq) => from_iq(iq)?,
        Stanza::Presence | Stanza::Other(_) => {
            debug!(stanza = stanza.name(), "stanza carries no command");
            return None;
        }
    };

    if own.is_self(&request, kind) {
        debug!(hostmask = %request.hostmask, "dropping own echo");
        return None;
    }

    debug!(
        command = %request.command,
        hostmask = %request.hostmask,
        "translated stanza"
    );
    Some(Event::Request(request))
}

fn from_message(message: &MessageStanza) -> Option<(RequestEvent, StanzaType)> {
    let Some(from) = message.from.as_deref() else {
        debug!("message without sender");
        return None;
    };
    let Some(body) = message.bodies.first() else {
        debug!(from, "message without body");
        return None;
    };

    let kind = StanzaType::Message(message.kind);
    let source = if kind.is_groupchat() {
        hostmask::bare(from)
    } else {
        from
    };

    let request = RequestEvent {
        command: RequestCommand::Privmsg,
        arguments: vec![source.to_string(), body.clone()],
        hostmask: hostmask::parse(from, kind),
    };
    Some((request, kind))
}

fn from_iq(iq: &IqStanza) -> Option<(RequestEvent, StanzaType)> {
    let Some(from) = iq.from.as_deref() else {
        debug!("iq without sender");
        return None;
    };

    let kind = StanzaType::Iq(iq.kind);
    let request = RequestEvent {
        command: RequestCommand::Pong,
        arguments: vec![from.to_string()],
        hostmask: hostmask::parse(from, kind),
    };
    Some((request, kind))
}

#[cfg(test)]
mod tests {
    use perch_core::{Hostmask, ResponseCode};
    use perch_test_support::fixtures;
    use tracing_test::traced_test;

    use super::*;
    use crate::error::SessionError;
    use crate::session::MockXmppSession;
    use crate::stanza::{IqKind, MessageKind};

    fn own() -> Identity {
        Identity::new("Perch", "perch")
    }

    fn fixture(name: &str) -> Stanza {
        Stanza::parse(fixtures::stanza(name).as_bytes()).unwrap()
    }

    fn message(from: &str, kind: MessageKind, bodies: &[&str]) -> Stanza {
        Stanza::Message(MessageStanza {
            from: Some(from.to_string()),
            kind,
            bodies: bodies
                .iter()
                .map(|content| content.to_string())
                .collect(),
        })
    }

    fn request(event: Option<Event>) -> RequestEvent {
        match event {
            Some(Event::Request(request)) => request,
            other => panic!("expected a request, got {other:?}"),
        }
    }

    #[test]
    fn first_poll_is_no_motd_without_session_access() {
        let mut session = MockXmppSession::new();
        session.expect_wait().never();
        let mut translator = EventTranslator::new();

        let event = translator.poll(Some(&mut session), &own()).unwrap();
        let response = event.as_response().unwrap();
        assert_eq!(response.code, ResponseCode::ERR_NOMOTD);
        assert_eq!(response.description, "");
        assert!(translator.is_bootstrapped());
    }

    #[test]
    fn later_polls_wait_on_session() {
        let mut session = MockXmppSession::new();
        session
            .expect_wait()
            .times(2)
            .returning(|| Ok(Some(Stanza::Presence)));
        let mut translator = EventTranslator::new();

        assert!(translator.poll(Some(&mut session), &own()).is_some());
        assert_eq!(translator.poll(Some(&mut session), &own()), None);
        assert_eq!(translator.poll(Some(&mut session), &own()), None);
    }

    #[test]
    fn bootstrap_happens_even_without_session() {
        let mut translator = EventTranslator::new();
        let first = translator.poll::<MockXmppSession>(None, &own());
        assert_eq!(first, Some(Event::no_motd()));
        assert_eq!(translator.poll::<MockXmppSession>(None, &own()), None);
    }

    #[test]
    fn bootstrap_is_never_repeated() {
        let mut session = MockXmppSession::new();
        session.expect_wait().returning(|| Ok(None));
        let mut translator = EventTranslator::new();

        translator.poll(Some(&mut session), &own());
        for _ in 0..5 {
            assert_eq!(translator.poll(Some(&mut session), &own()), None);
        }
    }

    #[test]
    #[traced_test]
    fn transport_errors_become_no_event() {
        let mut session = MockXmppSession::new();
        session
            .expect_wait()
            .returning(|| Err(SessionError::Transport("connection reset".to_string())));
        let mut translator = EventTranslator::new();

        translator.poll(Some(&mut session), &own());
        assert_eq!(translator.poll(Some(&mut session), &own()), None);
        assert!(logs_contain("wait on XMPP session failed"));
        assert!(logs_contain("connection reset"));
    }

    #[test]
    fn groupchat_message_targets_room() {
        let request = request(translate(&fixture("message-groupchat.xml"), &own()));
        assert_eq!(request.command, RequestCommand::Privmsg);
        assert_eq!(
            request.arguments,
            vec!["lobby@conference.example.com", "!dice 2d6"]
        );
        assert_eq!(
            request.hostmask,
            Hostmask::new("alice", "alice", "lobby@conference.example.com")
        );
    }

    #[test]
    fn groupchat_prefix_is_room_address() {
        let stanza = message("room@conf.example/alice", MessageKind::Groupchat, &["hi"]);
        let request = request(translate(&stanza, &own()));
        assert_eq!(request.source(), Some("room@conf.example"));
    }

    #[test]
    fn chat_message_targets_full_sender() {
        let request = request(translate(&fixture("message-chat.xml"), &own()));
        assert_eq!(request.source(), Some("alice@example.com/phone"));
        assert_eq!(request.text(), Some("hello perch"));
    }

    #[test]
    fn bare_chat_sender_is_kept() {
        let stanza = message("alice@example.com", MessageKind::Chat, &["hi"]);
        let request = request(translate(&stanza, &own()));
        assert_eq!(request.source(), Some("alice@example.com"));
    }

    #[test]
    fn only_first_body_is_used() {
        let request = request(translate(&fixture("message-multiple-bodies.xml"), &own()));
        assert_eq!(request.arguments.len(), 2);
        assert_eq!(request.text(), Some("good morning"));
    }

    #[test]
    fn message_without_body_is_no_event() {
        assert_eq!(translate(&fixture("message-chat-state.xml"), &own()), None);
    }

    #[test]
    fn presence_is_no_event() {
        assert_eq!(translate(&fixture("presence-muc.xml"), &own()), None);
    }

    #[test]
    fn other_stanzas_are_no_event() {
        assert_eq!(translate(&Stanza::Other("r".to_string()), &own()), None);
    }

    #[test]
    fn iq_becomes_pong() {
        let request = request(translate(&fixture("iq-ping.xml"), &own()));
        assert_eq!(request.command, RequestCommand::Pong);
        assert_eq!(request.arguments, vec!["example.com"]);
        assert_eq!(request.text(), None);
    }

    #[test]
    fn senderless_stanzas_are_no_event() {
        let mut stanza = message("x@y", MessageKind::Chat, &["hi"]);
        if let Stanza::Message(inner) = &mut stanza {
            inner.from = None;
        }
        assert_eq!(translate(&stanza, &own()), None);

        let iq = Stanza::Iq(IqStanza {
            from: None,
            kind: IqKind::Get,
        });
        assert_eq!(translate(&iq, &own()), None);
    }

    #[test]
    #[traced_test]
    fn own_room_echo_is_dropped() {
        assert_eq!(translate(&fixture("message-groupchat-echo.xml"), &own()), None);
        assert!(logs_contain("dropping own echo"));
    }

    #[test]
    fn own_nick_outside_rooms_is_not_an_echo() {
        let stanza = message("Perch@example.com", MessageKind::Chat, &["hi"]);
        assert!(translate(&stanza, &own()).is_some());
    }

    #[test]
    fn own_username_is_dropped() {
        let chat = message("perch@example.com/other", MessageKind::Chat, &["hi"]);
        assert_eq!(translate(&chat, &own()), None);

        let iq = Stanza::Iq(IqStanza {
            from: Some("perch@example.com/Bot".to_string()),
            kind: IqKind::Result,
        });
        assert_eq!(translate(&iq, &own()), None);
    }

    #[test]
    fn username_comparison_is_exact() {
        let chat = message("PERCH@example.com", MessageKind::Chat, &["hi"]);
        assert!(translate(&chat, &own()).is_some());
    }

    #[test]
    fn occupant_differing_only_in_case_is_not_an_echo() {
        let stanza = message("lobby@conf.example/PERCH", MessageKind::Groupchat, &["hi"]);
        let request = request(translate(&stanza, &own()));
        assert_eq!(request.hostmask.nick, "PERCH");
    }

    #[test]
    fn identity_uses_localpart_of_qualified_username() {
        let params = ConnectionParams::new("example.com", "perch@other.org", "secret", "Perch");
        assert_eq!(Identity::from_params(&params), Identity::new("Perch", "perch"));
    }
}

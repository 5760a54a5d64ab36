//! Inbound stanza model and outbound stanza builders.
//!
//! Inbound elements are reduced to exactly the fields the event translator
//! reads. Anything that does not fit the model degrades to
//! [`Stanza::Other`] instead of failing.

use std::str::FromStr;

use minidom::Element;
use xmpp_parsers::ns;

use crate::error::StanzaError;

const NS_PING: &str = "urn:xmpp:ping";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stanza {
    Message(MessageStanza),
    Presence,
    Iq(IqStanza),
    /// Unrecognized or malformed element, by name.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageStanza {
    pub from: Option<String>,
    pub kind: MessageKind,
    /// Body texts in document order, regardless of language.
    pub bodies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IqStanza {
    pub from: Option<String>,
    pub kind: IqKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Chat,
    Error,
    Groupchat,
    Headline,
    Normal,
}

impl MessageKind {
    /// Absent or unknown `type` attributes mean `normal` (RFC 6121 §5.2.2).
    pub fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("chat") => MessageKind::Chat,
            Some("error") => MessageKind::Error,
            Some("groupchat") => MessageKind::Groupchat,
            Some("headline") => MessageKind::Headline,
            _ => MessageKind::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Chat => "chat",
            MessageKind::Error => "error",
            MessageKind::Groupchat => "groupchat",
            MessageKind::Headline => "headline",
            MessageKind::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IqKind {
    Get,
    Set,
    Result,
    Error,
}

impl IqKind {
    pub fn from_attr(value: Option<&str>) -> Option<Self> {
        match value? {
            "get" => Some(IqKind::Get),
            "set" => Some(IqKind::Set),
            "result" => Some(IqKind::Result),
            "error" => Some(IqKind::Error),
            _ => None,
        }
    }
}

/// The type discriminator of a stanza that can carry a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanzaType {
    Message(MessageKind),
    Iq(IqKind),
}

impl StanzaType {
    pub fn is_groupchat(&self) -> bool {
        matches!(self, StanzaType::Message(MessageKind::Groupchat))
    }
}

impl Stanza {
    pub fn parse(raw: &[u8]) -> Result<Self, StanzaError> {
        let xml = std::str::from_utf8(raw).map_err(|error| {
            StanzaError::ParseFailed(format!("invalid UTF-8 stanza bytes: {error}"))
        })?;
        let trimmed = xml.trim();
        if trimmed.is_empty() {
            return Err(StanzaError::ParseFailed(
                "stanza payload is empty".to_string(),
            ));
        }

        let element = Element::from_str(trimmed).map_err(|error| {
            StanzaError::ParseFailed(format!("failed to parse stanza XML: {error}"))
        })?;
        Ok(Self::from_element(&element))
    }

    pub fn from_element(element: &Element) -> Self {
        if element.is("message", ns::JABBER_CLIENT) {
            Stanza::Message(MessageStanza::from_element(element))
        } else if element.is("presence", ns::JABBER_CLIENT) {
            Stanza::Presence
        } else if element.is("iq", ns::JABBER_CLIENT) {
            match IqStanza::from_element(element) {
                Some(iq) => Stanza::Iq(iq),
                None => Stanza::Other("iq".to_string()),
            }
        } else {
            Stanza::Other(element.name().to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Stanza::Message(_) => "message",
            Stanza::Presence => "presence",
            Stanza::Iq(_) => "iq",
            Stanza::Other(name) => name,
        }
    }
}

impl MessageStanza {
    fn from_element(element: &Element) -> Self {
        let bodies = element
            .children()
            .filter(|child| child.is("body", ns::JABBER_CLIENT))
            .map(Element::text)
            .collect();

        Self {
            from: element.attr("from").map(str::to_string),
            kind: MessageKind::from_attr(element.attr("type")),
            bodies,
        }
    }
}

impl IqStanza {
    fn from_element(element: &Element) -> Option<Self> {
        Some(Self {
            from: element.attr("from").map(str::to_string),
            kind: IqKind::from_attr(element.attr("type"))?,
        })
    }
}

/// Build a message stanza with a single body.
pub fn build_message(to: &str, body: &str, kind: MessageKind) -> Element {
    Element::builder("message", ns::JABBER_CLIENT)
        .attr("to", to)
        .attr("type", kind.as_str())
        .append(
            Element::builder("body", ns::JABBER_CLIENT)
                .append(body.to_string())
                .build(),
        )
        .build()
}

/// Build a MUC join presence addressed to `room/nick`.
///
/// Without `history` the room is asked to replay nothing.
pub fn build_muc_join(room: &str, nick: &str, history: bool) -> Element {
    let mut muc = Element::builder("x", ns::MUC);
    if !history {
        muc = muc.append(
            Element::builder("history", ns::MUC)
                .attr("maxchars", "0")
                .build(),
        );
    }

    Element::builder("presence", ns::JABBER_CLIENT)
        .attr("to", format!("{room}/{nick}"))
        .append(muc.build())
        .build()
}

/// Build an available presence with no recipient.
pub fn build_initial_presence() -> Element {
    Element::builder("presence", ns::JABBER_CLIENT).build()
}

/// Build a XEP-0199 ping request.
pub fn build_ping(to: &str, id: &str) -> Element {
    Element::builder("iq", ns::JABBER_CLIENT)
        .attr("type", "get")
        .attr("id", id)
        .attr("to", to)
        .append(Element::builder("ping", NS_PING).build())
        .build()
}

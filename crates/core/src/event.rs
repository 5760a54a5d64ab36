use serde::{Deserialize, Serialize};

use crate::hostmask::Hostmask;

/// A normalized event handed to the host framework by a driver.
///
/// Drivers produce at most one of these per poll; "nothing happened" is
/// expressed as `None` at the call site, never as a special event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
    /// A numeric server reply, real or synthesized by the driver.
    Response(ResponseEvent),
    /// A command originating from another user or the server.
    Request(RequestEvent),
}

impl Event {
    /// Build the synthetic "no MOTD" reply used to signal session start.
    pub fn no_motd() -> Self {
        Event::Response(ResponseEvent {
            code: ResponseCode::ERR_NOMOTD,
            description: String::new(),
        })
    }

    pub fn as_response(&self) -> Option<&ResponseEvent> {
        match self {
            Event::Response(response) => Some(response),
            Event::Request(_) => None,
        }
    }

    pub fn as_request(&self) -> Option<&RequestEvent> {
        match self {
            Event::Request(request) => Some(request),
            Event::Response(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEvent {
    pub code: ResponseCode,
    pub description: String,
}

/// IRC numeric reply code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseCode(pub u16);

impl ResponseCode {
    /// `ERR_NOMOTD`: the server has no message of the day.
    pub const ERR_NOMOTD: ResponseCode = ResponseCode(422);

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEvent {
    pub command: RequestCommand,
    /// Ordered arguments; the first is always the reply target.
    pub arguments: Vec<String>,
    pub hostmask: Hostmask,
}

impl RequestEvent {
    /// Where a plugin should send its reply.
    pub fn source(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Message text for `privmsg` requests.
    pub fn text(&self) -> Option<&str> {
        match self.command {
            RequestCommand::Privmsg => self.arguments.get(1).map(String::as_str),
            RequestCommand::Pong => None,
        }
    }
}

/// Commands a driver can surface as inbound requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestCommand {
    Privmsg,
    Pong,
}

impl RequestCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestCommand::Privmsg => "privmsg",
            RequestCommand::Pong => "pong",
        }
    }
}

impl std::fmt::Display for RequestCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

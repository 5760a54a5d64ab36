use serde::{Deserialize, Serialize};

/// Normalized sender identity attached to inbound requests.
///
/// Drivers derive this from whatever addressing their protocol uses; it is
/// built fresh for every event and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Hostmask {
    pub nick: String,
    pub username: String,
    pub host: String,
}

impl Hostmask {
    pub fn new(
        nick: impl Into<String>,
        username: impl Into<String>,
        host: impl Into<String>,
    ) -> Self {
        Self {
            nick: nick.into(),
            username: username.into(),
            host: host.into(),
        }
    }
}

impl std::fmt::Display for Hostmask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}@{}", self.nick, self.username, self.host)
    }
}

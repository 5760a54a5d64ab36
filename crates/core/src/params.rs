use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 5222;
pub const DEFAULT_RESOURCE: &str = "Bot";

/// Transport selector value that opts out of TLS.
pub const PLAIN_TRANSPORT: &str = "tcp";

/// Connection parameters supplied by the host before `connect`.
///
/// Read-only for the life of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionParams {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    pub nick: String,
    #[serde(default)]
    pub realname: String,
    /// Free-form transport selector; only `"tcp"` disables TLS.
    #[serde(default)]
    pub transport: Option<String>,
    #[serde(default = "default_resource")]
    pub resource: String,
}

impl ConnectionParams {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        nick: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            password: password.into(),
            nick: nick.into(),
            realname: String::new(),
            transport: None,
            resource: DEFAULT_RESOURCE.to_string(),
        }
    }

    pub fn with_transport(mut self, transport: impl Into<String>) -> Self {
        self.transport = Some(transport.into());
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Secure unless a plain transport was explicitly requested.
    pub fn is_secure(&self) -> bool {
        self.transport.as_deref() != Some(PLAIN_TRANSPORT)
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_resource() -> String {
    DEFAULT_RESOURCE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secure_by_default() {
        let params = ConnectionParams::new("example.com", "bot", "secret", "Bot");
        assert!(params.is_secure());
        assert!(params.clone().with_transport("ssl").is_secure());
        assert!(params.clone().with_transport("tls").is_secure());
    }

    #[test]
    fn tcp_transport_is_plain() {
        let params = ConnectionParams::new("example.com", "bot", "secret", "Bot").with_transport("tcp");
        assert!(!params.is_secure());
    }

    #[test]
    fn new_applies_defaults() {
        let params = ConnectionParams::new("example.com", "bot", "secret", "Bot");
        assert_eq!(params.port, 5222);
        assert_eq!(params.resource, "Bot");
        assert!(params.realname.is_empty());
    }
}

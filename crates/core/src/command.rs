use serde::{Deserialize, Serialize};

/// Outbound commands a host framework can ask a driver to perform.
///
/// The set mirrors IRC verbs. Drivers for other protocols are free to treat
/// any of them as a no-op, but must accept every variant without failing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "lowercase")]
pub enum Command {
    Action {
        target: String,
        text: String,
    },
    Notice {
        target: String,
        text: String,
    },
    Privmsg {
        target: String,
        text: String,
    },
    /// `channels` is a comma-delimited list, as on IRC.
    Join {
        channels: String,
        keys: Option<String>,
    },
    Ping {
        nick: String,
        hash: String,
    },
    Quit {
        reason: Option<String>,
    },
    Finger {
        nick: String,
        finger: Option<String>,
    },
    Invite {
        nick: String,
        channel: String,
    },
    Kick {
        nick: String,
        channel: String,
        reason: Option<String>,
    },
    List {
        channels: Option<String>,
    },
    Mode {
        target: String,
        mode: Option<String>,
        param: Option<String>,
    },
    Names {
        channels: String,
    },
    Nick {
        nick: String,
    },
    Part {
        channels: String,
    },
    Pong {
        daemon: String,
    },
    /// A protocol line sent verbatim.
    Raw {
        line: String,
    },
    Time {
        nick: String,
        time: Option<String>,
    },
    Topic {
        channel: String,
        topic: Option<String>,
    },
    Version {
        nick: String,
        version: Option<String>,
    },
    Whois {
        nick: String,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Action { .. } => "action",
            Command::Notice { .. } => "notice",
            Command::Privmsg { .. } => "privmsg",
            Command::Join { .. } => "join",
            Command::Ping { .. } => "ping",
            Command::Quit { .. } => "quit",
            Command::Finger { .. } => "finger",
            Command::Invite { .. } => "invite",
            Command::Kick { .. } => "kick",
            Command::List { .. } => "list",
            Command::Mode { .. } => "mode",
            Command::Names { .. } => "names",
            Command::Nick { .. } => "nick",
            Command::Part { .. } => "part",
            Command::Pong { .. } => "pong",
            Command::Raw { .. } => "raw",
            Command::Time { .. } => "time",
            Command::Topic { .. } => "topic",
            Command::Version { .. } => "version",
            Command::Whois { .. } => "whois",
        }
    }
}

impl std::fmt::Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_tagged_commands() {
        let command: Command =
            serde_json::from_str(r#"{"command":"join","channels":"a@muc,b@muc","keys":null}"#)
                .unwrap();
        assert_eq!(
            command,
            Command::Join {
                channels: "a@muc,b@muc".to_string(),
                keys: None,
            }
        );
        assert_eq!(command.name(), "join");
    }

    #[test]
    fn raw_line_survives_json() {
        let raw = Command::Raw {
            line: "PRIVMSG #perch :hello".to_string(),
        };
        let json = serde_json::to_value(&raw).unwrap();
        assert_eq!(json["command"], "raw");
        assert_eq!(json["line"], "PRIVMSG #perch :hello");

        let back: Command = serde_json::from_value(json).unwrap();
        assert_eq!(back, raw);
    }

    #[test]
    fn names_match_irc_verbs() {
        let quit = Command::Quit { reason: None };
        assert_eq!(quit.to_string(), "quit");

        let whois = Command::Whois {
            nick: "alice".to_string(),
        };
        assert_eq!(whois.name(), "whois");
    }
}

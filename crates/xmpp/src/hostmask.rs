//! Derive IRC-style hostmasks from XMPP sender addresses.

use perch_core::Hostmask;

use crate::stanza::StanzaType;

/// Build the hostmask for a sender address.
///
/// In a room the occupant's nickname lives in the resource, so
/// `room@service/nick` yields host `room@service` and nick and username
/// `nick`. Everywhere else the resource is dropped and `local@domain` yields
/// nick and username `local` with host `domain`. A bare domain has no
/// username and doubles as nick and host.
pub fn parse(address: &str, kind: StanzaType) -> Hostmask {
    let (bare, resource) = match address.split_once('/') {
        Some((bare, resource)) => (bare, Some(resource)),
        None => (address, None),
    };

    if kind.is_groupchat() {
        let nick = resource.unwrap_or_default();
        return Hostmask::new(nick, nick, bare);
    }

    match bare.split_once('@') {
        Some((local, domain)) => Hostmask::new(local, local, domain),
        None => Hostmask::new(bare, "", bare),
    }
}

/// Strip the resource from an address.
pub fn bare(address: &str) -> &str {
    address.split_once('/').map_or(address, |(bare, _)| bare)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stanza::{IqKind, MessageKind};

    const GROUPCHAT: StanzaType = StanzaType::Message(MessageKind::Groupchat);
    const CHAT: StanzaType = StanzaType::Message(MessageKind::Chat);

    #[test]
    fn room_occupant() {
        let hostmask = parse("room@conf.example/alice", GROUPCHAT);
        assert_eq!(hostmask, Hostmask::new("alice", "alice", "room@conf.example"));
    }

    #[test]
    fn room_occupant_keeps_slashes_in_nick() {
        let hostmask = parse("room@conf.example/alice/away", GROUPCHAT);
        assert_eq!(hostmask.nick, "alice/away");
        assert_eq!(hostmask.host, "room@conf.example");
    }

    #[test]
    fn room_without_occupant() {
        let hostmask = parse("room@conf.example", GROUPCHAT);
        assert_eq!(hostmask, Hostmask::new("", "", "room@conf.example"));
    }

    #[test]
    fn direct_sender_drops_resource() {
        let hostmask = parse("alice@example.com/phone", CHAT);
        assert_eq!(hostmask, Hostmask::new("alice", "alice", "example.com"));
        assert_eq!(hostmask.to_string(), "alice!alice@example.com");
    }

    #[test]
    fn bare_sender() {
        let hostmask = parse("alice@example.com", StanzaType::Message(MessageKind::Normal));
        assert_eq!(hostmask, Hostmask::new("alice", "alice", "example.com"));
    }

    #[test]
    fn server_address() {
        let hostmask = parse("example.com", StanzaType::Iq(IqKind::Get));
        assert_eq!(hostmask, Hostmask::new("example.com", "", "example.com"));
    }

    #[test]
    fn bare_strips_resource() {
        assert_eq!(bare("room@conf.example/alice"), "room@conf.example");
        assert_eq!(bare("alice@example.com"), "alice@example.com");
    }
}

use crate::{command::Command, event::Event};

/// The contract a host framework drives: connect once, issue commands, and
/// poll for events in a blocking loop.
///
/// Every command method must accept its input even when the underlying
/// protocol has no equivalent; such commands are silently absorbed.
pub trait Driver {
    type Error: std::error::Error + Send + Sync + 'static;

    fn connect(&mut self) -> Result<(), Self::Error>;

    fn action(&mut self, target: &str, text: &str) -> Result<(), Self::Error>;

    fn notice(&mut self, target: &str, text: &str) -> Result<(), Self::Error>;

    fn privmsg(&mut self, target: &str, text: &str) -> Result<(), Self::Error>;

    fn join(&mut self, channels: &str, keys: Option<&str>) -> Result<(), Self::Error>;

    fn ping(&mut self, nick: &str, hash: &str) -> Result<(), Self::Error>;

    fn quit(&mut self, reason: Option<&str>) -> Result<(), Self::Error>;

    fn finger(&mut self, nick: &str, finger: Option<&str>) -> Result<(), Self::Error>;

    fn invite(&mut self, nick: &str, channel: &str) -> Result<(), Self::Error>;

    fn kick(&mut self, nick: &str, channel: &str, reason: Option<&str>)
        -> Result<(), Self::Error>;

    fn list(&mut self, channels: Option<&str>) -> Result<(), Self::Error>;

    fn mode(
        &mut self,
        target: &str,
        mode: Option<&str>,
        param: Option<&str>,
    ) -> Result<(), Self::Error>;

    fn names(&mut self, channels: &str) -> Result<(), Self::Error>;

    fn nick(&mut self, nick: &str) -> Result<(), Self::Error>;

    fn part(&mut self, channels: &str) -> Result<(), Self::Error>;

    fn pong(&mut self, daemon: &str) -> Result<(), Self::Error>;

    fn raw(&mut self, line: &str) -> Result<(), Self::Error>;

    fn time(&mut self, nick: &str, time: Option<&str>) -> Result<(), Self::Error>;

    fn topic(&mut self, channel: &str, topic: Option<&str>) -> Result<(), Self::Error>;

    fn version(&mut self, nick: &str, version: Option<&str>) -> Result<(), Self::Error>;

    fn whois(&mut self, nick: &str) -> Result<(), Self::Error>;

    /// False once the underlying connection is gone, whether by `quit` or
    /// because the peer closed it.
    fn is_connected(&self) -> bool;

    /// Block until the next event is available.
    ///
    /// `None` is a normal outcome meaning nothing worth surfacing arrived.
    fn next_event(&mut self) -> Option<Event>;

    /// Route a [`Command`] value to the matching method.
    fn dispatch(&mut self, command: &Command) -> Result<(), Self::Error> {
        match command {
            Command::Action { target, text } => self.action(target, text),
            Command::Notice { target, text } => self.notice(target, text),
            Command::Privmsg { target, text } => self.privmsg(target, text),
            Command::Join { channels, keys } => self.join(channels, keys.as_deref()),
            Command::Ping { nick, hash } => self.ping(nick, hash),
            Command::Quit { reason } => self.quit(reason.as_deref()),
            Command::Finger { nick, finger } => self.finger(nick, finger.as_deref()),
            Command::Invite { nick, channel } => self.invite(nick, channel),
            Command::Kick {
                nick,
                channel,
                reason,
            } => self.kick(nick, channel, reason.as_deref()),
            Command::List { channels } => self.list(channels.as_deref()),
            Command::Mode {
                target,
                mode,
                param,
            } => self.mode(target, mode.as_deref(), param.as_deref()),
            Command::Names { channels } => self.names(channels),
            Command::Nick { nick } => self.nick(nick),
            Command::Part { channels } => self.part(channels),
            Command::Pong { daemon } => self.pong(daemon),
            Command::Raw { line } => self.raw(line),
            Command::Time { nick, time } => self.time(nick, time.as_deref()),
            Command::Topic { channel, topic } => self.topic(channel, topic.as_deref()),
            Command::Version { nick, version } => self.version(nick, version.as_deref()),
            Command::Whois { nick } => self.whois(nick),
        }
    }
}

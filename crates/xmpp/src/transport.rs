//! [`XmppSession`](crate::session::XmppSession) over a real network stream.
//!
//! Feature-gated implementations provide the concrete session:
//! - `TokioXmppSession` (native feature): STARTTLS or plain TCP via tokio-xmpp

#[cfg(feature = "native")]
pub use native::{TokioXmppSession, HANDSHAKE_TIMEOUT};

#[cfg(feature = "native")]
mod native {
    use std::collections::HashSet;
    use std::str::FromStr;
    use std::time::Duration;

    use futures::StreamExt;
    use minidom::Element;
    use tokio::runtime::{Builder, Runtime};
    use tokio_xmpp::starttls::ServerConfig;
    use tokio_xmpp::tcp::TcpServerConnector;
    use tokio_xmpp::{AsyncClient, AsyncConfig, Event as TokioXmppEvent};
    use tracing::{debug, error, info, warn, Level};
    use xmpp_parsers::jid::Jid;

    use crate::error::SessionError;
    use crate::hostmask;
    use crate::session::{SessionSettings, XmppSession};
    use crate::stanza::{self, MessageKind, Stanza};

    /// Upper bound for TLS negotiation, SASL and resource binding.
    pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

    enum Client {
        Secure(AsyncClient<ServerConfig>),
        Plain(AsyncClient<TcpServerConnector>),
    }

    impl Client {
        async fn next(&mut self) -> Option<TokioXmppEvent> {
            match self {
                Client::Secure(client) => client.next().await,
                Client::Plain(client) => client.next().await,
            }
        }

        async fn send_stanza(&mut self, element: Element) -> Result<(), tokio_xmpp::Error> {
            match self {
                Client::Secure(client) => client.send_stanza(element).await,
                Client::Plain(client) => client.send_stanza(element).await,
            }
        }

        async fn send_end(&mut self) -> Result<(), tokio_xmpp::Error> {
            match self {
                Client::Secure(client) => client.send_end().await,
                Client::Plain(client) => client.send_end().await,
            }
        }
    }

    /// Blocking session around `tokio_xmpp::AsyncClient`.
    ///
    /// Owns a current-thread runtime; the async client only makes progress
    /// while one of the blocking methods is running.
    pub struct TokioXmppSession {
        settings: SessionSettings,
        jid: Jid,
        runtime: Runtime,
        client: Option<Client>,
        bound_jid: Option<Jid>,
        rooms: HashSet<String>,
    }

    impl TokioXmppSession {
        fn logs(&self, level: Level) -> bool {
            level <= self.settings.log_level
        }

        fn client(&mut self) -> Result<&mut Client, SessionError> {
            self.client.as_mut().ok_or(SessionError::NotConnected)
        }

        fn send(&mut self, element: Element) -> Result<(), SessionError> {
            let client = self.client.as_mut().ok_or(SessionError::NotConnected)?;
            let result = self.runtime.block_on(client.send_stanza(element));
            result.map_err(|e| {
                if self.logs(Level::ERROR) {
                    error!(error = %e, "failed to send stanza");
                }
                SessionError::Transport(e.to_string())
            })
        }

        fn ping_target(&self) -> String {
            match &self.bound_jid {
                Some(jid) => jid.domain().to_string(),
                None => self.settings.host.clone(),
            }
        }
    }

    impl XmppSession for TokioXmppSession {
        fn open(settings: SessionSettings) -> Result<Self, SessionError> {
            let address = settings.jid();
            let jid = Jid::from_str(&address).map_err(|e| SessionError::InvalidAddress {
                address: address.clone(),
                message: e.to_string(),
            })?;

            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| SessionError::Construction(e.to_string()))?;

            Ok(Self {
                settings,
                jid,
                runtime,
                client: None,
                bound_jid: None,
                rooms: HashSet::new(),
            })
        }

        fn connect(&mut self) -> Result<(), SessionError> {
            let host = self.settings.host.clone();
            let port = self.settings.port;
            let password = self.settings.password.clone();
            let jid = self.jid.clone();

            // The client spawns its connect task onto the current runtime.
            let _guard = self.runtime.enter();
            let client = if self.settings.secure {
                let mut client = AsyncClient::new_with_config(AsyncConfig {
                    jid,
                    password,
                    server: ServerConfig::Manual {
                        host: host.clone(),
                        port,
                    },
                });
                client.set_reconnect(false);
                Client::Secure(client)
            } else {
                let mut client = AsyncClient::new_with_config(AsyncConfig {
                    jid,
                    password,
                    server: TcpServerConnector::new(format!("{host}:{port}")),
                });
                client.set_reconnect(false);
                Client::Plain(client)
            };
            drop(_guard);

            if self.logs(Level::INFO) {
                info!(%host, port, secure = self.settings.secure, "connecting");
            }
            self.client = Some(client);
            Ok(())
        }

        fn authenticate(&mut self) -> Result<(), SessionError> {
            let client = self.client.as_mut().ok_or(SessionError::NotConnected)?;
            let outcome = self.runtime.block_on(async {
                tokio::time::timeout(HANDSHAKE_TIMEOUT, async {
                    loop {
                        match client.next().await {
                            Some(TokioXmppEvent::Online { bound_jid, .. }) => {
                                return Ok(bound_jid);
                            }
                            Some(TokioXmppEvent::Disconnected(tokio_xmpp::Error::Auth(e))) => {
                                return Err(SessionError::Authentication(e.to_string()));
                            }
                            Some(TokioXmppEvent::Disconnected(e)) => {
                                return Err(SessionError::Transport(e.to_string()));
                            }
                            Some(TokioXmppEvent::Stanza(_)) => continue,
                            None => {
                                return Err(SessionError::Transport(
                                    "stream closed during handshake".to_string(),
                                ));
                            }
                        }
                    }
                })
                .await
            });

            match outcome {
                Ok(Ok(bound_jid)) => {
                    self.bound_jid = Some(bound_jid);
                    Ok(())
                }
                Ok(Err(e)) => {
                    self.client = None;
                    if self.logs(Level::ERROR) {
                        error!(error = %e, "handshake failed");
                    }
                    Err(e)
                }
                Err(_) => {
                    self.client = None;
                    Err(SessionError::Transport(format!(
                        "handshake did not finish within {}s",
                        HANDSHAKE_TIMEOUT.as_secs()
                    )))
                }
            }
        }

        fn bind(&mut self) -> Result<(), SessionError> {
            match &self.bound_jid {
                Some(jid) if jid.resource().is_some() => {
                    if self.logs(Level::DEBUG) {
                        debug!(jid = %jid, "resource bound");
                    }
                    Ok(())
                }
                Some(jid) => Err(SessionError::Bind(format!(
                    "server returned a bare JID: {jid}"
                ))),
                None => Err(SessionError::Bind("no JID was bound".to_string())),
            }
        }

        fn establish_session(&mut self) -> Result<(), SessionError> {
            // Session establishment is optional since RFC 6121.
            self.client()?;
            Ok(())
        }

        fn presence(&mut self) -> Result<(), SessionError> {
            self.send(stanza::build_initial_presence())
        }

        fn message(&mut self, to: &str, body: &str) -> Result<(), SessionError> {
            let kind = if self.rooms.contains(to) {
                MessageKind::Groupchat
            } else {
                MessageKind::Chat
            };
            self.send(stanza::build_message(to, body, kind))
        }

        fn join(&mut self, room: &str, nick: &str, history: bool) -> Result<(), SessionError> {
            let room = hostmask::bare(room);
            self.send(stanza::build_muc_join(room, nick, history))?;
            self.rooms.insert(room.to_string());
            Ok(())
        }

        fn ping(&mut self) -> Result<(), SessionError> {
            let id = uuid::Uuid::new_v4().to_string();
            let target = self.ping_target();
            self.send(stanza::build_ping(&target, &id))
        }

        fn disconnect(&mut self) -> Result<(), SessionError> {
            self.rooms.clear();
            self.bound_jid = None;
            let Some(mut client) = self.client.take() else {
                return Ok(());
            };
            self.runtime
                .block_on(client.send_end())
                .map_err(|e| SessionError::Transport(e.to_string()))
        }

        fn is_connected(&self) -> bool {
            self.client.is_some()
        }

        fn wait(&mut self) -> Result<Option<Stanza>, SessionError> {
            let wait_timeout = self.settings.wait_timeout;
            let Some(client) = self.client.as_mut() else {
                // Keep a dead session from turning the poll loop into a spin.
                std::thread::sleep(wait_timeout);
                return Err(SessionError::NotConnected);
            };
            let next = self
                .runtime
                .block_on(async { tokio::time::timeout(wait_timeout, client.next()).await });

            match next {
                Err(_) => Ok(None),
                Ok(Some(TokioXmppEvent::Stanza(element))) => {
                    Ok(Some(Stanza::from_element(&element)))
                }
                Ok(Some(TokioXmppEvent::Online { .. })) => Ok(None),
                Ok(Some(TokioXmppEvent::Disconnected(e))) => {
                    self.client = None;
                    if self.logs(Level::WARN) {
                        warn!(error = %e, "stream disconnected");
                    }
                    Err(SessionError::Transport(e.to_string()))
                }
                Ok(None) => {
                    self.client = None;
                    Err(SessionError::Transport("stream closed".to_string()))
                }
            }
        }
    }

}

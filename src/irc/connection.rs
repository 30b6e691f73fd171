use crate::app::event::{AppEvent, NetworkId};
use futures::StreamExt;
use irc::client::prelude::*;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("connection failed: {0}")]
    Irc(#[from] irc::error::Error),
}

pub struct Connection {
    pub network_id: NetworkId,
    pub sender: irc::client::Sender,
}

/// Open one outbound connection and pump its messages into the dispatch
/// loop. A single attempt: errors here are terminal for the session.
///
/// Registration is not performed here. The event handler reacts to
/// `IrcConnected` by sending `NICK`/`USER`, so the whole login sequence
/// lives in one place.
pub async fn spawn_connection(
    network_id: NetworkId,
    host: String,
    port: u16,
    tls: bool,
    nickname: String,
    event_tx: mpsc::UnboundedSender<AppEvent>,
) -> Result<Connection, ConnectError> {
    let config = Config {
        server: Some(host),
        port: Some(port),
        use_tls: Some(tls),
        nickname: Some(nickname),
        ..Config::default()
    };

    let mut client = Client::from_config(config).await?;
    let sender = client.sender();
    let mut stream = client.stream()?;

    let _ = event_tx.send(AppEvent::IrcConnected { network_id });

    tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(message) => {
                    tracing::trace!(network_id, %message, "inbound");
                    if event_tx
                        .send(AppEvent::IrcMessage { network_id, message })
                        .is_err()
                    {
                        break;
                    }
                }
                Err(e) => {
                    let _ = event_tx.send(AppEvent::IrcError {
                        network_id,
                        error: e.to_string(),
                    });
                    break;
                }
            }
        }
        let _ = event_tx.send(AppEvent::IrcDisconnected {
            network_id,
            reason: "connection closed".to_string(),
        });
    });

    Ok(Connection { network_id, sender })
}

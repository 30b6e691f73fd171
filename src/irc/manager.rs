use crate::app::event::{AppEvent, NetworkId};
use crate::app::state::NetworkState;
use crate::irc::connection::{spawn_connection, ConnectError, Connection};
use anyhow::Result;
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Owns the live connection handles, one per network. Sessions never touch
/// sockets directly: the handler emits actions and the main loop calls in
/// here. Once a network is dropped from the map no command can reach it.
pub struct NetworkManager {
    connections: HashMap<NetworkId, Connection>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl NetworkManager {
    pub fn new(event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        Self {
            connections: HashMap::new(),
            event_tx,
        }
    }

    pub async fn connect(&mut self, network: &NetworkState) -> Result<(), ConnectError> {
        let conn = spawn_connection(
            network.id,
            network.host.clone(),
            network.port,
            network.tls,
            network.nickname.clone(),
            self.event_tx.clone(),
        )
        .await?;

        self.connections.insert(network.id, conn);
        Ok(())
    }

    pub fn disconnect(&mut self, network_id: NetworkId, message: Option<&str>) {
        if let Some(conn) = self.connections.remove(&network_id) {
            tracing::debug!(network_id = conn.network_id, "closing connection");
            let _ = conn.sender.send_quit(message.unwrap_or("Leaving"));
        }
    }

    fn sender(&self, network_id: NetworkId) -> Option<&irc::client::Sender> {
        self.connections.get(&network_id).map(|c| &c.sender)
    }

    /// Send a literal protocol line. Silently dropped when the connection is
    /// gone, matching the no-commands-after-close rule.
    pub fn send_raw(&self, network_id: NetworkId, line: &str) -> Result<()> {
        if let Some(sender) = self.sender(network_id) {
            sender.send(irc::proto::Command::Raw(line.to_string(), vec![]))?;
        }
        Ok(())
    }

    pub fn send_privmsg(&self, network_id: NetworkId, target: &str, text: &str) -> Result<()> {
        if let Some(sender) = self.sender(network_id) {
            // No CTCP injection in outbound messages
            let clean = text.replace('\x01', "");
            sender.send_privmsg(target, &clean)?;
        }
        Ok(())
    }

    pub fn send_join(&self, network_id: NetworkId, channel: &str) -> Result<()> {
        if let Some(sender) = self.sender(network_id) {
            sender.send_join(channel)?;
        }
        Ok(())
    }

    pub fn send_part(&self, network_id: NetworkId, channel: &str) -> Result<()> {
        if let Some(sender) = self.sender(network_id) {
            sender.send(irc::proto::Command::PART(channel.to_string(), None))?;
        }
        Ok(())
    }

    pub fn send_pong(&self, network_id: NetworkId, token: &str) -> Result<()> {
        if let Some(sender) = self.sender(network_id) {
            sender.send(irc::proto::Command::PONG(token.to_string(), None))?;
        }
        Ok(())
    }

    pub fn quit_all(&mut self, message: Option<&str>) {
        let msg = message.unwrap_or("Leaving");
        for (_, conn) in self.connections.drain() {
            tracing::debug!(network_id = conn.network_id, "closing connection");
            let _ = conn.sender.send_quit(msg);
        }
    }
}

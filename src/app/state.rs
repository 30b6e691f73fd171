//! Session state: networks, the channel/query registry, and display surfaces.
//!
//! Every tab is a [`Surface`]. Which protocol events reach which surface is
//! decided by the registry maps on [`NetworkState`]: at most one channel
//! session per (network, channel) and one query session per (network, nick),
//! keys folded to lowercase because IRC names are case-insensitive. Registry
//! entries and surfaces are created and removed together; a session that has
//! been detached can no longer receive events.

use crate::app::event::NetworkId;
use crate::complete::Completion;
use crate::config::AppConfig;
use crate::input::InputState;
use chrono::Local;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionKey {
    Network(NetworkId),
    /// Channel name, lowercased.
    Channel(NetworkId, String),
    /// Peer nickname, lowercased.
    Query(NetworkId, String),
}

impl SessionKey {
    pub fn channel(network_id: NetworkId, name: &str) -> Self {
        SessionKey::Channel(network_id, name.to_lowercase())
    }

    pub fn query(network_id: NetworkId, nick: &str) -> Self {
        SessionKey::Query(network_id, nick.to_lowercase())
    }

    pub fn network_id(&self) -> NetworkId {
        match self {
            SessionKey::Network(id) => *id,
            SessionKey::Channel(id, _) => *id,
            SessionKey::Query(id, _) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    /// `<nick> msg`
    Chat,
    /// Topic, peers, connection notices
    Notice,
    /// `>>> ... <<<` lifecycle lines
    Event,
    Error,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub timestamp: String,
    pub text: String,
    pub kind: LineKind,
}

/// One tab: a scrollback of formatted lines plus its completion cursor.
/// Appends only ever touch `lines`; the input line lives elsewhere, so chat
/// output can never clobber what the user is typing.
#[derive(Debug)]
pub struct Surface {
    pub title: String,
    pub lines: Vec<Line>,
    pub scroll_offset: usize,
    pub unread_count: usize,
    pub completion: Completion,
}

impl Surface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            scroll_offset: 0,
            unread_count: 0,
            completion: Completion::default(),
        }
    }

    pub fn push(&mut self, line: Line, max_scrollback: usize) {
        self.lines.push(line);
        if self.lines.len() > max_scrollback {
            self.lines.remove(0);
            if self.scroll_offset > 0 {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelPhase {
    /// JOIN sent, self-join not yet seen.
    Joining,
    Active,
}

#[derive(Debug)]
pub struct ChannelState {
    /// Display name with original casing.
    pub name: String,
    pub phase: ChannelPhase,
    /// Known members, used as the completion candidate pool.
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

#[derive(Debug)]
pub struct NetworkState {
    pub id: NetworkId,
    pub name: String,
    pub host: String,
    pub port: u16,
    pub tls: bool,
    /// `USER` parameters, sent verbatim at login.
    pub user: String,
    /// Configured nickname, sent at login.
    pub nickname: String,
    /// Tracks self nick changes after login.
    pub current_nick: String,
    /// Raw command sent once after end-of-MOTD (nickserv identify, usually).
    pub login_cmd: Option<String>,
    /// Channels joined in order after end-of-MOTD.
    pub autojoin: Vec<String>,
    pub status: ConnectionStatus,
    /// Channel registry: lowercased name -> session.
    pub channels: HashMap<String, ChannelState>,
    /// Query registry: lowercased nick -> display nick.
    pub queries: HashMap<String, String>,
}

impl NetworkState {
    pub fn from_config(id: NetworkId, cfg: &crate::config::model::NetworkConfig) -> Self {
        Self {
            id,
            name: cfg.name.clone(),
            host: cfg.host.clone(),
            port: cfg.port,
            tls: cfg.tls,
            user: cfg.user.clone(),
            nickname: cfg.nickname.clone(),
            current_nick: cfg.nickname.clone(),
            login_cmd: cfg.login_cmd.clone(),
            autojoin: cfg.channels.clone(),
            status: ConnectionStatus::Connecting,
            channels: HashMap::new(),
            queries: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Messages,
    Input,
}

pub struct AppState {
    pub config: AppConfig,
    pub networks: Vec<NetworkState>,
    pub surfaces: BTreeMap<SessionKey, Surface>,
    pub active: Option<SessionKey>,
    pub input: InputState,
    pub focus: FocusPanel,
    pub next_network_id: NetworkId,
    pub should_quit: bool,
    pub dirty: bool,
    /// Lines appended since the last loop turn, drained by the chat logger.
    pub new_lines: Vec<(SessionKey, Line)>,
    pub timestamp_format: String,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let timestamp_format = config.ui.timestamp_format.clone();
        Self {
            config,
            networks: Vec::new(),
            surfaces: BTreeMap::new(),
            active: None,
            input: InputState::new(),
            focus: FocusPanel::Input,
            next_network_id: 0,
            should_quit: false,
            dirty: true,
            new_lines: Vec::new(),
            timestamp_format,
        }
    }

    pub fn allocate_network_id(&mut self) -> NetworkId {
        let id = self.next_network_id;
        self.next_network_id += 1;
        id
    }

    /// Register a network and create its status surface.
    pub fn add_network(&mut self, network: NetworkState) {
        let key = SessionKey::Network(network.id);
        self.surfaces
            .entry(key.clone())
            .or_insert_with(|| Surface::new(network.name.clone()));
        if self.active.is_none() {
            self.active = Some(key);
        }
        self.networks.push(network);
        self.dirty = true;
    }

    pub fn get_network(&self, id: NetworkId) -> Option<&NetworkState> {
        self.networks.iter().find(|n| n.id == id)
    }

    pub fn get_network_mut(&mut self, id: NetworkId) -> Option<&mut NetworkState> {
        self.networks.iter_mut().find(|n| n.id == id)
    }

    fn timestamp(&self) -> String {
        Local::now().format(&self.timestamp_format).to_string()
    }

    /// Append a formatted line to an existing surface. Lines addressed to a
    /// surface that is gone are dropped; a detached session must not render.
    pub fn push_line(&mut self, key: &SessionKey, text: String, kind: LineKind) {
        let timestamp = self.timestamp();
        let max = self.config.ui.max_scrollback;
        let is_active = self.active.as_ref() == Some(key);
        let Some(surface) = self.surfaces.get_mut(key) else {
            tracing::debug!(?key, "dropping line for missing surface: {}", text);
            return;
        };
        let line = Line { timestamp, text, kind };
        surface.push(line.clone(), max);
        if !is_active {
            surface.unread_count += 1;
        }
        self.new_lines.push((key.clone(), line));
        self.dirty = true;
    }

    pub fn notice(&mut self, key: &SessionKey, text: String) {
        self.push_line(key, text, LineKind::Notice);
    }

    pub fn error(&mut self, key: &SessionKey, text: String) {
        self.push_line(key, text, LineKind::Error);
    }

    /// Record that a JOIN was sent so the eventual self-join is expected.
    pub fn channel_joining(&mut self, network_id: NetworkId, chan: &str) {
        if let Some(net) = self.get_network_mut(network_id) {
            net.channels
                .entry(chan.to_lowercase())
                .or_insert_with(|| ChannelState {
                    name: chan.to_string(),
                    phase: ChannelPhase::Joining,
                    peers: Vec::new(),
                });
        }
    }

    /// Self-join arrived: activate the session and create its tab in one
    /// step. Idempotent for the at-most-one-session invariant.
    pub fn channel_opened(&mut self, network_id: NetworkId, chan: &str) -> SessionKey {
        let key = SessionKey::channel(network_id, chan);
        if let Some(net) = self.get_network_mut(network_id) {
            let entry = net
                .channels
                .entry(chan.to_lowercase())
                .or_insert_with(|| ChannelState {
                    name: chan.to_string(),
                    phase: ChannelPhase::Joining,
                    peers: Vec::new(),
                });
            entry.phase = ChannelPhase::Active;
        }
        self.surfaces
            .entry(key.clone())
            .or_insert_with(|| Surface::new(chan.to_string()));
        self.set_active(key.clone());
        key
    }

    /// Is this channel currently registered to receive events?
    pub fn channel_session(&self, network_id: NetworkId, chan: &str) -> Option<&ChannelState> {
        self.get_network(network_id)
            .and_then(|n| n.channels.get(&chan.to_lowercase()))
            .filter(|c| c.phase == ChannelPhase::Active)
    }

    pub fn channel_session_mut(
        &mut self,
        network_id: NetworkId,
        chan: &str,
    ) -> Option<&mut ChannelState> {
        self.get_network_mut(network_id)
            .and_then(|n| n.channels.get_mut(&chan.to_lowercase()))
            .filter(|c| c.phase == ChannelPhase::Active)
    }

    /// The server refused a JOIN: drop the pending entry so it cannot sit in
    /// the registry forever. Active sessions are left alone.
    pub fn abandon_join(&mut self, network_id: NetworkId, chan: &str) -> bool {
        let Some(net) = self.get_network_mut(network_id) else {
            return false;
        };
        let key = chan.to_lowercase();
        if net.channels.get(&key).map(|c| c.phase) == Some(ChannelPhase::Joining) {
            net.channels.remove(&key);
            true
        } else {
            false
        }
    }

    /// Remove the channel from the registry. This is the single cleanup path
    /// both teardowns converge on: self-part/kick from the wire, and the
    /// user closing the tab. The scrollback stays readable until the tab is
    /// closed; no further events reach it.
    pub fn detach_channel(&mut self, network_id: NetworkId, chan: &str) -> bool {
        self.get_network_mut(network_id)
            .map(|n| n.channels.remove(&chan.to_lowercase()).is_some())
            .unwrap_or(false)
    }

    /// Find-or-create the query session for a nick, matched
    /// case-insensitively. A miss is the creation trigger, not a fault: the
    /// tab exists before anything is delivered to it.
    pub fn open_query(&mut self, network_id: NetworkId, nick: &str) -> SessionKey {
        let key = SessionKey::query(network_id, nick);
        if let Some(net) = self.get_network_mut(network_id) {
            net.queries
                .entry(nick.to_lowercase())
                .or_insert_with(|| nick.to_string());
        }
        self.surfaces
            .entry(key.clone())
            .or_insert_with(|| Surface::new(nick.to_string()));
        key
    }

    /// Deliver a private-chat line, creating the session first if needed.
    pub fn deliver_query(&mut self, network_id: NetworkId, nick: &str, text: String) {
        let key = self.open_query(network_id, nick);
        self.push_line(&key, text, LineKind::Chat);
    }

    /// UI teardown of a channel or query tab: registry entry and surface go
    /// in the same step. Returns the channel display name if the caller
    /// still owes the server a PART.
    pub fn close_tab(&mut self, key: &SessionKey) -> Option<String> {
        let part = match key {
            SessionKey::Network(_) => return None, // status tabs are permanent
            SessionKey::Channel(id, chan) => {
                let name = self
                    .get_network(*id)
                    .and_then(|n| n.channels.get(chan))
                    .map(|c| c.name.clone());
                self.detach_channel(*id, chan);
                name
            }
            SessionKey::Query(id, nick) => {
                if let Some(net) = self.get_network_mut(*id) {
                    net.queries.remove(nick);
                }
                None
            }
        };
        self.surfaces.remove(key);
        if self.active.as_ref() == Some(key) {
            self.active = Some(SessionKey::Network(key.network_id()));
        }
        self.dirty = true;
        part
    }

    /// Connection closed: every session tied to it is unregistered in the
    /// same step, so nothing routes to them anymore. Surfaces stay for
    /// reading scrollback; the sender is gone, so no command can leave.
    pub fn close_network(&mut self, network_id: NetworkId) {
        if let Some(net) = self.get_network_mut(network_id) {
            net.status = ConnectionStatus::Disconnected;
            net.channels.clear();
            net.queries.clear();
        }
        self.dirty = true;
    }

    pub fn set_active(&mut self, key: SessionKey) {
        if let Some(surface) = self.surfaces.get_mut(&key) {
            surface.unread_count = 0;
        }
        self.active = Some(key);
        self.dirty = true;
    }

    pub fn active_network_id(&self) -> Option<NetworkId> {
        self.active.as_ref().map(|k| k.network_id())
    }

    pub fn active_surface_mut(&mut self) -> Option<&mut Surface> {
        let key = self.active.clone()?;
        self.surfaces.get_mut(&key)
    }

    pub fn select_next_tab(&mut self) {
        self.select_tab(1);
    }

    pub fn select_prev_tab(&mut self) {
        self.select_tab(-1);
    }

    fn select_tab(&mut self, step: isize) {
        let keys: Vec<_> = self.surfaces.keys().cloned().collect();
        if keys.is_empty() {
            return;
        }
        let current = self
            .active
            .as_ref()
            .and_then(|k| keys.iter().position(|x| x == k))
            .unwrap_or(0);
        let next = (current as isize + step).rem_euclid(keys.len() as isize) as usize;
        self.set_active(keys[next].clone());
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPanel::Input => FocusPanel::Messages,
            FocusPanel::Messages => FocusPanel::Input,
        };
        self.dirty = true;
    }

    pub fn status_line(&self) -> String {
        let connected = self
            .networks
            .iter()
            .filter(|n| n.status == ConnectionStatus::Connected)
            .count();
        format!("Networks: {}/{}", connected, self.networks.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_with_network() -> AppState {
        let mut state = AppState::new(AppConfig::default());
        let id = state.allocate_network_id();
        state.add_network(NetworkState {
            id,
            name: "testnet".into(),
            host: "irc.example.org".into(),
            port: 6667,
            tls: false,
            user: "vy vy vy :vy".into(),
            nickname: "alice".into(),
            current_nick: "alice".into(),
            login_cmd: None,
            autojoin: vec![],
            status: ConnectionStatus::Connected,
            channels: HashMap::new(),
            queries: HashMap::new(),
        });
        state
    }

    #[test]
    fn test_query_lookup_is_case_insensitive() {
        let mut state = state_with_network();
        let first = state.open_query(0, "Bob");
        let second = state.open_query(0, "bOB");
        assert_eq!(first, second);
        assert_eq!(state.get_network(0).unwrap().queries.len(), 1);
        // One tab, titled with the casing seen first.
        assert_eq!(state.surfaces.get(&first).unwrap().title, "Bob");
    }

    #[test]
    fn test_deliver_creates_session_before_appending() {
        let mut state = state_with_network();
        assert!(state.get_network(0).unwrap().queries.is_empty());
        state.deliver_query(0, "Bob", "<Bob> hi".into());
        let key = SessionKey::query(0, "bob");
        let surface = state.surfaces.get(&key).unwrap();
        assert_eq!(surface.lines.len(), 1);
        assert_eq!(surface.lines[0].text, "<Bob> hi");
        // A second delivery reuses the session.
        state.deliver_query(0, "BOB", "<BOB> again".into());
        assert_eq!(state.surfaces.get(&key).unwrap().lines.len(), 2);
        assert_eq!(state.get_network(0).unwrap().queries.len(), 1);
    }

    #[test]
    fn test_detached_channel_receives_nothing() {
        let mut state = state_with_network();
        let key = state.channel_opened(0, "#Test");
        assert!(state.channel_session(0, "#test").is_some());
        state.push_line(&key, "<bob> hi".into(), LineKind::Chat);
        assert!(state.detach_channel(0, "#TEST"));
        assert!(state.channel_session(0, "#test").is_none());
        // Registry entry is gone in the same step as its routing.
        assert!(!state.get_network(0).unwrap().channels.contains_key("#test"));
    }

    #[test]
    fn test_close_tab_removes_registry_and_surface_together() {
        let mut state = state_with_network();
        let key = state.channel_opened(0, "#vy");
        let part = state.close_tab(&key);
        assert_eq!(part.as_deref(), Some("#vy"));
        assert!(state.surfaces.get(&key).is_none());
        assert!(state.get_network(0).unwrap().channels.is_empty());
        assert_eq!(state.active, Some(SessionKey::Network(0)));
    }

    #[test]
    fn test_close_network_clears_all_sessions() {
        let mut state = state_with_network();
        state.channel_opened(0, "#a");
        state.open_query(0, "bob");
        state.close_network(0);
        let net = state.get_network(0).unwrap();
        assert_eq!(net.status, ConnectionStatus::Disconnected);
        assert!(net.channels.is_empty());
        assert!(net.queries.is_empty());
        // Scrollback survives for reading.
        assert!(state.surfaces.contains_key(&SessionKey::channel(0, "#a")));
    }

    #[test]
    fn test_joining_channel_is_not_active() {
        let mut state = state_with_network();
        state.channel_joining(0, "#vy");
        assert!(state.channel_session(0, "#vy").is_none());
        state.channel_opened(0, "#vy");
        assert!(state.channel_session(0, "#vy").is_some());
    }
}

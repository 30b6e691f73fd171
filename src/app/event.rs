use crossterm::event::Event as CrosstermEvent;

pub type NetworkId = usize;

/// Everything the dispatch loop can receive. Handlers run to completion, one
/// event at a time, so session state needs no locking. Protocol messages for
/// a connection arrive in the order the connection received them.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal input event
    Terminal(CrosstermEvent),

    /// Protocol message received from a network
    IrcMessage {
        network_id: NetworkId,
        message: irc::proto::Message,
    },

    /// Connection state changes
    IrcConnected {
        network_id: NetworkId,
    },
    IrcDisconnected {
        network_id: NetworkId,
        reason: String,
    },
    IrcError {
        network_id: NetworkId,
        error: String,
    },

    /// Tick for UI refresh
    Tick,
}

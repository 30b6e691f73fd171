use crate::app::event::NetworkId;

/// Outbound work produced by the event handler and executed by the main
/// loop. Keeping these as data makes the handler a pure function over state,
/// which is what the tests drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// A literal protocol line, sent verbatim (`NICK ...`, `USER ...`,
    /// the configured post-login command, user raw commands).
    SendRaw { network_id: NetworkId, line: String },
    SendPrivmsg { network_id: NetworkId, target: String, text: String },
    SendJoin { network_id: NetworkId, channel: String },
    SendPart { network_id: NetworkId, channel: String },
    SendPong { network_id: NetworkId, token: String },
    /// Open the connection for an already-registered network.
    ConnectNetwork { network_id: NetworkId },
    DisconnectNetwork { network_id: NetworkId },
    Quit { message: Option<String> },
}

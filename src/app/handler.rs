//! The dispatch loop's brain.
//!
//! [`handle_event`] is a pure function from (state, event) to a list of
//! [`Action`]s; the main loop executes the actions against the network
//! manager. Inbound protocol messages go through one exhaustive match per
//! command kind, and routing to channel/query sessions is decided by the
//! registry in [`AppState`] alone.

use crate::app::action::Action;
use crate::app::event::{AppEvent, NetworkId};
use crate::app::format;
use crate::app::state::*;
use crate::input::PromptMode;
use crate::irc::commands::{parse_command, ParsedCommand};
use crossterm::event::{Event as CEvent, KeyCode, KeyEvent, KeyModifiers};

pub fn handle_event(state: &mut AppState, event: AppEvent) -> Vec<Action> {
    match event {
        AppEvent::Terminal(cevent) => {
            state.dirty = true;
            handle_terminal(state, cevent)
        }
        AppEvent::IrcMessage { network_id, message } => {
            handle_irc_message(state, network_id, message)
        }
        AppEvent::IrcConnected { network_id } => on_connected(state, network_id),
        AppEvent::IrcDisconnected { network_id, reason } => {
            state.close_network(network_id);
            let key = SessionKey::Network(network_id);
            state.notice(&key, format!("Disconnected: {}", reason));
            vec![]
        }
        AppEvent::IrcError { network_id, error } => {
            let key = SessionKey::Network(network_id);
            state.error(&key, error);
            vec![]
        }
        AppEvent::Tick => vec![],
    }
}

/// Socket is up: log in. `NICK` first, then the `USER` parameters verbatim.
/// Auto-join waits for end-of-MOTD.
fn on_connected(state: &mut AppState, network_id: NetworkId) -> Vec<Action> {
    let Some(net) = state.get_network_mut(network_id) else {
        return vec![];
    };
    net.status = ConnectionStatus::Connected;
    let nick = net.nickname.clone();
    let user = net.user.clone();
    let host = net.host.clone();
    let port = net.port;

    let key = SessionKey::Network(network_id);
    state.notice(&key, format!("Connected to {}:{}", host, port));

    vec![
        Action::SendRaw {
            network_id,
            line: format!("NICK {}", nick),
        },
        Action::SendRaw {
            network_id,
            line: format!("USER {}", user),
        },
    ]
}

pub fn handle_irc_message(
    state: &mut AppState,
    network_id: NetworkId,
    message: irc::proto::Message,
) -> Vec<Action> {
    use irc::proto::{Command, Prefix};

    let nick_from = match &message.prefix {
        Some(Prefix::Nickname(nick, _, _)) => nick.clone(),
        Some(Prefix::ServerName(name)) => name.clone(),
        None => String::new(),
    };
    let Some(current_nick) = state.get_network(network_id).map(|n| n.current_nick.clone())
    else {
        return vec![];
    };
    let is_self = nick_from.eq_ignore_ascii_case(&current_nick);

    match &message.command {
        Command::PING(token, _) => {
            return vec![Action::SendPong {
                network_id,
                token: token.clone(),
            }];
        }
        Command::PONG(_, _) => {}

        Command::PRIVMSG(target, text) => {
            if target.starts_with('#') || target.starts_with('&') {
                if state.channel_session(network_id, target).is_some() {
                    let key = SessionKey::channel(network_id, target);
                    state.push_line(&key, format::chat(&nick_from, text), LineKind::Chat);
                } else {
                    tracing::debug!(network_id, %target, "message for unjoined channel dropped");
                }
            } else {
                // Private message: a missing session is the creation
                // trigger, never an error.
                state.deliver_query(network_id, &nick_from, format::chat(&nick_from, text));
            }
        }

        Command::JOIN(chan, _, _) => {
            if is_self {
                let key = state.channel_opened(network_id, chan);
                state.push_line(&key, format::join(&nick_from, chan), LineKind::Event);
            } else if state.channel_session(network_id, chan).is_some() {
                let key = SessionKey::channel(network_id, chan);
                state.push_line(&key, format::join(&nick_from, chan), LineKind::Event);
                if let Some(cs) = state.channel_session_mut(network_id, chan) {
                    if !cs.peers.iter().any(|p| p.eq_ignore_ascii_case(&nick_from)) {
                        cs.peers.push(nick_from.clone());
                    }
                }
            }
        }

        Command::PART(chan, _reason) => {
            if state.channel_session(network_id, chan).is_some() {
                let key = SessionKey::channel(network_id, chan);
                state.push_line(&key, format::part(&nick_from, chan), LineKind::Event);
                if is_self {
                    // Protocol-driven teardown; the tab outlives the session
                    // for scrollback, but nothing routes here anymore.
                    state.detach_channel(network_id, chan);
                } else if let Some(cs) = state.channel_session_mut(network_id, chan) {
                    cs.peers.retain(|p| !p.eq_ignore_ascii_case(&nick_from));
                }
            }
        }

        Command::QUIT(reason) => {
            // Deliberately renders nothing (long-standing policy); traced so
            // the information is not lost entirely.
            tracing::debug!(
                network_id,
                "{}",
                format::quit(&nick_from, reason.as_deref().unwrap_or(""))
            );
            if let Some(net) = state.get_network_mut(network_id) {
                for chan in net.channels.values_mut() {
                    chan.peers.retain(|p| !p.eq_ignore_ascii_case(&nick_from));
                }
            }
        }

        Command::NICK(new_nick) => {
            if is_self {
                if let Some(net) = state.get_network_mut(network_id) {
                    net.current_nick = new_nick.clone();
                }
                // Announce in every channel tab on this network.
                let chans: Vec<String> = state
                    .get_network(network_id)
                    .map(|n| n.channels.values().map(|c| c.name.clone()).collect())
                    .unwrap_or_default();
                for chan in chans {
                    let key = SessionKey::channel(network_id, &chan);
                    state.push_line(
                        &key,
                        format::nick_change(&nick_from, new_nick),
                        LineKind::Event,
                    );
                }
            }
            if let Some(net) = state.get_network_mut(network_id) {
                for chan in net.channels.values_mut() {
                    for peer in chan.peers.iter_mut() {
                        if peer.eq_ignore_ascii_case(&nick_from) {
                            *peer = new_nick.clone();
                        }
                    }
                }
            }
        }

        Command::KICK(chan, target, reason) => {
            if state.channel_session(network_id, chan).is_some() {
                let key = SessionKey::channel(network_id, chan);
                state.push_line(
                    &key,
                    format::kick(&nick_from, target, chan, reason.as_deref().unwrap_or("")),
                    LineKind::Event,
                );
                if target.eq_ignore_ascii_case(&current_nick) {
                    // Kicked: same teardown as a self-part.
                    state.detach_channel(network_id, chan);
                } else if let Some(cs) = state.channel_session_mut(network_id, chan) {
                    cs.peers.retain(|p| !p.eq_ignore_ascii_case(target));
                }
            }
        }

        Command::TOPIC(chan, topic) => {
            if let Some(topic) = topic {
                if state.channel_session(network_id, chan).is_some() {
                    let key = SessionKey::channel(network_id, chan);
                    state.push_line(&key, format::topic(topic), LineKind::Notice);
                }
            }
        }

        Command::ChannelMODE(target, modes) => {
            let mode_text = modes
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            let key = if state.channel_session(network_id, target).is_some() {
                SessionKey::channel(network_id, target)
            } else {
                SessionKey::Network(network_id)
            };
            state.push_line(
                &key,
                format::mode(&nick_from, &mode_text, target),
                LineKind::Event,
            );
        }

        Command::Response(resp, args) => {
            return handle_numeric(state, network_id, *resp, args);
        }

        Command::ERROR(text) => {
            let key = SessionKey::Network(network_id);
            state.error(&key, text.clone());
        }

        _ => {
            // Anything unrouted lands on the network status tab, raw.
            let key = SessionKey::Network(network_id);
            let text = message.to_string().trim_end().to_string();
            state.notice(&key, text);
        }
    }
    vec![]
}

fn handle_numeric(
    state: &mut AppState,
    network_id: NetworkId,
    resp: irc::proto::Response,
    args: &[String],
) -> Vec<Action> {
    use irc::proto::Response;

    match resp {
        // End-of-MOTD marks login completion: fire the configured command
        // verbatim, then join the channel list in order.
        Response::RPL_ENDOFMOTD | Response::ERR_NOMOTD => {
            let Some(net) = state.get_network(network_id) else {
                return vec![];
            };
            let login_cmd = net.login_cmd.clone();
            let autojoin = net.autojoin.clone();

            let mut actions = Vec::new();
            if let Some(line) = login_cmd {
                actions.push(Action::SendRaw { network_id, line });
            }
            for channel in autojoin {
                state.channel_joining(network_id, &channel);
                actions.push(Action::SendJoin {
                    network_id,
                    channel,
                });
            }
            actions
        }

        Response::RPL_TOPIC => {
            // [client, channel, topic]
            if let (Some(chan), Some(topic)) = (args.get(1), args.get(2)) {
                if state.channel_session(network_id, chan).is_some() {
                    let key = SessionKey::channel(network_id, chan);
                    state.push_line(&key, format::topic(topic), LineKind::Notice);
                }
            }
            vec![]
        }

        Response::RPL_NAMREPLY => {
            // [client, symbol, channel, names]
            if let (Some(chan), Some(names)) = (args.get(2), args.get(3)) {
                if state.channel_session(network_id, chan).is_some() {
                    let key = SessionKey::channel(network_id, chan);
                    state.push_line(&key, format::peers(names), LineKind::Notice);
                    if let Some(cs) = state.channel_session_mut(network_id, chan) {
                        for name in names.split_whitespace() {
                            let nick = name.trim_start_matches(['@', '+', '%', '~', '&']);
                            if !nick.is_empty()
                                && !cs.peers.iter().any(|p| p.eq_ignore_ascii_case(nick))
                            {
                                cs.peers.push(nick.to_string());
                            }
                        }
                    }
                }
            }
            vec![]
        }

        // Join refused: the pending registry entry must not outlive the
        // attempt.
        Response::ERR_CHANNELISFULL
        | Response::ERR_INVITEONLYCHAN
        | Response::ERR_BANNEDFROMCHAN
        | Response::ERR_BADCHANNELKEY => {
            if let Some(chan) = args.get(1) {
                state.abandon_join(network_id, chan);
            }
            let key = SessionKey::Network(network_id);
            state.error(&key, args[args.len().min(1)..].join(" "));
            vec![]
        }

        _ => {
            // Other numerics (MOTD body included) go to the status tab.
            let key = SessionKey::Network(network_id);
            let text = args[args.len().min(1)..].join(" ");
            if !text.is_empty() {
                state.notice(&key, text);
            }
            vec![]
        }
    }
}

fn handle_terminal(state: &mut AppState, event: CEvent) -> Vec<Action> {
    match event {
        CEvent::Key(key) => handle_key(state, key),
        CEvent::Resize(_, _) => {
            state.dirty = true;
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![Action::Quit { message: None }];
    }

    match state.focus {
        FocusPanel::Input => handle_input_key(state, key),
        FocusPanel::Messages => handle_message_key(state, key),
    }
}

fn handle_input_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Any key that is not the completion trigger interrupts an in-flight
    // completion; the next Tab starts fresh at the new position.
    let is_trigger = key.code == KeyCode::Tab && !state.input.text.is_empty();
    if !is_trigger {
        if let Some(surface) = state.active_surface_mut() {
            surface.completion.clear();
        }
    }

    match key.code {
        KeyCode::Enter => submit_input(state),
        KeyCode::Tab => {
            if state.input.text.is_empty() {
                state.cycle_focus();
            } else {
                advance_completion(state);
            }
            vec![]
        }
        KeyCode::Esc => {
            if state.input.prompt != PromptMode::Message {
                state.input.prompt = PromptMode::Message;
                state.input.text.clear();
                state.input.cursor = 0;
            } else {
                state.focus = FocusPanel::Messages;
            }
            vec![]
        }
        KeyCode::Backspace => {
            if key.modifiers.contains(KeyModifiers::ALT) {
                state.input.delete_word_back();
            } else {
                state.input.delete_back();
            }
            vec![]
        }
        KeyCode::Delete => {
            state.input.delete_forward();
            vec![]
        }
        KeyCode::Left => {
            if key.modifiers.contains(KeyModifiers::ALT) {
                state.select_prev_tab();
            } else {
                state.input.move_left();
            }
            vec![]
        }
        KeyCode::Right => {
            if key.modifiers.contains(KeyModifiers::ALT) {
                state.select_next_tab();
            } else {
                state.input.move_right();
            }
            vec![]
        }
        KeyCode::Home => {
            state.input.move_home();
            vec![]
        }
        KeyCode::End => {
            state.input.move_end();
            vec![]
        }
        KeyCode::Up => {
            state.input.history_up();
            vec![]
        }
        KeyCode::Down => {
            state.input.history_down();
            vec![]
        }
        KeyCode::PageUp => {
            scroll_up(state);
            vec![]
        }
        KeyCode::PageDown => {
            scroll_down(state);
            vec![]
        }
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match c {
                    // Raw-command prompt (sent to the network verbatim).
                    'e' => {
                        state.input.prompt = PromptMode::RawCommand;
                        state.input.text.clear();
                        state.input.cursor = 0;
                    }
                    // Private-chat prompt: collect a nickname.
                    't' => {
                        state.input.prompt = PromptMode::QueryNick;
                        state.input.text.clear();
                        state.input.cursor = 0;
                    }
                    // Both variants reset the completion cursor (already
                    // cleared above).
                    'r' | 'l' => {}
                    'a' => state.input.move_home(),
                    'w' => state.input.delete_word_back(),
                    'u' => {
                        state.input.text.clear();
                        state.input.cursor = 0;
                    }
                    'x' => return close_active_tab(state),
                    'p' => state.select_prev_tab(),
                    'n' => state.select_next_tab(),
                    _ => {}
                }
            } else if key.modifiers.contains(KeyModifiers::ALT) {
                match c {
                    'u' => state.input.upper_case(),
                    'l' => state.input.lower_case(),
                    _ => {}
                }
            } else {
                state.input.insert_char(c);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_message_key(state: &mut AppState, key: KeyEvent) -> Vec<Action> {
    // Chorded characters are not typing; they must not pull focus.
    let chorded = key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    match key.code {
        // Enter "IRC mode": start typing at the input line.
        KeyCode::Char('i') if !chorded => {
            state.focus = FocusPanel::Input;
            vec![]
        }
        KeyCode::Tab => {
            state.cycle_focus();
            vec![]
        }
        KeyCode::Left => {
            state.select_prev_tab();
            vec![]
        }
        KeyCode::Right => {
            state.select_next_tab();
            vec![]
        }
        KeyCode::PageUp | KeyCode::Up => {
            scroll_up(state);
            vec![]
        }
        KeyCode::PageDown | KeyCode::Down => {
            scroll_down(state);
            vec![]
        }
        KeyCode::Char(c) if !chorded => {
            state.focus = FocusPanel::Input;
            state.input.insert_char(c);
            vec![]
        }
        _ => vec![],
    }
}

fn scroll_up(state: &mut AppState) {
    if let Some(surface) = state.active_surface_mut() {
        let max_scroll = surface.lines.len().saturating_sub(1);
        surface.scroll_offset = (surface.scroll_offset + 5).min(max_scroll);
    }
    state.dirty = true;
}

fn scroll_down(state: &mut AppState) {
    if let Some(surface) = state.active_surface_mut() {
        surface.scroll_offset = surface.scroll_offset.saturating_sub(5);
    }
    state.dirty = true;
}

/// Tab pressed with a partial word: arm or step the active surface's
/// completion cursor. Exhaustion is silently absorbed.
fn advance_completion(state: &mut AppState) {
    let Some(active) = state.active.clone() else {
        return;
    };
    let in_progress = state
        .surfaces
        .get(&active)
        .map(|s| s.completion.in_progress())
        .unwrap_or(false);

    if !in_progress {
        let (start, end) = state.input.word_bounds();
        let prefix = state.input.text[start..end].to_lowercase();
        if prefix.is_empty() {
            return;
        }
        let candidates = completion_candidates(state, &active, &prefix);
        let Some(surface) = state.surfaces.get_mut(&active) else {
            return;
        };
        surface.completion.begin(start, end, candidates);
    }

    let Some(surface) = state.surfaces.get_mut(&active) else {
        return;
    };
    if let Some((start, end, text)) = surface.completion.advance() {
        state.input.replace_range(start, end, &text);
    }
}

fn completion_candidates(state: &AppState, key: &SessionKey, prefix: &str) -> Vec<String> {
    let mut pool: Vec<String> = match key {
        SessionKey::Channel(id, chan) => state
            .get_network(*id)
            .and_then(|n| n.channels.get(chan))
            .map(|c| c.peers.clone())
            .unwrap_or_default(),
        SessionKey::Query(id, nick) => {
            let mut pool = Vec::new();
            if let Some(net) = state.get_network(*id) {
                if let Some(display) = net.queries.get(nick) {
                    pool.push(display.clone());
                }
                pool.push(net.current_nick.clone());
            }
            pool
        }
        SessionKey::Network(_) => Vec::new(),
    };
    pool.retain(|n| n.to_lowercase().starts_with(prefix));
    pool
}

fn submit_input(state: &mut AppState) -> Vec<Action> {
    let prompt = state.input.prompt;
    let text = state.input.take_text();
    if text.is_empty() {
        return vec![];
    }

    match prompt {
        PromptMode::RawCommand => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            vec![Action::SendRaw { network_id, line: text }]
        }
        PromptMode::QueryNick => {
            if let Some(network_id) = state.active_network_id() {
                let key = state.open_query(network_id, text.trim());
                state.set_active(key);
            }
            vec![]
        }
        PromptMode::Message => {
            if text.starts_with('/') {
                handle_command(state, &text)
            } else {
                send_to_active(state, text)
            }
        }
    }
}

/// Send chat text to the active tab's target, echoing it locally under our
/// current nick.
fn send_to_active(state: &mut AppState, text: String) -> Vec<Action> {
    let Some(active) = state.active.clone() else {
        return vec![];
    };
    match &active {
        SessionKey::Channel(id, chan) => {
            let Some(net) = state.get_network(*id) else {
                return vec![];
            };
            let Some(cs) = net.channels.get(chan) else {
                state.notice(&active, "Not joined to this channel.".to_string());
                return vec![];
            };
            let target = cs.name.clone();
            let nick = net.current_nick.clone();
            state.push_line(&active, format::chat(&nick, &text), LineKind::Chat);
            vec![Action::SendPrivmsg {
                network_id: *id,
                target,
                text,
            }]
        }
        SessionKey::Query(id, qnick) => {
            let Some(net) = state.get_network(*id) else {
                return vec![];
            };
            let target = net
                .queries
                .get(qnick)
                .cloned()
                .unwrap_or_else(|| qnick.clone());
            let nick = net.current_nick.clone();
            state.push_line(&active, format::chat(&nick, &text), LineKind::Chat);
            vec![Action::SendPrivmsg {
                network_id: *id,
                target,
                text,
            }]
        }
        SessionKey::Network(_) => {
            state.notice(
                &active,
                "Not a chat tab. /join a channel or /query a nick.".to_string(),
            );
            vec![]
        }
    }
}

fn handle_command(state: &mut AppState, text: &str) -> Vec<Action> {
    let Some(cmd) = parse_command(text) else {
        if let Some(key) = state.active.clone() {
            state.error(&key, format!("Unknown command: {}", text));
        }
        return vec![];
    };

    match cmd {
        ParsedCommand::Connect { name } => connect_network(state, &name),
        ParsedCommand::Disconnect => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            vec![Action::DisconnectNetwork { network_id }]
        }
        ParsedCommand::Join { channel } => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            state.channel_joining(network_id, &channel);
            vec![Action::SendJoin { network_id, channel }]
        }
        ParsedCommand::Part { channel } => {
            let Some(active) = state.active.clone() else {
                return vec![];
            };
            let network_id = active.network_id();
            let channel = channel.or_else(|| match &active {
                SessionKey::Channel(id, chan) => state
                    .get_network(*id)
                    .and_then(|n| n.channels.get(chan))
                    .map(|c| c.name.clone()),
                _ => None,
            });
            match channel {
                Some(channel) => vec![Action::SendPart { network_id, channel }],
                None => {
                    state.notice(&active, "Not on a channel tab.".to_string());
                    vec![]
                }
            }
        }
        ParsedCommand::Close => close_active_tab(state),
        ParsedCommand::Msg { target, text } => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            let key = state.open_query(network_id, &target);
            if text.is_empty() {
                state.set_active(key);
                return vec![];
            }
            let nick = state
                .get_network(network_id)
                .map(|n| n.current_nick.clone())
                .unwrap_or_default();
            state.push_line(&key, format::chat(&nick, &text), LineKind::Chat);
            vec![Action::SendPrivmsg {
                network_id,
                target,
                text,
            }]
        }
        ParsedCommand::Query { nick } => {
            if let Some(network_id) = state.active_network_id() {
                let key = state.open_query(network_id, &nick);
                state.set_active(key);
            }
            vec![]
        }
        ParsedCommand::Nick { nick } => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            vec![Action::SendRaw {
                network_id,
                line: format!("NICK {}", nick),
            }]
        }
        ParsedCommand::Raw { line } => {
            let Some(network_id) = state.active_network_id() else {
                return vec![];
            };
            vec![Action::SendRaw { network_id, line }]
        }
        ParsedCommand::Upper { text } => send_to_active(state, text.to_uppercase()),
        ParsedCommand::Lower { text } => send_to_active(state, text.to_lowercase()),
        ParsedCommand::Quit { message } => vec![Action::Quit { message }],
        ParsedCommand::Help => {
            if let Some(key) = state.active.clone() {
                for line in HELP_LINES {
                    state.notice(&key, line.to_string());
                }
            }
            vec![]
        }
    }
}

const HELP_LINES: &[&str] = &[
    "/connect <name>        connect to a configured network",
    "/disconnect            drop the active network's connection",
    "/join <#chan>          join a channel (tab opens on the server's JOIN)",
    "/part [#chan]          leave a channel",
    "/close                 close this tab (parts the channel)   [Ctrl-X]",
    "/msg <nick> <text>     message a nick in a private tab",
    "/query <nick>          open a private tab                   [Ctrl-T]",
    "/nick <nick>           change nickname",
    "/raw <line>            send a raw IRC line                  [Ctrl-E]",
    "/upper <text>, /lower <text>   send text case-converted  [Alt-U/Alt-L on input]",
    "/quit [message]        exit",
    "Tab completes nicks; Ctrl-R or Ctrl-L resets the completion.",
];

fn connect_network(state: &mut AppState, name: &str) -> Vec<Action> {
    if let Some(net) = state
        .networks
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name) && n.status != ConnectionStatus::Disconnected)
    {
        let key = SessionKey::Network(net.id);
        state.set_active(key);
        return vec![];
    }

    let Some(cfg) = state
        .config
        .networks
        .iter()
        .find(|n| n.name.eq_ignore_ascii_case(name))
        .cloned()
    else {
        if let Some(key) = state.active.clone() {
            state.error(&key, format!("No configured network named '{}'", name));
        }
        return vec![];
    };

    let network_id = state.allocate_network_id();
    state.add_network(NetworkState::from_config(network_id, &cfg));
    let key = SessionKey::Network(network_id);
    state.notice(&key, format!("Connecting to {}:{}...", cfg.host, cfg.port));
    state.set_active(key);
    vec![Action::ConnectNetwork { network_id }]
}

/// UI-driven teardown: close the tab and, for channels, part on the wire.
/// Converges with the protocol-driven path inside [`AppState::close_tab`].
fn close_active_tab(state: &mut AppState) -> Vec<Action> {
    let Some(key) = state.active.clone() else {
        return vec![];
    };
    let network_id = key.network_id();
    match state.close_tab(&key) {
        Some(channel) => vec![Action::SendPart { network_id, channel }],
        None => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_state(login_cmd: Option<&str>, autojoin: &[&str]) -> AppState {
        let mut state = AppState::new(crate::config::AppConfig::default());
        let id = state.allocate_network_id();
        state.add_network(NetworkState {
            id,
            name: "testnet".into(),
            host: "irc.example.org".into(),
            port: 6667,
            tls: false,
            user: "vy vy vy :vyirc".into(),
            nickname: "alice".into(),
            current_nick: "alice".into(),
            login_cmd: login_cmd.map(String::from),
            autojoin: autojoin.iter().map(|s| s.to_string()).collect(),
            status: ConnectionStatus::Connecting,
            channels: HashMap::new(),
            queries: HashMap::new(),
        });
        state
    }

    fn irc(state: &mut AppState, raw: &str) -> Vec<Action> {
        let message = format!("{}\r\n", raw).parse().unwrap();
        handle_event(
            state,
            AppEvent::IrcMessage {
                network_id: 0,
                message,
            },
        )
    }

    fn join_test_channel(state: &mut AppState) {
        irc(state, ":alice!a@host JOIN #test");
        assert!(state.channel_session(0, "#test").is_some());
    }

    #[test]
    fn test_login_sequence_then_autojoin_in_order() {
        let mut state = test_state(Some("PRIVMSG nickserv :identify x"), &["#test"]);

        let mut actions = handle_event(&mut state, AppEvent::IrcConnected { network_id: 0 });
        // Nothing joins before end-of-MOTD.
        assert_eq!(
            actions,
            vec![
                Action::SendRaw {
                    network_id: 0,
                    line: "NICK alice".into()
                },
                Action::SendRaw {
                    network_id: 0,
                    line: "USER vy vy vy :vyirc".into()
                },
            ]
        );

        actions.extend(irc(&mut state, ":irc.example.org 376 alice :End of /MOTD command."));
        assert_eq!(
            actions[2..].to_vec(),
            vec![
                Action::SendRaw {
                    network_id: 0,
                    line: "PRIVMSG nickserv :identify x".into()
                },
                Action::SendJoin {
                    network_id: 0,
                    channel: "#test".into()
                },
            ]
        );
    }

    #[test]
    fn test_autojoin_list_order_is_preserved() {
        let mut state = test_state(None, &["#c1", "#c2", "#c3"]);
        let actions = irc(&mut state, ":irc.example.org 376 alice :End of /MOTD command.");
        let joins: Vec<_> = actions
            .iter()
            .filter_map(|a| match a {
                Action::SendJoin { channel, .. } => Some(channel.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(joins, vec!["#c1", "#c2", "#c3"]);
        assert_eq!(actions.len(), 3);
    }

    #[test]
    fn test_refused_join_clears_pending_entry() {
        let mut state = test_state(None, &[]);
        state.channel_joining(0, "#private");
        irc(
            &mut state,
            ":irc.example.org 473 alice #private :Cannot join channel (+i)",
        );
        assert!(state.get_network(0).unwrap().channels.is_empty());

        // A refusal for a channel we are already in must not tear it down.
        join_test_channel(&mut state);
        irc(
            &mut state,
            ":irc.example.org 473 alice #test :Cannot join channel (+i)",
        );
        assert!(state.channel_session(0, "#test").is_some());
    }

    #[test]
    fn test_ping_answered_with_pong() {
        let mut state = test_state(None, &[]);
        let actions = irc(&mut state, "PING :irc.example.org");
        assert_eq!(
            actions,
            vec![Action::SendPong {
                network_id: 0,
                token: "irc.example.org".into()
            }]
        );
    }

    #[test]
    fn test_private_message_creates_query_session_first() {
        let mut state = test_state(None, &[]);
        irc(&mut state, ":Bob!b@host PRIVMSG alice :hi there");

        let key = SessionKey::query(0, "bob");
        let surface = state.surfaces.get(&key).expect("query tab created");
        assert_eq!(surface.lines.len(), 1);
        assert_eq!(surface.lines[0].text, "<Bob> hi there");

        // Any case variant of the nick lands in the same session.
        irc(&mut state, ":bOB!b@host PRIVMSG alice :again");
        assert_eq!(state.surfaces.get(&key).unwrap().lines.len(), 2);
        assert_eq!(state.get_network(0).unwrap().queries.len(), 1);
    }

    #[test]
    fn test_channel_messages_render_until_self_part() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");

        irc(&mut state, ":Bob!b@host PRIVMSG #test :hello");
        let before = state.surfaces.get(&key).unwrap().lines.len();
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            "<Bob> hello"
        );

        irc(&mut state, ":alice!a@host PART #test");
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            ">>> alice has left #test <<<"
        );
        assert!(state.channel_session(0, "#test").is_none());

        // Session is detached: nothing may render here anymore.
        irc(&mut state, ":Bob!b@host PRIVMSG #test :ghost");
        assert_eq!(state.surfaces.get(&key).unwrap().lines.len(), before + 1);
    }

    #[test]
    fn test_kick_is_the_same_teardown_as_part() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");

        irc(&mut state, ":op!o@host KICK #test alice :flooding");
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            ">>> op has kicked alice from #test (flooding) <<<"
        );
        assert!(state.channel_session(0, "#test").is_none());
        assert!(state.get_network(0).unwrap().channels.is_empty());
    }

    #[test]
    fn test_names_reply_renders_peers_and_fills_pool() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");

        irc(&mut state, ":irc.example.org 353 alice = #test :@op +Bob alice");
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            "Peers:@op +Bob alice"
        );
        let peers = &state.channel_session(0, "#test").unwrap().peers;
        assert!(peers.iter().any(|p| p == "op"));
        assert!(peers.iter().any(|p| p == "Bob"));
    }

    #[test]
    fn test_topic_numeric_renders() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");
        irc(&mut state, ":irc.example.org 332 alice #test :welcome home");
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            "Topic :welcome home"
        );
    }

    #[test]
    fn test_self_nick_change_announced_in_channels() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");

        irc(&mut state, ":alice!a@host NICK :alice2");
        assert_eq!(state.get_network(0).unwrap().current_nick, "alice2");
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            ">>> alice is now known as alice2 <<<"
        );
    }

    #[test]
    fn test_quit_renders_nothing_but_prunes_peers() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        irc(&mut state, ":irc.example.org 353 alice = #test :alice Bob");
        let key = SessionKey::channel(0, "#test");
        let before = state.surfaces.get(&key).unwrap().lines.len();

        irc(&mut state, ":Bob!b@host QUIT :gone fishing");
        assert_eq!(state.surfaces.get(&key).unwrap().lines.len(), before);
        assert!(!state
            .channel_session(0, "#test")
            .unwrap()
            .peers
            .iter()
            .any(|p| p == "Bob"));
    }

    #[test]
    fn test_disconnect_unregisters_everything() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        irc(&mut state, ":Bob!b@host PRIVMSG alice :hi");

        let actions = handle_event(
            &mut state,
            AppEvent::IrcDisconnected {
                network_id: 0,
                reason: "connection closed".into(),
            },
        );
        assert!(actions.is_empty());
        let net = state.get_network(0).unwrap();
        assert_eq!(net.status, ConnectionStatus::Disconnected);
        assert!(net.channels.is_empty());
        assert!(net.queries.is_empty());
    }

    #[test]
    fn test_outbound_chat_echoes_under_current_nick() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        irc(&mut state, ":alice!a@host NICK :alice2");
        let key = SessionKey::channel(0, "#test");
        state.set_active(key.clone());

        let actions = send_to_active(&mut state, "hello all".into());
        assert_eq!(
            actions,
            vec![Action::SendPrivmsg {
                network_id: 0,
                target: "#test".into(),
                text: "hello all".into(),
            }]
        );
        assert_eq!(
            state.surfaces.get(&key).unwrap().lines.last().unwrap().text,
            "<alice2> hello all"
        );
    }

    #[test]
    fn test_close_tab_parts_channel_on_the_wire() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        let key = SessionKey::channel(0, "#test");
        state.set_active(key.clone());

        let actions = close_active_tab(&mut state);
        assert_eq!(
            actions,
            vec![Action::SendPart {
                network_id: 0,
                channel: "#test".into()
            }]
        );
        assert!(state.surfaces.get(&key).is_none());
        assert!(state.get_network(0).unwrap().channels.is_empty());
    }

    #[test]
    fn test_case_conversion_commands_transform_outbound_text() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        state.set_active(SessionKey::channel(0, "#test"));

        let actions = handle_command(&mut state, "/upper shout this");
        assert_eq!(
            actions,
            vec![Action::SendPrivmsg {
                network_id: 0,
                target: "#test".into(),
                text: "SHOUT THIS".into(),
            }]
        );
    }

    #[test]
    fn test_chorded_keys_do_not_type_in_message_focus() {
        let mut state = test_state(None, &[]);
        state.focus = FocusPanel::Messages;

        for (code, modifiers) in [
            (KeyCode::Char('e'), KeyModifiers::CONTROL),
            (KeyCode::Char('t'), KeyModifiers::CONTROL),
            (KeyCode::Char('x'), KeyModifiers::CONTROL),
            (KeyCode::Char('u'), KeyModifiers::ALT),
        ] {
            let actions = handle_key(&mut state, KeyEvent::new(code, modifiers));
            assert!(actions.is_empty());
            assert_eq!(state.focus, FocusPanel::Messages);
            assert!(state.input.text.is_empty());
        }

        // Plain characters still start typing.
        handle_key(&mut state, KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE));
        assert_eq!(state.focus, FocusPanel::Input);
        assert_eq!(state.input.text, "h");
    }

    #[test]
    fn test_tab_completion_walks_candidates_then_stops() {
        let mut state = test_state(None, &[]);
        join_test_channel(&mut state);
        irc(&mut state, ":irc.example.org 353 alice = #test :bobby bob boris");
        let key = SessionKey::channel(0, "#test");
        state.set_active(key);

        for c in "bo".chars() {
            state.input.insert_char(c);
        }
        advance_completion(&mut state);
        assert_eq!(state.input.text, "bobby");
        advance_completion(&mut state);
        assert_eq!(state.input.text, "bob");
        advance_completion(&mut state);
        assert_eq!(state.input.text, "boris");
        // Exhausted: further triggers change nothing.
        advance_completion(&mut state);
        assert_eq!(state.input.text, "boris");
    }
}

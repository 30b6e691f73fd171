mod app;
mod complete;
mod config;
mod input;
mod irc;
mod logging;
mod ui;

use crate::app::action::Action;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::state::*;
use crate::irc::manager::NetworkManager;
use crate::logging::ChatLogger;
use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    logging::init_tracing()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, cfg).await;

    restore_terminal()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let mut state = AppState::new(cfg.clone());
    let mut manager = NetworkManager::new(event_tx.clone());
    let mut chat_logger = ChatLogger::new(&cfg.logging);

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (20 FPS = 50ms)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(50));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    // Auto-connect networks from config
    for net_cfg in &cfg.networks {
        if net_cfg.auto_connect {
            let network_id = state.allocate_network_id();
            state.add_network(NetworkState::from_config(network_id, net_cfg));
            let key = SessionKey::Network(network_id);
            state.notice(
                &key,
                format!("Connecting to {}:{}...", net_cfg.host, net_cfg.port),
            );
            connect_network(&mut state, &mut manager, network_id).await;
        }
    }

    // No auto-connect: show a welcome tab listing the configured networks
    if state.networks.is_empty() {
        let network_id = state.allocate_network_id();
        state.add_network(NetworkState {
            id: network_id,
            name: "tabirc".to_string(),
            host: String::new(),
            port: 0,
            tls: false,
            user: String::new(),
            nickname: String::new(),
            current_nick: String::new(),
            login_cmd: None,
            autojoin: Vec::new(),
            status: ConnectionStatus::Disconnected,
            channels: Default::default(),
            queries: Default::default(),
        });
        let key = SessionKey::Network(network_id);
        state.notice(&key, "Welcome to tabirc.".to_string());
        state.notice(&key, String::new());
        state.notice(&key, "Configured networks:".to_string());
        for net in &cfg.networks {
            state.notice(&key, format!("  {}  ({}:{})", net.name, net.host, net.port));
        }
        state.notice(&key, String::new());
        state.notice(&key, "Connect:  /connect <name>".to_string());
        state.notice(&key, "Help:     /help".to_string());
    }

    // Initial render
    terminal.draw(|f| ui::render(f, &state))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);

        // Drain new lines for the transcript logger
        let new_lines: Vec<_> = state.new_lines.drain(..).collect();
        for (key, line) in &new_lines {
            chat_logger.log_line(key, line);
        }

        for action in actions {
            match action {
                Action::SendRaw { network_id, line } => {
                    if let Err(e) = manager.send_raw(network_id, &line) {
                        let key = SessionKey::Network(network_id);
                        state.error(&key, format!("Send failed: {}", e));
                    }
                }
                Action::SendPrivmsg {
                    network_id,
                    target,
                    text,
                } => {
                    if let Err(e) = manager.send_privmsg(network_id, &target, &text) {
                        let key = SessionKey::Network(network_id);
                        state.error(&key, format!("Send failed: {}", e));
                    }
                }
                Action::SendJoin {
                    network_id,
                    channel,
                } => {
                    if let Err(e) = manager.send_join(network_id, &channel) {
                        let key = SessionKey::Network(network_id);
                        state.error(&key, format!("Join failed: {}", e));
                    }
                }
                Action::SendPart {
                    network_id,
                    channel,
                } => {
                    if let Err(e) = manager.send_part(network_id, &channel) {
                        let key = SessionKey::Network(network_id);
                        state.error(&key, format!("Part failed: {}", e));
                    }
                }
                Action::SendPong { network_id, token } => {
                    if let Err(e) = manager.send_pong(network_id, &token) {
                        let key = SessionKey::Network(network_id);
                        state.error(&key, format!("Pong failed: {}", e));
                    }
                }
                Action::ConnectNetwork { network_id } => {
                    connect_network(&mut state, &mut manager, network_id).await;
                }
                Action::DisconnectNetwork { network_id } => {
                    manager.disconnect(network_id, None);
                    state.close_network(network_id);
                    let key = SessionKey::Network(network_id);
                    state.notice(&key, "Disconnected.".to_string());
                }
                Action::Quit { message } => {
                    manager.quit_all(message.as_deref());
                    state.should_quit = true;
                }
            }
        }

        if state.should_quit {
            break;
        }

        // Conditional render (only if dirty)
        if state.dirty {
            terminal.draw(|f| ui::render(f, &state))?;
            state.dirty = false;
        }
    }

    Ok(())
}

async fn connect_network(state: &mut AppState, manager: &mut NetworkManager, network_id: usize) {
    let Some(network) = state.get_network(network_id) else {
        return;
    };
    if let Err(e) = manager.connect(network).await {
        let key = SessionKey::Network(network_id);
        state.error(&key, format!("Connection failed: {}", e));
        if let Some(net) = state.get_network_mut(network_id) {
            net.status = ConnectionStatus::Disconnected;
        }
    }
}

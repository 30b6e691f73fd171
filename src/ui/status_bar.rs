use crate::app::state::{AppState, FocusPanel};
use crate::ui::theme::Theme;
use ratatui::prelude::{Color, Frame, Rect, Span, Style};
use ratatui::text::Line as UiLine;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut parts: Vec<Span> = Vec::new();

    // Current nick on the active network
    if let Some(net) = state.active_network_id().and_then(|id| state.get_network(id)) {
        parts.push(Span::styled(
            format!(" [{}] ", net.current_nick),
            Style::default().fg(Color::Green).bg(Color::DarkGray),
        ));
    }

    parts.push(Span::styled(
        format!(" {} ", state.status_line()),
        Theme::status_bar(),
    ));

    let focus_name = match state.focus {
        FocusPanel::Input => "INPUT",
        FocusPanel::Messages => "MESSAGES",
    };
    // Pad to fill remaining space (display columns, not bytes)
    let used: usize = parts.iter().map(|s| s.content.width()).sum();
    let remaining = (area.width as usize).saturating_sub(used + focus_name.width() + 3);
    parts.push(Span::styled(" ".repeat(remaining), Theme::status_bar()));
    parts.push(Span::styled(
        format!(" [{}] ", focus_name),
        Style::default().fg(Color::Cyan).bg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(UiLine::from(parts)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::{AppState, ConnectionStatus, NetworkState, SessionKey};
    use crate::config::AppConfig;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::collections::HashMap;

    #[test]
    fn test_focus_tag_stays_flush_right_with_wide_nick() {
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
            // Wide characters: 12 display columns, 18 bytes.
            current_nick: "日本語なまえ".into(),
            login_cmd: None,
            autojoin: vec![],
            status: ConnectionStatus::Connecting,
            channels: HashMap::new(),
            queries: HashMap::new(),
        });
        state.set_active(SessionKey::Network(0));

        let backend = TestBackend::new(60, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render(f, f.area(), &state))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row: String = (0..60).map(|x| buffer[(x, 0)].symbol()).collect();
        // Byte-based padding would leave trailing blank cells here.
        assert!(row.ends_with("[INPUT]"), "row was {:?}", row);
    }
}

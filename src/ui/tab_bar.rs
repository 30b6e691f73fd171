//! One-line tab strip. Every surface is a tab: network status tabs first,
//! then their channels and queries (the registry map is ordered, so tabs
//! stay grouped by network without extra sorting).

use crate::app::state::{AppState, ConnectionStatus, SessionKey};
use crate::ui::theme::Theme;
use ratatui::prelude::{Frame, Rect, Span};
use ratatui::text::Line as UiLine;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = Vec::new();

    for (key, surface) in &state.surfaces {
        let is_active = state.active.as_ref() == Some(key);

        let style = if is_active {
            Theme::tab_active()
        } else if surface.unread_count > 0 {
            Theme::tab_unread()
        } else if matches!(key, SessionKey::Network(id)
            if state.get_network(*id).map(|n| n.status == ConnectionStatus::Disconnected).unwrap_or(false))
        {
            Theme::tab_disconnected()
        } else {
            Theme::tab_normal()
        };

        let label = if surface.unread_count > 0 && !is_active {
            format!(" {}({}) ", surface.title, surface.unread_count)
        } else {
            format!(" {} ", surface.title)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::styled("|", Theme::border()));
    }
    spans.pop();

    frame.render_widget(Paragraph::new(UiLine::from(spans)), area);
}

use crate::app::state::{AppState, FocusPanel, Line, LineKind};
use crate::ui::theme::Theme;
use ratatui::prelude::{Frame, Rect, Span};
use ratatui::text::Line as UiLine;
use ratatui::widgets::{
    Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == FocusPanel::Messages;
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    let title = state
        .active
        .as_ref()
        .and_then(|k| state.surfaces.get(k))
        .map(|s| format!(" {} ", s.title))
        .unwrap_or_default();

    let block = Block::default()
        .title(title)
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(ref key) = state.active else {
        let empty =
            Paragraph::new("No tab. /connect <name> to get started.").style(Theme::border());
        frame.render_widget(empty, inner);
        return;
    };
    let Some(surface) = state.surfaces.get(key) else {
        return;
    };

    let available_height = inner.height as usize;
    let total = surface.lines.len();

    // Visible window, anchored to the bottom unless scrolled back.
    let end = total.saturating_sub(surface.scroll_offset);
    let start = end.saturating_sub(available_height);

    let lines: Vec<UiLine> = surface.lines[start..end].iter().map(format_line).collect();

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);

    if total > available_height {
        let mut scrollbar_state =
            ScrollbarState::new(total.saturating_sub(available_height)).position(start);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .thumb_symbol("┃")
            .track_symbol(Some("│"))
            .thumb_style(Theme::scrollbar_thumb())
            .track_style(Theme::scrollbar_track());
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn format_line(line: &Line) -> UiLine<'_> {
    let ts = Span::styled(format!("[{}] ", line.timestamp), Theme::timestamp());
    let text_style = match line.kind {
        LineKind::Chat => Theme::chat_text(),
        LineKind::Notice => Theme::notice_text(),
        LineKind::Event => Theme::event_text(),
        LineKind::Error => Theme::error_text(),
    };
    UiLine::from(vec![ts, Span::styled(line.text.as_str(), text_style)])
}

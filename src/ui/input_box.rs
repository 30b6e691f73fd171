use crate::app::state::{AppState, FocusPanel};
use crate::input::PromptMode;
use crate::ui::theme::Theme;
use ratatui::prelude::{Frame, Rect, Span};
use ratatui::text::Line as UiLine;
use ratatui::widgets::block::Padding;
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
    let focused = state.focus == FocusPanel::Input;
    let border_style = if focused {
        Theme::border_focused()
    } else {
        Theme::border()
    };

    // The label doubles as the mode indicator for the two capture prompts.
    let label = match state.input.prompt {
        PromptMode::Message => "> ",
        PromptMode::RawCommand => "raw> ",
        PromptMode::QueryNick => "query nick> ",
    };

    let block = Block::default()
        .title(" Input ")
        .title_style(if focused { Theme::title() } else { Theme::border() })
        .borders(Borders::ALL)
        .border_style(border_style)
        .padding(Padding::horizontal(1));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = UiLine::from(vec![
        Span::styled(label, Theme::prompt_label()),
        Span::styled(state.input.text.as_str(), Theme::input_text()),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    if focused {
        let before_cursor = &state.input.text[..state.input.cursor];
        let cursor_x = inner.x + label.width() as u16 + before_cursor.width() as u16;
        frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
    }
}

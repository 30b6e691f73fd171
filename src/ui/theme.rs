use ratatui::style::{Color, Modifier, Style};

pub struct Theme;

impl Theme {
    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn timestamp() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn chat_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn notice_text() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn event_text() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn error_text() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn tab_normal() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn tab_active() -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub fn tab_unread() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn tab_disconnected() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn input_text() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn prompt_label() -> Style {
        Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn scrollbar_thumb() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn scrollbar_track() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}

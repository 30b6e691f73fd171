use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub struct AppLayout {
    pub tab_bar: Rect,
    pub message_area: Rect,
    pub input_box: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect) -> AppLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Messages
            Constraint::Length(3), // Input box
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    AppLayout {
        tab_bar: chunks[0],
        message_area: chunks[1],
        input_box: chunks[2],
        status_bar: chunks[3],
    }
}

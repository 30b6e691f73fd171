//! Input line editing.
//!
//! One editable line shared by all tabs. The prompt mode decides what Enter
//! does with the text: send it as a chat message, as a raw IRC line, or as
//! the nick of a private chat to open.

/// What the input line currently collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    /// Normal chat input for the active tab.
    Message,
    /// A raw IRC command sent to the active network verbatim.
    RawCommand,
    /// A nickname to open a private chat with.
    QueryNick,
}

#[derive(Debug)]
pub struct InputState {
    pub text: String,
    pub cursor: usize,
    pub prompt: PromptMode,
    pub history: Vec<String>,
    pub history_index: Option<usize>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            prompt: PromptMode::Message,
            history: Vec::new(),
            history_index: None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            let prev = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.text.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor < self.text.len() {
            let next = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
            self.text.drain(self.cursor..next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor = self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.text.len() {
            self.cursor = self.text[self.cursor..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor + i)
                .unwrap_or(self.text.len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    pub fn delete_word_back(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let mut pos = self.cursor;
        while pos > 0 && self.text.as_bytes().get(pos - 1) == Some(&b' ') {
            pos -= 1;
        }
        while pos > 0 && self.text.as_bytes().get(pos - 1) != Some(&b' ') {
            pos -= 1;
        }
        self.text.drain(pos..self.cursor);
        self.cursor = pos;
    }

    /// Take the line, push it to history, and fall back to message mode.
    pub fn take_text(&mut self) -> String {
        let text = self.text.clone();
        self.text.clear();
        self.cursor = 0;
        self.history_index = None;
        self.prompt = PromptMode::Message;
        if !text.is_empty() {
            self.history.push(text.clone());
        }
        text
    }

    pub fn history_up(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            Some(i) if i > 0 => i - 1,
            Some(_) => return,
            None => self.history.len() - 1,
        };
        self.history_index = Some(idx);
        self.text = self.history[idx].clone();
        self.cursor = self.text.len();
    }

    pub fn history_down(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                let idx = i + 1;
                self.history_index = Some(idx);
                self.text = self.history[idx].clone();
                self.cursor = self.text.len();
            }
            Some(_) => {
                self.history_index = None;
                self.text.clear();
                self.cursor = 0;
            }
            None => {}
        }
    }

    /// Byte range of the word ending at the cursor (completion target).
    pub fn word_bounds(&self) -> (usize, usize) {
        let start = self.text[..self.cursor]
            .rfind(' ')
            .map(|i| i + 1)
            .unwrap_or(0);
        (start, self.cursor)
    }

    /// Splice `replacement` over `start..end` and leave the cursor after it.
    pub fn replace_range(&mut self, start: usize, end: usize, replacement: &str) {
        self.text.replace_range(start..end, replacement);
        self.cursor = start + replacement.len();
    }

    pub fn upper_case(&mut self) {
        self.text = self.text.to_uppercase();
        self.clamp_cursor();
    }

    pub fn lower_case(&mut self) {
        self.text = self.text.to_lowercase();
        self.clamp_cursor();
    }

    // Case mapping can change byte lengths, so re-anchor the cursor.
    fn clamp_cursor(&mut self) {
        if self.cursor > self.text.len() {
            self.cursor = self.text.len();
        }
        while self.cursor > 0 && !self.text.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_text(text: &str) -> InputState {
        let mut input = InputState::new();
        for c in text.chars() {
            input.insert_char(c);
        }
        input
    }

    #[test]
    fn test_case_conversion() {
        let mut input = with_text("Hello World");
        input.upper_case();
        assert_eq!(input.text, "HELLO WORLD");
        input.lower_case();
        assert_eq!(input.text, "hello world");
        assert_eq!(input.cursor, input.text.len());
    }

    #[test]
    fn test_case_conversion_keeps_cursor_on_boundary() {
        let mut input = with_text("straße x");
        input.cursor = 6; // just past the ß
        input.upper_case(); // ß -> SS shifts byte offsets
        assert!(input.text.is_char_boundary(input.cursor));
        assert_eq!(input.text, "STRASSE X");
    }

    #[test]
    fn test_word_bounds_at_cursor() {
        let mut input = with_text("hello wor");
        assert_eq!(input.word_bounds(), (6, 9));
        input.cursor = 5;
        assert_eq!(input.word_bounds(), (0, 5));
    }

    #[test]
    fn test_replace_range_moves_cursor() {
        let mut input = with_text("hey bo");
        input.replace_range(4, 6, "bob");
        assert_eq!(input.text, "hey bob");
        assert_eq!(input.cursor, 7);
    }

    #[test]
    fn test_take_text_resets_prompt() {
        let mut input = with_text("JOIN #vy");
        input.prompt = PromptMode::RawCommand;
        assert_eq!(input.take_text(), "JOIN #vy");
        assert_eq!(input.prompt, PromptMode::Message);
        assert!(input.text.is_empty());
        assert_eq!(input.history.last().map(String::as_str), Some("JOIN #vy"));
    }

    #[test]
    fn test_delete_word_back() {
        let mut input = with_text("one two  ");
        input.delete_word_back();
        assert_eq!(input.text, "one ");
    }
}

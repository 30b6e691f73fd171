//! Nickname completion over the input line.
//!
//! Each display surface owns one [`Completion`]. The state is a single-use,
//! forward-only cursor over the candidates computed when the completion was
//! armed: every trigger press advances one step, running off the end is
//! silently absorbed (no wrap), and any other keystroke clears the state so
//! the next trigger starts fresh at the new cursor position.

/// Per-surface completion cursor.
#[derive(Debug, Default)]
pub struct Completion {
    candidates: Vec<String>,
    next: usize,
    /// Byte range of the input text currently holding the completed word.
    region: Option<(usize, usize)>,
}

impl Completion {
    /// Arm a fresh completion attempt for the word occupying `start..end`
    /// of the input line.
    pub fn begin(&mut self, start: usize, end: usize, candidates: Vec<String>) {
        self.candidates = candidates;
        self.next = 0;
        self.region = Some((start, end));
    }

    /// Step the cursor forward. Returns the byte range to replace and the
    /// replacement text, or `None` once the candidates are exhausted.
    pub fn advance(&mut self) -> Option<(usize, usize, String)> {
        let (start, end) = self.region?;
        let candidate = self.candidates.get(self.next)?.clone();
        self.next += 1;
        self.region = Some((start, start + candidate.len()));
        Some((start, end, candidate))
    }

    /// Drop any in-flight completion. Called on every non-trigger key.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.next = 0;
        self.region = None;
    }

    pub fn in_progress(&self) -> bool {
        self.region.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn armed(cands: &[&str]) -> Completion {
        let mut c = Completion::default();
        c.begin(0, 1, cands.iter().map(|s| s.to_string()).collect());
        c
    }

    #[test]
    fn test_forward_only_no_wrap() {
        let mut c = armed(&["alpha", "bravo", "charlie"]);
        assert_eq!(c.advance().unwrap().2, "alpha");
        assert_eq!(c.advance().unwrap().2, "bravo");
        assert_eq!(c.advance().unwrap().2, "charlie");
        // Exhausted: a fourth advance is a no-op, not an error.
        assert_eq!(c.advance(), None);
        assert_eq!(c.advance(), None);
    }

    #[test]
    fn test_region_tracks_replacement_length() {
        let mut c = armed(&["al", "albert"]);
        let (s, e, text) = c.advance().unwrap();
        assert_eq!((s, e, text.as_str()), (0, 1, "al"));
        // Next advance replaces the previously inserted candidate.
        let (s, e, text) = c.advance().unwrap();
        assert_eq!((s, e, text.as_str()), (0, 2, "albert"));
    }

    #[test]
    fn test_clear_disarms() {
        let mut c = armed(&["alpha"]);
        assert!(c.in_progress());
        c.clear();
        assert!(!c.in_progress());
        assert_eq!(c.advance(), None);
    }

    #[test]
    fn test_rearm_after_exhaustion() {
        let mut c = armed(&["alpha"]);
        assert!(c.advance().is_some());
        assert_eq!(c.advance(), None);
        c.begin(3, 4, vec!["bravo".into()]);
        assert_eq!(c.advance().unwrap().2, "bravo");
    }
}

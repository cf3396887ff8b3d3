//! Transcript scroll following
//!
//! Keeps the view pinned to the latest message: every change in transcript
//! length asks the view to scroll to the end, once.

/// Decides when the transcript view should scroll to its newest message
#[derive(Debug, Clone, Default)]
pub struct ScrollController {
    /// Transcript length at the last observation
    seen_len: Option<usize>,
}

impl ScrollController {
    /// Create a controller that has observed nothing yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the current transcript length
    ///
    /// Returns true when the view should smoothly scroll to the most recent
    /// message, i.e. when the length differs from the last observation.
    pub fn observe(&mut self, transcript_len: usize) -> bool {
        let changed = self.seen_len != Some(transcript_len);
        self.seen_len = Some(transcript_len);
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_scrolls() {
        let mut scroll = ScrollController::new();
        assert!(scroll.observe(1));
    }

    #[test]
    fn test_idempotent_without_new_messages() {
        let mut scroll = ScrollController::new();
        scroll.observe(1);
        assert!(!scroll.observe(1));
        assert!(!scroll.observe(1));
    }

    #[test]
    fn test_scrolls_on_each_append() {
        let mut scroll = ScrollController::new();
        scroll.observe(1);
        assert!(scroll.observe(2));
        assert!(!scroll.observe(2));
        assert!(scroll.observe(3));
    }
}

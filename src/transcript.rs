/// Accumulates recognition results across one dictation run.
///
/// Engines re-deliver result windows as they refine audio, so results
/// carry an index and the session keeps a high-water mark: a final
/// result advances the mark past itself, and anything arriving below
/// the mark is a replay and gets dropped. Interim results are kept
/// only as the latest preview tail and never accumulate.
#[derive(Clone, Debug, Default)]
pub struct TranscriptSession {
    final_transcript: String,
    interim_transcript: String,
    last_result_index: usize,
}

impl TranscriptSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one engine result in. Returns false when the result sits
    /// below the high-water mark and was dropped.
    pub fn push(&mut self, result_index: usize, text: &str, is_final: bool) -> bool {
        if result_index < self.last_result_index {
            return false;
        }
        if is_final {
            if !self.final_transcript.is_empty() && !text.is_empty() {
                self.final_transcript.push(' ');
            }
            self.final_transcript.push_str(text);
            self.last_result_index = result_index + 1;
            self.interim_transcript.clear();
        } else {
            self.interim_transcript = text.to_string();
        }
        true
    }

    /// Final transcript plus the pending interim tail.
    pub fn preview(&self) -> String {
        if self.interim_transcript.is_empty() {
            self.final_transcript.clone()
        } else if self.final_transcript.is_empty() {
            self.interim_transcript.clone()
        } else {
            format!("{} {}", self.final_transcript, self.interim_transcript)
        }
    }

    /// Drain the final transcript. The interim tail is discarded; the
    /// high-water mark stays so later replays are still recognized.
    pub fn take_final(&mut self) -> String {
        self.interim_transcript.clear();
        std::mem::take(&mut self.final_transcript)
    }

    pub fn reset(&mut self) {
        self.final_transcript.clear();
        self.interim_transcript.clear();
        self.last_result_index = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.final_transcript.is_empty() && self.interim_transcript.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finals_accumulate_with_spaces() {
        let mut t = TranscriptSession::new();
        t.push(0, "hello", true);
        t.push(1, "world", true);
        assert_eq!(t.preview(), "hello world");
    }

    #[test]
    fn interim_replaces_previous_interim() {
        let mut t = TranscriptSession::new();
        t.push(0, "he", false);
        t.push(0, "hello", false);
        assert_eq!(t.preview(), "hello");
    }

    #[test]
    fn preview_joins_final_and_interim() {
        let mut t = TranscriptSession::new();
        t.push(0, "hello", true);
        t.push(1, "wor", false);
        assert_eq!(t.preview(), "hello wor");
    }

    #[test]
    fn final_clears_the_interim_tail() {
        let mut t = TranscriptSession::new();
        t.push(0, "wor", false);
        t.push(0, "world", true);
        assert_eq!(t.preview(), "world");
    }

    #[test]
    fn replayed_result_is_dropped() {
        let mut t = TranscriptSession::new();
        assert!(t.push(0, "hello", true));
        assert!(!t.push(0, "hello", true));
        assert!(!t.push(0, "hello again", false));
        assert_eq!(t.preview(), "hello");
    }

    #[test]
    fn result_indexes_may_skip_ahead() {
        let mut t = TranscriptSession::new();
        t.push(0, "one", true);
        t.push(5, "six", true);
        assert_eq!(t.preview(), "one six");
        assert!(!t.push(3, "stale", true));
    }

    #[test]
    fn take_final_drains() {
        let mut t = TranscriptSession::new();
        t.push(0, "hello", true);
        t.push(1, "tail", false);
        assert_eq!(t.take_final(), "hello");
        assert!(t.is_empty());
        // the mark survives the drain
        assert!(!t.push(0, "replay", true));
    }

    #[test]
    fn reset_clears_everything() {
        let mut t = TranscriptSession::new();
        t.push(0, "hello", true);
        t.reset();
        assert!(t.is_empty());
        assert_eq!(t.preview(), "");
        // indexes start over after reset
        assert!(t.push(0, "fresh", true));
        assert_eq!(t.preview(), "fresh");
    }

    #[test]
    fn empty_final_does_not_add_a_space() {
        let mut t = TranscriptSession::new();
        t.push(0, "hello", true);
        t.push(1, "", true);
        assert_eq!(t.preview(), "hello");
    }
}

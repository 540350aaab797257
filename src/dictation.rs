//! Dictation orchestration: recognition engine seam, transcript
//! accumulation, punctuation, and insertion into an editable target.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::messages::{Notice, NoticeSink};
use crate::punctuation::PunctuationMap;
use crate::settings::ReaderSettings;
use crate::transcript::TranscriptSession;

/// Speech recognition engine. Hosts wrap the platform recognizer.
pub trait RecognitionEngine {
    fn start(&mut self, lang: &str, continuous: bool) -> Result<(), String>;
    fn stop(&mut self);
}

/// Events a recognition engine reports during a run. The stream ends
/// with `End` or `Error`; `Result` events carry the engine's result
/// index for replay detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RecognitionEvent {
    #[serde(rename = "result")]
    Result {
        result_index: usize,
        text: String,
        is_final: bool,
    },
    #[serde(rename = "end")]
    End,
    #[serde(rename = "error")]
    Error { reason: String },
}

/// Insertion point for dictated text.
pub trait EditableTarget {
    fn insert_at_cursor(&mut self, text: &str);
}

/// Editable field double with a byte cursor.
#[derive(Clone, Debug, Default)]
pub struct TextField {
    value: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field pre-filled with `value`, cursor at the end.
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        let cursor = value.len();
        Self { value, cursor }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Clamped to the value length, snapped back to a char boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut c = cursor.min(self.value.len());
        while c > 0 && !self.value.is_char_boundary(c) {
            c -= 1;
        }
        self.cursor = c;
    }
}

impl EditableTarget for TextField {
    fn insert_at_cursor(&mut self, text: &str) {
        self.value.insert_str(self.cursor, text);
        self.cursor += text.len();
    }
}

/// A recognition language offered in the settings UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub label: &'static str,
}

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "en-US", label: "English (United States)" },
    Language { code: "en-GB", label: "English (United Kingdom)" },
    Language { code: "es-ES", label: "Spanish (Spain)" },
    Language { code: "fr-FR", label: "French (France)" },
    Language { code: "de-DE", label: "German (Germany)" },
];

/// Drives one dictation run at a time. Final results are punctuated
/// and inserted at the target's cursor; the run stops when the engine
/// ends, the caller stops it, or focus leaves the dictated field.
pub struct Dictation<R: RecognitionEngine> {
    engine: R,
    transcript: TranscriptSession,
    punctuation: PunctuationMap,
    settings: ReaderSettings,
    sink: Box<dyn NoticeSink>,
    active: bool,
    field_id: Option<String>,
}

impl<R: RecognitionEngine> Dictation<R> {
    pub fn new(
        engine: R,
        settings: ReaderSettings,
        punctuation: PunctuationMap,
        sink: Box<dyn NoticeSink>,
    ) -> Self {
        Self {
            engine,
            transcript: TranscriptSession::new(),
            punctuation,
            settings,
            sink,
            active: false,
            field_id: None,
        }
    }

    /// Begin recognition into the field identified by `field_id`,
    /// restarting cleanly if a run is already active.
    pub fn start(&mut self, field_id: &str) -> Result<(), String> {
        if self.active {
            debug!(field_id, "restarting recognition");
            self.engine.stop();
            self.active = false;
        }
        self.transcript.reset();
        self.engine
            .start(&self.settings.stt_language, self.settings.continuous_stt)
            .map_err(|e| format!("Failed to start recognition: {e}"))?;
        self.active = true;
        self.field_id = Some(field_id.to_string());
        self.sink.notify(Notice::SttActive);
        Ok(())
    }

    /// Single entry point for engine events. Results replayed below
    /// the transcript's high-water mark insert nothing.
    pub fn handle_event(&mut self, target: &mut dyn EditableTarget, event: RecognitionEvent) {
        if !self.active {
            trace!(?event, "recognition event with no active run");
            return;
        }
        match event {
            RecognitionEvent::Result { result_index, text, is_final } => {
                let accepted = self.transcript.push(result_index, &text, is_final);
                if is_final && accepted {
                    let corrected = self.punctuation.apply(&text);
                    if !corrected.is_empty() {
                        target.insert_at_cursor(&format!("{corrected} "));
                    }
                }
            }
            RecognitionEvent::End => self.deactivate(),
            RecognitionEvent::Error { reason } => {
                warn!(reason, "recognition engine reported an error");
                self.deactivate();
            }
        }
    }

    /// Stop recognition when focus moves off the dictated field.
    pub fn focus_changed(&mut self, focused: Option<&str>) {
        if !self.active {
            return;
        }
        if self.field_id.as_deref() != focused {
            debug!(?focused, "focus left the dictated field, stopping recognition");
            self.stop();
        }
    }

    /// Stop the active run. Safe to call when idle.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.engine.stop();
        self.deactivate();
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.field_id = None;
        self.sink.notify(Notice::SttInactive);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Transcript so far, final text plus the interim tail.
    pub fn preview(&self) -> String {
        self.transcript.preview()
    }

    pub fn engine(&self) -> &R {
        &self.engine
    }
}

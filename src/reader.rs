//! Read-aloud orchestration: one controller owns the speech engine and
//! the highlight registry, and turns engine events into paints.

use tracing::{debug, trace, warn};

use crate::color::HighlightStyle;
use crate::highlight::{Highlighter, MarkupTarget, SessionHandle};
use crate::messages::{Notice, NoticeSink};
use crate::settings::ReaderSettings;
use crate::speech::{SpeakRequest, SpeechEngine, SpeechEvent, Voice};

/// Drives one utterance at a time: speak, paint word highlights as the
/// engine reports boundaries, restore on end. Settings are snapshotted
/// when an utterance starts; changing them never affects an utterance
/// already playing.
pub struct Reader<E: SpeechEngine> {
    engine: E,
    highlighter: Highlighter,
    settings: ReaderSettings,
    sink: Box<dyn NoticeSink>,
    speaking: bool,
    session: Option<SessionHandle>,
}

impl<E: SpeechEngine> Reader<E> {
    pub fn new(engine: E, settings: ReaderSettings, sink: Box<dyn NoticeSink>) -> Self {
        Self {
            engine,
            highlighter: Highlighter::new(),
            settings,
            sink,
            speaking: false,
            session: None,
        }
    }

    /// Reader with settings loaded from the settings file.
    pub fn with_stored_settings(engine: E, sink: Box<dyn NoticeSink>) -> Self {
        Self::new(engine, crate::settings::load_reader_settings(), sink)
    }

    /// Speak `text`, highlighting it inside `target` as word boundaries
    /// arrive. An utterance still playing is cancelled and its
    /// highlight restored first. A fragment the locator cannot find
    /// only disables highlighting; playback still starts.
    pub fn read_aloud(
        &mut self,
        element_id: &str,
        target: &mut dyn MarkupTarget,
        text: &str,
    ) -> Result<(), String> {
        let text = text.trim();
        if text.is_empty() {
            return Err("Nothing to read: empty selection".to_string());
        }
        self.stop(target);

        let settings = self.settings.sanitized();
        let session = if settings.enable_highlight {
            let style = HighlightStyle::from_config(&settings.color_config());
            match self
                .highlighter
                .start_session(element_id, target, text, style)
            {
                Ok(handle) => Some(handle),
                Err(e) => {
                    debug!(element_id, error = %e, "reading without highlight");
                    None
                }
            }
        } else {
            None
        };

        if let Err(e) = self.engine.speak(SpeakRequest::from_settings(text, &settings)) {
            if let Some(handle) = &session {
                self.highlighter.end_session(handle, target);
            }
            return Err(format!("Failed to start speech: {e}"));
        }

        self.session = session;
        self.speaking = true;
        self.sink.notify(Notice::TtsStart);
        Ok(())
    }

    /// Single entry point for engine events, processed in arrival
    /// order. Events with no utterance in flight are dropped.
    pub fn handle_event(&mut self, target: &mut dyn MarkupTarget, event: SpeechEvent) {
        if !self.speaking {
            trace!(?event, "speech event with no active utterance");
            return;
        }
        match event {
            SpeechEvent::WordBoundary { word, char_index } => {
                if let Some(handle) = &self.session {
                    self.highlighter
                        .on_word_boundary(handle, target, &word, char_index);
                }
            }
            SpeechEvent::End => self.finish(target),
            SpeechEvent::Error { reason } => {
                warn!(reason, "speech engine reported an error");
                self.finish(target);
            }
        }
    }

    /// Cancel playback and restore the highlight. No-op when idle.
    pub fn stop(&mut self, target: &mut dyn MarkupTarget) {
        if !self.speaking {
            return;
        }
        self.engine.cancel();
        self.finish(target);
    }

    fn finish(&mut self, target: &mut dyn MarkupTarget) {
        if let Some(handle) = self.session.take() {
            self.highlighter.end_session(&handle, target);
        }
        self.speaking = false;
        self.sink.notify(Notice::TtsEnd);
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Replace the settings snapshot used by future utterances.
    pub fn set_settings(&mut self, settings: ReaderSettings) {
        self.settings = settings;
    }

    /// Voices the engine offers, for settings UI population.
    pub fn voices(&self) -> Vec<Voice> {
        self.engine.voices()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

//! Text-to-speech seam: the engine trait, its event stream, and a
//! scripted engine double for tests and demos.

use serde::{Deserialize, Serialize};

use crate::settings::ReaderSettings;

/// A synthesis voice as reported by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Voice {
    #[serde(rename = "voiceURI")]
    pub voice_uri: String,
    pub name: String,
    pub lang: String,
}

/// One utterance request with playback parameters already sanitized.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeakRequest {
    pub text: String,
    pub rate: f64,
    pub pitch: f64,
    pub volume: f64,
    pub voice_uri: Option<String>,
}

impl SpeakRequest {
    pub fn from_settings(text: impl Into<String>, settings: &ReaderSettings) -> Self {
        let s = settings.sanitized();
        Self {
            text: text.into(),
            rate: s.rate,
            pitch: s.pitch,
            volume: s.volume,
            voice_uri: s.voice_uri,
        }
    }
}

/// Events an engine reports during playback. Word boundaries arrive in
/// utterance order; the stream finishes with exactly one `End` or
/// `Error`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpeechEvent {
    /// Playback reached the word starting at byte `char_index` of the
    /// utterance text.
    #[serde(rename = "word-boundary")]
    WordBoundary { word: String, char_index: usize },
    #[serde(rename = "end")]
    End,
    #[serde(rename = "error")]
    Error { reason: String },
}

/// Text-to-speech engine. Hosts wrap the platform synthesizer; tests
/// use [`ScriptedEngine`].
pub trait SpeechEngine {
    fn speak(&mut self, request: SpeakRequest) -> Result<(), String>;
    fn cancel(&mut self);
    fn voices(&self) -> Vec<Voice>;
}

/// Engine double that records requests and cancellations instead of
/// producing audio.
#[derive(Debug, Default)]
pub struct ScriptedEngine {
    requests: Vec<SpeakRequest>,
    cancelled: usize,
    voices: Vec<Voice>,
    fail_next: bool,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voices(voices: Vec<Voice>) -> Self {
        Self {
            voices,
            ..Self::default()
        }
    }

    /// Make the next `speak` call fail.
    pub fn fail_next(&mut self) {
        self.fail_next = true;
    }

    pub fn requests(&self) -> &[SpeakRequest] {
        &self.requests
    }

    pub fn cancel_count(&self) -> usize {
        self.cancelled
    }
}

impl SpeechEngine for ScriptedEngine {
    fn speak(&mut self, request: SpeakRequest) -> Result<(), String> {
        if self.fail_next {
            self.fail_next = false;
            return Err("speech engine unavailable".to_string());
        }
        self.requests.push(request);
        Ok(())
    }

    fn cancel(&mut self) {
        self.cancelled += 1;
    }

    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }
}

/// Word boundary events for `text`, one per whitespace-separated word
/// and a final `End`, in the shape a live engine would deliver them.
/// `char_index` is the word's byte offset in `text`.
pub fn word_events(text: &str) -> Vec<SpeechEvent> {
    let mut events = Vec::new();
    let mut offset = 0;
    while offset < text.len() {
        let rest = &text[offset..];
        let trimmed = rest.trim_start();
        if trimmed.is_empty() {
            break;
        }
        let start = offset + (rest.len() - trimmed.len());
        let end = trimmed
            .find(char::is_whitespace)
            .map_or(text.len(), |i| start + i);
        events.push(SpeechEvent::WordBoundary {
            word: text[start..end].to_string(),
            char_index: start,
        });
        offset = end;
    }
    events.push(SpeechEvent::End);
    events
}

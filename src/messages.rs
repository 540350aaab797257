//! Wire vocabulary shared with hosting scripts, plus the notice sink
//! controllers report status through.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Commands a host sends the controllers. The tag strings are part of
/// the wire contract and never change casing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    #[serde(rename = "readAloud")]
    ReadAloud {
        #[serde(default)]
        text: Option<String>,
    },
    #[serde(rename = "readSelectedText")]
    ReadSelectedText,
    #[serde(rename = "startSTT")]
    StartStt,
    #[serde(rename = "stopTTS")]
    StopTts,
    #[serde(rename = "stopSTT")]
    StopStt,
}

/// Status notices the controllers emit for badge and notification
/// display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "notice")]
pub enum Notice {
    #[serde(rename = "tts-start")]
    TtsStart,
    #[serde(rename = "tts-end")]
    TtsEnd,
    #[serde(rename = "stt-active")]
    SttActive,
    #[serde(rename = "stt-inactive")]
    SttInactive,
}

/// Receives controller notices. Implementations are called from inside
/// controller methods and must not call back into the controller.
pub trait NoticeSink {
    fn notify(&self, notice: Notice);
}

/// Discards every notice.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl NoticeSink for NullSink {
    fn notify(&self, _notice: Notice) {}
}

/// Buffers notices for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }
}

impl NoticeSink for CollectingSink {
    fn notify(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

impl<T: NoticeSink + ?Sized> NoticeSink for Arc<T> {
    fn notify(&self, notice: Notice) {
        (**self).notify(notice);
    }
}

//! Reads page text aloud and dictates into editable fields, keeping an
//! on-page word highlight in step with speech playback.
//!
//! The core is the pipeline in [`highlight`]: locate the spoken
//! fragment inside an element's serialized markup, partition the match
//! into word and tag units, and re-render the element from an
//! immutable snapshot as the engine reports word boundaries. The
//! [`reader::Reader`] and [`dictation::Dictation`] controllers wrap
//! that pipeline with engine seams, persisted settings, and status
//! notices.

pub mod color;
pub mod dictation;
pub mod highlight;
pub mod messages;
pub mod punctuation;
pub mod reader;
pub mod settings;
pub mod speech;
pub mod transcript;

pub use color::{hex_to_rgba, ColorConfig, HighlightStyle};
pub use dictation::{
    Dictation, EditableTarget, Language, RecognitionEngine, RecognitionEvent, TextField,
    SUPPORTED_LANGUAGES,
};
pub use highlight::{
    HighlightError, HighlightSession, Highlighter, MarkupBuffer, MarkupTarget, SessionHandle,
};
pub use messages::{Action, CollectingSink, Notice, NoticeSink, NullSink};
pub use punctuation::PunctuationMap;
pub use reader::Reader;
pub use settings::{load_reader_settings, save_reader_settings, settings_dir, ReaderSettings};
pub use speech::{word_events, ScriptedEngine, SpeakRequest, SpeechEngine, SpeechEvent, Voice};
pub use transcript::TranscriptSession;

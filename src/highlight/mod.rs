//! Word-synchronized highlighting over serialized markup.
//!
//! A [`HighlightSession`] pins an immutable snapshot of an element's
//! markup, locates the spoken fragment inside it, and re-renders the
//! element from that snapshot as word-boundary events arrive. The
//! [`Highlighter`] registry keys sessions by element so a new read on
//! an element tears the previous session down first.

mod boundaries;
mod locator;
mod render;

use dashmap::DashMap;
use thiserror::Error;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::color::HighlightStyle;
use render::RenderOutcome;

/// Failures on the highlight path. None of them interrupt playback;
/// only [`HighlightError::NotFound`] is ever surfaced, and only from
/// session start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum HighlightError {
    /// The spoken fragment has no visible-text match in the markup.
    #[error("spoken text not found in target markup")]
    NotFound,
    /// More word-boundary events arrived than word units exist.
    #[error("word boundary table exhausted")]
    BoundaryExhausted,
    /// Restore requested on an inactive or superseded session.
    #[error("restore on an inactive session")]
    RestoreConflict,
}

/// Serialized-markup view of a page element. Reads return the current
/// serialized content; writes replace it wholesale.
pub trait MarkupTarget {
    fn inner_markup(&self) -> String;
    fn set_inner_markup(&mut self, markup: String);
}

/// In-memory target for tests, demos, and headless embedding.
#[derive(Clone, Debug, Default)]
pub struct MarkupBuffer {
    markup: String,
}

impl MarkupBuffer {
    pub fn new(markup: impl Into<String>) -> Self {
        Self { markup: markup.into() }
    }
}

impl MarkupTarget for MarkupBuffer {
    fn inner_markup(&self) -> String {
        self.markup.clone()
    }

    fn set_inner_markup(&mut self, markup: String) {
        self.markup = markup;
    }
}

/// One utterance's worth of highlight state for a single element.
///
/// The session stores the snapshot and the cursor, never the element;
/// callers pass the target back in on every call. Past construction
/// every failure is absorbed and logged, so event handlers can drive
/// the session without checking anything.
#[derive(Clone, Debug)]
pub struct HighlightSession {
    original_markup: String,
    word_boundaries: Vec<usize>,
    cursor: usize,
    active: bool,
    style: HighlightStyle,
}

impl HighlightSession {
    /// Snapshot the target, locate `spoken_text` in it, and build the
    /// word boundary table. Nothing is written back; a `NotFound`
    /// leaves the target untouched.
    pub fn start(
        target: &dyn MarkupTarget,
        spoken_text: &str,
        style: HighlightStyle,
    ) -> Result<Self, HighlightError> {
        let original_markup = target.inner_markup();
        let range = locator::locate(&original_markup, spoken_text)?;
        trace!(start = range.start, end = range.end, "located spoken fragment");
        let word_boundaries = boundaries::partition(&original_markup, range);
        Ok(Self {
            original_markup,
            word_boundaries,
            cursor: 0,
            active: true,
            style,
        })
    }

    /// Consume the next word unit and re-render the target with it
    /// wrapped. Renders always compose from the snapshot, never from
    /// the target's current markup, so a repeated write cannot nest
    /// highlight tags.
    pub fn on_word_boundary(
        &mut self,
        target: &mut dyn MarkupTarget,
        word: &str,
        char_index: usize,
    ) {
        if !self.active {
            trace!(word, char_index, "word boundary on an ended session");
            return;
        }
        if word.is_empty() {
            trace!(char_index, "empty word boundary event");
            return;
        }
        match render::next_render(
            &self.original_markup,
            &self.word_boundaries,
            &mut self.cursor,
            word,
            &self.style,
        ) {
            RenderOutcome::Rendered(markup) => target.set_inner_markup(markup),
            RenderOutcome::Missed => {}
            RenderOutcome::Exhausted => {
                debug!(
                    word,
                    char_index,
                    error = %HighlightError::BoundaryExhausted,
                    "dropping word boundary event"
                );
            }
        }
    }

    /// Write the snapshot back and deactivate. Safe to call any number
    /// of times; repeat calls are no-ops.
    pub fn end(&mut self, target: &mut dyn MarkupTarget) {
        if let Err(e) = self.try_restore(target) {
            trace!(error = %e, "restore skipped");
        }
    }

    fn try_restore(&mut self, target: &mut dyn MarkupTarget) -> Result<(), HighlightError> {
        if !self.active {
            return Err(HighlightError::RestoreConflict);
        }
        target.set_inner_markup(self.original_markup.clone());
        self.active = false;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Snapshot taken at session start.
    pub fn original_markup(&self) -> &str {
        &self.original_markup
    }

    #[cfg(test)]
    fn boundaries(&self) -> &[usize] {
        &self.word_boundaries
    }

    #[cfg(test)]
    fn cursor(&self) -> usize {
        self.cursor
    }
}

/// Handle for a session started through a [`Highlighter`]. A handle
/// goes stale when its session ends or a newer session claims the same
/// element; every call through a stale handle is a no-op.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionHandle {
    element_id: String,
    token: Uuid,
}

impl SessionHandle {
    pub fn element_id(&self) -> &str {
        &self.element_id
    }
}

struct Registered {
    token: Uuid,
    session: HighlightSession,
}

/// Session registry keyed by element id, enforcing one live session
/// per element: starting a session on an element restores and replaces
/// any session already tracking it.
#[derive(Default)]
pub struct Highlighter {
    sessions: DashMap<String, Registered>,
}

impl Highlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on `element_id`, tearing down any live session
    /// on that element first. The teardown happens even when the new
    /// fragment turns out not to be locatable.
    pub fn start_session(
        &self,
        element_id: &str,
        target: &mut dyn MarkupTarget,
        spoken_text: &str,
        style: HighlightStyle,
    ) -> Result<SessionHandle, HighlightError> {
        if let Some((_, mut prev)) = self.sessions.remove(element_id) {
            debug!(element_id, "replacing live session");
            prev.session.end(target);
        }
        let session = HighlightSession::start(target, spoken_text, style)?;
        let token = Uuid::new_v4();
        self.sessions
            .insert(element_id.to_string(), Registered { token, session });
        Ok(SessionHandle {
            element_id: element_id.to_string(),
            token,
        })
    }

    /// Route a word boundary event to the handle's session, if it is
    /// still the live one for its element.
    pub fn on_word_boundary(
        &self,
        handle: &SessionHandle,
        target: &mut dyn MarkupTarget,
        word: &str,
        char_index: usize,
    ) {
        match self.sessions.get_mut(&handle.element_id) {
            Some(mut reg) if reg.token == handle.token => {
                reg.session.on_word_boundary(target, word, char_index);
            }
            _ => trace!(element_id = %handle.element_id, "word boundary on a stale handle"),
        }
    }

    /// End the handle's session and restore the element's markup.
    /// Stale handles are ignored, so double ends and ends racing a
    /// replacement are safe.
    pub fn end_session(&self, handle: &SessionHandle, target: &mut dyn MarkupTarget) {
        match self
            .sessions
            .remove_if(&handle.element_id, |_, reg| reg.token == handle.token)
        {
            Some((_, mut reg)) => reg.session.end(target),
            None => trace!(element_id = %handle.element_id, "end on a stale handle"),
        }
    }

    /// True while the handle refers to its element's live session.
    pub fn is_live(&self, handle: &SessionHandle) -> bool {
        self.sessions
            .get(&handle.element_id)
            .is_some_and(|reg| reg.token == handle.token)
    }
}

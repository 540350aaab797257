use tracing::{debug, trace};

use crate::color::HighlightStyle;

/// Outcome of advancing the cursor for one word-boundary event.
pub(crate) enum RenderOutcome {
    /// A word unit matched; the returned markup has it wrapped.
    Rendered(String),
    /// The unit at the cursor does not contain the event word. The
    /// unit is consumed anyway; the event just paints nothing.
    Missed,
    /// No word units remain.
    Exhausted,
}

/// Units holding markup or no alphanumeric character are never
/// highlighted.
pub(crate) fn is_word_unit(slice: &str) -> bool {
    !slice.contains('<') && slice.chars().any(|c| c.is_alphanumeric())
}

/// Advance `cursor` past tag and separator units to the next word
/// unit, then try to render `word` inside it. The word unit is
/// consumed whether or not it matches; the cursor never moves back.
pub(crate) fn next_render(
    original: &str,
    boundaries: &[usize],
    cursor: &mut usize,
    word: &str,
    style: &HighlightStyle,
) -> RenderOutcome {
    loop {
        if *cursor + 1 >= boundaries.len() {
            return RenderOutcome::Exhausted;
        }
        let (start, end) = (boundaries[*cursor], boundaries[*cursor + 1]);
        *cursor += 1;
        let slice = &original[start..end];
        if !is_word_unit(slice) {
            trace!(unit = slice, "skipping non-word unit");
            continue;
        }
        if slice.contains(word) {
            return RenderOutcome::Rendered(wrap(original, start, end, style));
        }
        debug!(unit = slice, word, "event word not in unit, skipping paint");
        return RenderOutcome::Missed;
    }
}

/// Rebuild the full markup with `original[start..end]` wrapped in the
/// highlight tags. One trailing whitespace character stays outside the
/// wrap so the separator after the word is not painted.
pub(crate) fn wrap(original: &str, start: usize, end: usize, style: &HighlightStyle) -> String {
    let wrap_end = match original[start..end].chars().next_back() {
        Some(c) if c.is_whitespace() => end - c.len_utf8(),
        _ => end,
    };
    let mut out = String::with_capacity(
        original.len() + style.open_tag().len() + style.close_tag().len(),
    );
    out.push_str(&original[..start]);
    out.push_str(style.open_tag());
    out.push_str(&original[start..wrap_end]);
    out.push_str(style.close_tag());
    out.push_str(&original[wrap_end..]);
    out
}

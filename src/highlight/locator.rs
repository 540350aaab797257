use std::ops::Range;

use tracing::debug;

use super::HighlightError;

/// Upper bound on candidate start positions examined per lookup. Keeps
/// pathological input (a page full of the fragment's first character)
/// from scanning without end.
const MAX_CANDIDATES: usize = 1_000_000;

/// Find the byte range of `spoken_text` inside `markup`, comparing only
/// visible characters.
///
/// The fragment is normalized by dropping every whitespace character
/// before the scan. From each occurrence of the fragment's first
/// character, the walk steps over whitespace, steps over `<...>` tag
/// spans whole (tag contents never count toward the match), and treats
/// a `&` entity reference as one visible character while jumping to the
/// next space. The entity rule over-consumes back-to-back entity runs;
/// fragments crossing those come back as `NotFound`.
///
/// The leftmost candidate that consumes the whole fragment wins.
pub(crate) fn locate(markup: &str, spoken_text: &str) -> Result<Range<usize>, HighlightError> {
    locate_bounded(markup, spoken_text, MAX_CANDIDATES)
}

fn locate_bounded(
    markup: &str,
    spoken_text: &str,
    max_candidates: usize,
) -> Result<Range<usize>, HighlightError> {
    let target: Vec<char> = spoken_text.chars().filter(|c| !c.is_whitespace()).collect();
    if target.is_empty() {
        return Err(HighlightError::NotFound);
    }

    let chars: Vec<(usize, char)> = markup.char_indices().collect();
    let first = target[0];
    let mut candidates = 0usize;

    for start in 0..chars.len() {
        if chars[start].1 != first {
            continue;
        }
        candidates += 1;
        if candidates > max_candidates {
            debug!(candidates, "candidate limit reached before a match");
            return Err(HighlightError::NotFound);
        }
        if let Some(end) = walk_candidate(markup, &chars, start, &target) {
            return Ok(chars[start].0..end);
        }
    }

    debug!(fragment_chars = target.len(), "fragment not present in markup");
    Err(HighlightError::NotFound)
}

/// Try to consume the whole normalized fragment starting at
/// `chars[start]`. Returns the byte offset one past the last markup
/// character the match covers, or None when the candidate fails.
fn walk_candidate(
    markup: &str,
    chars: &[(usize, char)],
    start: usize,
    target: &[char],
) -> Option<usize> {
    let mut ti = 0;
    let mut i = start;
    while ti < target.len() {
        let (_, ch) = *chars.get(i)?;
        if ch.is_whitespace() {
            i += 1;
        } else if ch == '<' {
            i = skip_tag(chars, i)?;
        } else if ch == '&' {
            // Entity reference: count the span as one visible character.
            ti += 1;
            i = next_space(chars, i).unwrap_or(chars.len());
        } else if ch == target[ti] {
            ti += 1;
            i += 1;
        } else {
            return None;
        }
    }
    Some(byte_offset(markup, chars, i))
}

/// Index one past the `>` closing the tag that opens at `i`.
/// None when the tag never closes.
fn skip_tag(chars: &[(usize, char)], i: usize) -> Option<usize> {
    (i + 1..chars.len())
        .find(|&j| chars[j].1 == '>')
        .map(|j| j + 1)
}

fn next_space(chars: &[(usize, char)], i: usize) -> Option<usize> {
    (i + 1..chars.len()).find(|&j| chars[j].1 == ' ')
}

fn byte_offset(markup: &str, chars: &[(usize, char)], i: usize) -> usize {
    chars.get(i).map_or(markup.len(), |&(off, _)| off)
}

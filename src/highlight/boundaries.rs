use std::ops::Range;

/// Partition `range` of `markup` into word and tag units.
///
/// Returns a flat offset sequence beginning at `range.start`; each
/// adjacent pair of entries delimits one unit. A tag always gets a cut
/// at its `<` and one after its `>`, so it is a unit of its own. A word
/// runs to the next whitespace or `<` and carries at most one following
/// whitespace character with it; further whitespace leads the next
/// unit. The sequence is strictly increasing and ends at `range.end`,
/// short of it only when the range ends in a run of whitespace.
pub(crate) fn partition(markup: &str, range: Range<usize>) -> Vec<usize> {
    let mut cuts = vec![range.start];
    let chars: Vec<(usize, char)> = markup[range.clone()]
        .char_indices()
        .map(|(off, ch)| (range.start + off, ch))
        .collect();

    let mut i = 0;
    while i < chars.len() {
        let (off, ch) = chars[i];
        if ch.is_whitespace() {
            i += 1;
            continue;
        }
        if ch == '<' {
            push_cut(&mut cuts, off);
            i = tag_close(&chars, i);
        } else {
            i = word_close(&chars, i);
        }
        // the unit keeps one trailing whitespace character
        if i < chars.len() && chars[i].1.is_whitespace() {
            i += 1;
        }
        push_cut(&mut cuts, byte_offset(&chars, i, range.end));
    }
    cuts
}

fn push_cut(cuts: &mut Vec<usize>, off: usize) {
    if cuts.last().is_some_and(|&last| off > last) {
        cuts.push(off);
    }
}

/// Index one past the `>` that closes the tag opening at `i`, or the
/// end of the scan when the tag never closes.
fn tag_close(chars: &[(usize, char)], i: usize) -> usize {
    (i + 1..chars.len())
        .find(|&j| chars[j].1 == '>')
        .map_or(chars.len(), |j| j + 1)
}

/// Index of the first whitespace or `<` after the word starting at `i`.
fn word_close(chars: &[(usize, char)], i: usize) -> usize {
    (i + 1..chars.len())
        .find(|&j| chars[j].1.is_whitespace() || chars[j].1 == '<')
        .unwrap_or(chars.len())
}

fn byte_offset(chars: &[(usize, char)], i: usize, end: usize) -> usize {
    chars.get(i).map_or(end, |&(off, _)| off)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units<'a>(markup: &'a str, cuts: &[usize]) -> Vec<&'a str> {
        cuts.windows(2).map(|w| &markup[w[0]..w[1]]).collect()
    }

    #[test]
    fn splits_words_and_tags() {
        let markup = "Hello <b>world</b> foo";
        let cuts = partition(markup, 0..markup.len());
        assert_eq!(cuts, vec![0, 6, 9, 14, 19, 22]);
        assert_eq!(
            units(markup, &cuts),
            vec!["Hello ", "<b>", "world", "</b> ", "foo"]
        );
    }

    #[test]
    fn single_word() {
        let cuts = partition("hello", 0..5);
        assert_eq!(cuts, vec![0, 5]);
    }

    #[test]
    fn word_keeps_one_trailing_space() {
        let markup = "a  b";
        let cuts = partition(markup, 0..4);
        assert_eq!(units(markup, &cuts), vec!["a ", " b"]);
    }

    #[test]
    fn adjacent_tags_are_separate_units() {
        let markup = "<i><b>x</b></i>";
        let cuts = partition(markup, 0..markup.len());
        assert_eq!(
            units(markup, &cuts),
            vec!["<i>", "<b>", "x", "</b>", "</i>"]
        );
    }

    #[test]
    fn gap_whitespace_before_tag_becomes_its_own_unit() {
        let markup = "a  <b>";
        let cuts = partition(markup, 0..markup.len());
        assert_eq!(units(markup, &cuts), vec!["a ", " ", "<b>"]);
    }

    #[test]
    fn trailing_whitespace_leaves_last_cut_short_of_end() {
        let markup = "ab   ";
        let cuts = partition(markup, 0..5);
        assert_eq!(cuts, vec![0, 3]);
    }

    #[test]
    fn leading_whitespace_joins_first_word() {
        let markup = "  ab";
        let cuts = partition(markup, 0..4);
        assert_eq!(cuts, vec![0, 4]);
        assert_eq!(units(markup, &cuts), vec!["  ab"]);
    }

    #[test]
    fn empty_range_yields_no_units() {
        assert_eq!(partition("hello", 2..2), vec![2]);
    }

    #[test]
    fn subrange_offsets_are_absolute() {
        let markup = "xx ab cd yy";
        let cuts = partition(markup, 3..8);
        assert_eq!(cuts, vec![3, 6, 8]);
        assert_eq!(units(markup, &cuts), vec!["ab ", "cd"]);
    }

    #[test]
    fn unterminated_tag_runs_to_range_end() {
        let markup = "ab <b cd";
        let cuts = partition(markup, 0..8);
        assert_eq!(units(markup, &cuts), vec!["ab ", "<b cd"]);
    }

    #[test]
    fn cuts_are_strictly_increasing() {
        let markup = "a<b>c</b> d  e <i>f</i>";
        let cuts = partition(markup, 0..markup.len());
        assert!(cuts.windows(2).all(|w| w[0] < w[1]), "cuts: {cuts:?}");
        assert_eq!(*cuts.first().unwrap(), 0);
        assert!(*cuts.last().unwrap() <= markup.len());
    }

    #[test]
    fn units_tile_the_range_contiguously() {
        let markup = "Hello <b>world</b> foo";
        let cuts = partition(markup, 0..markup.len());
        let total: usize = cuts.windows(2).map(|w| w[1] - w[0]).sum();
        assert_eq!(total, markup.len());
    }

    #[test]
    fn multibyte_words_cut_on_char_boundaries() {
        let markup = "héllo wörld";
        let cuts = partition(markup, 0..markup.len());
        for &cut in &cuts {
            assert!(markup.is_char_boundary(cut));
        }
        assert_eq!(units(markup, &cuts), vec!["héllo ", "wörld"]);
    }
}

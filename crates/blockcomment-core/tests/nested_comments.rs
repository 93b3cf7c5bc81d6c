use blockcomment_core::comment::{DelimiterPair, NestedCommentInserter, WrapLayout};
use blockcomment_core::{CharRange, TextBuffer, TextDelta};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

/// Non-nesting matcher: each comment runs from a prefix to the first suffix after it.
fn naive_comments(text: &str, pair: &DelimiterPair) -> Vec<CharRange> {
    let chars: Vec<char> = text.chars().collect();
    let prefix: Vec<char> = pair.prefix().chars().collect();
    let suffix: Vec<char> = pair.suffix().chars().collect();
    let find = |from: usize, pattern: &[char]| {
        (from..chars.len()).find(|&i| chars.get(i..i + pattern.len()) == Some(pattern))
    };

    let mut comments = Vec::new();
    let mut pos = 0;
    while let Some(start) = find(pos, &prefix) {
        let end = find(start + prefix.len(), &suffix).map_or(chars.len(), |s| s + suffix.len());
        comments.push(CharRange::new(start, end));
        pos = end;
    }
    comments
}

fn wrap_inline(
    text: &str,
    range: CharRange,
    pair: &DelimiterPair,
) -> (String, CharRange, TextDelta) {
    let mut buffer = TextBuffer::new(text);
    let mut delta = TextDelta::new(buffer.len_chars());
    let comment = NestedCommentInserter::new(pair)
        .wrap(&mut buffer, range, &WrapLayout::Inline, &mut delta)
        .unwrap();
    (buffer.text(), comment, delta)
}

/// The naive matcher must tile `comment` exactly: no gap, no overrun.
fn assert_tiles(text: &str, comment: CharRange, pair: &DelimiterPair) {
    let inside: Vec<CharRange> = naive_comments(text, pair)
        .into_iter()
        .filter(|c| c.start >= comment.start && c.start < comment.end)
        .collect();
    assert!(!inside.is_empty(), "no comment found in {text:?}");
    assert_eq!(inside[0].start, comment.start, "{text:?}");
    for adjacent in inside.windows(2) {
        assert_eq!(adjacent[0].end, adjacent[1].start, "gap in {text:?}");
    }
    assert_eq!(inside[inside.len() - 1].end, comment.end, "{text:?}");
}

#[test]
fn test_html_comment_inside_selection() {
    let pair = DelimiterPair::new("<!--", "-->").unwrap();
    let (text, comment, _) = wrap_inline("x <!-- y --> z", CharRange::new(0, 14), &pair);

    assert_eq!(text, "<!--x --><!-- y --><!-- z-->");
    assert_eq!(comment, CharRange::new(0, 28));
    assert_tiles(&text, comment, &pair);
}

#[test]
fn test_only_a_suffix_inside_selection() {
    let pair = DelimiterPair::new("/*", "*/").unwrap();
    let (text, comment, _) = wrap_inline("a */ b", CharRange::new(0, 6), &pair);

    assert_eq!(text, "/*a *//* b*/");
    assert_tiles(&text, comment, &pair);
}

#[test]
fn test_consecutive_nested_comments() {
    let pair = DelimiterPair::new("/*", "*/").unwrap();
    let (text, comment, _) = wrap_inline("/*1*//*2*/", CharRange::new(0, 10), &pair);

    assert_eq!(text, "/**//*1*//**//*2*//**/");
    assert_tiles(&text, comment, &pair);
}

#[test]
fn test_padded_delimiters_escape_with_trimmed_tokens() {
    let pair = DelimiterPair::new("/* ", " */").unwrap();
    let (text, comment, _) = wrap_inline("a*/b", CharRange::new(0, 4), &pair);

    assert_eq!(text, "/* a*//*b */");
    assert_eq!(comment, CharRange::new(0, 12));
}

#[test]
fn test_equal_delimiters_alternate() {
    let pair = DelimiterPair::new("\"\"\"", "\"\"\"").unwrap();
    let (text, comment, _) = wrap_inline("a\"\"\"b", CharRange::new(0, 5), &pair);

    assert_eq!(text, "\"\"\"a\"\"\"\"\"\"b\"\"\"");
    assert_tiles(&text, comment, &pair);
}

fn chunk() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("a"),
        Just("b"),
        Just(" "),
        Just("\n"),
        Just("/*"),
        Just("*/"),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_wrapped_range_is_tiled_by_naive_matcher(
        chunks in prop::collection::vec(chunk(), 1..24),
    ) {
        let pair = DelimiterPair::new("/*", "*/").unwrap();
        let body: String = chunks.concat();
        let len = body.chars().count();
        let (text, comment, delta) = wrap_inline(&body, CharRange::new(0, len), &pair);

        assert_tiles(&text, comment, &pair);
        prop_assert!(delta.edits.iter().all(|edit| edit.deleted_text.is_empty()));
        prop_assert_eq!(delta.after_char_count, text.chars().count());
    }
}

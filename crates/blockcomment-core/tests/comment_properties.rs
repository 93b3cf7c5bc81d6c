use blockcomment_core::comment::{
    BlockCommentToggler, CaretState, DelimiterPair, NestedCommentInserter, NestedCommentRemover,
    SingleLanguage, SourceContext, WrapLayout,
};
use blockcomment_core::{
    CharRange, CommentConfig, CustomSyntax, TextBuffer, TextDelta, ToggleAction,
};
use proptest::prelude::*;

/// Non-empty lines without blanks or delimiter characters, each terminated by `'\n'`.
///
/// Blank-only neighbourhoods are excluded: a delimiter that ends up alone on its line is removed
/// together with that line.
fn document() -> impl Strategy<Value = String> {
    prop::collection::vec("[abcx]{1,8}", 1..6).prop_map(|lines| {
        let mut text = lines.join("\n");
        text.push('\n');
        text
    })
}

fn document_and_range() -> impl Strategy<Value = (String, CharRange)> {
    document().prop_flat_map(|text| {
        let len = text.chars().count();
        (Just(text), 0..len).prop_flat_map(move |(text, start)| {
            (Just(text), Just(start), start + 1..=len)
                .prop_map(|(text, start, end)| (text, CharRange::new(start, end)))
        })
    })
}

fn layout_for(
    buffer: &TextBuffer,
    inserter: &NestedCommentInserter<'_>,
    range: CharRange,
) -> WrapLayout {
    if inserter.is_whole_line(buffer, range) {
        WrapLayout::WholeLine {
            indent: String::new(),
        }
    } else {
        WrapLayout::Inline
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_remove_undoes_insert((text, range) in document_and_range()) {
        for (prefix, suffix) in [("/*", "*/"), ("<!--", "-->"), ("{-", "-}")] {
            let pair = DelimiterPair::new(prefix, suffix).unwrap();
            let mut buffer = TextBuffer::new(&text);
            let mut delta = TextDelta::new(buffer.len_chars());

            let inserter = NestedCommentInserter::new(&pair);
            let layout = layout_for(&buffer, &inserter, range);
            let comment = inserter.wrap(&mut buffer, range, &layout, &mut delta).unwrap();

            prop_assert!(buffer.matches_at(comment.start, prefix));
            prop_assert!(buffer.matches_at(comment.end - pair.suffix_len(), suffix));

            NestedCommentRemover::new(&pair)
                .unwrap(&mut buffer, comment, &mut delta)
                .unwrap();
            prop_assert_eq!(buffer.text(), text.clone());
            prop_assert_eq!(delta.after_char_count, delta.before_char_count);
        }
    }

    #[test]
    fn prop_toggle_twice_restores_text((text, range) in document_and_range()) {
        let syntax = CustomSyntax::with_block_comment("/*", "*/");
        let languages = SingleLanguage::new("c", CommentConfig::block("/*", "*/"));
        let toggler = BlockCommentToggler::new(
            SourceContext::new(&languages).with_custom_syntax(&syntax),
        );

        let mut buffer = TextBuffer::new(&text);
        let state = CaretState::from_offset(&buffer, range.start).with_selection(range);
        let first = toggler.toggle(&mut buffer, &state).unwrap();

        // Put the caret back inside the new comment and toggle again.
        let comment = match first.action {
            ToggleAction::Commented { comment, .. } => comment,
            other => panic!("expected a comment, got {other:?}"),
        };
        let inside = CaretState::from_offset(&buffer, comment.start + 1);
        toggler.toggle(&mut buffer, &inside).unwrap();

        prop_assert_eq!(buffer.text(), text);
    }
}

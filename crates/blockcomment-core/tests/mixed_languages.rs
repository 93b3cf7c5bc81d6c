use blockcomment_core::comment::{
    BlockCommentToggler, CaretState, LanguageRegions, SkipReason, SourceContext,
};
use blockcomment_core::{CharRange, CommentConfig, TextBuffer, ToggleAction};
use pretty_assertions::assert_eq;

const PAGE: &str = "<p>x</p><script>let a;</script>";
const SCRIPT: CharRange = CharRange { start: 16, end: 22 };

fn page_languages() -> LanguageRegions {
    LanguageRegions::new("html", CommentConfig::block("<!--", "-->"))
        .with_language("js", CommentConfig::line_and_block("//", "/*", "*/"))
        .with_region(SCRIPT, "js")
}

fn toggle_selection(languages: &LanguageRegions, caret: usize, range: CharRange) -> String {
    let toggler = BlockCommentToggler::new(SourceContext::new(languages));
    let mut buffer = TextBuffer::new(PAGE);
    let state = CaretState::from_offset(&buffer, caret).with_selection(range);
    toggler.toggle(&mut buffer, &state).unwrap();
    buffer.text()
}

#[test]
fn test_selection_inside_script_uses_script_tokens() {
    let text = toggle_selection(&page_languages(), 16, CharRange::new(16, 19));
    assert_eq!(text, "<p>x</p><script>/*let*/ a;</script>");
}

#[test]
fn test_selection_ending_at_region_end_stays_in_region() {
    let text = toggle_selection(&page_languages(), 16, SCRIPT);
    assert_eq!(text, "<p>x</p><script>/*let a;*/</script>");
}

#[test]
fn test_selection_spanning_languages_uses_file_language() {
    let text = toggle_selection(&page_languages(), 3, CharRange::new(3, 19));
    assert_eq!(text, "<p><!--x</p><script>let--> a;</script>");
}

#[test]
fn test_caret_in_host_language() {
    let languages = page_languages();
    let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
    let mut buffer = TextBuffer::new(PAGE);

    let caret = CaretState::from_offset(&buffer, 3);

    let outcome = toggler
        .toggle(&mut buffer, &caret)
        .unwrap();

    assert_eq!(outcome.action, ToggleAction::InsertedEmpty { offset: 3 });
    assert_eq!(buffer.text(), "<p><!---->x</p><script>let a;</script>");
    assert_eq!(buffer.position_to_offset(outcome.caret), 7);
}

#[test]
fn test_embedded_language_without_block_comments_is_skipped() {
    let languages = LanguageRegions::new("html", CommentConfig::block("<!--", "-->"))
        .with_language("py", CommentConfig::line("#"))
        .with_region(SCRIPT, "py");
    let toggler = BlockCommentToggler::new(SourceContext::new(&languages));
    let mut buffer = TextBuffer::new(PAGE);

    let caret = CaretState::from_offset(&buffer, 18);

    let outcome = toggler
        .toggle(&mut buffer, &caret)
        .unwrap();

    assert_eq!(outcome.action, ToggleAction::Skipped(SkipReason::NoDelimiters));
    assert_eq!(buffer.text(), PAGE);
    assert!(outcome.delta.is_empty());
}

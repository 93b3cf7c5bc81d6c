use blockcomment_core::comment::{LanguageRegions, SkipReason};
use blockcomment_core::{
    CharRange, Command, CommandExecutor, CommandResult, CommentConfig, CommentSettings,
    CursorCommand, EditCommand, Position, ToggleAction,
};
use pretty_assertions::assert_eq;

fn c_block() -> CommentConfig {
    CommentConfig::block("/*", "*/")
}

fn toggle(ex: &mut CommandExecutor) -> CommandResult {
    ex.execute(Command::Edit(EditCommand::ToggleBlockComment { config: c_block() }))
        .unwrap()
}

fn select(ex: &mut CommandExecutor, start: Position, end: Position) {
    ex.execute(Command::Cursor(CursorCommand::SetSelection { start, end }))
        .unwrap();
}

#[test]
fn test_empty_caret_inserts_pair() {
    let mut ex = CommandExecutor::new("abc");
    ex.execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 1 }))
        .unwrap();

    let result = toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "a/**/bc");
    assert_eq!(ex.editor().cursor_position(), Position::new(0, 3));
    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::InsertedEmpty { offset: 1 })
    );
}

#[test]
fn test_caret_inside_comment_uncomments() {
    let mut ex = CommandExecutor::new("/*hello*/");
    ex.execute(Command::Cursor(CursorCommand::MoveTo { line: 0, column: 4 }))
        .unwrap();

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "hello");
    assert_eq!(ex.editor().cursor_position(), Position::new(0, 2));
}

#[test]
fn test_whole_line_selection_round_trip() {
    let mut ex = CommandExecutor::new("foo\nbar\n");
    select(&mut ex, Position::new(0, 0), Position::new(2, 0));

    let result = toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "/*\nfoo\nbar\n*/\n");
    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::Commented {
            comment: CharRange::new(0, 13),
            whole_line: true,
        })
    );
    assert_eq!(ex.editor().cursor_position(), Position::new(3, 0));

    // Back inside the comment: toggling again restores the text.
    ex.execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 1 }))
        .unwrap();
    toggle(&mut ex);
    assert_eq!(ex.editor().get_text(), "foo\nbar\n");
    assert_eq!(ex.editor().cursor_position(), Position::new(0, 1));
}

#[test]
fn test_whole_line_selection_keeps_crlf_line_endings() {
    let mut ex = CommandExecutor::new("foo\r\nbar\r\n");
    select(&mut ex, Position::new(0, 0), Position::new(2, 0));

    toggle(&mut ex);
    assert_eq!(ex.editor().get_text(), "/*\r\nfoo\r\nbar\r\n*/\r\n");

    ex.execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 1 }))
        .unwrap();
    toggle(&mut ex);
    assert_eq!(ex.editor().get_text(), "foo\r\nbar\r\n");
}

#[test]
fn test_whole_line_selection_without_trailing_newline() {
    let mut ex = CommandExecutor::new("foo\nbar");
    select(&mut ex, Position::new(0, 0), Position::new(1, 3));

    toggle(&mut ex);
    // The suffix follows the last character; its line break is new.
    assert_eq!(ex.editor().get_text(), "/*\nfoo\nbar*/\n");

    ex.execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 1 }))
        .unwrap();
    toggle(&mut ex);
    assert_eq!(ex.editor().get_text(), "foo\nbar\n");
}

#[test]
fn test_whole_line_selection_uses_minimum_indent() {
    let mut ex = CommandExecutor::new("fn f() {\n    a();\n      b();\n}\n");
    select(&mut ex, Position::new(1, 0), Position::new(3, 0));

    toggle(&mut ex);

    assert_eq!(
        ex.editor().get_text(),
        "fn f() {\n    /*\n    a();\n      b();\n    */\n}\n"
    );
}

#[test]
fn test_whole_line_selection_at_first_column() {
    let mut ex = CommandExecutor::new("  a\n  b\n");
    ex.set_comment_settings(CommentSettings {
        block_comment_at_first_column: true,
        ..CommentSettings::default()
    });
    select(&mut ex, Position::new(0, 0), Position::new(2, 0));

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "/*\n  a\n  b\n*/\n");
}

#[test]
fn test_partial_overlap_comments_selection() {
    // C = [5, 15), S = [10, 20); the caret sits inside C at the selection start.
    let mut ex = CommandExecutor::new("abcde/*fghijk*/lmnopqrstuv");
    select(&mut ex, Position::new(0, 20), Position::new(0, 10));

    let result = toggle(&mut ex);

    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::Commented {
            comment: CharRange::new(10, 26),
            whole_line: false,
        })
    );
    // The nested suffix is followed by a reopening prefix.
    assert_eq!(ex.editor().get_text(), "abcde/*fgh/*ijk*//*lmnop*/qrstuv");
    assert_eq!(ex.editor().cursor_position(), Position::new(0, 12));
}

#[test]
fn test_selection_inside_comment_uncomments() {
    let mut ex = CommandExecutor::new("x /* abc */ y");
    select(&mut ex, Position::new(0, 5), Position::new(0, 8));

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "x  abc  y");
    let selection = ex.editor().selection().unwrap();
    assert_eq!(
        (selection.start, selection.end),
        (Position::new(0, 3), Position::new(0, 6))
    );
}

#[test]
fn test_selection_covering_comment_uncomments() {
    let mut ex = CommandExecutor::new("x /* abc */ y");
    // The caret right after the suffix still counts as inside the comment.
    select(&mut ex, Position::new(0, 0), Position::new(0, 11));

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "x  abc  y");
    let selection = ex.editor().selection().unwrap();
    assert_eq!(
        (selection.start, selection.end),
        (Position::new(0, 0), Position::new(0, 7))
    );
}

#[test]
fn test_caret_outside_comment_wraps_selection_safely() {
    let mut ex = CommandExecutor::new("x /* abc */ y");
    select(&mut ex, Position::new(0, 0), Position::new(0, 12));

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "/*x *//* abc *//* */y");
}

#[test]
fn test_block_selection_pads_short_lines() {
    let mut ex = CommandExecutor::new("abcdef\na\nabcdef");
    ex.execute(Command::Cursor(CursorCommand::SetRectSelection {
        anchor: Position::new(0, 2),
        active: Position::new(2, 4),
    }))
    .unwrap();

    let result = toggle(&mut ex);

    assert_eq!(
        ex.editor().get_text(),
        "ab/*cd*/ef\na /*  */\nab/*cd*/ef"
    );
    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::BlockCommented { lines: 3 })
    );
    assert_eq!(ex.editor().cursor_position(), Position::new(2, 4));
    assert_eq!(ex.editor().block_selection(), None);
}

#[test]
fn test_language_without_block_comments_is_skipped() {
    let mut ex = CommandExecutor::new("x = 1\n");
    let result = ex
        .execute(Command::Edit(EditCommand::ToggleBlockComment {
            config: CommentConfig::line("#"),
        }))
        .unwrap();

    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::Skipped(SkipReason::NoDelimiters))
    );
    assert_eq!(ex.editor().get_text(), "x = 1\n");
}

#[test]
fn test_read_only_buffer_needs_write_access() {
    let mut ex = CommandExecutor::new("abc");
    ex.editor_mut().buffer.set_read_only(true);

    let result = toggle(&mut ex);
    assert_eq!(
        result,
        CommandResult::BlockComment(ToggleAction::Skipped(SkipReason::ReadOnly))
    );
    assert_eq!(ex.editor().get_text(), "abc");

    ex.set_write_access(|| true);
    toggle(&mut ex);
    assert_eq!(ex.editor().get_text(), "/**/abc");
}

#[test]
fn test_resolver_overrides_command_config() {
    let mut ex = CommandExecutor::new("<p>x</p>");
    ex.set_language_resolver(LanguageRegions::new(
        "html",
        CommentConfig::block("<!--", "-->"),
    ));
    select(&mut ex, Position::new(0, 3), Position::new(0, 4));

    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "<p><!--x--></p>");
}

#[test]
fn test_toggle_records_text_delta() {
    let mut ex = CommandExecutor::new("abcd");
    select(&mut ex, Position::new(0, 1), Position::new(0, 3));
    toggle(&mut ex);

    assert_eq!(ex.editor().get_text(), "a/*bc*/d");
    let delta = ex.last_text_delta().unwrap();
    assert_eq!(delta.before_char_count, 4);
    assert_eq!(delta.after_char_count, 8);
    assert_eq!(delta.edits.len(), 2);
}

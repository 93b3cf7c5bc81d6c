//! Walk through the block comment action on a small C file.
//!
//! Run with `RUST_LOG=blockcomment_core=debug` to see the toggler's decisions.

use blockcomment_core::{
    Command, CommandExecutor, CommandResult, CommentConfig, CursorCommand, EditCommand, Position,
};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

fn toggle(executor: &mut CommandExecutor) -> CommandResult {
    executor
        .execute(Command::Edit(EditCommand::ToggleBlockComment {
            config: CommentConfig::line_and_block("//", "/*", "*/"),
        }))
        .unwrap()
}

fn show(step: &str, executor: &CommandExecutor, result: &CommandResult) {
    info!(?result, cursor = ?executor.editor().cursor_position(), "{step}");
    println!("--- {step}\n{}", executor.editor().get_text());
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::WARN.into()))
        .init();

    let mut executor = CommandExecutor::new(
        "int main() {\n    int a = 1;\n    return a;\n}\n",
    );

    // Whole lines: the delimiters go on lines of their own, indented like the body.
    executor
        .execute(Command::Cursor(CursorCommand::SetSelection {
            start: Position::new(1, 0),
            end: Position::new(3, 0),
        }))
        .unwrap();
    let result = toggle(&mut executor);
    show("comment two lines", &executor, &result);

    // With the caret inside the new comment, toggling again restores the text.
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 2, column: 6 }))
        .unwrap();
    let result = toggle(&mut executor);
    show("uncomment", &executor, &result);

    // No selection outside a comment: an empty pair at the caret.
    executor
        .execute(Command::Cursor(CursorCommand::MoveTo { line: 1, column: 4 }))
        .unwrap();
    let result = toggle(&mut executor);
    show("empty pair", &executor, &result);
}

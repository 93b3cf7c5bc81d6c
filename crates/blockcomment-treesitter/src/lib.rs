#![warn(missing_docs)]
//! `blockcomment-treesitter` - Tree-sitter backed comment lookup for `blockcomment-core`.
//!
//! [`TreeSitterCommentFinder`] implements [`blockcomment_core::comment::CommentFinder`]: given a
//! buffer and an offset it returns the innermost comment node covering that offset. Plug it into
//! a [`SourceContext`](blockcomment_core::SourceContext) (or
//! [`CommandExecutor::set_comment_finder`](blockcomment_core::CommandExecutor::set_comment_finder))
//! to get structured block comment detection: `/*` inside a string literal is never mistaken
//! for a comment start.
//!
//! The parse tree is cached between lookups and can be kept current incrementally from the
//! [`TextDelta`](blockcomment_core::TextDelta) every toggle reports.

mod finder;

pub use finder::{
    TreeSitterCommentConfig, TreeSitterCommentFinder, TreeSitterError, TreeSitterUpdateMode,
};

use super::DelimiterPair;
use crate::buffer::CharRange;
use blockcomment_lang::{CommentConfig, CustomSyntax};
use std::collections::BTreeMap;
use tracing::debug;

/// Language lookup for a document that may embed several languages.
pub trait LanguageResolver {
    /// Language at `offset`. With `backward`, the character *before* `offset` decides, which is
    /// what a range end needs.
    fn language_at(&self, offset: usize, backward: bool) -> Option<&str>;

    /// The language of the file as a whole.
    fn file_language(&self) -> &str;

    /// Comment tokens of `language`.
    fn comment_config(&self, language: &str) -> Option<&CommentConfig>;
}

/// A document in a single language.
#[derive(Debug, Clone)]
pub struct SingleLanguage {
    language: String,
    config: CommentConfig,
}

impl SingleLanguage {
    /// Create a resolver that answers `language` everywhere.
    pub fn new(language: impl Into<String>, config: CommentConfig) -> Self {
        Self {
            language: language.into(),
            config,
        }
    }
}

impl LanguageResolver for SingleLanguage {
    fn language_at(&self, _offset: usize, _backward: bool) -> Option<&str> {
        Some(&self.language)
    }

    fn file_language(&self) -> &str {
        &self.language
    }

    fn comment_config(&self, language: &str) -> Option<&CommentConfig> {
        (language == self.language).then_some(&self.config)
    }
}

/// A document with embedded regions in other languages (e.g. `<script>` in HTML).
///
/// Regions must not overlap. Offsets outside every region belong to the file language.
#[derive(Debug, Clone)]
pub struct LanguageRegions {
    file_language: String,
    regions: Vec<(CharRange, String)>,
    configs: BTreeMap<String, CommentConfig>,
}

impl LanguageRegions {
    /// Create a resolver for a file in `file_language`.
    pub fn new(file_language: impl Into<String>, config: CommentConfig) -> Self {
        let file_language = file_language.into();
        let mut configs = BTreeMap::new();
        configs.insert(file_language.clone(), config);
        Self {
            file_language,
            regions: Vec::new(),
            configs,
        }
    }

    /// Register comment tokens for an embedded language.
    pub fn with_language(mut self, language: impl Into<String>, config: CommentConfig) -> Self {
        self.configs.insert(language.into(), config);
        self
    }

    /// Mark `range` as written in `language`.
    pub fn with_region(mut self, range: CharRange, language: impl Into<String>) -> Self {
        self.regions.push((range, language.into()));
        self
    }
}

impl LanguageResolver for LanguageRegions {
    fn language_at(&self, offset: usize, backward: bool) -> Option<&str> {
        let probe = if backward {
            offset.saturating_sub(1)
        } else {
            offset
        };
        let language = self
            .regions
            .iter()
            .find(|(range, _)| range.start <= probe && probe < range.end)
            .map_or(self.file_language.as_str(), |(_, language)| language.as_str());
        Some(language)
    }

    fn file_language(&self) -> &str {
        &self.file_language
    }

    fn comment_config(&self, language: &str) -> Option<&CommentConfig> {
        self.configs.get(language)
    }
}

/// Pick the delimiter pair for a toggle at `caret`.
///
/// A custom syntax always wins. Otherwise the language at the caret decides, unless a selection
/// starts and ends in different languages; then the file language is used.
pub fn resolve_delimiters(
    languages: &dyn LanguageResolver,
    custom_syntax: Option<&CustomSyntax>,
    caret: usize,
    selection: Option<CharRange>,
) -> Option<DelimiterPair> {
    if let Some(syntax) = custom_syntax {
        return DelimiterPair::from_config(&syntax.comment_config());
    }

    let mut language = languages.language_at(caret, false)?;
    if let Some(range) = selection {
        let start = languages.language_at(range.start, false);
        let end = languages.language_at(range.end, true);
        if start != Some(language) || end != Some(language) {
            debug!(?start, ?end, language, "selection spans languages, using file language");
            language = languages.file_language();
        }
    }

    languages
        .comment_config(language)
        .and_then(DelimiterPair::from_config)
}

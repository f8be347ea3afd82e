//! Query compiler
//!
//! A query is matched as a glob. Plain queries are wrapped as `*query*` so the
//! default behaves like a substring search.

use regex::Regex;

use crate::core::model::{FindResult, MatchSpan};
use crate::search::glob::{
    build_regex, compile_glob, compile_glob_at_edges, has_glob_meta, GlobOptions,
};
use crate::search::highlight::{locate_all, locate_first};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    pub case_sensitive: bool,
    /// Do not wrap plain queries in `*...*`
    pub exact: bool,
}

/// A compiled query: matcher, span finder and literal word form
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    raw: String,
    pattern: String,
    /// Anchored, decides whether a name or line matches
    matcher: Regex,
    /// Anchored only at star-free edges, locates the highlight span
    finder: Regex,
    word: String,
    word_matcher: Option<Regex>,
}

impl CompiledQuery {
    pub fn compile(raw: &str, options: QueryOptions) -> FindResult<Self> {
        let pattern = if !has_glob_meta(raw) && !options.exact {
            format!("*{}*", raw)
        } else {
            raw.to_string()
        };

        let glob_options = GlobOptions {
            literal_separator: false,
            case_insensitive: !options.case_sensitive,
        };
        let matcher = compile_glob(&pattern, glob_options)?;
        // Edges without a `*` stay anchored so the span is the part the matcher accepted
        let unstarred = pattern.trim_start_matches('*');
        let core = trim_edge_stars(&pattern);
        let finder = compile_glob_at_edges(
            core,
            unstarred.len() == pattern.len(),
            core.len() == unstarred.len(),
            glob_options,
        )?;

        let word: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();
        let word_matcher = if word.is_empty() {
            None
        } else {
            Some(build_regex(
                &word,
                &regex::escape(&word),
                !options.case_sensitive,
            )?)
        };

        Ok(Self {
            raw: raw.to_string(),
            pattern,
            matcher,
            finder,
            word,
            word_matcher,
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The glob actually matched (after wrapping)
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Literal word form used for content highlighting
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// First span of the query inside `text`, if `text` matches at all
    pub fn first_span(&self, text: &str) -> Option<MatchSpan> {
        if !self.is_match(text) {
            return None;
        }
        locate_first(&self.finder, text)
    }

    /// Every occurrence of the literal word form in `text`
    pub fn word_spans(&self, text: &str) -> Vec<MatchSpan> {
        match &self.word_matcher {
            Some(word) => locate_all(word, text),
            None => Vec::new(),
        }
    }
}

/// Drop leading and trailing unescaped `*`
fn trim_edge_stars(pattern: &str) -> &str {
    let mut trimmed = pattern.trim_start_matches('*');
    while trimmed.ends_with('*') {
        let without = &trimmed[..trimmed.len() - 1];
        let backslashes = without.chars().rev().take_while(|&c| c == '\\').count();
        if backslashes % 2 == 1 {
            break;
        }
        trimmed = without;
    }
    trimmed
}

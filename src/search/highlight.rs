//! Match highlighter
//!
//! Span location works on byte offsets reported by `regex`, so spans always
//! fall on UTF-8 character boundaries.

use regex::Regex;

use crate::core::model::MatchSpan;
use crate::core::render::Theme;
#[cfg(test)]
use crate::search::query::CompiledQuery;

/// First match of `regex` in `text`
pub fn locate_first(regex: &Regex, text: &str) -> Option<MatchSpan> {
    regex
        .find(text)
        .map(|found| MatchSpan::new(found.start(), found.end()))
}

/// All non-overlapping, non-empty matches, left to right
pub fn locate_all(regex: &Regex, text: &str) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let Some(found) = regex.find_at(text, cursor) else {
            break;
        };
        if found.start() == found.end() {
            // Step past the empty match to the next char boundary
            match text[found.end()..].chars().next() {
                Some(c) => cursor = found.end() + c.len_utf8(),
                None => break,
            }
            continue;
        }
        spans.push(MatchSpan::new(found.start(), found.end()));
        cursor = found.end();
    }

    spans
}

/// Paints text and spans with a [`Theme`]
pub struct Highlighter<'a> {
    theme: &'a Theme,
}

impl<'a> Highlighter<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self { theme }
    }

    /// Names: the matched substring painted, everything else plain
    pub fn single(&self, text: &str, span: MatchSpan) -> String {
        let Some(span) = clamp(text, span).filter(|span| !span.is_empty()) else {
            return text.to_string();
        };
        format!(
            "{}{}{}",
            &text[..span.start],
            self.theme.matched.apply(&text[span.start..span.end]),
            &text[span.end..]
        )
    }

    /// Highlight the first match of `query` in `text`; `None` when nothing matches
    #[cfg(test)]
    pub fn first(&self, text: &str, query: &CompiledQuery) -> Option<String> {
        query.first_span(text).map(|span| self.single(text, span))
    }

    /// Content lines: every span painted, the text between them dimmed
    pub fn multi(&self, text: &str, spans: &[MatchSpan]) -> String {
        let mut out = String::with_capacity(text.len() + spans.len() * 16);
        let mut cursor = 0;

        for span in spans.iter().filter_map(|span| clamp(text, *span)) {
            if span.start < cursor {
                continue;
            }
            if span.start > cursor {
                out.push_str(&self.theme.dimmed.apply(&text[cursor..span.start]));
            }
            out.push_str(&self.theme.matched.apply(&text[span.start..span.end]));
            cursor = span.end;
        }

        if cursor < text.len() {
            out.push_str(&self.theme.dimmed.apply(&text[cursor..]));
        }

        out
    }

    /// Highlight every occurrence of the query's literal word in `line`
    #[cfg(test)]
    pub fn all(&self, line: &str, query: &CompiledQuery) -> String {
        self.multi(line, &query.word_spans(line))
    }
}

/// Reject spans that fall outside `text` or off a character boundary
fn clamp(text: &str, span: MatchSpan) -> Option<MatchSpan> {
    let valid = span.start <= span.end
        && span.end <= text.len()
        && text.is_char_boundary(span.start)
        && text.is_char_boundary(span.end);
    valid.then_some(span)
}

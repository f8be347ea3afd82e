//! Glob to regex translation
//!
//! Grammar:
//! - `*` any run of characters (not `/` with `literal_separator`)
//! - `**` any run of characters, always crossing `/`
//! - `?` one character (not `/` with `literal_separator`)
//! - `[abc]`, `[a-z]`, `[!abc]`, `[^abc]` character classes
//! - `{a,b}` alternation
//! - `\x` literal `x`

use regex::{Regex, RegexBuilder};

use crate::core::model::{FindError, FindResult};

/// Characters that make a string a glob rather than a literal
pub const GLOB_META: &[char] = &['*', '?', '[', ']', '{', '}'];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobOptions {
    /// `*` and `?` stop at `/`
    pub literal_separator: bool,
    pub case_insensitive: bool,
}

/// True if `s` contains any glob metacharacter
pub fn has_glob_meta(s: &str) -> bool {
    s.contains(GLOB_META)
}

/// Translate a glob into an unanchored regex body
pub fn glob_to_regex(glob: &str, literal_separator: bool) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let any_run = if literal_separator { "[^/]*" } else { ".*" };
    let any_one = if literal_separator { "[^/]" } else { "." };

    let mut out = String::with_capacity(glob.len() * 2);
    let mut brace_depth = 0usize;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            '*' => {
                let mut run = 1;
                while i + run < chars.len() && chars[i + run] == '*' {
                    run += 1;
                }
                out.push_str(if run > 1 { ".*" } else { any_run });
                i += run;
                continue;
            }
            '?' => out.push_str(any_one),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i + 1..end]));
                    i = end + 1;
                    continue;
                }
                None => out.push_str(r"\["),
            },
            '{' => {
                brace_depth += 1;
                out.push_str("(?:");
            }
            ',' if brace_depth > 0 => out.push('|'),
            '}' if brace_depth > 0 => {
                brace_depth -= 1;
                out.push(')');
            }
            '\\' if i + 1 < chars.len() => {
                push_literal(&mut out, chars[i + 1]);
                i += 2;
                continue;
            }
            _ => push_literal(&mut out, c),
        }
        i += 1;
    }

    // Close any alternation left open at the end of the glob
    for _ in 0..brace_depth {
        out.push(')');
    }

    out
}

/// Compile a glob into an anchored regex
pub fn compile_glob(glob: &str, options: GlobOptions) -> FindResult<Regex> {
    let body = glob_to_regex(glob, options.literal_separator);
    build_regex(glob, &format!("^(?:{})$", body), options.case_insensitive)
}

/// Compile a glob for locating spans, anchored only at the requested edges
pub fn compile_glob_at_edges(
    glob: &str,
    anchor_start: bool,
    anchor_end: bool,
    options: GlobOptions,
) -> FindResult<Regex> {
    let body = glob_to_regex(glob, options.literal_separator);
    let regex = format!(
        "{}(?:{}){}",
        if anchor_start { "^" } else { "" },
        body,
        if anchor_end { "$" } else { "" }
    );
    build_regex(glob, &regex, options.case_insensitive)
}

pub(crate) fn build_regex(source: &str, regex: &str, case_insensitive: bool) -> FindResult<Regex> {
    RegexBuilder::new(regex)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source_err| FindError::Pattern {
            pattern: source.to_string(),
            source: source_err,
        })
}

fn push_literal(out: &mut String, c: char) {
    let mut buf = [0u8; 4];
    out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
}

/// Index of the `]` closing the class opened at `start`
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if i < chars.len() && (chars[i] == '!' || chars[i] == '^') {
        i += 1;
    }
    // A leading ']' is part of the class
    if i < chars.len() && chars[i] == ']' {
        i += 1;
    }
    while i < chars.len() {
        if chars[i] == ']' {
            return Some(i);
        }
        i += 1;
    }
    None
}

fn translate_class(inner: &[char]) -> String {
    let mut out = String::from("[");
    let mut rest = inner;
    if let Some((&first, tail)) = rest.split_first() {
        if first == '!' || first == '^' {
            out.push('^');
            rest = tail;
        }
    }
    for &c in rest {
        match c {
            '\\' | '[' | ']' | '&' | '~' | '^' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push(']');
    out
}

//! Ignore-rule matcher
//!
//! Reads a gitignore-style rules file: one pattern per line, `#` comments,
//! `!` negations. Lines are trimmed, so escaped leading/trailing spaces are
//! not supported.

use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::core::model::{FindError, FindResult};
use crate::search::glob::{build_regex, compile_glob, glob_to_regex, GlobOptions};

/// Default rules file name
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

#[derive(Debug, Clone)]
enum Matcher {
    /// `/pattern`: whole path relative to the rules base
    Rooted(Regex),
    /// `left**right`: left literal followed later by right literal
    Spanning(Regex),
    /// Full path (relative to the base) or final segment
    Bare(Regex),
}

#[derive(Debug, Clone)]
struct Rule {
    /// Pattern text as written (without `!`)
    source: String,
    matcher: Matcher,
}

impl Rule {
    fn parse(pattern: &str) -> FindResult<Self> {
        let options = GlobOptions {
            literal_separator: true,
            case_insensitive: false,
        };

        let matcher = if let Some(rooted) = pattern.strip_prefix('/') {
            Matcher::Rooted(compile_rule_glob(pattern, rooted, options)?)
        } else if let Some((left, right)) = pattern.split_once("**") {
            let regex = format!("{}.*?{}", regex::escape(left), regex::escape(right));
            Matcher::Spanning(build_regex(pattern, &regex, false)?)
        } else {
            Matcher::Bare(compile_rule_glob(pattern, pattern, options)?)
        };

        Ok(Self {
            source: pattern.to_string(),
            matcher,
        })
    }

    fn is_match(&self, path: &str, relative: &str) -> bool {
        match &self.matcher {
            Matcher::Rooted(regex) => regex.is_match(relative),
            Matcher::Spanning(regex) => regex.is_match(path),
            Matcher::Bare(regex) => {
                regex.is_match(relative)
                    || regex.is_match(path)
                    || regex.is_match(final_segment(path))
            }
        }
    }

    /// Pattern text without a leading '/'
    fn body(&self) -> &str {
        self.source.trim_start_matches('/')
    }
}

/// A trailing '/' marks a directory pattern: the directory and everything below it.
/// Other patterns also accept the directory form of a path (`name/`).
fn compile_rule_glob(source: &str, glob: &str, options: GlobOptions) -> FindResult<Regex> {
    match glob.strip_suffix('/') {
        Some(dir) if !dir.is_empty() => {
            let body = glob_to_regex(dir, options.literal_separator);
            build_regex(source, &format!("^(?:{})/.*$", body), false)
        }
        _ => {
            let body = glob_to_regex(glob, options.literal_separator);
            if body.is_empty() {
                return compile_glob(glob, options);
            }
            build_regex(source, &format!("^(?:{})/?$", body), false)
        }
    }
}

/// Last segment of a '/'-separated path, keeping a trailing '/' for directories
fn final_segment(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    let start = trimmed.rfind('/').map(|i| i + 1).unwrap_or(0);
    &path[start..]
}

/// Ordered inclusion and negation patterns from one rules file
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    patterns: Vec<Rule>,
    negations: Vec<Rule>,
    /// Prefix stripped from absolute paths before rooted comparison
    base: Option<String>,
}

impl IgnoreRules {
    /// Read `dir/file_name`. A missing or unreadable file is an error.
    pub fn build(dir: &Path, file_name: &str) -> FindResult<Self> {
        let path = dir.join(file_name);
        let content = fs::read_to_string(&path).map_err(|source| FindError::IgnoreRules {
            path: path.clone(),
            source,
        })?;

        let rules = Self::parse(&content)?;
        debug!(
            "Loaded {} ignore patterns and {} negations from {}",
            rules.patterns.len(),
            rules.negations.len(),
            path.display()
        );
        Ok(rules)
    }

    /// Parse rules file content
    pub fn parse(content: &str) -> FindResult<Self> {
        let mut rules = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match line.strip_prefix('!') {
                Some(negated) => {
                    if !negated.is_empty() {
                        rules.negations.push(Rule::parse(negated)?);
                    }
                }
                None => rules.patterns.push(Rule::parse(line)?),
            }
        }

        Ok(rules)
    }

    /// Strip `base` from absolute paths before rooted comparison
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        self.base = Some(base);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.negations.is_empty()
    }

    /// Whether `path` is excluded. Directory paths end with '/'.
    pub fn is_excluded(&self, path: &str) -> bool {
        let relative = self.relative(path);

        let excluded = self
            .patterns
            .iter()
            .any(|rule| rule.is_match(path, relative));
        if !excluded {
            return false;
        }

        !self
            .negations
            .iter()
            .any(|rule| rule.is_match(path, relative))
    }

    /// Whether a negation names something inside the directory `dir`
    pub fn may_reinclude_under(&self, dir: &str) -> bool {
        let relative = self.relative(dir);
        let prefix = if relative.ends_with('/') {
            relative.to_string()
        } else {
            format!("{}/", relative)
        };

        self.negations.iter().any(|rule| {
            let body = rule.body();
            body.len() > prefix.len() && body.starts_with(&prefix)
        })
    }

    fn relative<'a>(&self, path: &'a str) -> &'a str {
        match &self.base {
            Some(base) => path.strip_prefix(base.as_str()).unwrap_or(path),
            None => path,
        }
    }
}

//! Search module - name and content search over a file tree
//!
//! Provides:
//! - glob: glob to regex translation
//! - ignore_rules: gitignore-style exclusion rules
//! - query: query compilation
//! - highlight: span location and painting
//! - walker: depth-bounded traversal
//! - content: per-file line search

pub mod content;
pub mod glob;
pub mod highlight;
pub mod ignore_rules;
pub mod query;
pub mod walker;

use anyhow::Result;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::model::{FindError, FindResult, Hit};
use crate::core::paths::normalize_path;
use crate::core::render::{RenderConfig, Renderer};
use ignore_rules::{IgnoreRules, DEFAULT_IGNORE_FILE};
use query::{CompiledQuery, QueryOptions};
use walker::WalkOptions;

/// Maximum symlink hops followed when resolving the input path
const MAX_SYMLINK_HOPS: usize = 40;

/// Everything one invocation needs
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    pub path: PathBuf,
    pub max_depth: usize,
    pub case_sensitive: bool,
    pub exact: bool,
    /// Search file contents instead of names
    pub contents: bool,
    /// Honor the ignore-rules file
    pub ignore: bool,
    pub ignore_file: String,
    pub hidden: bool,
    /// Resolve the root to an absolute canonical path
    pub full_path: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            query: String::new(),
            path: PathBuf::from("."),
            max_depth: 10,
            case_sensitive: false,
            exact: false,
            contents: false,
            ignore: false,
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            hidden: false,
            full_path: false,
        }
    }
}

/// What the input path turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    File,
    Directory,
}

/// Follow the input through any chain of symlinks and classify the target
pub fn resolve_input(path: &Path) -> FindResult<(PathBuf, InputKind)> {
    let mut current = path.to_path_buf();
    let mut seen = HashSet::new();

    loop {
        let meta = fs::symlink_metadata(&current)
            .map_err(|e| not_found_or_io(&current, !seen.is_empty(), e))?;
        if !meta.file_type().is_symlink() {
            break;
        }

        if !seen.insert(current.clone()) || seen.len() > MAX_SYMLINK_HOPS {
            return Err(FindError::SymlinkCycle(path.to_path_buf()));
        }

        let target = fs::read_link(&current).map_err(|e| FindError::io(&current, e))?;
        current = match current.parent() {
            Some(parent) if target.is_relative() => parent.join(target),
            _ => target,
        };
        debug!("Input symlink resolves to {}", current.display());
    }

    let meta =
        fs::metadata(&current).map_err(|e| not_found_or_io(&current, !seen.is_empty(), e))?;
    let kind = if meta.is_dir() {
        InputKind::Directory
    } else if meta.is_file() {
        InputKind::File
    } else {
        return Err(FindError::UnsupportedInput(current));
    };

    // Keep the path as given unless a link was followed
    let resolved = if seen.is_empty() {
        path.to_path_buf()
    } else {
        current
    };
    Ok((resolved, kind))
}

/// `followed` tells whether `path` was reached through a symlink
fn not_found_or_io(path: &Path, followed: bool, e: io::Error) -> FindError {
    match e.kind() {
        io::ErrorKind::NotFound if followed => FindError::TargetNotFound(path.to_path_buf()),
        io::ErrorKind::NotFound => FindError::InputNotFound(path.to_path_buf()),
        _ => FindError::io(path, e),
    }
}

/// Run a search and return hits in output order
pub fn search(options: &SearchOptions) -> FindResult<Vec<Hit>> {
    let (resolved, kind) = resolve_input(&options.path)?;

    if options.contents && kind == InputKind::File {
        return Err(FindError::Usage(
            "--contents cannot be used with a single file; file inputs are always searched by content"
                .to_string(),
        ));
    }

    let query = CompiledQuery::compile(
        &options.query,
        QueryOptions {
            case_sensitive: options.case_sensitive,
            exact: options.exact,
        },
    )?;
    debug!(
        "Compiled query {:?} as pattern {:?} (word {:?})",
        query.raw(),
        query.pattern(),
        query.word()
    );

    let root = if options.full_path {
        resolved
            .canonicalize()
            .map_err(|e| FindError::io(&resolved, e))?
    } else {
        resolved
    };

    let rules_dir = match kind {
        InputKind::Directory => root.clone(),
        InputKind::File => root
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let rules = if options.ignore {
        let rules = IgnoreRules::build(&rules_dir, &options.ignore_file)?
            .with_base(normalize_path(&rules_dir));
        if rules.is_empty() {
            debug!("Ignore rules file has no patterns");
        }
        Some(rules)
    } else {
        None
    };

    let hits = match kind {
        InputKind::Directory => walker::walk(
            &root,
            &query,
            rules.as_ref(),
            WalkOptions {
                max_depth: options.max_depth,
                hidden: options.hidden,
                contents: options.contents,
            },
        )?,
        InputKind::File => search_single_file(&root, &query, rules.as_ref())?,
    };

    info!("Found {} results under {}", hits.len(), root.display());
    Ok(hits)
}

fn search_single_file(
    path: &Path,
    query: &CompiledQuery,
    rules: Option<&IgnoreRules>,
) -> FindResult<Vec<Hit>> {
    let shown = normalize_path(path);
    if rules.is_some_and(|rules| rules.is_excluded(&shown)) {
        debug!("Input file is excluded by ignore rules: {}", path.display());
        return Ok(Vec::new());
    }

    Ok(content::search_file(path, &shown, query)?
        .into_iter()
        .collect())
}

/// Run the search and print all results at once
pub fn run_search(options: &SearchOptions, config: RenderConfig) -> Result<()> {
    let hits = search(options)?;

    let renderer = Renderer::with_config(config);
    let output = renderer.render(&hits);
    if !output.is_empty() {
        println!("{}", output);
    }

    Ok(())
}

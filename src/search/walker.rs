//! Depth-bounded directory walker
//!
//! Each directory level is listed with walkdir (sorted by name), files are
//! processed before subdirectories, and subdirectories are descended depth first.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::core::model::{FindResult, Hit, HitKind};
use crate::core::paths::{file_name, is_hidden_name, normalize_path, rule_path};
use crate::search::content::search_file;
use crate::search::ignore_rules::IgnoreRules;
use crate::search::query::CompiledQuery;

/// Traversal options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Deepest level visited; the root's children are depth 1
    pub max_depth: usize,
    pub hidden: bool,
    pub contents: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            max_depth: 10,
            hidden: false,
            contents: false,
        }
    }
}

/// Entry type, determined once at listing time without following links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    RegularFile,
    Directory,
    Symlink,
}

#[derive(Debug, Clone)]
struct Entry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
}

/// Walk `root` and collect hits in output order
pub fn walk(
    root: &Path,
    query: &CompiledQuery,
    rules: Option<&IgnoreRules>,
    options: WalkOptions,
) -> FindResult<Vec<Hit>> {
    let mut walker = Walker {
        query,
        rules,
        options,
        hits: Vec::new(),
        branch: Vec::new(),
    };

    if let Ok(canonical) = root.canonicalize() {
        walker.branch.push(canonical);
    }
    walker.visit(root, 1)?;

    debug!("Walk of {} produced {} hits", root.display(), walker.hits.len());
    Ok(walker.hits)
}

struct Walker<'a> {
    query: &'a CompiledQuery,
    rules: Option<&'a IgnoreRules>,
    options: WalkOptions,
    hits: Vec<Hit>,
    /// Canonical directories on the current branch
    branch: Vec<PathBuf>,
}

impl Walker<'_> {
    fn visit(&mut self, dir: &Path, depth: usize) -> FindResult<()> {
        if depth > self.options.max_depth {
            return Ok(());
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();

        for entry in self.list(dir) {
            if !self.options.hidden && is_hidden_name(&entry.name) {
                continue;
            }

            let Some(kind) = resolve_kind(&entry) else {
                continue;
            };
            let is_dir = kind == EntryKind::Directory;

            let mut report = true;
            if let Some(rules) = self.rules {
                let path = rule_path(&normalize_path(&entry.path), is_dir);
                if rules.is_excluded(&path) {
                    if is_dir && rules.may_reinclude_under(&path) {
                        debug!("Descending into excluded {} for negations", path);
                        report = false;
                    } else {
                        debug!("Ignored by rules: {}", path);
                        continue;
                    }
                }
            }

            if is_dir {
                dirs.push((entry, report));
            } else {
                files.push(entry);
            }
        }

        for file in &files {
            self.process_file(file)?;
        }

        for (sub, report) in &dirs {
            if *report {
                self.match_name(sub, HitKind::Dir);
            }
            self.descend(sub, depth + 1)?;
        }

        Ok(())
    }

    fn descend(&mut self, dir: &Entry, depth: usize) -> FindResult<()> {
        if depth > self.options.max_depth {
            return Ok(());
        }

        let canonical = match dir.path.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                warn!("Cannot resolve {}: {}", dir.path.display(), e);
                return Ok(());
            }
        };
        if self.branch.contains(&canonical) {
            warn!("Symlink loop detected, not descending: {}", dir.path.display());
            return Ok(());
        }

        self.branch.push(canonical);
        let result = self.visit(&dir.path, depth);
        self.branch.pop();
        result
    }

    fn process_file(&mut self, file: &Entry) -> FindResult<()> {
        if !self.options.contents {
            self.match_name(file, HitKind::File);
            return Ok(());
        }

        let display = normalize_path(&file.path);
        if let Some(hit) = search_file(&file.path, &display, self.query)? {
            self.hits.push(hit);
        }
        Ok(())
    }

    fn match_name(&mut self, entry: &Entry, kind: HitKind) {
        if let Some(hit) = name_hit(&entry.path, &entry.name, kind, self.query) {
            self.hits.push(hit);
        }
    }

    /// Immediate children of `dir`, sorted by file name
    fn list(&self, dir: &Path) -> Vec<Entry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_dir() {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::RegularFile
            } else {
                debug!("Skipping special file {}", entry.path().display());
                continue;
            };

            entries.push(Entry {
                name: file_name(entry.path()),
                path: entry.into_path(),
                kind,
            });
        }

        entries
    }
}

/// Follow a symlink entry to the kind of its target; `None` for dangling links
/// and links to anything other than a regular file or directory
fn resolve_kind(entry: &Entry) -> Option<EntryKind> {
    if entry.kind != EntryKind::Symlink {
        return Some(entry.kind);
    }

    match fs::metadata(&entry.path) {
        Ok(meta) if meta.is_dir() => Some(EntryKind::Directory),
        Ok(meta) if meta.is_file() => Some(EntryKind::RegularFile),
        Ok(_) => {
            debug!("Skipping link to special file {}", entry.path.display());
            None
        }
        Err(e) => {
            debug!("Skipping dangling symlink {}: {}", entry.path.display(), e);
            None
        }
    }
}

/// Match `name` and report the full path with the span shifted onto it
pub fn name_hit(path: &Path, name: &str, kind: HitKind, query: &CompiledQuery) -> Option<Hit> {
    let span = query.first_span(name)?;
    let display = normalize_path(path);

    let prefix_len = display.strip_suffix(name).map(str::len);
    let (display, span) = match prefix_len {
        Some(offset) => (display, span.offset(offset)),
        None => (name.to_string(), span),
    };

    Some(Hit::Name {
        entry: kind,
        path: display,
        span,
    })
}

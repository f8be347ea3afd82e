//! File content searcher

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

use crate::core::model::{FindError, FindResult, Hit, LineHit};
use crate::search::query::CompiledQuery;

/// Scan `path` line by line. Returns `None` when nothing matched or the file
/// is not text (invalid UTF-8 or NUL bytes); other read failures are fatal.
pub fn search_file(path: &Path, display: &str, query: &CompiledQuery) -> FindResult<Option<Hit>> {
    let file = File::open(path).map_err(|e| FindError::io(path, e))?;
    let reader = BufReader::new(file);
    let mut lines = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                debug!("Skipping undecodable file: {}", path.display());
                return Ok(None);
            }
            Err(e) => return Err(FindError::io(path, e)),
        };

        if line.contains('\0') {
            debug!("Skipping binary file: {}", path.display());
            return Ok(None);
        }

        if query.is_match(&line) {
            let spans = query.word_spans(&line);
            lines.push(LineHit {
                number: index + 1,
                text: line,
                spans,
            });
        }
    }

    if lines.is_empty() {
        return Ok(None);
    }

    Ok(Some(Hit::Content {
        path: display.to_string(),
        lines,
    }))
}

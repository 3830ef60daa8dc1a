use std::{fs, path::{Path, PathBuf}, time::Instant};

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::{info, warn};

use crate::{error::{Result, SearchError}, vectorizer::DocId};

/// Extension of the files picked up as documents.
pub const DOCUMENT_EXTENSION: &str = "txt";

/// Read every `*.txt` file directly inside `dir`, keyed by file name.
///
/// Files are read in parallel. A file that cannot be read is logged and
/// skipped; the rest of the corpus still loads. A missing directory, or a
/// directory yielding no documents at all, is an error.
pub fn load_documents<P: AsRef<Path>>(dir: P) -> Result<IndexMap<DocId, String>> {
    let dir = dir.as_ref();
    let start = Instant::now();

    let read_dir = fs::read_dir(dir).map_err(|source| SearchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION))
        .collect();
    files.sort();

    let loaded: Vec<Option<(DocId, String)>> = files
        .par_iter()
        .map(|path| {
            let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
                warn!(path = %path.display(), "skipping document with non UTF-8 file name");
                return None;
            };
            match fs::read_to_string(path) {
                Ok(content) => Some((DocId::from(name), content)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to read document, skipping");
                    None
                }
            }
        })
        .collect();

    let skipped = loaded.iter().filter(|doc| doc.is_none()).count();
    let documents: IndexMap<DocId, String> = loaded.into_iter().flatten().collect();

    if documents.is_empty() {
        return Err(SearchError::EmptyCorpus(format!(
            "no readable .{} documents in {}",
            DOCUMENT_EXTENSION,
            dir.display()
        )));
    }

    info!(
        dir = %dir.display(),
        loaded = documents.len(),
        skipped,
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "loaded documents"
    );
    Ok(documents)
}

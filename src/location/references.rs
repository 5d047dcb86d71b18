//! Line lookup for report source references.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Reads a source file the session log was parsed from.
pub trait SourceReader {
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    fn read_source(&self, path: &Path) -> io::Result<String>;
}

/// Reads sources from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_source(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// Finds the line a mention was written on. Each file is read at most once
/// per scanner; unreadable files are remembered as such.
pub struct ReferenceScanner<'r> {
    reader: &'r dyn SourceReader,
    files: HashMap<PathBuf, Option<Vec<String>>>,
    reads: usize,
}

impl<'r> ReferenceScanner<'r> {
    /// A scanner that has read nothing yet.
    pub fn new(reader: &'r dyn SourceReader) -> Self {
        Self {
            reader,
            files: HashMap::new(),
            reads: 0,
        }
    }

    /// Number of files actually read.
    pub const fn reads(&self) -> usize {
        self.reads
    }

    /// 1-based line of the first case-insensitive occurrence of `needle`,
    /// searching after `header` when the header is found.
    pub fn find_line(&mut self, path: &Path, header: &str, needle: &str) -> Option<usize> {
        let lines = self.lines(path)?;
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let header = header.trim();
        let start = if header.is_empty() {
            0
        } else {
            lines.iter().position(|l| l.trim() == header).unwrap_or(0)
        };

        let hit = |from: usize| {
            lines
                .iter()
                .enumerate()
                .skip(from)
                .find(|(_, line)| line.to_lowercase().contains(&needle))
                .map(|(i, _)| i + 1)
        };
        hit(start).or_else(|| if start > 0 { hit(0) } else { None })
    }

    fn lines(&mut self, path: &Path) -> Option<&Vec<String>> {
        if !self.files.contains_key(path) {
            let loaded = match self.reader.read_source(path) {
                Ok(text) => Some(text.lines().map(str::to_string).collect()),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "source file unreadable");
                    None
                }
            };
            self.reads += 1;
            self.files.insert(path.to_path_buf(), loaded);
        }
        self.files.get(path).and_then(Option::as_ref)
    }
}

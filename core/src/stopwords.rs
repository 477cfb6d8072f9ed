use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::source::{decode_lossy, split_lines};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::Path;

/// Case-insensitive set of words excluded from indexing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn new() -> Self { Self::default() }

    /// One candidate per line; surrounding whitespace is trimmed and blank lines ignored.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = lines
            .into_iter()
            .map(|l| l.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a stop list from disk. A missing file is not an error and yields an empty set.
    pub fn load<P: AsRef<Path>>(path: P, sink: &dyn DiagnosticSink) -> Self {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => {
                let words = Self::from_lines(split_lines(&decode_lossy(bytes)));
                tracing::debug!(path = %path.display(), count = words.len(), "loaded stop list");
                words
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no stop list, indexing without stop words");
                Self::new()
            }
            Err(e) => {
                sink.report(Diagnostic::StopListUnreadable { path: path.to_path_buf(), reason: e.to_string() });
                Self::new()
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        if self.words.contains(word) { return true; }
        let lowered = word.to_lowercase();
        lowered != word && self.words.contains(&lowered)
    }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

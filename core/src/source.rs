use anyhow::{Context, Result};
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One enumerated document. `text` carries the read failure when the file could not be read.
#[derive(Debug)]
pub struct SourceDocument {
    pub name: String,
    pub text: io::Result<String>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self { name: name.into(), text: Ok(text.into()) }
    }

    pub fn failed(name: impl Into<String>, error: io::Error) -> Self {
        Self { name: name.into(), text: Err(error) }
    }
}

/// The regular files directly inside a directory, minus the stop list.
pub struct DirectorySource {
    root: PathBuf,
    stop_list: OsString,
}

impl DirectorySource {
    pub fn new<P: AsRef<Path>>(root: P, stop_list: impl Into<OsString>) -> Self {
        Self { root: root.as_ref().to_path_buf(), stop_list: stop_list.into() }
    }

    pub fn stop_list_path(&self) -> PathBuf { self.root.join(&self.stop_list) }

    /// File paths in enumeration order (sorted by file name).
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root).min_depth(1).max_depth(1).sort_by_file_name();
        for entry in walker {
            let entry = entry.with_context(|| format!("reading directory {}", self.root.display()))?;
            // follow symlinks the way a plain is_file() check would
            if !entry.path().is_file() { continue; }
            if entry.file_name() == self.stop_list.as_os_str() { continue; }
            files.push(entry.into_path());
        }
        Ok(files)
    }

    /// Read every document. Per-file failures are carried in the returned items; only an
    /// unreadable directory is an error.
    pub fn documents(&self) -> Result<Vec<SourceDocument>> {
        let files = self.files()?;
        tracing::debug!(root = %self.root.display(), count = files.len(), "enumerated documents");
        Ok(files
            .into_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                SourceDocument { name, text: std::fs::read(&path).map(decode_lossy) }
            })
            .collect())
    }
}

/// Decode UTF-8, dropping any invalid byte sequences.
pub fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect(),
    }
}

/// Split on `\r\n`, `\n` or a lone `\r`. A trailing terminator does not produce an empty line.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() { return None; }
        match rest.find(|c: char| c == '\r' || c == '\n') {
            Some(i) => {
                let line = &rest[..i];
                let skip = if rest[i..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[i + skip..];
                Some(line)
            }
            None => Some(std::mem::take(&mut rest)),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn excludes_stop_list_and_subdirectories() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "cloud").unwrap();
        fs::write(dir.path().join("a.txt"), "computer").unwrap();
        fs::write(dir.path().join("stop.txt"), "is").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.txt"), "cat").unwrap();

        let docs = DirectorySource::new(dir.path(), "stop.txt").documents().unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
        assert_eq!(docs[0].text.as_deref().unwrap(), "computer");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let source = DirectorySource::new(dir.path().join("gone"), "stop.txt");
        assert!(source.documents().is_err());
    }

    #[test]
    fn splits_on_every_line_ending() {
        let lines: Vec<_> = split_lines("a\r\nb\rc\nd\r\r\ne").collect();
        assert_eq!(lines, vec!["a", "b", "c", "d", "", "e"]);
        assert_eq!(split_lines("cloud 1.0\rcomputer 3.0\r").collect::<Vec<_>>(), vec!["cloud 1.0", "computer 3.0"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn invalid_utf8_is_dropped() {
        assert_eq!(decode_lossy(b"ca\xfft".to_vec()), "cat");
        assert_eq!(decode_lossy("café".as_bytes().to_vec()), "café");
    }
}

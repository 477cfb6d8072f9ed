use crate::index::{DocTable, InvertedIndex, TermTable};
use anyhow::{Context, Result};
use std::fs::create_dir_all;
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct ExportPaths {
    pub root: PathBuf,
}

impl ExportPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn doc_table(&self) -> PathBuf { self.root.join("doc_table.csv") }
    pub fn term_table(&self) -> PathBuf { self.root.join("term_table.csv") }
}

/// `Document ID,Filename` rows in id order.
pub fn write_doc_table<W: Write>(out: W, docs: &DocTable) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["Document ID", "Filename"])?;
    for (doc_id, name) in docs.iter() {
        w.write_record([doc_id.to_string().as_str(), name])?;
    }
    w.flush()?;
    Ok(())
}

/// `Term,Document ID,Frequency` rows, one per posting, sorted by term then id.
pub fn write_term_table<W: Write>(out: W, terms: &TermTable) -> Result<()> {
    let mut w = csv::Writer::from_writer(out);
    w.write_record(["Term", "Document ID", "Frequency"])?;
    for (term, postings) in terms.sorted() {
        for (doc_id, freq) in postings {
            w.write_record([term, doc_id.to_string().as_str(), freq.to_string().as_str()])?;
        }
    }
    w.flush()?;
    Ok(())
}

pub fn save_doc_table(paths: &ExportPaths, docs: &DocTable) -> Result<()> {
    create_dir_all(&paths.root)?;
    let file = paths.doc_table();
    let f = std::fs::File::create(&file).with_context(|| format!("creating {}", file.display()))?;
    write_doc_table(f, docs)
}

pub fn save_term_table(paths: &ExportPaths, terms: &TermTable) -> Result<()> {
    create_dir_all(&paths.root)?;
    let file = paths.term_table();
    let f = std::fs::File::create(&file).with_context(|| format!("creating {}", file.display()))?;
    write_term_table(f, terms)
}

/// Write both tables under `paths.root`.
pub fn save_index(paths: &ExportPaths, index: &InvertedIndex) -> Result<()> {
    save_doc_table(paths, index.docs())?;
    save_term_table(paths, index.terms())?;
    tracing::info!(root = %paths.root.display(), docs = index.num_docs(), terms = index.num_terms(), "exported index tables");
    Ok(())
}

use crate::diagnostics::{Diagnostic, DiagnosticSink, TRACING_SINK};
use crate::index::{DocId, DocTable, InvertedIndex, TermTable};
use crate::source::SourceDocument;
use crate::stopwords::StopWords;
use crate::tokenizer::tokenize;
use rayon::prelude::*;
use std::collections::HashMap;

pub const DEFAULT_PREFIX: char = 'c';

/// Builds an [`InvertedIndex`] from an ordered document collection.
///
/// Only tokens whose first character matches the prefix (case-insensitively) and that are
/// not stop words are indexed.
pub struct IndexBuilder<'a> {
    stop_words: &'a StopWords,
    prefix: char,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(stop_words: &'a StopWords) -> Self {
        Self { stop_words, prefix: DEFAULT_PREFIX, sink: &TRACING_SINK }
    }

    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix.to_lowercase().next().unwrap_or(prefix);
        self
    }

    pub fn sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Index documents one at a time in the order supplied.
    pub fn build<I>(&self, documents: I) -> InvertedIndex
    where
        I: IntoIterator<Item = SourceDocument>,
    {
        let mut docs = DocTable::default();
        let mut terms = TermTable::default();
        for doc in documents {
            let doc_id = docs.push(doc.name.clone());
            if let Some(counts) = self.count_document(doc) {
                merge(&mut terms, doc_id, counts);
            }
        }
        self.finish(docs, terms)
    }

    /// Convenience for in-memory `(name, text)` pairs.
    pub fn build_texts<I, N, T>(&self, documents: I) -> InvertedIndex
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        self.build(documents.into_iter().map(|(n, t)| SourceDocument::new(n, t)))
    }

    /// Count documents on the rayon pool, then merge serially in id order.
    /// Produces the same index as [`IndexBuilder::build`].
    pub fn build_parallel(&self, documents: Vec<SourceDocument>) -> InvertedIndex {
        let mut docs = DocTable::default();
        for doc in &documents {
            docs.push(doc.name.clone());
        }
        let counted: Vec<Option<HashMap<String, u32>>> =
            documents.into_par_iter().map(|doc| self.count_document(doc)).collect();

        let mut terms = TermTable::default();
        for (doc_id, counts) in counted.into_iter().enumerate() {
            if let Some(counts) = counts {
                merge(&mut terms, doc_id as DocId, counts);
            }
        }
        self.finish(docs, terms)
    }

    fn count_document(&self, doc: SourceDocument) -> Option<HashMap<String, u32>> {
        let text = match doc.text {
            Ok(text) => text,
            Err(e) => {
                self.sink.report(Diagnostic::DocumentSkipped { name: doc.name, reason: e.to_string() });
                return None;
            }
        };
        let mut tf_counts: HashMap<String, u32> = HashMap::new();
        for token in tokenize(&text) {
            if self.retains(&token) {
                *tf_counts.entry(token).or_insert(0) += 1;
            }
        }
        Some(tf_counts)
    }

    fn retains(&self, token: &str) -> bool {
        token.chars().next() == Some(self.prefix) && !self.stop_words.contains(token)
    }

    fn finish(&self, docs: DocTable, terms: TermTable) -> InvertedIndex {
        tracing::info!(num_docs = docs.len(), num_terms = terms.len(), "index build complete");
        InvertedIndex { docs, terms }
    }
}

fn merge(terms: &mut TermTable, doc_id: DocId, counts: HashMap<String, u32>) {
    for (term, tf) in counts {
        terms.record(term, doc_id, tf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingSink;
    use std::io;

    #[test]
    fn unreadable_document_keeps_its_id_but_has_no_postings() {
        let sw = StopWords::new();
        let sink = CollectingSink::new();
        let docs = vec![
            SourceDocument::new("a.txt", "cat"),
            SourceDocument::failed("b.txt", io::Error::new(io::ErrorKind::PermissionDenied, "denied")),
            SourceDocument::new("c.txt", "cat cow"),
        ];
        let index = IndexBuilder::new(&sw).sink(&sink).build(docs);
        assert_eq!(index.docs().name(1), Some("b.txt"));
        assert_eq!(index.docs().len(), 3);
        let cat = index.terms().postings("cat").unwrap();
        assert_eq!(cat.get(&0), Some(&1));
        assert_eq!(cat.get(&2), Some(&1));
        assert!(!cat.contains_key(&1));
        assert_eq!(
            sink.diagnostics(),
            vec![Diagnostic::DocumentSkipped { name: "b.txt".into(), reason: "denied".into() }]
        );
    }

    #[test]
    fn custom_prefix_is_case_insensitive() {
        let sw = StopWords::new();
        let index = IndexBuilder::new(&sw).prefix('D').build_texts([("d0", "Dog cat dig")]);
        assert!(index.terms().contains("dog"));
        assert!(index.terms().contains("dig"));
        assert!(!index.terms().contains("cat"));
    }

    #[test]
    fn digits_and_underscores_never_match_c() {
        let sw = StopWords::new();
        let index = IndexBuilder::new(&sw).build_texts([("d0", "_cat 9cats c_3 c")]);
        let mut terms: Vec<_> = index.terms().iter().map(|(t, _)| t.to_string()).collect();
        terms.sort();
        assert_eq!(terms, vec!["c", "c_3"]);
    }
}

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

pub type DocId = u32;

/// Per-document term frequencies for a single term, ordered by doc id.
pub type Postings = BTreeMap<DocId, u32>;

/// Document names indexed by their position; ids are contiguous from 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTable {
    names: Vec<String>,
}

impl DocTable {
    pub(crate) fn push(&mut self, name: String) -> DocId {
        let id = self.names.len() as DocId;
        self.names.push(name);
        id
    }

    pub fn name(&self, id: DocId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (DocId, &str)> + '_ {
        self.names.iter().enumerate().map(|(i, n)| (i as DocId, n.as_str()))
    }
}

/// Term -> postings. Every postings map is non-empty and every frequency is positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermTable {
    terms: HashMap<String, Postings>,
}

impl TermTable {
    pub(crate) fn record(&mut self, term: String, doc_id: DocId, freq: u32) {
        if freq == 0 { return; }
        self.terms.entry(term).or_default().insert(doc_id, freq);
    }

    pub fn postings(&self, term: &str) -> Option<&Postings> { self.terms.get(term) }

    pub fn contains(&self, term: &str) -> bool { self.terms.contains_key(term) }

    pub fn len(&self) -> usize { self.terms.len() }

    pub fn is_empty(&self) -> bool { self.terms.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Postings)> + '_ {
        self.terms.iter().map(|(t, p)| (t.as_str(), p))
    }

    /// Terms in lexical order, for display and export.
    pub fn sorted(&self) -> Vec<(&str, &Postings)> {
        let mut out: Vec<_> = self.iter().collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }
}

/// A completed, read-only index snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    pub(crate) docs: DocTable,
    pub(crate) terms: TermTable,
}

impl InvertedIndex {
    pub fn docs(&self) -> &DocTable { &self.docs }

    pub fn terms(&self) -> &TermTable { &self.terms }

    pub fn num_docs(&self) -> usize { self.docs.len() }

    pub fn num_terms(&self) -> usize { self.terms.len() }
}

//! Weighted term-frequency ranking over a built [`InvertedIndex`].
//!
//! A document's score for one term is `frequency * weight`. Multi-term queries sum the
//! per-term contributions. Results are ordered by score descending, ties by doc id ascending.

use crate::diagnostics::{Diagnostic, DiagnosticSink, TRACING_SINK};
use crate::index::{DocId, InvertedIndex};
use crate::source::{decode_lossy, split_lines};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedHit {
    pub doc_id: DocId,
    pub name: String,
    pub score: f64,
}

/// A weight field, possibly replaced by [`DEFAULT_WEIGHT`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedWeight {
    pub value: f64,
    pub substituted: bool,
}

pub fn parse_weight(raw: &str) -> ParsedWeight {
    match raw.trim().parse::<f64>() {
        Ok(value) => ParsedWeight { value, substituted: false },
        Err(_) => ParsedWeight { value: DEFAULT_WEIGHT, substituted: true },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryLine {
    Blank,
    Malformed,
    Weighted { term: String, raw_weight: String, weight: ParsedWeight },
}

/// Parse a `term weight` line. Fields past the second are ignored.
pub fn parse_query_line(line: &str) -> QueryLine {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next()) {
        (None, _) => QueryLine::Blank,
        (Some(_), None) => QueryLine::Malformed,
        (Some(term), Some(raw)) => QueryLine::Weighted {
            term: term.to_lowercase(),
            raw_weight: raw.to_string(),
            weight: parse_weight(raw),
        },
    }
}

pub struct QueryEngine<'a> {
    index: &'a InvertedIndex,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> QueryEngine<'a> {
    pub fn new(index: &'a InvertedIndex) -> Self {
        Self { index, sink: &TRACING_SINK }
    }

    pub fn sink(mut self, sink: &'a dyn DiagnosticSink) -> Self {
        self.sink = sink;
        self
    }

    /// Top `top_n` documents for a single term. An unknown term is reported and yields no hits.
    pub fn find(&self, term: &str, weight: f64, top_n: usize) -> Vec<RankedHit> {
        let term = term.to_lowercase();
        let Some(postings) = self.index.terms.postings(&term) else {
            self.sink.report(Diagnostic::TermNotFound { term });
            return Vec::new();
        };
        let hits = postings
            .iter()
            .map(|(&doc_id, &freq)| RankedHit { doc_id, name: self.doc_name(doc_id), score: freq as f64 * weight })
            .collect();
        rank(hits, top_n)
    }

    /// Top `top_n` documents for a list of `term weight` lines, summing each document's
    /// per-term scores.
    pub fn find_weighted<I, S>(&self, lines: I, top_n: usize) -> Vec<RankedHit>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // keyed by name; doc_id tracks the lowest id carrying it
        let mut totals: HashMap<String, (DocId, f64)> = HashMap::new();
        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            let line_no = i + 1;
            let (term, raw_weight, weight) = match parse_query_line(line) {
                QueryLine::Blank => continue,
                QueryLine::Malformed => {
                    self.sink.report(Diagnostic::MalformedQueryLine { line_no, line: line.trim().to_string() });
                    continue;
                }
                QueryLine::Weighted { term, raw_weight, weight } => (term, raw_weight, weight),
            };
            if weight.substituted {
                self.sink.report(Diagnostic::WeightSubstituted {
                    line_no,
                    term: term.clone(),
                    raw: raw_weight,
                    default: weight.value,
                });
            }
            let Some(postings) = self.index.terms.postings(&term) else {
                self.sink.report(Diagnostic::TermNotFound { term });
                continue;
            };
            for (&doc_id, &freq) in postings {
                let entry = totals.entry(self.doc_name(doc_id)).or_insert((doc_id, 0.0));
                entry.0 = entry.0.min(doc_id);
                entry.1 += freq as f64 * weight.value;
            }
        }
        let hits = totals
            .into_iter()
            .map(|(name, (doc_id, score))| RankedHit { doc_id, name, score })
            .collect();
        rank(hits, top_n)
    }

    /// [`QueryEngine::find_weighted`] over the lines of a file. An unreadable file is reported
    /// and yields no hits.
    pub fn find_from_file<P: AsRef<Path>>(&self, path: P, top_n: usize) -> Vec<RankedHit> {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => self.find_weighted(split_lines(&decode_lossy(bytes)), top_n),
            Err(e) => {
                self.sink.report(Diagnostic::QuerySourceUnreadable { path: path.to_path_buf(), reason: e.to_string() });
                Vec::new()
            }
        }
    }

    fn doc_name(&self, doc_id: DocId) -> String {
        // postings only reference ids from the same build
        self.index.docs.name(doc_id).unwrap_or_default().to_string()
    }
}

fn by_rank(a: &RankedHit, b: &RankedHit) -> Ordering {
    b.score.total_cmp(&a.score).then(a.doc_id.cmp(&b.doc_id))
}

fn rank(mut hits: Vec<RankedHit>, top_n: usize) -> Vec<RankedHit> {
    if top_n == 0 { return Vec::new(); }
    if hits.len() > top_n {
        hits.select_nth_unstable_by(top_n - 1, by_rank);
        hits.truncate(top_n);
    }
    hits.sort_unstable_by(by_rank);
    hits
}

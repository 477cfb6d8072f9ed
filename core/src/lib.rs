//! Restricted inverted index over a directory of text documents, with weighted
//! term-frequency ranking.

pub mod builder;
pub mod diagnostics;
pub mod export;
pub mod index;
pub mod query;
pub mod source;
pub mod stopwords;
pub mod tokenizer;

pub use builder::IndexBuilder;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use index::{DocId, DocTable, InvertedIndex, Postings, TermTable};
pub use query::{ParsedWeight, QueryEngine, RankedHit};
pub use source::{DirectorySource, SourceDocument};
pub use stopwords::StopWords;

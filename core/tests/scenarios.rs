use cindex_core::diagnostics::{CollectingSink, Diagnostic};
use cindex_core::source::{DirectorySource, SourceDocument};
use cindex_core::tokenizer::tokenize;
use cindex_core::{IndexBuilder, InvertedIndex, QueryEngine, StopWords};
use std::collections::BTreeMap;
use std::fs;
use tempfile::tempdir;

fn stop_words() -> StopWords {
    StopWords::from_lines(["is", "and"])
}

fn sample_index() -> InvertedIndex {
    IndexBuilder::new(&stop_words())
        .build_texts([("doc0", "computer science is fun"), ("doc1", "cloud computing and cloud storage")])
}

fn hits(results: Vec<cindex_core::RankedHit>) -> Vec<(String, f64)> {
    results.into_iter().map(|h| (h.name, h.score)).collect()
}

fn table(index: &InvertedIndex) -> BTreeMap<String, Vec<(u32, u32)>> {
    index
        .terms()
        .iter()
        .map(|(t, p)| (t.to_string(), p.iter().map(|(d, f)| (*d, *f)).collect()))
        .collect()
}

#[test]
fn build_keeps_only_c_terms() {
    let index = sample_index();
    let expected: BTreeMap<String, Vec<(u32, u32)>> = [
        ("cloud".to_string(), vec![(1, 2)]),
        ("computer".to_string(), vec![(0, 1)]),
        ("computing".to_string(), vec![(1, 1)]),
    ]
    .into_iter()
    .collect();
    assert_eq!(table(&index), expected);
    assert_eq!(index.docs().name(0), Some("doc0"));
    assert_eq!(index.docs().name(1), Some("doc1"));
}

#[test]
fn find_single_term() {
    let index = sample_index();
    let results = QueryEngine::new(&index).find("cloud", 2.0, 5);
    assert_eq!(hits(results), vec![("doc1".to_string(), 4.0)]);
}

#[test]
fn find_missing_term_reports_not_found() {
    let index = sample_index();
    let sink = CollectingSink::new();
    let results = QueryEngine::new(&index).sink(&sink).find("missing", 1.0, 5);
    assert!(results.is_empty());
    assert_eq!(sink.diagnostics(), vec![Diagnostic::TermNotFound { term: "missing".into() }]);
}

#[test]
fn find_weighted_sums_terms() {
    let index = sample_index();
    let results = QueryEngine::new(&index).find_weighted(["cloud 1.0", "computer 3.0"], 2);
    assert_eq!(hits(results), vec![("doc0".to_string(), 3.0), ("doc1".to_string(), 2.0)]);
}

#[test]
fn find_weighted_tolerates_bad_lines() {
    let index = sample_index();
    let sink = CollectingSink::new();
    let results = QueryEngine::new(&index).sink(&sink).find_weighted(["cloud", "computer abc"], 5);
    assert_eq!(hits(results), vec![("doc0".to_string(), 1.0)]);
    let seen = sink.diagnostics();
    assert!(matches!(seen[0], Diagnostic::MalformedQueryLine { line_no: 1, .. }));
    assert!(matches!(&seen[1], Diagnostic::WeightSubstituted { term, default, .. } if term == "computer" && *default == 1.0));
}

#[test]
fn find_from_file_reads_lines_and_fails_soft() {
    let index = sample_index();
    let dir = tempdir().unwrap();
    let query = dir.path().join("words.txt");
    fs::write(&query, "cloud 1.0\n\ncomputer 3.0\n").unwrap();

    let engine = QueryEngine::new(&index);
    assert_eq!(hits(engine.find_from_file(&query, 2)), vec![("doc0".to_string(), 3.0), ("doc1".to_string(), 2.0)]);

    let sink = CollectingSink::new();
    let engine = QueryEngine::new(&index).sink(&sink);
    assert!(engine.find_from_file(dir.path().join("absent.txt"), 2).is_empty());
    assert!(matches!(sink.diagnostics()[0], Diagnostic::QuerySourceUnreadable { .. }));
}

#[test]
fn find_from_file_accepts_carriage_return_line_endings() {
    let index = sample_index();
    let dir = tempdir().unwrap();
    let query = dir.path().join("mac.txt");
    fs::write(&query, "cloud 1.0\rcomputer 3.0\r").unwrap();

    let sink = CollectingSink::new();
    let results = QueryEngine::new(&index).sink(&sink).find_from_file(&query, 2);
    assert_eq!(hits(results), vec![("doc0".to_string(), 3.0), ("doc1".to_string(), 2.0)]);
    assert!(sink.is_empty());
}

#[test]
fn postings_match_filtered_token_counts() {
    let sw = StopWords::from_lines(["can", "cOuld"]);
    let docs = [
        ("a", "Can you count? Could COUNT, count_it, Cat. cat! catalog"),
        ("b", "Nothing here at all"),
        ("c", "cobalt Cobalt COBALT could can"),
    ];
    let index = IndexBuilder::new(&sw).build_texts(docs);

    for (term, postings) in index.terms().iter() {
        assert!(term.starts_with('c'));
        assert!(!sw.contains(term));
        assert!(!postings.is_empty());
        for (&doc_id, &freq) in postings {
            let name = index.docs().name(doc_id).expect("posting references a known document");
            let text = docs.iter().find(|(n, _)| *n == name).unwrap().1;
            let expected = tokenize(text).iter().filter(|t| t.as_str() == term).count() as u32;
            assert_eq!(freq, expected, "{term} in {name}");
        }
    }
    assert_eq!(index.terms().postings("cobalt").unwrap().get(&2), Some(&3));
    assert!(!index.terms().contains("could"));
}

#[test]
fn scores_scale_with_weight() {
    let index = sample_index();
    let engine = QueryEngine::new(&index);
    let once = engine.find("cloud", 1.5, 5);
    let twice = engine.find("cloud", 3.0, 5);
    for (a, b) in once.iter().zip(&twice) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.score * 2.0, b.score);
    }
}

#[test]
fn weighted_score_is_sum_of_single_term_scores() {
    let index = IndexBuilder::new(&StopWords::new()).build_texts([
        ("x", "cat cat cow crab"),
        ("y", "cow cow cow crab"),
        ("z", "crab"),
    ]);
    let engine = QueryEngine::new(&index);
    let query = [("cat", 2.0), ("cow", 0.5), ("crab", -1.0)];
    let lines: Vec<String> = query.iter().map(|(t, w)| format!("{t} {w}")).collect();
    let combined = engine.find_weighted(&lines, 10);

    let mut expected: BTreeMap<String, f64> = BTreeMap::new();
    for (term, weight) in query {
        for hit in engine.find(term, weight, 10) {
            *expected.entry(hit.name).or_default() += hit.score;
        }
    }
    assert_eq!(combined.len(), expected.len());
    for hit in combined {
        assert_eq!(expected[&hit.name], hit.score);
    }
}

#[test]
fn rebuild_and_parallel_build_are_identical() {
    let sw = stop_words();
    let texts = [
        ("a", "cloud computing cloud"),
        ("b", "Cats chase cats and climb"),
        ("c", ""),
        ("d", "completely CLOUDY"),
    ];
    let builder = IndexBuilder::new(&sw);
    let first = builder.build_texts(texts);
    let second = builder.build_texts(texts);
    let parallel = builder.build_parallel(texts.iter().map(|(n, t)| SourceDocument::new(*n, *t)).collect());
    assert_eq!(first, second);
    assert_eq!(first, parallel);
}

#[test]
fn directory_build_excludes_stop_list() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("doc0"), "computer science is fun").unwrap();
    fs::write(dir.path().join("doc1"), "cloud computing and cloud storage").unwrap();
    fs::write(dir.path().join("stoplist.txt"), "is\nand\ncontent\n").unwrap();

    let source = DirectorySource::new(dir.path(), "stoplist.txt");
    let sink = CollectingSink::new();
    let sw = StopWords::load(source.stop_list_path(), &sink);
    let index = IndexBuilder::new(&sw).sink(&sink).build(source.documents().unwrap());

    assert_eq!(index.num_docs(), 2);
    assert_eq!(table(&index), table(&sample_index()));
    assert!(sink.is_empty());
}

#[test]
fn index_serializes_to_json() {
    let index = sample_index();
    let json = serde_json::to_value(&index).unwrap();
    assert_eq!(json["terms"]["terms"]["cloud"]["1"], 2);
    assert_eq!(json["docs"]["names"][0], "doc0");
}

use anyhow::{Context, Result};
use cindex_core::diagnostics::TracingSink;
use cindex_core::export::{save_index, ExportPaths};
use cindex_core::{DirectorySource, IndexBuilder, InvertedIndex, QueryEngine, RankedHit, StopWords};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

mod shell;

#[derive(Parser)]
#[command(name = "cindex")]
#[command(about = "Index the c-words of a document directory and rank documents by weighted term frequency", long_about = None)]
struct Cli {
    #[command(flatten)]
    index: IndexArgs,
    /// Print results as JSON
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IndexArgs {
    /// Directory containing the documents
    #[arg(long)]
    dir: PathBuf,
    /// Name of the stop list file inside the directory (never indexed)
    #[arg(long, default_value = "stoplist.txt")]
    stoplist: String,
    /// Only words starting with this character are indexed
    #[arg(long, default_value_t = 'c')]
    prefix: char,
    /// Tokenize and count documents in parallel
    #[arg(long, default_value_t = false)]
    parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print the document and term tables
    Build {
        /// Also write doc_table.csv and term_table.csv into this directory
        #[arg(long)]
        export: Option<PathBuf>,
        /// Only print the summary line
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Rank documents for a single word
    Find {
        term: String,
        #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
        weight: f64,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Rank documents for a file of `word weight` lines
    Query {
        file: PathBuf,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print the index, write the CSV tables, then open the interactive search menu
    Shell {
        /// Directory for doc_table.csv and term_table.csv
        #[arg(long, default_value = ".")]
        export: PathBuf,
        /// Only print the summary line before the menu
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let index = build_index(&cli.index)?;

    match cli.command {
        Commands::Build { export, quiet } => report_index(&index, export.as_deref(), quiet, cli.json)?,
        Commands::Find { term, weight, top } => {
            let hits = QueryEngine::new(&index).find(&term, weight, top);
            let label = format!("'{term}' (weight: {weight:?})");
            print_hits(&mut io::stdout(), &hits, &label, cli.json)?;
        }
        Commands::Query { file, top } => {
            let hits = QueryEngine::new(&index).find_from_file(&file, top);
            let label = format!("query in '{}'", file.display());
            print_hits(&mut io::stdout(), &hits, &label, cli.json)?;
        }
        Commands::Shell { export, quiet } => {
            report_index(&index, Some(export.as_path()), quiet, cli.json)?;
            shell::run(&index, cli.json)?
        }
    }
    Ok(())
}

fn build_index(args: &IndexArgs) -> Result<InvertedIndex> {
    let source = DirectorySource::new(&args.dir, &args.stoplist);
    let stop_words = StopWords::load(source.stop_list_path(), &TracingSink);
    let documents = source
        .documents()
        .with_context(|| format!("reading documents from {}", args.dir.display()))?;
    tracing::info!(dir = %args.dir.display(), stoplist = %args.stoplist, num_docs = documents.len(), "indexing");

    let builder = IndexBuilder::new(&stop_words).prefix(args.prefix);
    let index = if args.parallel { builder.build_parallel(documents) } else { builder.build(documents) };
    Ok(index)
}

fn report_index(index: &InvertedIndex, export: Option<&Path>, quiet: bool, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(index)?);
    } else {
        println!("Created index with {} documents and {} terms", index.num_docs(), index.num_terms());
        if !quiet {
            display_index(index);
        }
    }
    if let Some(out) = export {
        let paths = ExportPaths::new(out);
        save_index(&paths, index).with_context(|| format!("exporting index to {}", out.display()))?;
        if !json {
            println!("\nResults saved to {} and {}", paths.doc_table().display(), paths.term_table().display());
        }
    }
    Ok(())
}

fn display_index(index: &InvertedIndex) {
    println!("Document Table:");
    println!("---------------");
    for (doc_id, name) in index.docs().iter() {
        println!("ID: {doc_id} -> {name}");
    }

    println!("\nTerm Table:");
    println!("-----------");
    for (term, postings) in index.terms().sorted() {
        let ids: Vec<String> = postings.keys().map(|d| d.to_string()).collect();
        let details: Vec<String> = postings
            .iter()
            .map(|(d, f)| format!("{} (freq: {f})", index.docs().name(*d).unwrap_or("?")))
            .collect();
        println!("'{term}' appears in: [{}] ({})", ids.join(", "), details.join(", "));
    }
}

pub(crate) fn print_hits<W: Write>(out: &mut W, hits: &[RankedHit], label: &str, json: bool) -> Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(hits)?)?;
        return Ok(());
    }
    if hits.is_empty() {
        writeln!(out, "No documents found for {label}.")?;
        return Ok(());
    }
    writeln!(out, "\nTop {} documents for {label}:", hits.len())?;
    writeln!(out, "------------------------------------")?;
    for hit in hits {
        writeln!(out, "Document: {}, Score: {:?}", hit.name, hit.score)?;
    }
    Ok(())
}

use anyhow::Result;
use cindex_core::query::{parse_weight, DEFAULT_WEIGHT};
use cindex_core::{InvertedIndex, QueryEngine};
use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::print_hits;

pub fn run(index: &InvertedIndex, json: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut prompt = Prompt { input: &mut input, out: io::stdout() };
    menu(&mut prompt, index, json)
}

struct Prompt<'a, R: BufRead, W: Write> {
    input: &'a mut R,
    out: W,
}

impl<R: BufRead, W: Write> Prompt<'_, R, W> {
    /// `None` at end of input.
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.out, "{question}")?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn menu<R: BufRead, W: Write>(prompt: &mut Prompt<'_, R, W>, index: &InvertedIndex, json: bool) -> Result<()> {
    let engine = QueryEngine::new(index);
    loop {
        writeln!(prompt.out, "\nSearch options:\n1. Search by single word\n2. Search by word file\n3. Exit")?;
        let Some(choice) = prompt.ask("Enter your choice (1-3): ")? else { break };
        match choice.as_str() {
            "1" => {
                let Some(term) = prompt.ask("Enter a word to search: ")? else { break };
                let Some(raw) = prompt.ask("Enter the weight for this word (default is 1.0): ")? else { break };
                let weight = if raw.is_empty() {
                    DEFAULT_WEIGHT
                } else {
                    let parsed = parse_weight(&raw);
                    if parsed.substituted {
                        writeln!(prompt.out, "Invalid weight value. Using default weight {DEFAULT_WEIGHT:.1}.")?;
                    }
                    parsed.value
                };
                let Some(raw_top) = prompt.ask("Enter number of top documents to retrieve: ")? else { break };
                let Ok(top) = raw_top.parse::<usize>() else {
                    writeln!(prompt.out, "Please enter a valid number.")?;
                    continue;
                };
                let hits = engine.find(&term, weight, top);
                print_hits(&mut prompt.out, &hits, &format!("'{term}' (weight: {weight:?})"), json)?;
            }
            "2" => {
                let Some(file) = prompt.ask("Enter the path of the word file: ")? else { break };
                if file.is_empty() {
                    writeln!(prompt.out, "No word file selected. Returning to menu.")?;
                    continue;
                }
                let Some(raw_top) = prompt.ask("Enter number of top documents to retrieve: ")? else { break };
                let Ok(top) = raw_top.parse::<usize>() else {
                    writeln!(prompt.out, "Please enter a valid number for top N documents.")?;
                    continue;
                };
                let hits = engine.find_from_file(&file, top);
                let name = Path::new(&file).file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_else(|| file.clone());
                print_hits(&mut prompt.out, &hits, &format!("query in '{name}'"), json)?;
            }
            "3" => {
                writeln!(prompt.out, "Exiting program.")?;
                break;
            }
            other if other.parse::<i64>().is_err() => writeln!(prompt.out, "Please enter a valid number.")?,
            _ => writeln!(prompt.out, "Invalid option, please try again.")?,
        }
    }
    Ok(())
}

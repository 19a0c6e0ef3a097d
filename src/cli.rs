use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::compression::Filter;
use crate::core::config::{BuildConfig, SearchConfig, INDEX_FILE_NAME};
use crate::core::error::Result;
use crate::corpus::CorpusTokenStream;
use crate::corpus::sgml::parse_reuters_file;
use crate::index::descriptor::Descriptor;
use crate::index::driver::merge_multi_pass;
use crate::index::reader::IndexReader;
use crate::index::spimi::SpimiInverter;
use crate::query::{Evaluator, Parser as QueryParser};
use crate::rank::Bm25Ranker;
use crate::result::EvalResult;

/// `build` constructs the inverted index, `search` runs the interactive
/// Boolean/BM25 query loop. Flags
/// mirror `original_source/irspimi/__main__.py`'s `argparse` setup, ported
/// onto `clap`'s derive API.
#[derive(Debug, Parser)]
#[command(name = "spimidex", about = "SPIMI-based inverted index over a Reuters-21578-style corpus")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the inverted index for a set of ordered source files.
    Build {
        /// Source files of the corpus, in the order they should be indexed.
        #[arg(required = true)]
        corpus_files: Vec<PathBuf>,

        #[arg(long = "dest-dir", short = 'd', default_value = ".")]
        dest_dir: PathBuf,

        /// Compression filters to apply, in order: nonum, casefold, stopw30, stopw150, portstem.
        #[arg(long = "compress-dict")]
        compress_dict: Vec<String>,

        /// Stop-word list file, read when `stopw30`/`stopw150` is requested.
        #[arg(long = "stopwords-file", default_value = "stopwords.list")]
        stopwords_file: PathBuf,
    },
    /// Search a previously built index, interactively.
    Search {
        /// Directory where the source corpus can be found, for title/body enrichment.
        corpus_dir: PathBuf,

        #[arg(long = "src-dir", short = 'd', default_value = ".")]
        src_dir: PathBuf,

        #[arg(long = "title", short = 't')]
        show_title: bool,

        #[arg(long = "ranked", short = 'r')]
        ranked: bool,

        #[arg(long = "k1", default_value_t = 1.2)]
        k1: f32,

        #[arg(long = "b", default_value_t = 0.75)]
        b: f32,

        #[arg(long = "limit", short = 'l')]
        limit: Option<usize>,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build { corpus_files, dest_dir, compress_dict, stopwords_file } => {
            run_build(corpus_files, dest_dir, compress_dict, stopwords_file)
        }
        Command::Search { corpus_dir, src_dir, show_title, ranked, k1, b, limit } => {
            let config = SearchConfig { src_dir, show_title, ranked, k1, b, limit };
            run_search(corpus_dir, config)
        }
    }
}

fn run_build(
    corpus_files: Vec<PathBuf>,
    dest_dir: PathBuf,
    compress_dict: Vec<String>,
    stopwords_file: PathBuf,
) -> Result<()> {
    println!("Building index with multipass merge");

    let config = BuildConfig { dest_dir: dest_dir.clone(), ..BuildConfig::default() };
    std::fs::create_dir_all(&config.dest_dir)?;

    let compression = if compress_dict.is_empty() {
        None
    } else {
        Some(Filter::from_cli_names(&compress_dict, &stopwords_file)?)
    };

    let mut stream = CorpusTokenStream::new(corpus_files, compression.clone());
    let mut inverter = SpimiInverter::new(&mut stream, config.spill_dir.clone(), config.block_entry_budget)?;
    let blocks = inverter.invert_all()?;

    let out_path = config.dest_dir.join(INDEX_FILE_NAME);
    merge_multi_pass(blocks, &out_path, config.merge_fan_in, config.input_buffer_len, config.output_buffer_len)?;

    let recipe = compression.map(|f| f.to_recipe()).unwrap_or_default();
    let descriptor = Descriptor::new(stream.doc_id_list.clone(), stream.doc_lengths.clone(), recipe);
    let desc_path = crate::index::descriptor::descriptor_path(&out_path);
    descriptor.write_to_file(&desc_path)?;

    println!("{}", out_path.display());
    Ok(())
}

fn run_search(corpus_dir: PathBuf, config: SearchConfig) -> Result<()> {
    let index_path = config.src_dir.join(INDEX_FILE_NAME);
    let mut reader = IndexReader::open(&index_path)?;

    let stdin = io::stdin();
    loop {
        print!("What do you want to search for? (Type q to exit) ");
        io::stdout().flush().ok();
        let mut line = String::new();
        if stdin.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let expr = line.trim();
        if expr == "q" {
            println!("Goodbye!");
            break;
        }

        let result = if config.ranked {
            let (hits, term_postings) = Bm25Ranker::new(&mut reader, config.k1 as f64, config.b as f64).search(expr)?;
            let hits = match config.limit {
                Some(limit) => hits.into_iter().take(limit).collect::<Vec<_>>(),
                None => hits,
            };
            let mut result = EvalResult::from_term_postings(&term_postings);
            result.update_ranked_results(&hits);
            result
        } else {
            let node = match QueryParser::new(expr).parse() {
                Ok(node) => node,
                Err(e) => {
                    println!("Invalid query: {e}");
                    continue;
                }
            };
            let mut evaluator = Evaluator::new(&mut reader);
            let query_result = evaluator.evaluate(&node)?;
            let mut result = EvalResult::new();
            for (term, postings) in &evaluator.postings_by_term {
                result.add_postings(term, postings);
            }
            result.update_results(&query_result);
            result
        };

        if config.show_title {
            enrich_from_corpus_dir(&mut result, &corpus_dir);
        }

        print_results(&result);
        println!();
    }
    Ok(())
}

fn enrich_from_corpus_dir(result: &mut EvalResult, corpus_dir: &std::path::Path) {
    let Ok(entries) = std::fs::read_dir(corpus_dir) else { return };
    for entry in entries.flatten() {
        if let Ok(docs) = parse_reuters_file(&entry.path()) {
            for doc in docs {
                if let Some(e) = result.entries.get_mut(&crate::core::types::DocId::new(doc.doc_id)) {
                    e.title = Some(doc.title);
                }
            }
        }
    }
}

fn print_results(result: &EvalResult) {
    let order: Vec<_> = if result.ranked {
        result.ranked_order.clone()
    } else {
        let mut ids: Vec<_> = result.entries.keys().copied().collect();
        ids.sort_by(|a, b| {
            let ea = &result.entries[a];
            let eb = &result.entries[b];
            (eb.terms.len(), eb.positions.len()).cmp(&(ea.terms.len(), ea.positions.len()))
        });
        ids
    };

    for (rank, doc_id) in order.iter().enumerate() {
        let entry = &result.entries[doc_id];
        let label = match &entry.title {
            Some(title) => format!("{title} - DocId {doc_id}"),
            None => format!("DocId {doc_id}"),
        };
        println!("#{}: {}", rank + 1, label);
        match entry.weight {
            Some(weight) => println!("\tWeight: {weight:.4}, Terms: {}", entry.terms.join(", ")),
            None => println!("\tCount: {}, Terms: {}", entry.positions.len(), entry.terms.join(", ")),
        }
    }
    println!("\nRetrieved {} results.", order.len());
}

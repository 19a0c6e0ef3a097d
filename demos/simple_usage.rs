/// Complete spimidex API demo.
///
/// Demonstrates the full pipeline: corpus tokenization, SPIMI block
/// building, multi-pass merging, and both Boolean and BM25-ranked search
/// over the resulting index.
use spimidex::compression::Filter;
use spimidex::core::config::INDEX_FILE_NAME;
use spimidex::corpus::CorpusTokenStream;
use spimidex::index::descriptor::{descriptor_path, Descriptor};
use spimidex::index::driver::merge_multi_pass;
use spimidex::index::reader::IndexReader;
use spimidex::index::spimi::SpimiInverter;
use spimidex::query::{Evaluator, Parser};
use spimidex::rank::Bm25Ranker;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n=== spimidex API demo ===\n");

    let workdir = tempfile::tempdir()?;
    let corpus_file = workdir.path().join("reut2-000.sgm");
    write_sample_corpus(&corpus_file)?;

    println!("Step 1: INDEX - building from a single source file...");
    let compression = Filter::CaseFolding;
    let mut stream = CorpusTokenStream::new(vec![corpus_file], Some(compression.clone()));
    let spill_dir = workdir.path().join("blocks");
    let mut inverter = SpimiInverter::new(&mut stream, spill_dir, 4096)?;
    let blocks = inverter.invert_all()?;
    println!("  Built {} SPIMI block(s)", blocks.len());

    let index_path = workdir.path().join(INDEX_FILE_NAME);
    merge_multi_pass(blocks, &index_path, 8, 64, 64)?;

    let descriptor = Descriptor::new(stream.doc_id_list.clone(), stream.doc_lengths.clone(), compression.to_recipe());
    descriptor.write_to_file(&descriptor_path(&index_path))?;
    println!("  Merged index written to {}\n", index_path.display());

    println!("Step 2: SEARCH - Boolean queries...");
    let mut reader = IndexReader::open(&index_path)?;
    for expr in ["rust", "rust AND database", "rust OR web", "NOT rust"] {
        let node = Parser::new(expr).parse()?;
        let result = Evaluator::new(&mut reader).evaluate(&node)?;
        println!("  '{expr}': {} document(s)", result.len());
    }
    println!();

    println!("Step 3: SEARCH - BM25 ranked query...");
    let (hits, _) = Bm25Ranker::new(&mut reader, 1.2, 0.75).search("rust database")?;
    for (rank, hit) in hits.iter().enumerate() {
        println!("  #{}: doc {} (weight {:.4})", rank + 1, hit.doc_id, hit.weight);
    }

    println!("\n=== Demo complete ===\n");
    Ok(())
}

fn write_sample_corpus(path: &std::path::Path) -> std::io::Result<()> {
    let mut f = std::fs::File::create(path)?;
    write!(
        f,
        r#"<REUTERS NEWID="1"><TITLE>Rust Programming</TITLE><BODY>Learn the Rust language for systems work.</BODY></REUTERS>
<REUTERS NEWID="2"><TITLE>Database Systems</TITLE><BODY>SQL and NoSQL databases, written in Rust.</BODY></REUTERS>
<REUTERS NEWID="3"><TITLE>Web Development</TITLE><BODY>Building web apps, no Rust required.</BODY></REUTERS>
"#
    )?;
    Ok(())
}

use std::path::PathBuf;

use clap::Parser;
use lettergen_core::io::build_output_path;
use lettergen_core::{Snapshot, WordGenerator};

/// Trains a word generator on a corpus and prints new words.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Training corpus, one word per line
    #[arg(default_value = "./data/towns.txt")]
    corpus: PathBuf,

    /// Highest context length of the model
    #[arg(short, long, default_value_t = WordGenerator::DEFAULT_ORDER)]
    order: usize,

    /// Smoothing prior (0.001 to 0.05 adds some randomness)
    #[arg(short, long, default_value_t = WordGenerator::DEFAULT_PRIOR)]
    prior: f64,

    /// Number of words to generate
    #[arg(short = 'n', long, default_value_t = 11)]
    count: usize,

    #[arg(long, default_value_t = 3)]
    min_length: usize,

    #[arg(long, default_value_t = 8)]
    max_length: usize,

    /// Allow the same word twice in the output
    #[arg(long)]
    allow_repeats: bool,

    /// Fixed seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Also write the trained model next to the corpus (`.bin`)
    #[arg(long)]
    save_snapshot: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    // Train from the corpus file
    let trained = WordGenerator::from_corpus_file(&args.corpus, args.order, args.prior)?;
    log::info!("trained order {} model from {}", trained.order(), args.corpus.display());

    // Export the model and rebuild a second generator from it,
    // no retraining involved
    let snapshot = trained.export_data();
    if args.save_snapshot {
        let path = build_output_path(&args.corpus, "bin")?;
        snapshot.save(&path)?;
        log::info!("snapshot written to {}", path.display());
        // Reload from disk to check the written file
        let reloaded = Snapshot::load(&path)?;
        log::debug!("reloaded snapshot of order {}", reloaded.order());
    }
    let mut generator = WordGenerator::from_snapshot(snapshot)?;
    if let Some(seed) = args.seed {
        generator.reseed(seed);
    }

    let words = generator.new_words(args.count, args.min_length, args.max_length, args.allow_repeats)?;
    for word in words {
        println!("{}", word);
    }

    Ok(())
}

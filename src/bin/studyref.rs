//! Command line front end: tag and chunk text, build ARFF training sets,
//! and index corpora.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use studyref_core::export;
use studyref_core::features::{ExampleSource, FeatureRowBuilder, JsonLinesSource};
use studyref_core::indexing::{IndexOptions, Indexer};
use studyref_core::tagger::{ProcessTagger, TaggerClient, TaggerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "studyref",
    version,
    about = "Tagger output parsing and context features for study reference classification"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Part-of-speech tag a text and print one token per line
    Tag {
        /// JSON tagger config (commands, encoding, temp files)
        #[arg(short, long)]
        config: PathBuf,
        text: String,
    },
    /// Chunk a text into phrases and print them as JSON
    Chunk {
        #[arg(short, long)]
        config: PathBuf,
        text: String,
    },
    /// Turn extracted contexts into an ARFF training set
    TrainingSet {
        /// JSON Lines file with `left`/`right` context records
        #[arg(short, long)]
        examples: PathBuf,
        /// ARFF file to write
        #[arg(short, long)]
        output: PathBuf,
        /// Class assigned to every row ("True" or "False")
        #[arg(short, long, default_value = "True")]
        label: String,
    },
    /// Index the text files of a corpus
    Index {
        /// Corpus root directory
        #[arg(short, long)]
        corpus: PathBuf,
        /// Index directory (prefix in recursive mode)
        #[arg(short, long)]
        output: PathBuf,
        /// One index per subdirectory of the corpus root
        #[arg(short, long)]
        recursive: bool,
        /// Delete existing index directories first
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();

    match Cli::parse().command {
        Commands::Tag { config, text } => {
            let tagger = ProcessTagger::new(load_config(&config)?);
            for token in tagger.tag(&text)? {
                println!("{token}");
            }
        }
        Commands::Chunk { config, text } => {
            let tagger = ProcessTagger::new(load_config(&config)?);
            let phrases = tagger.chunk(&text)?;
            println!("{}", serde_json::to_string_pretty(&phrases)?);
        }
        Commands::TrainingSet {
            examples,
            output,
            label,
        } => {
            let examples = JsonLinesSource::new(examples).read_examples()?;
            log::info!(
                "{} example(s) from {} document(s)",
                examples.len(),
                examples.documents().len()
            );
            let set = FeatureRowBuilder::default().build_training_set(&examples, &label)?;
            export::export(&set, &output)?;
        }
        Commands::Index {
            corpus,
            output,
            recursive,
            force,
        } => {
            let options = IndexOptions {
                recursive,
                force_overwrite: force,
            };
            let results = Indexer::default()
                .index_corpus(&corpus, &output, options)
                .with_context(|| format!("Cannot list corpus {}", corpus.display()))?;
            let failed = results.values().filter(|r| r.is_err()).count();
            log::info!("finished indexing");
            if failed > 0 {
                bail!("{failed} of {} index target(s) failed", results.len());
            }
        }
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<TaggerConfig> {
    Ok(TaggerConfig::load(path)?)
}

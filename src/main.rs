use anyhow::Result;
use clap::Parser;
use matching::{extractor_for_extension, Config, DocumentMatcher, VocabularyScope};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory containing the documents to match
    #[arg(long, default_value = "./documentsimilarity/test")]
    test_dir: PathBuf,

    /// Directory containing the reference documents
    #[arg(long, default_value = "./documentsimilarity/train")]
    train_dir: PathBuf,

    /// Extension of the document files to load
    #[arg(long, default_value = "pdf")]
    extension: String,

    /// Write JSON results to this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Fit a separate vocabulary for every query/reference pair
    #[arg(long)]
    pairwise: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let extractor = extractor_for_extension(&args.extension);
    let config = Config {
        test_dir: args.test_dir,
        train_dir: args.train_dir,
        extension: args.extension,
        output_dir: args.output_dir,
        scope: if args.pairwise {
            VocabularyScope::Pairwise
        } else {
            VocabularyScope::Batch
        },
    };

    let matcher = DocumentMatcher::new(config, extractor)?;
    let matches = matcher.process_all().await?;

    for document_match in &matches {
        println!("Test Invoice: {}", document_match.query_document);
        println!(
            "Most Similar Train Invoice: {}",
            document_match.best_match_document.as_deref().unwrap_or("None")
        );
        println!("Similarity Score: {:.4}\n", document_match.similarity);
    }

    Ok(())
}

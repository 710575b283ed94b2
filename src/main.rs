use clap::Parser;
use deckforge::{
    DeckDeclaration, PipelineBuilder, PipelineConfig, PipelineError, load_notes,
    types::NotesMap,
};
use log::info;
use std::fs;
use std::path::PathBuf;

/// Generate a slide deck from a JSON deck declaration.
#[derive(Parser, Debug)]
#[command(name = "deckforge", version, about)]
struct Args {
    /// Deck declaration (JSON: { canvas?, slides: [...] })
    #[arg(long)]
    deck: PathBuf,

    /// Speaker notes (JSON object: slide identifier -> text)
    #[arg(long)]
    notes: Option<PathBuf>,

    /// Pipeline configuration file (TOML, JSON or YAML)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Output document path
    #[arg(long, short)]
    out: PathBuf,

    /// Write the run report as JSON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Override the number of slide workers
    #[arg(long)]
    concurrency: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<(), PipelineError> {
    env_logger::init();
    let args = Args::parse();

    let config = PipelineConfig::load(args.config.as_deref())?;
    let deck = DeckDeclaration::load(&args.deck)?;
    let notes = match &args.notes {
        Some(path) => load_notes(path)?,
        None => NotesMap::new(),
    };

    let mut builder = PipelineBuilder::from_config(&config)?;
    if let Some(canvas) = deck.canvas {
        builder = builder.with_canvas(canvas);
    }
    if let Some(workers) = args.concurrency {
        builder = builder.with_max_concurrency(workers);
    }
    let pipeline = builder.build()?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    info!("Loaded {} slide(s) from {}", deck.slides.len(), args.deck.display());
    let report = pipeline
        .generate_to_file(deck.slides, &notes, &args.out)
        .await?;

    if let Some(path) = &args.report {
        fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!("Run report written to {}", path.display());
    }
    Ok(())
}

//! CLI tool that generates the CoupleSnap overview presentation.

use anyhow::{Context, Result};
use clap::Parser;
use couplesnap_core::{DeckBuilder, Presentation, OUTPUT_FILE};
use couplesnap_pptx::{PptxReader, PptxWriter};
use std::path::{Path, PathBuf};

/// Generate the ten-slide CoupleSnap overview deck.
#[derive(Parser, Debug)]
#[command(name = "couplesnap-deck")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file, overwritten if it exists
    #[arg(short, long, default_value = OUTPUT_FILE)]
    output: PathBuf,

    /// Reopen the written file and list its slides
    #[arg(long)]
    inspect: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let presentation = DeckBuilder::new()
        .build()
        .context("Failed to build presentation")?;

    save(&presentation, &args.output)?;

    println!(
        "✅ Presentation created successfully: {}",
        args.output.display()
    );
    println!("📁 Location: {}", args.output.display());

    if args.inspect {
        inspect(&args.output)?;
    }

    Ok(())
}

/// Write the presentation to `path`.
fn save(presentation: &Presentation, path: &Path) -> Result<()> {
    log::debug!(
        "Writing {} slides to {}",
        presentation.slide_count(),
        path.display()
    );
    PptxWriter::new()
        .save(presentation, path)
        .with_context(|| format!("Failed to save {}", path.display()))
}

/// Print the number and title of every slide in the file at `path`.
fn inspect(path: &Path) -> Result<()> {
    let presentation = PptxReader::new()
        .open(path)
        .with_context(|| format!("Failed to reopen {}", path.display()))?;

    for (idx, slide) in presentation.slides().iter().enumerate() {
        println!("{:>2}. {}", idx + 1, slide.title_text());
    }
    Ok(())
}

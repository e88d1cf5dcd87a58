//! CLI commands implementation.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::detect::{Candidate, DetectEvent, DetectionEngine};
use crate::fetch::{FetchEvent, TextFetcher};
use crate::formats::{FormatCatalog, ValueKind};
use crate::ocr::{OcrConfig, TesseractFactory};
use crate::page::{Page, PageIdAllocator};

#[derive(Parser)]
#[command(name = "docsift")]
#[command(about = "Typed value extraction from scanned pages via OCR")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize page images and detect typed values in the text
    Detect {
        /// Page images, in page order
        images: Vec<PathBuf>,
        /// Recognition language passed to the OCR engine
        #[arg(short, long, default_value = "eng")]
        language: String,
        /// Override the OCR engine's data directory
        #[arg(long)]
        tessdata: Option<PathBuf>,
        /// Number of detection workers (0 = twice the available parallelism)
        #[arg(short, long, default_value = "0")]
        workers: usize,
        /// Emit candidates as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the deduplicated format catalog
    Formats {
        /// Restrict to one family (number, percent, currency, date, time, date_time)
        #[arg(long)]
        family: Option<String>,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Detect {
            images,
            language,
            tessdata,
            workers,
            json,
        } => detect(images, language, tessdata, workers, json).await,
        Commands::Formats { family } => formats(family),
    }
}

fn progress_bar(total: u64, message: &'static str) -> ProgressBar {
    let progress = ProgressBar::new(total);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    progress.set_message(message);
    progress
}

async fn detect(
    images: Vec<PathBuf>,
    language: String,
    tessdata: Option<PathBuf>,
    workers: usize,
    json: bool,
) -> anyhow::Result<()> {
    if images.is_empty() {
        anyhow::bail!("no page images given");
    }
    if !TesseractFactory::is_available() {
        anyhow::bail!("tesseract not installed (install with: apt install tesseract-ocr)");
    }

    let allocator = PageIdAllocator::new();
    let mut pages = Vec::with_capacity(images.len());
    for path in &images {
        let img = image::open(path)
            .with_context(|| format!("failed to open image {}", path.display()))?;
        pages.push(Page::new(allocator.allocate(), img));
    }

    let config = OcrConfig {
        language,
        model_path: tessdata,
    };
    let fetcher = TextFetcher::new(Arc::new(TesseractFactory::new()), config);

    // Phase 1: text acquisition.
    let (tx, mut rx) = mpsc::channel::<FetchEvent>(64);
    let display = tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while let Some(event) = rx.recv().await {
            match event {
                FetchEvent::Started { total } => {
                    println!("{} Recognizing {} pages", style("→").cyan(), total);
                    bar = Some(progress_bar(total as u64, "Running OCR..."));
                }
                FetchEvent::PageCached { .. }
                | FetchEvent::PageRecognized { .. }
                | FetchEvent::PageSkipped { .. } => {
                    if let Some(ref progress) = bar {
                        progress.inc(1);
                    }
                }
            }
        }
        if let Some(progress) = bar {
            progress.finish_and_clear();
        }
    });

    let text = fetcher.fetch(&pages, tx).await?;
    let _ = display.await;
    println!(
        "{} Recognized {} characters",
        style("✓").green(),
        text.chars().count()
    );

    // Phase 2: value detection.
    let mut engine = DetectionEngine::new();
    if workers > 0 {
        engine = engine.with_workers(workers);
    }

    let (tx, mut rx) = mpsc::channel::<DetectEvent>(64);
    let display = tokio::spawn(async move {
        let mut bar: Option<ProgressBar> = None;
        while let Some(event) = rx.recv().await {
            match event {
                DetectEvent::Started { total } => {
                    println!("{} Scanning {} windows", style("→").cyan(), total);
                    bar = Some(progress_bar(total as u64, "Detecting values..."));
                }
                DetectEvent::WindowScanned { candidate, .. } => {
                    if let Some(ref progress) = bar {
                        if let Some(candidate) = candidate {
                            progress.set_message(format!(
                                "{}: {}",
                                candidate.kind.as_str(),
                                candidate.text
                            ));
                        }
                        progress.inc(1);
                    }
                }
            }
        }
        if let Some(progress) = bar {
            progress.finish_and_clear();
        }
    });

    let mut candidates = engine.detect(&text, FormatCatalog::global(), tx).await?;
    let _ = display.await;

    candidates.sort_by(|a, b| (a.kind.as_str(), &a.text).cmp(&(b.kind.as_str(), &b.text)));

    if json {
        println!("{}", serde_json::to_string_pretty(&candidates)?);
    } else {
        print_candidates(&candidates);
    }
    Ok(())
}

fn print_candidates(candidates: &[Candidate]) {
    if candidates.is_empty() {
        println!("{} No candidate values found", style("!").yellow());
        return;
    }
    println!(
        "{} {} candidate values",
        style("✓").green(),
        candidates.len()
    );
    for candidate in candidates {
        println!(
            "  {:>9}  {:<28} {}",
            style(candidate.kind.as_str()).cyan(),
            candidate.text,
            candidate.value
        );
    }
}

fn formats(family: Option<String>) -> anyhow::Result<()> {
    let filter = match family {
        Some(ref name) => match ValueKind::from_str(name) {
            Some(kind) => Some(kind),
            None => anyhow::bail!("unknown format family: {}", name),
        },
        None => None,
    };

    let catalog = FormatCatalog::global();
    for fam in catalog.families() {
        if filter.is_some_and(|kind| kind != fam.kind()) {
            continue;
        }
        println!(
            "{} {} ({} formats, window up to {} words)",
            style("→").cyan(),
            fam.kind().as_str(),
            fam.descriptors().len(),
            fam.max_window_words()
        );
        for descriptor in fam.descriptors() {
            println!(
                "  {:<28} {:>3} locales",
                descriptor.rendering(),
                descriptor.locales().len()
            );
        }
    }
    Ok(())
}

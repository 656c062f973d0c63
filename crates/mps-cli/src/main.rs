//! MPS CLI: normalize images and PDF pages into web-ready WebP/JPEG files.
//!
//! Limits and defaults come from `MPS_*` environment variables (a `.env` file is honoured).

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use mps_cli::{build_pipeline, init_tracing, read_asset, result_summary, write_outputs};
use mps_core::{DocumentOptions, ImageOptions, OutputFormatSelection, PipelineConfig, ProcessingResult};
use mps_processing::classify_asset;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mps", about = "Media normalization pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category (image, document, unknown) of a file
    Classify {
        /// Path to the file
        file: PathBuf,
    },
    /// Print dimensions (images) or page count and title (PDFs) as JSON
    Info {
        /// Path to the file
        file: PathBuf,
    },
    /// Normalize a single image
    Image {
        /// Path to a PNG, JPEG or WebP file
        file: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Render, normalize and optionally merge pages of a PDF
    Document {
        /// Path to a PDF file
        file: PathBuf,
        /// Pages to process, 1-based (e.g. 1,3,2)
        #[arg(long, value_delimiter = ',')]
        pages: Vec<u32>,
        /// Output order; must list the same pages. Defaults to --pages order
        #[arg(long, value_delimiter = ',')]
        order: Vec<u32>,
        /// Stack the pages into a single output
        #[arg(long)]
        merge: bool,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Paint over the bottom-right watermark
    #[arg(long)]
    remove_watermark: bool,
    /// Downscale to at most 1200px wide
    #[arg(long)]
    optimize: bool,
    /// Output format: webp, jpg or both
    #[arg(long, default_value = "webp")]
    format: OutputFormatSelection,
    /// Directory the outputs are written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

impl OutputArgs {
    fn image_options(&self) -> ImageOptions {
        ImageOptions {
            remove_watermark: self.remove_watermark,
            optimize_for_blog: self.optimize,
            output_format: self.format,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

/// Write outputs, print the result and report whether it succeeded
fn report(result: &ProcessingResult, output: &OutputArgs) -> anyhow::Result<bool> {
    let written = write_outputs(result, &output.out_dir)?;
    tracing::info!(files = written.len(), out_dir = %output.out_dir.display(), "Outputs written");
    print_json(&result_summary(result)?)?;
    Ok(result.success)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = PipelineConfig::from_env().context("Invalid MPS_* configuration")?;
    let cli = Cli::parse();

    let succeeded = match cli.command {
        Commands::Classify { file } => {
            let asset = read_asset(&file)?;
            println!("{}", classify_asset(&asset));
            true
        }
        Commands::Info { file } => {
            let asset = read_asset(&file)?;
            let metadata = build_pipeline(config)
                .inspect(&asset)
                .await
                .with_context(|| format!("Inspect {}", file.display()))?;
            print_json(&metadata)?;
            true
        }
        Commands::Image { file, output } => {
            let asset = read_asset(&file)?;
            let pipeline = build_pipeline(config);
            let result = pipeline
                .process_image_async(asset, output.image_options())
                .await;
            report(&result, &output)?
        }
        Commands::Document {
            file,
            pages,
            order,
            merge,
            output,
        } => {
            let asset = read_asset(&file)?;
            let options = DocumentOptions {
                image: output.image_options(),
                merge_pages: merge,
                selected_pages: pages,
                page_order: order,
            };
            let pipeline = build_pipeline(config);
            let result = pipeline.process_document_async(asset, options).await;
            report(&result, &output)?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }

    Ok(())
}

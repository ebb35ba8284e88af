mod logger;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use logger::CliLogger;
use pdf_bookmerge::{MergeError, TargetGeometry};
use pdf_storybook::{BookOptions, PagePlan};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pbook", about = "Illustrated book PDF assembler", version)]
struct Cli {
    /// More log output (repeat for more)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a book from a manuscript and a folder of images
    Build {
        /// Manuscript JSON file ({"title", "author", "pages": [...]})
        manuscript: PathBuf,

        /// Output PDF file (defaults to the configured output name)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// PDF placed before the generated pages
        #[arg(long, default_value = "rfh.pdf")]
        front_matter: PathBuf,

        /// Write the body alone, without front matter
        #[arg(long, conflicts_with = "front_matter")]
        no_front_matter: bool,

        /// Directory containing page images
        #[arg(long, default_value = "images")]
        images_dir: PathBuf,

        /// JSON options file; flags below override it
        #[arg(long)]
        config: Option<PathBuf>,

        #[command(flatten)]
        size: SizeArgs,

        /// Body font size in points
        #[arg(long)]
        font_size: Option<u32>,

        /// Smallest font size tried before text is allowed to overflow
        #[arg(long)]
        min_font_size: Option<u32>,

        /// Margin in inches (all sides)
        #[arg(long)]
        margin_in: Option<f32>,

        /// Add a blank page after the title page
        #[arg(long)]
        title_verso: bool,

        /// Print the page plan and exit without writing anything
        #[arg(long)]
        plan_only: bool,

        /// Keep the intermediate body PDF next to the output
        #[arg(long)]
        keep_body: bool,
    },

    /// Merge a front matter PDF and a body PDF onto one page size
    Merge {
        /// PDF placed first
        #[arg(long)]
        front_matter: PathBuf,

        /// PDF placed after the front matter
        #[arg(long)]
        body: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        size: SizeArgs,

        /// Pages within this many points of the target are not rescaled
        #[arg(long)]
        tolerance_pt: Option<f32>,
    },
}

#[derive(Args)]
struct SizeArgs {
    /// Page width in inches
    #[arg(long)]
    page_width_in: Option<f32>,

    /// Page height in inches
    #[arg(long)]
    page_height_in: Option<f32>,
}

impl SizeArgs {
    fn apply(&self, options: &mut BookOptions) {
        if let Some(width) = self.page_width_in {
            options.page_width_in = width;
        }
        if let Some(height) = self.page_height_in {
            options.page_height_in = height;
        }
    }
}

fn target_geometry(options: &BookOptions) -> TargetGeometry {
    TargetGeometry::from_inches(options.page_width_in, options.page_height_in)
        .with_tolerance(options.merge_tolerance_pt)
}

/// `book.pdf` -> `book.body.pdf` in the same directory.
fn body_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "book".to_string());
    output.with_file_name(format!("{}.body.pdf", stem))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    CliLogger::from_flags(cli.verbose, cli.quiet)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Build {
            manuscript,
            output,
            front_matter,
            no_front_matter,
            images_dir,
            config,
            size,
            font_size,
            min_font_size,
            margin_in,
            title_verso,
            plan_only,
            keep_body,
        } => {
            let mut options = match &config {
                Some(path) => BookOptions::load(path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => BookOptions::default(),
            };
            size.apply(&mut options);
            if let Some(font_size) = font_size {
                options.font_size = font_size;
            }
            if let Some(min_font_size) = min_font_size {
                options.min_font_size = min_font_size;
            }
            if let Some(margin_in) = margin_in {
                options.margin_in = margin_in;
            }
            options.title_verso |= title_verso;
            options.validate()?;

            let book = pdf_storybook::load_manuscript(&manuscript).await?;
            let images = pdf_storybook::resolve_images(&images_dir)?;

            if plan_only {
                let plan = PagePlan::new(
                    book.has_title(),
                    options.title_verso,
                    book.pages.len(),
                    images.len(),
                );
                let summary = plan.summary();
                println!("Page plan:");
                println!("  Total pages: {}", summary.total_pages);
                println!("  Title pages: {}", summary.title_pages);
                println!("  Text pages: {}", summary.text_pages);
                println!("  Image pages: {}", summary.image_pages);
                println!("  Blank pages: {}", summary.blank_pages);
                println!("  Color-washed pages: {}", summary.themed_pages);
                return Ok(());
            }

            let output = output.unwrap_or_else(|| PathBuf::from(&options.output_name));

            if no_front_matter {
                let report =
                    pdf_storybook::generate_body(&book, &images, &options, &output).await?;
                let body = pdf_bookmerge::load_pdf(&output).await?;
                let normalized = pdf_bookmerge::normalize_document(&body, &target_geometry(&options))?;
                pdf_bookmerge::save_pdf(normalized.document, &output).await?;
                println!(
                    "Generated {} pages → {}",
                    report.summary.total_pages,
                    output.display()
                );
                return Ok(());
            }

            // Fail before writing anything if the front matter is absent
            if !tokio::fs::try_exists(&front_matter).await? {
                return Err(MergeError::MissingResource(front_matter).into());
            }

            let body_path = body_path_for(&output);
            let report =
                pdf_storybook::generate_body(&book, &images, &options, &body_path).await?;
            if !report.overflowed_pages.is_empty() {
                log::warn!(
                    "Text overflows at the minimum font size on pages {:?}",
                    report.overflowed_pages
                );
            }

            let merged = pdf_bookmerge::merge_files(
                &front_matter,
                &body_path,
                &output,
                &target_geometry(&options),
            )
            .await?;

            if keep_body {
                println!("Body kept at {}", body_path.display());
            } else {
                tokio::fs::remove_file(&body_path)
                    .await
                    .with_context(|| format!("Failed to remove {}", body_path.display()))?;
            }

            println!(
                "Generated {} pages ({} front matter pages rescaled) → {}",
                merged.total_pages,
                merged.transformed_pages.len(),
                output.display()
            );
        }

        Commands::Merge {
            front_matter,
            body,
            output,
            size,
            tolerance_pt,
        } => {
            let mut options = BookOptions::default();
            size.apply(&mut options);
            if let Some(tolerance_pt) = tolerance_pt {
                options.merge_tolerance_pt = tolerance_pt;
            }
            options.validate()?;

            let merged =
                pdf_bookmerge::merge_files(&front_matter, &body, &output, &target_geometry(&options))
                    .await?;
            println!(
                "Merged {} pages ({} rescaled) → {}",
                merged.total_pages,
                merged.transformed_pages.len(),
                output.display()
            );
        }
    }

    Ok(())
}

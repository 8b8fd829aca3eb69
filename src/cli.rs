//! Command-line front end.
//!
//! Commands: sizes, fonts, new, describe, validate, export

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use stampkit_core::UnitConverter;
use stampkit_designer::export::FontDbProvider;
use stampkit_designer::font_manager;
use stampkit_designer::registry::RegistryRecord;
use stampkit_designer::scene::{FrameOptions, TextOptions};
use stampkit_designer::text_metrics::FontMeasurer;
use stampkit_designer::{StampSession, StampSize};
use stampkit_settings::{BoundaryMode, EditorConfig};

#[derive(Debug, Parser)]
#[command(name = "stampkit")]
#[command(about = "Rubber-stamp layout and print-ready PDF export", version)]
#[command(long_version = crate::LONG_VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Editor configuration file (JSON or TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the predefined stamp sizes
    Sizes,

    /// List installed font families
    Fonts,

    /// Create a design file
    New {
        /// Stamp size as WIDTHxHEIGHT in millimetres
        #[arg(short, long, default_value = "47x18")]
        size: StampSize,

        /// Output design file
        #[arg(short, long)]
        output: PathBuf,

        /// Text element to add; repeat for several elements, use \n for line breaks
        #[arg(short, long)]
        text: Vec<String>,

        /// Add a border frame
        #[arg(long)]
        frame: bool,

        /// Registry record (JSON) to add as formatted company text
        #[arg(long)]
        registry: Option<PathBuf>,

        /// Boundary mode: safety, print or unlocked
        #[arg(long, default_value = "safety")]
        boundary: BoundaryMode,
    },

    /// Print the page-space description of a design as JSON
    Describe {
        design: PathBuf,
    },

    /// Report text that is too small to print
    Validate {
        design: PathBuf,
    },

    /// Export a design to PDF
    Export {
        design: PathBuf,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,

        /// Render a monochrome bitmap instead of vector text
        #[arg(long)]
        flatten: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    match cli.command {
        Commands::Sizes => {
            print!("{}", sizes_table(&config));
            Ok(())
        }
        Commands::Fonts => {
            let families = font_manager::list_font_families();
            print!("{}", fonts_listing(&families, &config.text.default_family));
            Ok(())
        }
        Commands::New {
            size,
            output,
            text,
            frame,
            registry,
            boundary,
        } => {
            let record = match registry {
                Some(path) => Some(read_record(&path)?),
                None => None,
            };
            let mut session = new_design(size, config, &text, frame, record.as_ref(), boundary)?;
            session.save_to_file(&output)?;
            println!("Created {}", output.display());
            Ok(())
        }
        Commands::Describe { design } => {
            let session = open(&design, config)?;
            println!("{}", session.describe().to_json()?);
            Ok(())
        }
        Commands::Validate { design } => {
            let session = open(&design, config)?;
            let warnings = session.validate_min_font_size();
            if warnings.is_empty() {
                println!("No problems found");
            }
            for warning in warnings {
                println!("{}", warning);
            }
            Ok(())
        }
        Commands::Export {
            design,
            output,
            flatten,
        } => {
            let export_settings = config.export.clone();
            let mut session = open(&design, config)?;
            let provider = FontDbProvider::from_settings(&export_settings).await;
            session.export_to_file(&output, flatten, &provider).await?;
            println!("Exported {}", output.display());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => EditorConfig::load_or_default().context("Failed to load default config"),
    }
}

fn open(path: &Path, config: EditorConfig) -> Result<StampSession> {
    StampSession::load_from_file(path, config, Arc::new(FontMeasurer::new()))
}

fn read_record(path: &Path) -> Result<RegistryRecord> {
    let json = std::fs::read_to_string(path).context("Failed to read registry record")?;
    serde_json::from_str(&json).context("Failed to parse registry record")
}

/// Builds a new session with the requested content.
pub fn new_design(
    size: StampSize,
    config: EditorConfig,
    texts: &[String],
    frame: bool,
    record: Option<&RegistryRecord>,
    boundary: BoundaryMode,
) -> Result<StampSession> {
    size.validate(&config.document)?;
    let mut session = StampSession::with_measurer(size, config, Arc::new(FontMeasurer::new()));
    session.set_boundary_mode(boundary);
    if frame {
        session.add_frame(FrameOptions::default());
    }
    for text in texts {
        let id = session.add_text(TextOptions {
            text: Some(text.replace("\\n", "\n")),
            ..Default::default()
        });
        session.center_both(id);
    }
    if let Some(record) = record {
        let id = session.add_registry_text(record);
        session.center_both(id);
    }
    session.clear_selection();
    Ok(session)
}

/// One row per predefined size with its page and canvas dimensions.
pub fn sizes_table(config: &EditorConfig) -> String {
    let units = UnitConverter::STANDARD;
    let mut out = String::new();
    for size in StampSize::predefined() {
        let dims = units.canvas_dimensions(size.width_mm, size.height_mm);
        out.push_str(&format!(
            "{:<14} {:>7.2} x {:>6.2} pt  {:>4} x {:>3} px\n",
            size.label,
            units.mm_to_pt(size.width_mm),
            units.mm_to_pt(size.height_mm),
            dims.width_px.round(),
            dims.height_px.round(),
        ));
    }
    out.push_str(&format!(
        "custom sizes: {}-{} mm per side\n",
        config.document.min_mm, config.document.max_mm
    ));
    out
}

/// Installed families, one per line, and whether the default family is among them.
pub fn fonts_listing(families: &[String], default_family: &str) -> String {
    let mut out = String::new();
    for family in families {
        out.push_str(family);
        out.push('\n');
    }
    let installed = families
        .iter()
        .any(|f| f.eq_ignore_ascii_case(default_family));
    if installed {
        out.push_str(&format!("default family {}: installed\n", default_family));
    } else {
        out.push_str(&format!(
            "default family {}: not installed, exports fall back to Helvetica\n",
            default_family
        ));
    }
    out
}

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use scoretrim::CropArea;

use crate::shared::{parse_area, parse_grid, parse_page_area};

/// Crop regions out of PDF scores and recompose them into a new PDF.
#[derive(Debug, Parser)]
#[command(name = "scoretrim", about, version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Cut crop areas out of each page and write them as a new PDF
    Trim(TrimArgs),

    /// Display page count, page boxes and rotation
    Info {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Password for encrypted PDFs
        #[arg(long)]
        password: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = InfoFormat::Text)]
        format: InfoFormat,
    },

    /// Lay the pages of a PDF out in a grid on landscape sheets
    Nup {
        /// Path to the PDF file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Grid as COLSxROWS (e.g. '2x2')
        #[arg(long, default_value = "2x2", value_parser = parse_grid)]
        grid: (u32, u32),

        /// Where to write the result
        #[arg(short, long)]
        output: PathBuf,

        /// Blank border around the grid, in points
        #[arg(long, default_value_t = 18.0)]
        margin: f64,

        /// Space between cells, in points
        #[arg(long, default_value_t = 12.0)]
        gap: f64,
    },
}

/// Arguments of the `trim` subcommand.
#[derive(Debug, Args)]
pub struct TrimArgs {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Crop area applied to every page, as fractions of the page box.
    /// Repeat for several areas.
    #[arg(long = "area", value_name = "TOP,LEFT,WIDTH,HEIGHT", value_parser = parse_area)]
    pub areas: Vec<CropArea>,

    /// Crop area for one page only; replaces --area on that page.
    /// Repeat for several areas on the same page.
    #[arg(long = "page-area", value_name = "PAGE:TOP,LEFT,WIDTH,HEIGHT", value_parser = parse_page_area)]
    pub page_areas: Vec<(i64, CropArea)>,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Title used to name the output file
    #[arg(long)]
    pub title: Option<String>,

    /// Where to write the result. Default: derived from the title
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also lay the result out as a COLSxROWS grid (e.g. '2x2')
    #[arg(long, value_parser = parse_grid)]
    pub nup: Option<(u32, u32)>,

    /// JSON request file with areas, includePages and pageSettings.
    /// Command-line areas and pages are added to it.
    #[arg(long, value_name = "JSON")]
    pub request: Option<PathBuf>,

    /// Store content streams uncompressed
    #[arg(long)]
    pub no_compress: bool,
}

/// Output format for the info subcommand.
#[derive(Debug, Clone, ValueEnum)]
pub enum InfoFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::output::OutputFormat;

/// Generate EAN-13 barcode images (PNG and SVG) from a spreadsheet or
/// pasted codes.
#[derive(Parser, Debug, Clone)]
#[command(name = "gtin-barcodes", version)]
pub struct Cli {
    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root folder for timestamped batch folders.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output formats to write (repeat or comma-separate).
    #[arg(short, long, value_enum, value_delimiter = ',')]
    pub format: Vec<OutputFormat>,

    /// TrueType font for the human-readable line.
    #[arg(long)]
    pub font: Option<PathBuf>,

    #[arg(long)]
    pub dpi: Option<u32>,

    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Read codes and labels from a workbook (.xlsx, .xls, .ods) or .csv file.
    Sheet {
        path: Option<PathBuf>,
        #[arg(long)]
        sheet: Option<String>,
        #[arg(long)]
        start_row: Option<u32>,
        #[arg(long)]
        end_row: Option<u32>,
    },
    /// Paste codes line by line, optionally followed by a TAB or 2+ spaces
    /// and a label. Finish with an empty line or EOF.
    Paste,
}

impl Cli {
    /// Fold command-line overrides into a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(output) = &self.output {
            config.output.dir = output.clone();
        }
        if !self.format.is_empty() {
            config.output.formats = self.format.clone();
        }
        if let Some(font) = &self.font {
            config.render.font_path = font.clone();
        }
        if let Some(dpi) = self.dpi {
            config.render.dpi = dpi;
        }
        if let Some(Mode::Sheet { path, sheet, start_row, end_row }) = &self.mode {
            if let Some(path) = path {
                config.sheet.path = path.clone();
            }
            if let Some(sheet) = sheet {
                config.sheet.sheet = sheet.clone();
            }
            if let Some(start) = start_row {
                config.sheet.start_row = *start;
            }
            if let Some(end) = end_row {
                config.sheet.end_row = *end;
            }
        }
    }
}

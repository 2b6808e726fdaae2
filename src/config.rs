use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts;
use crate::error::{Error, Result};
use crate::layout::mm_to_px;
use crate::output::{format_timestamp, OutputFormat};
use crate::source::column_index;

/// Everything a run needs, loaded from TOML with per-field defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub render: RenderConfig,
    pub output: OutputConfig,
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub dpi: u32,
    pub module_width_mm: f32,
    pub bar_height_mm: f32,
    pub quiet_zone_mm: f32,
    pub side_pad_mm: f32,
    pub gap_mm: f32,
    pub font_path: PathBuf,
    pub font_family: String,
    pub font_size_px: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dpi: consts::DPI,
            module_width_mm: consts::MODULE_WIDTH_MM,
            bar_height_mm: consts::BAR_HEIGHT_MM,
            quiet_zone_mm: consts::QUIET_ZONE_MM,
            side_pad_mm: consts::SIDE_PAD_MM,
            gap_mm: consts::GAP_MM,
            font_path: PathBuf::from(consts::FONT_PATH),
            font_family: consts::FONT_FAMILY.to_string(),
            font_size_px: consts::FONT_PX,
        }
    }
}

impl RenderConfig {
    pub fn side_pad_px(&self) -> u32 {
        mm_to_px(self.side_pad_mm, self.dpi)
    }

    pub fn gap_px(&self) -> u32 {
        mm_to_px(self.gap_mm, self.dpi)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub formats: Vec<OutputFormat>,
    pub timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(consts::OUTPUT_DIR),
            formats: vec![OutputFormat::Png, OutputFormat::Svg],
            timestamp_format: consts::TIMESTAMP_FORMAT.to_string(),
        }
    }
}

/// Where codes and labels live in the workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub path: PathBuf,
    pub sheet: String,
    pub start_row: u32,
    pub end_row: u32,
    pub code_column: String,
    pub fallback_columns: Vec<String>,
    pub label_column: String,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("barcodes.xlsx"),
            sheet: consts::SHEET_NAME.to_string(),
            start_row: consts::START_ROW,
            end_row: consts::END_ROW,
            code_column: consts::CODE_COLUMN.to_string(),
            fallback_columns: consts::FALLBACK_COLUMNS.iter().map(|c| c.to_string()).collect(),
            label_column: consts::LABEL_COLUMN.to_string(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::config(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {e}", path.display())))?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let r = &self.render;
        if r.dpi == 0 || r.dpi > consts::MAX_DPI {
            return Err(Error::config(format!("render.dpi must be in 1..={}, got {}", consts::MAX_DPI, r.dpi)));
        }
        for (name, value, max) in [
            ("render.module_width_mm", r.module_width_mm, consts::MAX_LENGTH_MM),
            ("render.bar_height_mm", r.bar_height_mm, consts::MAX_LENGTH_MM),
            ("render.font_size_px", r.font_size_px, consts::MAX_FONT_PX),
        ] {
            if !(value > 0.0 && value <= max) {
                return Err(Error::config(format!("{name} must be in (0, {max}], got {value}")));
            }
        }
        for (name, value) in [
            ("render.quiet_zone_mm", r.quiet_zone_mm),
            ("render.side_pad_mm", r.side_pad_mm),
            ("render.gap_mm", r.gap_mm),
        ] {
            if !(0.0..=consts::MAX_LENGTH_MM).contains(&value) {
                return Err(Error::config(format!(
                    "{name} must be in [0, {}], got {value}",
                    consts::MAX_LENGTH_MM
                )));
            }
        }

        if self.output.formats.is_empty() {
            return Err(Error::config("output.formats must name at least one format"));
        }
        let stamp = &self.output.timestamp_format;
        if stamp.trim().is_empty() {
            return Err(Error::config("output.timestamp_format must not be empty"));
        }
        let sample = NaiveDate::from_ymd_opt(2000, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap_or_default();
        format_timestamp(sample, stamp).map_err(|_| {
            Error::config(format!("output.timestamp_format {stamp:?} is not a valid strftime format"))
        })?;

        let s = &self.sheet;
        if s.start_row == 0 || s.start_row > s.end_row {
            return Err(Error::config(format!(
                "sheet rows {}..={} are not a valid 1-based range",
                s.start_row, s.end_row
            )));
        }
        let columns = std::iter::once(&s.code_column)
            .chain(&s.fallback_columns)
            .chain(std::iter::once(&s.label_column));
        for column in columns {
            if column_index(column).is_none() {
                return Err(Error::config(format!("{column:?} is not a column letter")));
            }
        }
        Ok(())
    }
}

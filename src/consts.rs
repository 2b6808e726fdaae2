// Rendering and batch defaults, overridable from the config file.
pub const DPI: u32 = 600;
pub const MM_PER_INCH: f32 = 25.4;

pub const MODULE_WIDTH_MM: f32 = 0.33;
pub const BAR_HEIGHT_MM: f32 = 22.0;
pub const QUIET_ZONE_MM: f32 = 2.0;
pub const SIDE_PAD_MM: f32 = 2.0;
pub const GAP_MM: f32 = 0.7;

// upper bounds accepted from config
pub const MAX_DPI: u32 = 4800;
pub const MAX_LENGTH_MM: f32 = 1000.0;
pub const MAX_FONT_PX: f32 = 1000.0;

pub const FONT_PATH: &str = "fonts/arial.ttf";
pub const FONT_FAMILY: &str = "Arial";
pub const FONT_PX: f32 = 34.0;

pub const OUTPUT_DIR: &str = "barcodes";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H%M";

pub const SHEET_NAME: &str = "Replaced";
pub const START_ROW: u32 = 4;
pub const END_ROW: u32 = 21;
pub const CODE_COLUMN: &str = "E";          // pre-joined code
pub const FALLBACK_COLUMNS: [&str; 3] = ["B", "C", "D"];
pub const LABEL_COLUMN: &str = "F";

pub const MAX_FILENAME_CHARS: usize = 150;

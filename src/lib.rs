//! EAN-13 barcode files from product codes.
//! - Normalizes 12/13-digit codes into GTINs, repairing the check digit
//! - Renders bars as transparent PNG or as SVG sized in millimetres
//! - Prints the 13-digit code centred under the bars
//! - Reads rows from a workbook/CSV or from pasted lines, one batch folder per run

pub mod barcode;
pub mod batch;
pub mod builder;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod consts;
pub mod error;
pub mod graphics;
pub mod layout;
pub mod logger;
pub mod output;
pub mod render;
pub mod sanitize;
pub mod source;
pub mod symbology;

pub use barcode::{checksum, normalize, Gtin};
pub use batch::{BatchRunner, BatchSummary, RowFailure, RowOutcome};
pub use builder::LabelBuilder;
pub use config::{Config, OutputConfig, RenderConfig, SheetConfig};
pub use error::{Error, InvalidInput, InvalidReason, Result};
pub use graphics::{FontText, TextBox, TextRenderer};
pub use layout::{layout, mm_to_px, LayoutResult};
pub use output::{BatchDir, BatchPathBuilder, Clock, FixedClock, OutputArtifact, OutputFormat, SystemClock};
pub use render::{BarcodeRenderRequest, BarcodeRenderer, Ean13Renderer, VectorBars};
pub use sanitize::{artifact_stem, sanitize};
pub use source::{DelimitedLineParser, Grid, LineSource, RowId, RowParser, SheetSource, SourceRow};

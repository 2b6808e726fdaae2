//! Row-at-a-time driver: normalize, compose, write, count.

use std::fmt;

use crate::barcode::{normalize, Gtin};
use crate::builder::LabelBuilder;
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::graphics::TextRenderer;
use crate::output::{BatchDir, OutputArtifact, OutputFormat};
use crate::render::BarcodeRenderer;
use crate::sanitize::artifact_stem;
use crate::source::{RowId, SourceRow};

/// A row that produced files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub id: RowId,
    pub gtin: Gtin,
    pub artifacts: Vec<OutputArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowFailure {
    pub id: RowId,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub skipped: usize,
    pub failures: Vec<RowFailure>,
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} barcodes, {} skipped", self.succeeded, self.skipped)
    }
}

pub struct BatchRunner<'a, B, T> {
    builder: LabelBuilder<'a, B, T>,
    dir: &'a BatchDir,
    formats: &'a [OutputFormat],
}

impl<'a, B: BarcodeRenderer, T: TextRenderer> BatchRunner<'a, B, T> {
    pub fn new(
        bars: &'a B,
        text: &'a T,
        render: &'a RenderConfig,
        dir: &'a BatchDir,
        formats: &'a [OutputFormat],
    ) -> Self {
        Self { builder: LabelBuilder::new(bars, text, render), dir, formats }
    }

    /// Produce every configured format for one row.
    ///
    /// All formats are rendered before anything is written, and files
    /// already written are removed if a later write fails, so a skipped row
    /// leaves nothing behind.
    pub fn process_row(&self, row: &SourceRow) -> Result<RowOutcome> {
        let gtin = normalize(&row.code)?;
        let stem = artifact_stem(&row.label, &gtin);

        let rendered = self
            .formats
            .iter()
            .map(|&format| {
                let data = match format {
                    OutputFormat::Png => self.builder.png(&gtin)?,
                    OutputFormat::Svg => self.builder.svg(&gtin)?.into_bytes(),
                };
                Ok((format, data))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut artifacts = Vec::with_capacity(rendered.len());
        for (format, data) in rendered {
            match self.dir.write(&stem, format, &data) {
                Ok(artifact) => artifacts.push(artifact),
                Err(e) => {
                    self.dir.discard(&artifacts);
                    return Err(e);
                }
            }
        }
        Ok(RowOutcome { id: row.id, gtin, artifacts })
    }

    /// Process rows one by one. Row errors are logged and counted; a fatal
    /// error from the source stops the run.
    pub fn run<I>(&self, rows: I) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = Result<SourceRow>>,
    {
        self.run_with(rows, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_row` after each produced row.
    pub fn run_with<I, F>(&self, rows: I, mut on_row: F) -> Result<BatchSummary>
    where
        I: IntoIterator<Item = Result<SourceRow>>,
        F: FnMut(&RowOutcome),
    {
        let mut summary = BatchSummary::default();
        for row in rows {
            let row = row?;
            match self.process_row(&row) {
                Ok(outcome) => {
                    let names: Vec<_> = outcome.artifacts.iter().map(OutputArtifact::file_name).collect();
                    tracing::info!("{}: {} -> {}", outcome.id, outcome.gtin, names.join(", "));
                    summary.succeeded += 1;
                    on_row(&outcome);
                }
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    tracing::warn!("{}: {:?} skipped: {}", row.id, row.code, e);
                    summary.skipped += 1;
                    summary.failures.push(RowFailure { id: row.id, code: row.code, reason: reason(&e) });
                }
            }
        }
        tracing::info!("batch done: {} -> {}", summary, self.dir.path().display());
        Ok(summary)
    }
}

fn reason(e: &Error) -> String {
    match e {
        Error::InvalidInput(invalid) => invalid.reason.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::TextBox;
    use crate::render::{BarcodeRenderRequest, Ean13Renderer, VectorBars};
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    struct NoText;

    impl TextRenderer for NoText {
        fn measure(&self, _text: &str) -> TextBox {
            TextBox::default()
        }
        fn draw(&self, _canvas: &mut RgbaImage, _x: u32, _y: u32, _text: &str, _color: Rgba<u8>) {}
        fn family(&self) -> &str {
            "none"
        }
        fn size_px(&self) -> f32 {
            1.0
        }
    }

    fn row(n: usize, code: &str, label: &str) -> Result<SourceRow> {
        Ok(SourceRow { id: RowId::Line(n), code: code.into(), label: label.into() })
    }

    #[test]
    fn counts_successes_and_skips() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        let render = RenderConfig::default();
        let formats = [OutputFormat::Svg];
        let runner = BatchRunner::new(&Ean13Renderer, &NoText, &render, &dir, &formats);

        let summary = runner
            .run(vec![row(1, "400638133393", "Widget"), row(2, "12a456789012", ""), row(3, "123", "x")])
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failures[0].id, RowId::Line(2));
        assert!(summary.failures[1].reason.contains("got 3"));
        assert!(tmp.path().join("Widget.svg").is_file());
        assert_eq!(summary.to_string(), "1 barcodes, 2 skipped");
    }

    #[test]
    fn source_error_aborts() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        let render = RenderConfig::default();
        let formats = [OutputFormat::Svg];
        let runner = BatchRunner::new(&Ean13Renderer, &NoText, &render, &dir, &formats);

        let rows = vec![row(1, "400638133393", ""), Err(Error::source_unavailable("<stdin>", "closed"))];
        assert!(matches!(runner.run(rows), Err(Error::SourceUnavailable { .. })));
        // the row before the failure was still written
        assert!(tmp.path().join("4006381333931.svg").is_file());
    }

    #[test]
    fn process_row_writes_each_format_under_gtin_when_unlabelled() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        let render = RenderConfig::default();
        let formats = [OutputFormat::Png, OutputFormat::Svg];
        let runner = BatchRunner::new(&Ean13Renderer, &NoText, &render, &dir, &formats);

        let outcome = runner.process_row(&row(7, "4006381333939", "").unwrap()).unwrap();
        assert_eq!(outcome.gtin.as_str(), "4006381333931");
        let names: Vec<_> = outcome.artifacts.iter().map(OutputArtifact::file_name).collect();
        assert_eq!(names, vec!["4006381333931.png", "4006381333931.svg"]);
    }

    /// Raster works, vector always fails.
    struct RasterOnly;

    impl BarcodeRenderer for RasterOnly {
        fn render_raster(&self, request: &BarcodeRenderRequest) -> Result<RgbaImage> {
            Ean13Renderer.render_raster(request)
        }
        fn render_vector(&self, _request: &BarcodeRenderRequest) -> Result<VectorBars> {
            Err(Error::Render("no vector backend".into()))
        }
    }

    #[test]
    fn failed_format_leaves_no_partial_files() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        let render = RenderConfig::default();
        let formats = [OutputFormat::Png, OutputFormat::Svg];
        let runner = BatchRunner::new(&RasterOnly, &NoText, &render, &dir, &formats);

        let summary = runner.run(vec![row(1, "400638133393", "Widget")]).unwrap();
        assert_eq!((summary.succeeded, summary.skipped), (0, 1));
        assert!(summary.failures[0].reason.contains("no vector backend"));
        assert!(!tmp.path().join("Widget.png").exists());
    }

    #[test]
    fn failed_write_removes_earlier_files_of_the_row() {
        let tmp = TempDir::new().unwrap();
        let dir = BatchDir::create(tmp.path()).unwrap();
        // a directory where the SVG should go makes that write fail
        std::fs::create_dir(tmp.path().join("Widget.svg")).unwrap();
        let render = RenderConfig::default();
        let formats = [OutputFormat::Png, OutputFormat::Svg];
        let runner = BatchRunner::new(&Ean13Renderer, &NoText, &render, &dir, &formats);

        let err = runner.process_row(&row(1, "400638133393", "Widget").unwrap()).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!tmp.path().join("Widget.png").exists());
    }
}

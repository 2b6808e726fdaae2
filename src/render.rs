//! Bar rendering: raster bitmaps with a transparent background and bar
//! geometry for vector output.

use image::{Rgba, RgbaImage};

use crate::barcode::{normalize, Gtin};
use crate::config::RenderConfig;
use crate::error::{Error, Result};
use crate::layout::mm_to_px;
use crate::symbology::{bar_runs, encode, MODULES};

pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);
pub const INK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// What the renderer needs for one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeRenderRequest {
    pub payload: String,
    pub module_width_mm: f32,
    pub module_height_mm: f32,
    pub quiet_zone_mm: f32,
    pub dpi: u32,
}

impl BarcodeRenderRequest {
    pub fn new(gtin: &Gtin, render: &RenderConfig) -> Self {
        Self {
            payload: gtin.payload().to_string(),
            module_width_mm: render.module_width_mm,
            module_height_mm: render.bar_height_mm,
            quiet_zone_mm: render.quiet_zone_mm,
            dpi: render.dpi,
        }
    }
}

/// One dark bar in device pixels, spanning the full symbol height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRect {
    pub x: u32,
    pub width: u32,
}

/// Bars of a symbol as rectangles, quiet zones included in `width`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorBars {
    pub width: u32,
    pub height: u32,
    pub bars: Vec<BarRect>,
}

pub trait BarcodeRenderer {
    fn render_raster(&self, request: &BarcodeRenderRequest) -> Result<RgbaImage>;
    fn render_vector(&self, request: &BarcodeRenderRequest) -> Result<VectorBars>;
}

/// EAN-13 bars, no human-readable text.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ean13Renderer;

impl Ean13Renderer {
    fn geometry(&self, request: &BarcodeRenderRequest) -> Result<VectorBars> {
        if request.dpi == 0 {
            return Err(Error::Render("dpi must be positive".into()));
        }
        let gtin = normalize(&request.payload).map_err(|e| Error::Render(e.to_string()))?;
        let modules = encode(&gtin)?;

        let module_px = mm_to_px(request.module_width_mm, request.dpi).max(1);
        let quiet_px = mm_to_px(request.quiet_zone_mm, request.dpi);
        let height = mm_to_px(request.module_height_mm, request.dpi).max(1);

        let too_large = || Error::Render(format!("{gtin}: symbol does not fit in {} px", u32::MAX));
        let width = (MODULES as u32)
            .checked_mul(module_px)
            .and_then(|w| w.checked_add(quiet_px.checked_mul(2)?))
            .ok_or_else(too_large)?;
        width.checked_mul(height).ok_or_else(too_large)?;

        // every bar ends inside `width`, so these cannot overflow
        let bars = bar_runs(&modules)
            .into_iter()
            .map(|(start, len)| BarRect {
                x: quiet_px + start as u32 * module_px,
                width: len as u32 * module_px,
            })
            .collect();

        Ok(VectorBars { width, height, bars })
    }
}

impl BarcodeRenderer for Ean13Renderer {
    fn render_raster(&self, request: &BarcodeRenderRequest) -> Result<RgbaImage> {
        let geometry = self.geometry(request)?;
        let mut img = RgbaImage::from_pixel(geometry.width, geometry.height, TRANSPARENT);
        for bar in &geometry.bars {
            for x in bar.x..bar.x + bar.width {
                for y in 0..geometry.height {
                    img.put_pixel(x, y, INK);
                }
            }
        }
        Ok(img)
    }

    fn render_vector(&self, request: &BarcodeRenderRequest) -> Result<VectorBars> {
        self.geometry(request)
    }
}

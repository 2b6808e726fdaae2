use std::path::Path;

use image::{Pixel, Rgba, RgbaImage};
use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::{Error, Result};

/// Size of a rendered text line in pixels. `ascent` is the distance from
/// the top of the box to the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBox {
    pub width: u32,
    pub height: u32,
    pub ascent: u32,
}

pub trait TextRenderer {
    fn measure(&self, text: &str) -> TextBox;

    /// Draw `text` with the top-left of its box at `(x, y)`.
    fn draw(&self, canvas: &mut RgbaImage, x: u32, y: u32, text: &str, color: Rgba<u8>);

    /// Family name written into vector output.
    fn family(&self) -> &str;

    fn size_px(&self) -> f32;
}

/// TrueType text through `rusttype`.
pub struct FontText {
    font: Font<'static>,
    family: String,
    scale: Scale,
}

impl FontText {
    pub fn from_bytes(bytes: Vec<u8>, family: &str, size_px: f32) -> Result<Self> {
        let font = Font::try_from_vec(bytes).ok_or_else(|| Error::Font("not a TrueType font".into()))?;
        Ok(Self { font, family: family.to_string(), scale: Scale::uniform(size_px) })
    }

    pub fn load(path: &Path, family: &str, size_px: f32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::Font(format!("{}: {e}", path.display())))?;
        Self::from_bytes(bytes, family, size_px)
    }

    fn ascent(&self) -> f32 {
        self.font.v_metrics(self.scale).ascent.ceil()
    }

    fn glyphs(&self, text: &str, x: f32, y: f32) -> Vec<PositionedGlyph<'static>> {
        let baseline = y + self.ascent();
        self.font.layout(text, self.scale, point(x, baseline)).collect()
    }
}

impl TextRenderer for FontText {
    fn measure(&self, text: &str) -> TextBox {
        let vm = self.font.v_metrics(self.scale);
        let ascent = vm.ascent.ceil();
        let height = (ascent - vm.descent.floor()).ceil() as u32;

        // tight width: right edge of the last inked glyph
        let width = self
            .glyphs(text, 0.0, 0.0)
            .iter()
            .rev()
            .find_map(|g| g.pixel_bounding_box().map(|bb| bb.max.x as f32))
            .unwrap_or(0.0)
            .max(0.0)
            .ceil() as u32;

        TextBox { width, height, ascent: ascent as u32 }
    }

    fn draw(&self, canvas: &mut RgbaImage, x: u32, y: u32, text: &str, color: Rgba<u8>) {
        let (w, h) = canvas.dimensions();
        for g in self.glyphs(text, x as f32, y as f32) {
            let Some(bb) = g.pixel_bounding_box() else { continue };
            g.draw(|gx, gy, v| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px as u32 >= w || py as u32 >= h {
                    return;
                }
                // glyph coverage scales the ink's alpha, then alpha-over
                let alpha = (v.clamp(0.0, 1.0) * color[3] as f32).round() as u8;
                canvas
                    .get_pixel_mut(px as u32, py as u32)
                    .blend(&Rgba([color[0], color[1], color[2], alpha]));
            });
        }
    }

    fn family(&self) -> &str {
        &self.family
    }

    fn size_px(&self) -> f32 {
        self.scale.y
    }
}

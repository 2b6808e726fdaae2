//! Compose bars and the human-readable code into finished labels.

use std::fmt::Write as _;
use std::io::Cursor;

use image::imageops::overlay;
use image::{ImageFormat, RgbaImage};

use crate::barcode::Gtin;
use crate::config::RenderConfig;
use crate::consts::MM_PER_INCH;
use crate::error::{Error, Result};
use crate::graphics::TextRenderer;
use crate::layout::{layout, LayoutResult};
use crate::render::{BarcodeRenderRequest, BarcodeRenderer, INK, TRANSPARENT};

pub struct LabelBuilder<'a, B, T> {
    bars: &'a B,
    text: &'a T,
    render: &'a RenderConfig,
}

impl<'a, B: BarcodeRenderer, T: TextRenderer> LabelBuilder<'a, B, T> {
    pub fn new(bars: &'a B, text: &'a T, render: &'a RenderConfig) -> Self {
        Self { bars, text, render }
    }

    fn place(&self, bar_width: u32, bar_height: u32, gtin: &Gtin) -> (LayoutResult, u32) {
        let tb = self.text.measure(gtin.as_str());
        let placed = layout(
            bar_width,
            bar_height,
            tb.width,
            tb.height,
            self.render.side_pad_px(),
            self.render.gap_px(),
        );
        (placed, tb.ascent)
    }

    /// Transparent RGBA image: bars on top, code centred below.
    pub fn raster(&self, gtin: &Gtin) -> Result<RgbaImage> {
        let bars = self.bars.render_raster(&BarcodeRenderRequest::new(gtin, self.render))?;
        let (l, _) = self.place(bars.width(), bars.height(), gtin);
        ensure_canvas_fits(&l, gtin)?;

        let mut canvas = RgbaImage::from_pixel(l.canvas_width, l.canvas_height, TRANSPARENT);
        overlay(&mut canvas, &bars, i64::from(l.bar_x), i64::from(l.bar_y));
        self.text.draw(&mut canvas, l.text_x, l.text_y, gtin.as_str(), INK);
        Ok(canvas)
    }

    pub fn png(&self, gtin: &Gtin) -> Result<Vec<u8>> {
        let img = self.raster(gtin)?;
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png)?;
        Ok(out.into_inner())
    }

    /// SVG in device-pixel user units, sized in millimetres for print.
    pub fn svg(&self, gtin: &Gtin) -> Result<String> {
        let bars = self.bars.render_vector(&BarcodeRenderRequest::new(gtin, self.render))?;
        let (l, ascent) = self.place(bars.width, bars.height, gtin);
        ensure_canvas_fits(&l, gtin)?;
        let px_to_mm = |px: u32| px as f32 * MM_PER_INCH / self.render.dpi as f32;

        let mut doc = String::new();
        svg_line(&mut doc, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        svg_line(
            &mut doc,
            &format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{:.3}mm" height="{:.3}mm" viewBox="0 0 {} {}">"#,
                px_to_mm(l.canvas_width),
                px_to_mm(l.canvas_height),
                l.canvas_width,
                l.canvas_height
            ),
        )?;
        svg_line(&mut doc, r##"  <g fill="#000000">"##)?;
        for bar in &bars.bars {
            svg_line(
                &mut doc,
                &format!(
                    r#"    <rect x="{}" y="{}" width="{}" height="{}"/>"#,
                    l.bar_x.saturating_add(bar.x),
                    l.bar_y,
                    bar.width,
                    bars.height
                ),
            )?;
        }
        svg_line(&mut doc, "  </g>")?;
        svg_line(
            &mut doc,
            &format!(
                r##"  <text x="{}" y="{}" text-anchor="middle" font-family="{}" font-size="{}" fill="#000000">{}</text>"##,
                l.canvas_width as f32 / 2.0,
                l.text_y.saturating_add(ascent),
                escape(self.text.family()),
                self.text.size_px(),
                escape(gtin.as_str())
            ),
        )?;
        svg_line(&mut doc, "</svg>")?;
        Ok(doc)
    }
}

/// Reject canvases whose RGBA buffer would not be addressable.
fn ensure_canvas_fits(l: &LayoutResult, gtin: &Gtin) -> Result<()> {
    let bytes = u64::from(l.canvas_width) * u64::from(l.canvas_height) * 4;
    if l.canvas_width == u32::MAX || l.canvas_height == u32::MAX || bytes > isize::MAX as u64 {
        return Err(Error::Render(format!(
            "{gtin}: label of {}x{} px is too large",
            l.canvas_width, l.canvas_height
        )));
    }
    Ok(())
}

fn svg_line(buf: &mut String, s: &str) -> Result<()> {
    writeln!(buf, "{s}").map_err(|e| Error::Render(e.to_string()))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

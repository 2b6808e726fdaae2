use crate::consts::MM_PER_INCH;

/// Canvas size and placement of the bar image and the text line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutResult {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub bar_x: u32,
    pub bar_y: u32,
    pub text_x: u32,
    pub text_y: u32,
}

/// Physical length to whole device pixels, truncating.
pub fn mm_to_px(mm: f32, dpi: u32) -> u32 {
    (mm.max(0.0) * dpi as f32 / MM_PER_INCH) as u32
}

/// Place bars at the top and the text line `gap_px` below them, both
/// horizontally centred, with `side_pad_px` on each side of the wider one.
///
/// Height is `bar_height + gap_px + text_height`; text origin is the top of
/// its box, baseline handling is left to the text renderer. Sums saturate at
/// `u32::MAX`; callers reject canvases that large before allocating.
pub fn layout(
    bar_width: u32,
    bar_height: u32,
    text_width: u32,
    text_height: u32,
    side_pad_px: u32,
    gap_px: u32,
) -> LayoutResult {
    let canvas_width = bar_width.max(text_width).saturating_add(side_pad_px.saturating_mul(2));
    let text_y = bar_height.saturating_add(gap_px);
    let canvas_height = text_y.saturating_add(text_height);

    LayoutResult {
        canvas_width,
        canvas_height,
        bar_x: (canvas_width - bar_width) / 2,
        bar_y: 0,
        text_x: (canvas_width - text_width) / 2,
        text_y,
    }
}

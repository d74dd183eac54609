pub mod bitmap_font;
pub mod label;

use anyhow::{anyhow, Result};
use image::{Rgba, RgbaImage};
use label::LabelFont;
use tiny_skia::{
    FillRule, LineCap, Mask, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

const LABEL_TEXT: &str = "fn";

const BACKGROUND: [u8; 4] = [28, 28, 32, 255];
const BORDER: [u8; 4] = [60, 60, 72, 130];
const WAVE_RGB: [u8; 3] = [100, 190, 255];
const MIC_BODY: [u8; 4] = [100, 195, 255, 240];
const MIC_GRILLE: [u8; 4] = [35, 100, 160, 100];
const MIC_STAND: [u8; 4] = [100, 195, 255, 200];
const LABEL: [u8; 4] = [255, 255, 255, 230];

/// (radius as a fraction of the edge, alpha), outermost first.
const WAVES: [(f32, u8); 3] = [(0.30, 35), (0.23, 55), (0.16, 80)];
const GRILLE_LINES: usize = 4;

/// Bézier handle length for a quarter circle of radius 1.
const KAPPA: f32 = 0.552_284_8;

/// Every measurement of the design, derived from the edge length alone.
#[derive(Debug, Clone, PartialEq)]
pub struct IconGeometry {
    pub size: f32,
    pub center: (f32, f32),
    pub pad: f32,
    pub corner_radius: f32,
    pub border_inset: f32,
    pub border_width: f32,
    pub wave_width: f32,
    /// Horizontal distance of each wave center from the vertical centerline.
    pub wave_offset_x: f32,
    pub wave_offset_y: f32,
    pub mic_left: f32,
    pub mic_top: f32,
    pub mic_width: f32,
    pub mic_height: f32,
    pub grille_width: f32,
    pub stand_width: f32,
    pub font_size: f32,
    pub label_top: f32,
}

/// `max(1, floor(s * frac))`, the thinnest a visible stroke may get.
fn hairline(s: f32, frac: f32) -> f32 {
    (s * frac).floor().max(1.0)
}

impl IconGeometry {
    pub fn for_size(size: u32) -> Self {
        let s = size as f32;
        let pad = (s * 0.08).floor();
        let corner_radius = (s * 0.22).floor();
        let center = (s / 2.0, s / 2.0);
        let mic_width = s * 0.14;
        let mic_height = s * 0.24;

        Self {
            size: s,
            center,
            pad,
            corner_radius,
            border_inset: pad + hairline(s, 0.006),
            border_width: hairline(s, 0.004),
            wave_width: hairline(s, 0.013),
            wave_offset_x: s * 0.02,
            wave_offset_y: s * 0.04,
            mic_left: center.0 - mic_width / 2.0,
            mic_top: center.1 - mic_height * 0.15,
            mic_width,
            mic_height,
            grille_width: hairline(s, 0.005),
            stand_width: hairline(s, 0.016),
            font_size: (s * 0.16).floor().max(1.0),
            label_top: pad + s * 0.06,
        }
    }
}

/// Generate the RGBA app icon at the given `size` (e.g. 16, 1024).
///
/// Draws a dark rounded square with sound-wave arcs, a microphone on a stand
/// and the "fn" label. The result depends only on `size` and the label font.
pub fn create_icon(size: u32, font: &mut LabelFont) -> Result<RgbaImage> {
    let mut pixmap =
        Pixmap::new(size, size).ok_or_else(|| anyhow!("Cannot allocate a {size}x{size} canvas"))?;
    let g = IconGeometry::for_size(size);

    draw_background(&mut pixmap, &g)?;
    draw_waves(&mut pixmap, &g)?;
    draw_microphone(&mut pixmap, &g)?;
    draw_stand(&mut pixmap, &g)?;
    draw_label(&mut pixmap, &g, font)?;

    Ok(to_rgba_image(&pixmap))
}

// ---------------------------------------------------------------------------
// Layers
// ---------------------------------------------------------------------------

fn draw_background(pixmap: &mut Pixmap, g: &IconGeometry) -> Result<()> {
    let far = g.size - g.pad;
    let mut pb = PathBuilder::new();
    push_rounded_rect(&mut pb, g.pad, g.pad, far, far, g.corner_radius);
    fill(pixmap, &finish(pb, "background")?, BACKGROUND);

    // Outline sits inside its box, so the path runs half a stroke further in.
    let shrink = g.border_inset - g.pad;
    let inner = g.border_inset + g.border_width / 2.0;
    let mut pb = PathBuilder::new();
    push_rounded_rect(
        &mut pb,
        inner,
        inner,
        g.size - inner,
        g.size - inner,
        g.corner_radius - shrink - g.border_width / 2.0,
    );
    stroke(pixmap, &finish(pb, "border")?, BORDER, g.border_width);
    Ok(())
}

fn draw_waves(pixmap: &mut Pixmap, g: &IconGeometry) -> Result<()> {
    let cy = g.center.1 + g.wave_offset_y;
    for (frac, alpha) in WAVES {
        let r = g.size * frac - g.wave_width / 2.0;
        let color = [WAVE_RGB[0], WAVE_RGB[1], WAVE_RGB[2], alpha];

        let mut pb = PathBuilder::new();
        push_arc(&mut pb, g.center.0 + g.wave_offset_x, cy, r, -50.0, 50.0);
        push_arc(&mut pb, g.center.0 - g.wave_offset_x, cy, r, 130.0, 230.0);
        stroke(pixmap, &finish(pb, "wave")?, color, g.wave_width);
    }
    Ok(())
}

fn draw_microphone(pixmap: &mut Pixmap, g: &IconGeometry) -> Result<()> {
    let mut pb = PathBuilder::new();
    push_rounded_rect(
        &mut pb,
        g.mic_left,
        g.mic_top,
        g.mic_left + g.mic_width,
        g.mic_top + g.mic_height,
        g.mic_width / 2.0,
    );
    fill(pixmap, &finish(pb, "microphone")?, MIC_BODY);

    // Grille spans the straight part of the capsule only.
    let top = g.mic_top + g.mic_height * 0.28;
    let bottom = g.mic_top + g.mic_height * 0.82;
    let step = (bottom - top) / (GRILLE_LINES - 1) as f32;
    let x1 = g.mic_left + g.mic_width * 0.2;
    let x2 = g.mic_left + g.mic_width * 0.8;

    let mut pb = PathBuilder::new();
    for i in 0..GRILLE_LINES {
        let y = top + i as f32 * step;
        pb.move_to(x1, y);
        pb.line_to(x2, y);
    }
    stroke(pixmap, &finish(pb, "grille")?, MIC_GRILLE, g.grille_width);
    Ok(())
}

fn draw_stand(pixmap: &mut Pixmap, g: &IconGeometry) -> Result<()> {
    let cx = g.center.0;
    let cradle_r = g.mic_width * 0.85;
    let cradle_cy = g.mic_top + g.mic_height * 0.08;
    let stem_top = cradle_cy + cradle_r;
    let stem_bottom = stem_top + g.size * 0.07;
    let base_half = g.size * 0.06;

    let mut pb = PathBuilder::new();
    push_arc(
        &mut pb,
        cx,
        cradle_cy,
        cradle_r - g.stand_width / 2.0,
        0.0,
        180.0,
    );
    pb.move_to(cx, stem_top);
    pb.line_to(cx, stem_bottom);
    pb.move_to(cx - base_half, stem_bottom);
    pb.line_to(cx + base_half, stem_bottom);
    stroke(pixmap, &finish(pb, "stand")?, MIC_STAND, g.stand_width);
    Ok(())
}

fn draw_label(pixmap: &mut Pixmap, g: &IconGeometry, font: &mut LabelFont) -> Result<()> {
    let glyphs = font.render(LABEL_TEXT, g.font_size);
    let Some(ink) = glyphs.ink_bounds() else {
        log::debug!("Label has no ink at {}px, skipping", g.size);
        return Ok(());
    };

    // Center the ink, not the layout box, on the vertical centerline.
    let offset_x = (g.center.0 - ink.left as f32 - ink.width() as f32 / 2.0).round() as i64;
    let offset_y = g.label_top.round() as i64;

    let (width, height) = (pixmap.width(), pixmap.height());
    let mut mask = Mask::new(width, height).ok_or_else(|| anyhow!("Cannot allocate label mask"))?;
    let data = mask.data_mut();
    for y in 0..glyphs.height() {
        let ty = y as i64 + offset_y;
        if ty < 0 || ty >= height as i64 {
            continue;
        }
        for x in 0..glyphs.width() {
            let tx = x as i64 + offset_x;
            if tx < 0 || tx >= width as i64 {
                continue;
            }
            data[(ty as u32 * width + tx as u32) as usize] = glyphs.get(x, y);
        }
    }

    let canvas = Rect::from_xywh(0.0, 0.0, width as f32, height as f32)
        .ok_or_else(|| anyhow!("Degenerate canvas rect"))?;
    pixmap.fill_rect(canvas, &paint(LABEL), Transform::identity(), Some(&mask));
    Ok(())
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn push_rounded_rect(pb: &mut PathBuilder, left: f32, top: f32, right: f32, bottom: f32, radius: f32) {
    let r = radius
        .min((right - left) / 2.0)
        .min((bottom - top) / 2.0)
        .max(0.0);
    let k = r * KAPPA;

    pb.move_to(left + r, top);
    pb.line_to(right - r, top);
    pb.cubic_to(right - r + k, top, right, top + r - k, right, top + r);
    pb.line_to(right, bottom - r);
    pb.cubic_to(right, bottom - r + k, right - r + k, bottom, right - r, bottom);
    pb.line_to(left + r, bottom);
    pb.cubic_to(left + r - k, bottom, left, bottom - r + k, left, bottom - r);
    pb.line_to(left, top + r);
    pb.cubic_to(left, top + r - k, left + r - k, top, left + r, top);
    pb.close();
}

/// Circular arc from `start` to `end` degrees, clockwise from 3 o'clock
/// (y grows downward), as one cubic per quarter turn or less.
fn push_arc(pb: &mut PathBuilder, cx: f32, cy: f32, r: f32, start: f32, end: f32) {
    let sweep = (end - start).to_radians();
    let segments = (sweep.abs() / std::f32::consts::FRAC_PI_2).ceil().max(1.0) as usize;
    let step = sweep / segments as f32;
    let k = 4.0 / 3.0 * (step / 4.0).tan();

    let mut a = start.to_radians();
    pb.move_to(cx + r * a.cos(), cy + r * a.sin());
    for _ in 0..segments {
        let b = a + step;
        let (sa, ca) = a.sin_cos();
        let (sb, cb) = b.sin_cos();
        pb.cubic_to(
            cx + r * (ca - k * sa),
            cy + r * (sa + k * ca),
            cx + r * (cb + k * sb),
            cy + r * (sb - k * cb),
            cx + r * cb,
            cy + r * sb,
        );
        a = b;
    }
}

fn finish(pb: PathBuilder, what: &str) -> Result<Path> {
    pb.finish()
        .ok_or_else(|| anyhow!("Degenerate {what} geometry"))
}

fn paint(rgba: [u8; 4]) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(rgba[0], rgba[1], rgba[2], rgba[3]);
    paint.anti_alias = true;
    paint
}

fn fill(pixmap: &mut Pixmap, path: &Path, rgba: [u8; 4]) {
    pixmap.fill_path(path, &paint(rgba), FillRule::Winding, Transform::identity(), None);
}

fn stroke(pixmap: &mut Pixmap, path: &Path, rgba: [u8; 4], width: f32) {
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint(rgba), &stroke, Transform::identity(), None);
}

/// tiny-skia stores premultiplied pixels; PNG wants straight alpha.
fn to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    img
}

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::draw::surface::{Surface, TextAlign, TextStyle};
use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rect, Rgba8, Vec2};
use crate::foundation::error::{ReelError, ReelResult};
use crate::foundation::math::lerp;
use crate::render::frame::{FrameRGBA, FrameSource};
use crate::render::text::TextLayoutEngine;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct GradientKey {
    top: [u8; 4],
    bottom: [u8; 4],
    w: u32,
    h: u32,
}

/// Raster [`Surface`] powered by `vello_cpu`, with Parley-shaped text.
///
/// The pixmap is `canvas * pixel_ratio` pixels; drawing happens in logical canvas units. Without a
/// font, text runs are skipped (a warning is logged once).
pub struct CpuSurface {
    canvas: Canvas,
    pixel_ratio: f64,
    base: Affine,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    text: Option<TextLayoutEngine>,
    gradient_cache: HashMap<GradientKey, vello_cpu::Image>,
    opacity_depth: usize,
    warned_missing_font: bool,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("device_size", &self.device_size())
            .field("has_font", &self.text.is_some())
            .field("opacity_depth", &self.opacity_depth)
            .finish()
    }
}

impl CpuSurface {
    /// Create a surface for `canvas` at `pixel_ratio` device pixels per logical pixel.
    pub fn new(canvas: Canvas, pixel_ratio: f64) -> ReelResult<Self> {
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ReelError::validation(
                "pixel_ratio must be finite and > 0",
            ));
        }
        let (w, h) = canvas.device_size(pixel_ratio);
        let width: u16 = w
            .try_into()
            .map_err(|_| ReelError::render("surface width exceeds u16"))?;
        let height: u16 = h
            .try_into()
            .map_err(|_| ReelError::render("surface height exceeds u16"))?;

        Ok(Self {
            canvas,
            pixel_ratio,
            base: Affine::scale(pixel_ratio),
            ctx: vello_cpu::RenderContext::new(width, height),
            pixmap: vello_cpu::Pixmap::new(width, height),
            text: None,
            gradient_cache: HashMap::new(),
            opacity_depth: 0,
            warned_missing_font: false,
        })
    }

    /// Use `font_bytes` (TTF/OTF) for all text runs.
    pub fn with_font_bytes(mut self, font_bytes: Vec<u8>) -> ReelResult<Self> {
        self.text = Some(TextLayoutEngine::new(font_bytes)?);
        Ok(self)
    }

    /// Load the font at `path` for all text runs.
    pub fn with_font_path(self, path: &Path) -> ReelResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("failed to read font '{}'", path.display()))?;
        self.with_font_bytes(bytes)
    }

    /// Device pixels per logical pixel.
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    /// Pixmap size in device pixels.
    pub fn device_size(&self) -> (u32, u32) {
        (
            u32::from(self.pixmap.width()),
            u32::from(self.pixmap.height()),
        )
    }

    fn gradient_image(&mut self, top: Rgba8, bottom: Rgba8, w: u32, h: u32) -> ReelResult<vello_cpu::Image> {
        let key = GradientKey {
            top: top.to_premul(),
            bottom: bottom.to_premul(),
            w,
            h,
        };
        if let Some(img) = self.gradient_cache.get(&key).cloned() {
            return Ok(img);
        }
        let mut bytes = vec![0u8; (w as usize).saturating_mul(h as usize).saturating_mul(4)];
        let h1 = f64::from(h.max(1) - 1);
        for y in 0..h {
            let t = if h1 <= 0.0 { 0.0 } else { f64::from(y) / h1 };
            let mut c = [0u8; 4];
            for (i, out) in c.iter_mut().enumerate() {
                *out = lerp(f64::from(key.top[i]), f64::from(key.bottom[i]), t)
                    .round()
                    .clamp(0.0, 255.0) as u8;
            }
            let row = (y as usize) * (w as usize) * 4;
            for px in bytes[row..row + (w as usize) * 4].chunks_exact_mut(4) {
                px.copy_from_slice(&c);
            }
        }
        let img = rgba_premul_to_image(&bytes, w, h)?;
        self.gradient_cache.insert(key, img.clone());
        Ok(img)
    }

    fn draw_text(&mut self, text: &str, anchor: Point, style: &TextStyle) -> ReelResult<()> {
        let Some(engine) = self.text.as_mut() else {
            if !self.warned_missing_font {
                tracing::warn!("no font configured; text runs are skipped");
                self.warned_missing_font = true;
            }
            return Ok(());
        };

        let layout = engine.layout_line(text, style.size_px, style.weight, style.color)?;
        let width = f64::from(layout.width());
        let baseline = layout
            .lines()
            .next()
            .map(|l| f64::from(l.metrics().baseline))
            .unwrap_or(0.0);
        let x = match style.align {
            TextAlign::Start => anchor.x,
            TextAlign::Center => anchor.x - width / 2.0,
            TextAlign::End => anchor.x - width,
        };
        let origin = Vec2::new(x, anchor.y - baseline);

        self.ctx
            .set_transform(affine_to_cpu(self.base * Affine::translate(origin)));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        let font = engine.font().clone();
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn begin_frame(&mut self) {
        self.ctx.reset();
        self.opacity_depth = 0;
    }

    fn end_frame(&mut self) -> ReelResult<()> {
        while self.opacity_depth > 0 {
            self.ctx.pop_layer();
            self.opacity_depth -= 1;
        }
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        Ok(())
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    fn stroke_path(&mut self, path: &BezPath, color: Rgba8, width: f64) {
        self.ctx.set_transform(affine_to_cpu(self.base));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&bezpath_to_cpu(path));
    }

    fn fill_vertical_gradient(&mut self, rect: Rect, top: Rgba8, bottom: Rgba8) {
        let device = self.base.transform_rect_bbox(rect);
        let w = device.width().round().max(1.0) as u32;
        let h = device.height().round().max(1.0) as u32;
        let img = match self.gradient_image(top, bottom, w, h) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(error = %e, "gradient rasterization failed; skipping");
                return;
            }
        };
        self.ctx.set_transform(affine_to_cpu(Affine::translate(
            device.origin().to_vec2(),
        )));
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(img);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(w),
            f64::from(h),
        ));
    }

    fn fill_text(&mut self, text: &str, anchor: Point, style: &TextStyle) {
        if let Err(e) = self.draw_text(text, anchor, style) {
            tracing::warn!(error = %e, text, "text run skipped");
        }
    }

    fn push_opacity(&mut self, alpha: f32) {
        self.ctx.push_opacity_layer(alpha);
        self.opacity_depth += 1;
    }

    fn pop_opacity(&mut self) {
        if self.opacity_depth > 0 {
            self.ctx.pop_layer();
            self.opacity_depth -= 1;
        }
    }
}

impl FrameSource for CpuSurface {
    fn frame_size(&self) -> (u32, u32) {
        self.device_size()
    }

    fn read_frame(&self) -> ReelResult<FrameRGBA> {
        let (width, height) = self.device_size();
        Ok(FrameRGBA {
            width,
            height,
            data: self.pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn rgba_premul_to_image(bytes: &[u8], width: u32, height: u32) -> ReelResult<vello_cpu::Image> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::render("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(ReelError::render("pixmap byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true);
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;

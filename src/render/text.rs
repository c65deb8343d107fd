use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};

/// RGBA8 brush color used by Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    text: String,
    size_bits: u32,
    weight: u16,
    brush: [u8; 4],
}

const LAYOUT_CACHE_CAPACITY: usize = 256;

/// Stateful helper that shapes single-line text with one registered font family.
///
/// Layouts are cached per `(text, size, weight, color)`; the promo redraws the same handful of
/// runs every frame.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
    cache: HashMap<LayoutKey, Arc<parley::Layout<TextBrushRgba8>>>,
}

impl TextLayoutEngine {
    /// Register `font_bytes` and build a layout engine over its first family.
    pub(crate) fn new(font_bytes: Vec<u8>) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::validation("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::validation("registered font family has no name"))?
            .to_string();

        let font = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        tracing::debug!(family = %family_name, "registered promo font");

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
            font,
            cache: HashMap::new(),
        })
    }

    pub(crate) fn font(&self) -> &vello_cpu::peniko::FontData {
        &self.font
    }

    /// Shape `text` on a single line.
    pub(crate) fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        weight: u16,
        color: Rgba8,
    ) -> ReelResult<Arc<parley::Layout<TextBrushRgba8>>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("text size_px must be finite and > 0"));
        }

        let key = LayoutKey {
            text: text.to_owned(),
            size_bits: size_px.to_bits(),
            weight,
            brush: [color.r, color.g, color.b, color.a],
        };
        if let Some(layout) = self.cache.get(&key) {
            return Ok(layout.clone());
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        if self.cache.len() >= LAYOUT_CACHE_CAPACITY {
            self.cache.clear();
        }
        let layout = Arc::new(layout);
        self.cache.insert(key, layout.clone());
        Ok(layout)
    }
}

// File: crates/plotchain-core/src/text.rs
// Summary: Simple text painter over Skia fonts: one system typeface, sized per call, with alignment.

use skia_safe as skia;

/// Horizontal anchor of a text run relative to its x coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

pub struct TextPainter {
    typeface: Option<skia::Typeface>,
}

impl TextPainter {
    pub fn new() -> Self {
        // Use the platform font manager's default family
        let typeface = skia::FontMgr::default().legacy_make_typeface(None::<&str>, skia::FontStyle::normal());
        if typeface.is_none() {
            tracing::warn!("no system typeface found; text will not be drawn");
        }
        Self { typeface }
    }

    fn font(&self, size: f32) -> skia::Font {
        match &self.typeface {
            Some(tf) => skia::Font::new(tf.clone(), size.max(1.0)),
            None => {
                let mut f = skia::Font::default();
                f.set_size(size.max(1.0));
                f
            }
        }
    }

    pub fn measure_width(&self, text: &str, size: f32) -> f32 {
        let (w, _) = self.font(size).measure_str(text, None);
        w
    }

    /// Draw `text` with its baseline at `y`.
    pub fn draw(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: skia::Color, align: Align) {
        if text.is_empty() {
            return;
        }
        let font = self.font(size);
        let x = match align {
            Align::Left => x,
            Align::Center => x - self.measure_width(text, size) * 0.5,
            Align::Right => x - self.measure_width(text, size),
        };
        let mut paint = skia::Paint::default();
        paint.set_anti_alias(true);
        paint.set_color(color);
        canvas.draw_str(text, (x, y), &font, &paint);
    }

    /// Draw `text` rotated 90° counter-clockwise, centered on (x, y).
    pub fn draw_vertical(&self, canvas: &skia::Canvas, text: &str, x: f32, y: f32, size: f32, color: skia::Color) {
        canvas.save();
        canvas.translate((x, y));
        canvas.rotate(-90.0, None);
        self.draw(canvas, text, 0.0, 0.0, size, color, Align::Center);
        canvas.restore();
    }
}

impl Default for TextPainter {
    fn default() -> Self {
        Self::new()
    }
}

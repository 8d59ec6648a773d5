// File: crates/plotchain-core/src/types.rs
// Summary: Shared render constants (dpi, default figure/font sizes) and figure margins.

/// Pixels per inch used to turn `figsize` into a surface size.
pub const DPI: f64 = 100.0;
/// Figure size in inches when no stage sets one.
pub const DEFAULT_FIGSIZE: (f64, f64) = (6.4, 4.8);
/// Base font size in points when no stage sets one.
pub const DEFAULT_FONTSIZE: f64 = 10.0;
/// Line width in points for plots that don't set one.
pub const DEFAULT_LINEWIDTH: f64 = 1.5;
/// Marker size in points for plots that don't set one.
pub const DEFAULT_MARKERSIZE: f64 = 6.0;

/// Convert a size in points to pixels at [`DPI`].
#[inline]
pub fn pt_to_px(pt: f64) -> f32 {
    (pt * DPI / 72.0) as f32
}

/// Figure margins around the axes box, as fractions of the figure size.
/// Contract: left + right < 1 and top + bottom < 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Insets {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Insets {
    pub const fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Axes box in pixels for a `width` x `height` figure: (left, top, right, bottom).
    pub fn plot_rect(&self, width: i32, height: i32) -> (f32, f32, f32, f32) {
        let (w, h) = (width as f32, height as f32);
        (w * self.left, h * self.top, w * (1.0 - self.right), h * (1.0 - self.bottom))
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self::new(0.125, 0.1, 0.12, 0.11)
    }
}

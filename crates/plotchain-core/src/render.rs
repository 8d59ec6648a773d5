// File: crates/plotchain-core/src/render.rs
// Summary: Headless figure rendering of a chain with Skia CPU raster surfaces; outputs are per-plot snapshots.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use skia_safe as skia;

use crate::axis::{data_limits, pad_limits, time_to_f64, Axis, ScaleKind};
use crate::options::ResolvedOptions;
use crate::plot::PlotSpec;
use crate::series::XSeries;
use crate::text::{Align, TextPainter};
use crate::theme::{parse_color, LineStyle, Marker, Theme};
use crate::types::{pt_to_px, Insets, DEFAULT_FIGSIZE, DEFAULT_FONTSIZE, DEFAULT_LINEWIDTH, DEFAULT_MARKERSIZE, DPI};

/// Margin added on each side of autoscaled data limits, as a fraction of the span.
const AXIS_MARGIN: f64 = 0.05;

pub struct RenderOptions {
    pub insets: Insets,
    pub theme: Theme,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { insets: Insets::default(), theme: Theme::light() }
    }
}

/// Draw every plot in order onto one figure, saving a snapshot of the
/// figure each time a plot names an output target. Returns the paths written.
pub fn render_chain(plots: &[PlotSpec], options: &ResolvedOptions, opts: &RenderOptions) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for (i, plot) in plots.iter().enumerate() {
        let Some(out) = &plot.style().output else { continue };
        let format = format_for(out)?;
        let image = draw_figure(&plots[..=i], options, opts)?;
        #[allow(deprecated)]
        let data = image
            .encode_to_data(format)
            .ok_or_else(|| anyhow::anyhow!("encoding {} failed", out.display()))?;
        if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(out, data.as_bytes()).with_context(|| format!("writing {}", out.display()))?;
        tracing::info!(path = %out.display(), plots = i + 1, "saved figure");
        written.push(out.clone());
    }
    if written.is_empty() && !plots.is_empty() {
        tracing::warn!("no plot names an output target; nothing was saved");
    }
    Ok(written)
}

/// Render all `plots` to PNG bytes, ignoring their output targets.
pub fn render_to_png_bytes(plots: &[PlotSpec], options: &ResolvedOptions, opts: &RenderOptions) -> Result<Vec<u8>> {
    let image = draw_figure(plots, options, opts)?;
    #[allow(deprecated)]
    let data = image
        .encode_to_data(skia::EncodedImageFormat::PNG)
        .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
    Ok(data.as_bytes().to_vec())
}

/// Image format from the target's extension; no extension means PNG.
pub fn format_for(path: &Path) -> Result<skia::EncodedImageFormat> {
    let ext = path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase());
    match ext.as_deref() {
        None | Some("png") => Ok(skia::EncodedImageFormat::PNG),
        Some("jpg") | Some("jpeg") => Ok(skia::EncodedImageFormat::JPEG),
        Some("webp") => Ok(skia::EncodedImageFormat::WEBP),
        Some(other) => anyhow::bail!("unsupported output format `.{other}` for {}", path.display()),
    }
}

/// Figure size in pixels from `figsize` inches.
pub fn figure_pixels(options: &ResolvedOptions) -> (i32, i32) {
    let (w, h) = options.figsize.unwrap_or(DEFAULT_FIGSIZE);
    let px = |inches: f64| ((inches * DPI).round() as i32).clamp(16, 16_384);
    (px(w), px(h))
}

// ---- layout -----------------------------------------------------------------

/// One plot converted to axis coordinates.
struct Trace<'a> {
    points: Vec<(f64, f64)>,
    plot: &'a PlotSpec,
}

fn build_traces<'a>(plots: &'a [PlotSpec], options: &ResolvedOptions) -> (Vec<Trace<'a>>, Axis, Axis) {
    let mut categories: Vec<String> = Vec::new();
    let any_time = plots.iter().any(|p| matches!(p.x(), XSeries::Time(_)));
    let any_text = plots.iter().any(|p| matches!(p.x(), XSeries::Text(_)));

    let traces: Vec<Trace<'a>> = plots
        .iter()
        .map(|plot| {
            let xs: Vec<f64> = match plot.x() {
                XSeries::Numeric(v) => v.clone(),
                XSeries::Time(v) => v.iter().map(time_to_f64).collect(),
                XSeries::Text(v) => v
                    .iter()
                    .map(|s| match categories.iter().position(|c| c == s) {
                        Some(i) => i as f64,
                        None => {
                            categories.push(s.clone());
                            (categories.len() - 1) as f64
                        }
                    })
                    .collect(),
            };
            Trace { points: xs.into_iter().zip(plot.y().iter().copied()).collect(), plot }
        })
        .collect();

    let x_kind = if any_time {
        ScaleKind::Time
    } else if any_text {
        ScaleKind::Category(categories)
    } else {
        ScaleKind::Linear
    };

    let x_auto = data_limits(traces.iter().flat_map(|t| t.points.iter().map(|p| p.0)))
        .map_or((0.0, 1.0), |l| pad_limits(l, AXIS_MARGIN));
    let y_auto = data_limits(traces.iter().flat_map(|t| t.points.iter().map(|p| p.1)))
        .map_or((0.0, 1.0), |l| pad_limits(l, AXIS_MARGIN));
    let x_lim = options.xrange.unwrap_or(x_auto);
    let y_lim = options.yrange.unwrap_or(y_auto);

    let mut x_axis = Axis::new(options.xlabel.clone().unwrap_or_default(), x_lim.0, x_lim.1);
    x_axis.auto = x_auto;
    x_axis.kind = x_kind;
    let mut y_axis = Axis::new(options.ylabel.clone().unwrap_or_default(), y_lim.0, y_lim.1);
    y_axis.auto = y_auto;
    (traces, x_axis, y_axis)
}

/// Maps axis values into the axes box.
#[derive(Clone, Copy)]
struct Frame {
    l: f32,
    t: f32,
    r: f32,
    b: f32,
    x0: f64,
    x1: f64,
    y0: f64,
    y1: f64,
}

impl Frame {
    fn sx(&self, x: f64) -> f32 {
        let span = if (self.x1 - self.x0).abs() < 1e-12 { 1.0 } else { self.x1 - self.x0 };
        self.l + ((x - self.x0) / span) as f32 * (self.r - self.l)
    }
    fn sy(&self, y: f64) -> f32 {
        let span = if (self.y1 - self.y0).abs() < 1e-12 { 1.0 } else { self.y1 - self.y0 };
        self.b - ((y - self.y0) / span) as f32 * (self.b - self.t)
    }
    fn rect(&self) -> skia::Rect {
        skia::Rect::from_ltrb(self.l, self.t, self.r, self.b)
    }
}

fn draw_figure(plots: &[PlotSpec], options: &ResolvedOptions, opts: &RenderOptions) -> Result<skia::Image> {
    let (width, height) = figure_pixels(options);
    let mut surface = skia::surfaces::raster_n32_premul((width, height))
        .ok_or_else(|| anyhow::anyhow!("failed to create {width}x{height} raster surface"))?;
    let canvas = surface.canvas();
    let theme = &opts.theme;
    let text = TextPainter::new();

    let base_pt = options.fontsize.unwrap_or(DEFAULT_FONTSIZE);
    let size = |pt: Option<f64>| pt_to_px(pt.unwrap_or(base_pt));

    let (traces, x_axis, y_axis) = build_traces(plots, options);
    let (l, t, r, b) = opts.insets.plot_rect(width, height);
    let frame = Frame { l, t, r, b, x0: x_axis.min, x1: x_axis.max, y0: y_axis.min, y1: y_axis.max };

    canvas.clear(theme.background);
    let mut face = skia::Paint::default();
    face.set_color(theme.axes_face);
    canvas.draw_rect(frame.rect(), &face);

    let x_ticks = visible(x_axis.ticks(options.xscale), x_axis.min, x_axis.max);
    let y_ticks = visible(y_axis.ticks(options.yscale), y_axis.min, y_axis.max);
    draw_grid(canvas, &frame, &x_ticks, &y_ticks, theme);

    canvas.save();
    canvas.clip_rect(frame.rect(), skia::ClipOp::Intersect, true);
    for (i, trace) in traces.iter().enumerate() {
        draw_trace(canvas, &frame, trace, i, theme);
    }
    canvas.restore();

    draw_axes(canvas, &frame, theme);

    // Tick labels
    let xt = size(options.xtick_fontsize);
    let yt = size(options.ytick_fontsize);
    let mut tick = skia::Paint::default();
    tick.set_color(theme.axis_line);
    tick.set_anti_alias(true);
    tick.set_stroke_width(1.0);
    for &v in &x_ticks {
        let x = frame.sx(v);
        canvas.draw_line((x, b), (x, b + 4.0), &tick);
        text.draw(canvas, &x_axis.format_tick(v), x, b + 6.0 + xt, xt, theme.text, Align::Center);
    }
    for &v in &y_ticks {
        let y = frame.sy(v);
        canvas.draw_line((l - 4.0, y), (l, y), &tick);
        text.draw(canvas, &y_axis.format_tick(v), l - 7.0, y + yt * 0.35, yt, theme.text, Align::Right);
    }

    // Labels & title
    let xl = size(options.xlabel_fontsize);
    let yl = size(options.ylabel_fontsize);
    text.draw(canvas, &x_axis.label, (l + r) * 0.5, b + 10.0 + xt + xl * 1.1, xl, theme.text, Align::Center);
    let widest_y_tick = y_ticks
        .iter()
        .map(|&v| text.measure_width(&y_axis.format_tick(v), yt))
        .fold(0.0f32, f32::max);
    let ylabel_x = (l - 12.0 - widest_y_tick - yl * 0.3).max(yl);
    text.draw_vertical(canvas, &y_axis.label, ylabel_x, (t + b) * 0.5, yl, theme.text);
    if let Some(title) = &options.title {
        let tp = pt_to_px(base_pt * 1.2);
        text.draw(canvas, title, (l + r) * 0.5, t - tp * 0.5, tp, theme.text, Align::Center);
    }

    draw_legend(canvas, &frame, &traces, &text, size(None), theme);

    Ok(surface.image_snapshot())
}

fn visible(ticks: Vec<f64>, lo: f64, hi: f64) -> Vec<f64> {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    let eps = (hi - lo).abs() * 1e-9;
    ticks.into_iter().filter(|v| *v >= lo - eps && *v <= hi + eps).collect()
}

// ---- helpers ----------------------------------------------------------------

fn draw_grid(canvas: &skia::Canvas, frame: &Frame, x_ticks: &[f64], y_ticks: &[f64], theme: &Theme) {
    let mut paint = skia::Paint::default();
    paint.set_color(theme.grid);
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(0.8);
    paint.set_path_effect(skia::PathEffect::dash(&[6.4, 1.6, 1.0, 1.6], 0.0));

    for &v in x_ticks {
        let x = frame.sx(v);
        canvas.draw_line((x, frame.t), (x, frame.b), &paint);
    }
    for &v in y_ticks {
        let y = frame.sy(v);
        canvas.draw_line((frame.l, y), (frame.r, y), &paint);
    }
}

fn draw_axes(canvas: &skia::Canvas, frame: &Frame, theme: &Theme) {
    let mut axis_paint = skia::Paint::default();
    axis_paint.set_color(theme.axis_line);
    axis_paint.set_anti_alias(true);
    axis_paint.set_style(skia::paint::Style::Stroke);
    axis_paint.set_stroke_width(1.0);
    canvas.draw_rect(frame.rect(), &axis_paint);
}

/// Resolved drawing style of one plot.
struct Stroke {
    color: skia::Color,
    line: LineStyle,
    width: f32,
    marker: Option<Marker>,
    marker_px: f32,
}

fn stroke_for(plot: &PlotSpec, index: usize, theme: &Theme) -> Stroke {
    let s = plot.style();
    let color = match s.color.as_deref() {
        Some(c) => parse_color(c).unwrap_or_else(|| {
            tracing::warn!(color = c, "unknown color; using the default cycle");
            theme.cycle(index)
        }),
        None => theme.cycle(index),
    };
    let line = match s.style.as_deref() {
        Some(st) => LineStyle::parse(st).unwrap_or_else(|| {
            tracing::warn!(style = st, "unknown line style; drawing solid");
            LineStyle::Solid
        }),
        None => LineStyle::Solid,
    };
    let marker = s.marker.as_deref().and_then(|m| {
        let parsed = Marker::parse(m);
        if parsed.is_none() && !m.trim().is_empty() && m != "None" {
            tracing::warn!(marker = m, "unknown marker; drawing none");
        }
        parsed
    });
    Stroke {
        color,
        line,
        width: pt_to_px(s.linewidth.unwrap_or(DEFAULT_LINEWIDTH)),
        marker,
        marker_px: pt_to_px(s.markersize.unwrap_or(DEFAULT_MARKERSIZE)),
    }
}

fn line_paint(stroke: &Stroke) -> skia::Paint {
    let mut paint = skia::Paint::default();
    paint.set_anti_alias(true);
    paint.set_style(skia::paint::Style::Stroke);
    paint.set_stroke_width(stroke.width);
    paint.set_color(stroke.color);
    if let Some(pattern) = stroke.line.dash_pattern() {
        let scaled: Vec<f32> = pattern.iter().map(|d| d * stroke.width.max(1.0)).collect();
        paint.set_path_effect(skia::PathEffect::dash(&scaled, 0.0));
    }
    paint
}

fn draw_trace(canvas: &skia::Canvas, frame: &Frame, trace: &Trace<'_>, index: usize, theme: &Theme) {
    let stroke = stroke_for(trace.plot, index, theme);

    if stroke.line != LineStyle::None && trace.points.len() >= 2 {
        let mut path = skia::Path::new();
        let mut pen_down = false;
        for &(x, y) in &trace.points {
            if !(x.is_finite() && y.is_finite()) {
                pen_down = false;
                continue;
            }
            let p = (frame.sx(x), frame.sy(y));
            if pen_down {
                path.line_to(p);
            } else {
                path.move_to(p);
                pen_down = true;
            }
        }
        canvas.draw_path(&path, &line_paint(&stroke));
    }

    if let Some(marker) = stroke.marker {
        for &(x, y) in &trace.points {
            if x.is_finite() && y.is_finite() {
                draw_marker(canvas, marker, (frame.sx(x), frame.sy(y)), stroke.marker_px, stroke.color);
            }
        }
    }
}

fn draw_marker(canvas: &skia::Canvas, marker: Marker, (x, y): (f32, f32), size: f32, color: skia::Color) {
    let h = size * 0.5;
    let mut fill = skia::Paint::default();
    fill.set_anti_alias(true);
    fill.set_color(color);
    let mut line = fill.clone();
    line.set_style(skia::paint::Style::Stroke);
    line.set_stroke_width((size * 0.18).max(1.0));

    let polygon = |pts: &[(f32, f32)]| {
        let mut path = skia::Path::new();
        path.move_to(pts[0]);
        for &p in &pts[1..] {
            path.line_to(p);
        }
        path.close();
        path
    };

    match marker {
        Marker::Point => {
            canvas.draw_circle((x, y), h * 0.5, &fill);
        }
        Marker::Circle => {
            canvas.draw_circle((x, y), h, &fill);
        }
        Marker::Square => {
            canvas.draw_rect(skia::Rect::from_ltrb(x - h, y - h, x + h, y + h), &fill);
        }
        Marker::TriangleUp => {
            canvas.draw_path(&polygon(&[(x, y - h), (x + h, y + h), (x - h, y + h)]), &fill);
        }
        Marker::TriangleDown => {
            canvas.draw_path(&polygon(&[(x, y + h), (x + h, y - h), (x - h, y - h)]), &fill);
        }
        Marker::Diamond => {
            canvas.draw_path(&polygon(&[(x, y - h), (x + h, y), (x, y + h), (x - h, y)]), &fill);
        }
        Marker::Cross => {
            canvas.draw_line((x - h, y - h), (x + h, y + h), &line);
            canvas.draw_line((x - h, y + h), (x + h, y - h), &line);
        }
        Marker::Plus => {
            canvas.draw_line((x - h, y), (x + h, y), &line);
            canvas.draw_line((x, y - h), (x, y + h), &line);
        }
        Marker::Star => {
            let pts: Vec<(f32, f32)> = (0..10)
                .map(|k| {
                    let a = std::f32::consts::PI * (k as f32) / 5.0 - std::f32::consts::FRAC_PI_2;
                    let rad = if k % 2 == 0 { h } else { h * 0.45 };
                    (x + rad * a.cos(), y + rad * a.sin())
                })
                .collect();
            canvas.draw_path(&polygon(&pts), &fill);
        }
    }
}

fn draw_legend(canvas: &skia::Canvas, frame: &Frame, traces: &[Trace<'_>], text: &TextPainter, font_px: f32, theme: &Theme) {
    let entries: Vec<(usize, &str)> = traces
        .iter()
        .enumerate()
        .filter_map(|(i, t)| t.plot.style().legend.as_deref().map(|l| (i, l)))
        .collect();
    if entries.is_empty() {
        return;
    }

    let pad = font_px * 0.5;
    let sample = font_px * 2.0;
    let row = font_px * 1.4;
    let label_w = entries
        .iter()
        .map(|(_, l)| text.measure_width(l, font_px))
        .fold(0.0f32, f32::max);
    let w = pad * 3.0 + sample + label_w;
    let h = pad * 2.0 + row * entries.len() as f32;
    let box_r = frame.r - pad;
    let box_t = frame.t + pad;
    let rect = skia::Rect::from_ltrb(box_r - w, box_t, box_r, box_t + h);

    let mut bg = skia::Paint::default();
    bg.set_color(theme.legend_face);
    canvas.draw_rect(rect, &bg);
    let mut edge = skia::Paint::default();
    edge.set_anti_alias(true);
    edge.set_style(skia::paint::Style::Stroke);
    edge.set_color(theme.grid);
    canvas.draw_rect(rect, &edge);

    for (k, (i, label)) in entries.iter().enumerate() {
        let stroke = stroke_for(traces[*i].plot, *i, theme);
        let cy = box_t + pad + row * (k as f32 + 0.5);
        let x0 = rect.left + pad;
        if stroke.line != LineStyle::None {
            canvas.draw_line((x0, cy), (x0 + sample, cy), &line_paint(&stroke));
        }
        if let Some(marker) = stroke.marker {
            draw_marker(canvas, marker, (x0 + sample * 0.5, cy), stroke.marker_px, stroke.color);
        }
        text.draw(canvas, label, x0 + sample + pad, cy + font_px * 0.35, font_px, theme.text, Align::Left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_formats_by_extension() {
        assert!(matches!(format_for(Path::new("a.png")), Ok(skia::EncodedImageFormat::PNG)));
        assert!(matches!(format_for(Path::new("a.JPG")), Ok(skia::EncodedImageFormat::JPEG)));
        assert!(matches!(format_for(Path::new("plot")), Ok(skia::EncodedImageFormat::PNG)));
        assert!(format_for(Path::new("a.svg")).is_err());
    }

    #[test]
    fn step_ticks_are_laid_out_before_the_range_clamps() {
        let x = XSeries::Numeric((0..=10).map(f64::from).collect());
        let plot = PlotSpec::build(x, (0..=10).map(f64::from).collect(), Default::default()).unwrap();
        let options = ResolvedOptions { xrange: Some((2.5, 20.0)), xscale: Some(2.0), ..ResolvedOptions::default() };
        let plots = [plot];
        let (_, x_axis, _) = build_traces(&plots, &options);
        assert_eq!((x_axis.min, x_axis.max), (2.5, 20.0));
        let ticks = visible(x_axis.ticks(options.xscale), x_axis.min, x_axis.max);
        assert_eq!(ticks, vec![4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn figsize_in_inches() {
        let mut o = ResolvedOptions::default();
        assert_eq!(figure_pixels(&o), (640, 480));
        o.figsize = Some((3.0, 2.0));
        assert_eq!(figure_pixels(&o), (300, 200));
    }
}

// File: crates/plotchain-core/src/theme.rs
// Summary: Light/Dark figure themes plus parsing of per-plot color, line style and marker strings.

use skia_safe as skia;

/// tab10, the default color cycle for plots without a color.
const CYCLE: [(u8, u8, u8); 10] = [
    (0x1f, 0x77, 0xb4),
    (0xff, 0x7f, 0x0e),
    (0x2c, 0xa0, 0x2c),
    (0xd6, 0x27, 0x28),
    (0x94, 0x67, 0xbd),
    (0x8c, 0x56, 0x4b),
    (0xe3, 0x77, 0xc2),
    (0x7f, 0x7f, 0x7f),
    (0xbc, 0xbd, 0x22),
    (0x17, 0xbe, 0xcf),
];

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub name: &'static str,
    pub background: skia::Color,
    pub axes_face: skia::Color,
    pub grid: skia::Color,
    pub axis_line: skia::Color,
    pub text: skia::Color,
    pub legend_face: skia::Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            name: "light",
            background: skia::Color::from_argb(255, 255, 255, 255),
            axes_face: skia::Color::from_argb(255, 255, 255, 255),
            grid: skia::Color::from_argb(128, 176, 176, 176),
            axis_line: skia::Color::from_argb(255, 0, 0, 0),
            text: skia::Color::from_argb(255, 0, 0, 0),
            legend_face: skia::Color::from_argb(204, 255, 255, 255),
        }
    }

    pub fn dark() -> Self {
        Self {
            name: "dark",
            background: skia::Color::from_argb(255, 18, 18, 20),
            axes_face: skia::Color::from_argb(255, 24, 24, 28),
            grid: skia::Color::from_argb(128, 80, 80, 90),
            axis_line: skia::Color::from_argb(255, 180, 180, 190),
            text: skia::Color::from_argb(255, 235, 235, 245),
            legend_face: skia::Color::from_argb(204, 30, 30, 34),
        }
    }

    /// Color for the `i`-th plot when it has none of its own.
    pub fn cycle(&self, i: usize) -> skia::Color {
        let (r, g, b) = CYCLE[i % CYCLE.len()];
        skia::Color::from_rgb(r, g, b)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

/// Return a list of built-in theme presets.
pub fn presets() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark()]
}

/// Find a theme by its `name`, falling back to light.
pub fn find(name: &str) -> Theme {
    presets()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .unwrap_or_default()
}

/// Parse a color: single-letter codes (`b g r c m y k w`), common names,
/// `tab:<name>`, or `#rrggbb` / `#rrggbbaa`.
pub fn parse_color(s: &str) -> Option<skia::Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let rgb = match s.to_ascii_lowercase().as_str() {
        "b" | "blue" => (0, 0, 255),
        "g" | "green" => (0, 128, 0),
        "r" | "red" => (255, 0, 0),
        "c" | "cyan" => (0, 191, 191),
        "m" | "magenta" => (191, 0, 191),
        "y" | "yellow" => (191, 191, 0),
        "k" | "black" => (0, 0, 0),
        "w" | "white" => (255, 255, 255),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "brown" => (165, 42, 42),
        "pink" => (255, 192, 203),
        "gray" | "grey" => (128, 128, 128),
        "olive" => (128, 128, 0),
        "navy" => (0, 0, 128),
        "teal" => (0, 128, 128),
        "tab:blue" => CYCLE[0],
        "tab:orange" => CYCLE[1],
        "tab:green" => CYCLE[2],
        "tab:red" => CYCLE[3],
        "tab:purple" => CYCLE[4],
        "tab:brown" => CYCLE[5],
        "tab:pink" => CYCLE[6],
        "tab:gray" | "tab:grey" => CYCLE[7],
        "tab:olive" => CYCLE[8],
        "tab:cyan" => CYCLE[9],
        _ => return None,
    };
    Some(skia::Color::from_rgb(rgb.0, rgb.1, rgb.2))
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    let byte = |i: usize| hex.get(i..i + 2).and_then(|h| u8::from_str_radix(h, 16).ok());
    match hex.len() {
        6 => Some(skia::Color::from_rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(skia::Color::from_argb(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
        _ => None,
    }
}

/// Stroke pattern of a plot's line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    DashDot,
    Dotted,
    None,
}

impl LineStyle {
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "-" | "solid" => LineStyle::Solid,
            "--" | "dashed" => LineStyle::Dashed,
            "-." | "dashdot" => LineStyle::DashDot,
            ":" | "dotted" => LineStyle::Dotted,
            "" | " " | "none" | "None" => LineStyle::None,
            _ => return None,
        })
    }

    /// On/off intervals in units of line width, or `None` for solid/no line.
    pub fn dash_pattern(&self) -> Option<&'static [f32]> {
        match self {
            LineStyle::Dashed => Some(&[3.7, 1.6]),
            LineStyle::DashDot => Some(&[6.4, 1.6, 1.0, 1.6]),
            LineStyle::Dotted => Some(&[1.0, 1.65]),
            LineStyle::Solid | LineStyle::None => None,
        }
    }
}

/// Marker drawn at each data point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    Point,
    Circle,
    Square,
    TriangleUp,
    TriangleDown,
    Diamond,
    Cross,
    Plus,
    Star,
}

impl Marker {
    /// `None` for an unknown or empty marker string (no marker drawn).
    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "." => Marker::Point,
            "o" => Marker::Circle,
            "s" => Marker::Square,
            "^" => Marker::TriangleUp,
            "v" => Marker::TriangleDown,
            "D" | "d" => Marker::Diamond,
            "x" => Marker::Cross,
            "+" => Marker::Plus,
            "*" => Marker::Star,
            _ => return None,
        })
    }
}

// File: crates/plotchain-core/src/axis.rs
// Summary: Axis model: data limits, margins, range clamps and tick generation (fixed step or "nice").

use chrono::{DateTime, NaiveDateTime};

/// How axis values map back to labels.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleKind {
    Linear,
    /// Values are unix seconds.
    Time,
    /// Values are positions into the category list.
    Category(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Axis {
    pub label: String,
    pub min: f64,
    pub max: f64,
    /// Autoscaled limits before any explicit range; fixed-step ticks start here.
    pub auto: (f64, f64),
    pub kind: ScaleKind,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self { label: label.into(), min, max, auto: (min, max), kind: ScaleKind::Linear }
    }

    /// Every `step` across the autoscaled limits if given, else ~6 nice
    /// values inside the current limits. Callers drop ticks outside
    /// `min..=max`.
    pub fn ticks(&self, step: Option<f64>) -> Vec<f64> {
        match (step, &self.kind) {
            (Some(s), _) => step_ticks(self.auto.0, self.auto.1, s),
            (None, ScaleKind::Category(names)) => (0..names.len())
                .map(|i| i as f64)
                .filter(|v| *v >= self.min && *v <= self.max)
                .collect(),
            (None, _) => nice_ticks(self.min, self.max, 6),
        }
    }

    pub fn format_tick(&self, v: f64) -> String {
        match &self.kind {
            ScaleKind::Linear => format_number(v, (self.max - self.min).abs()),
            ScaleKind::Time => format_time(v, (self.max - self.min).abs()),
            ScaleKind::Category(names) => {
                let i = v.round();
                if (v - i).abs() < 1e-9 && i >= 0.0 && (i as usize) < names.len() {
                    names[i as usize].clone()
                } else {
                    String::new()
                }
            }
        }
    }
}

/// Min/max over finite values, `None` if there are none.
pub fn data_limits(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Widen limits by `margin` of their span on each side; degenerate spans get ±0.5.
pub fn pad_limits((lo, hi): (f64, f64), margin: f64) -> (f64, f64) {
    if (hi - lo).abs() < 1e-12 {
        let d = if lo.abs() > 1e-12 { lo.abs() * 0.05 } else { 0.5 };
        return (lo - d, hi + d);
    }
    let m = (hi - lo) * margin;
    (lo - m, hi + m)
}

/// `round(lo / step) * step`, then every `step` while below `hi`.
pub fn step_ticks(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step.is_finite() && step > 0.0) || !(lo.is_finite() && hi.is_finite()) {
        return Vec::new();
    }
    // a tiny step over a wide range would allocate without bound
    const MAX_TICKS: usize = 1000;
    let start = (lo / step).round() * step;
    (0..MAX_TICKS)
        .map(|i| start + step * i as f64)
        .take_while(|v| *v < hi)
        .collect()
}

/// About `target` ticks on a 1/2/5 × 10ⁿ grid, inside [lo, hi].
pub fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    let span = hi - lo;
    if !(span.is_finite() && span > 0.0) || target == 0 {
        return Vec::new();
    }
    let raw = span / target as f64;
    let mag = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * mag)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * mag);
    let first = (lo / step).ceil() * step;
    let eps = step * 1e-9;
    (0..=target * 2 + 1)
        .map(|i| first + step * i as f64)
        .take_while(|v| *v <= hi + eps)
        .map(|v| if v.abs() < eps { 0.0 } else { v })
        .collect()
}

fn format_number(v: f64, span: f64) -> String {
    if (span > 0.0 && span < 1e-3) || v.abs() >= 1e6 {
        return format!("{v:.3e}");
    }
    let decimals = if span >= 10.0 || span <= 0.0 {
        if v.fract().abs() < 1e-9 { 0 } else { 1 }
    } else {
        (-(span / 10.0).log10().floor()).max(0.0) as usize + 1
    };
    let s = format!("{v:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

fn format_time(v: f64, span: f64) -> String {
    let Some(dt) = DateTime::from_timestamp_millis((v * 1000.0).round() as i64) else {
        return format_number(v, span);
    };
    let naive = dt.naive_utc();
    if span >= 3.0 * 86_400.0 {
        naive.format("%Y-%m-%d").to_string()
    } else if span >= 120.0 {
        naive.format("%m-%d %H:%M").to_string()
    } else {
        naive.format("%H:%M:%S").to_string()
    }
}

/// Unix seconds for plotting a timestamp on a linear axis.
pub fn time_to_f64(t: &NaiveDateTime) -> f64 {
    t.and_utc().timestamp_millis() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_ticks_start_on_rounded_multiple() {
        assert_eq!(step_ticks(0.2, 3.0, 1.0), vec![0.0, 1.0, 2.0]);
        assert_eq!(step_ticks(-4.9, 5.0, 2.5), vec![-5.0, -2.5, 0.0, 2.5]);
        assert!(step_ticks(0.0, 1.0, 0.0).is_empty());
    }

    #[test]
    fn nice_ticks_land_on_round_values() {
        assert_eq!(nice_ticks(0.0, 10.0, 5), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        let t = nice_ticks(-0.3, 0.7, 6);
        assert!(t.iter().all(|v| (*v * 10.0 - (*v * 10.0).round()).abs() < 1e-9));
    }

    #[test]
    fn limits_skip_nan() {
        assert_eq!(data_limits([f64::NAN, 2.0, -1.0]), Some((-1.0, 2.0)));
        assert_eq!(data_limits([f64::NAN]), None);
    }

    #[test]
    fn step_ticks_follow_autoscaled_limits_not_the_range() {
        let mut a = Axis::new("x", 2.5, 20.0);
        a.auto = (-0.5, 10.5);
        assert_eq!(a.ticks(Some(2.0)), vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
        assert_eq!(Axis::new("x", 0.2, 3.0).ticks(Some(1.0)), vec![0.0, 1.0, 2.0]);
    }

    #[test]
    fn tick_labels() {
        let a = Axis::new("x", 0.0, 100.0);
        assert_eq!(a.format_tick(20.0), "20");
        let b = Axis::new("x", 0.0, 1.0);
        assert_eq!(b.format_tick(0.25), "0.25");
    }
}

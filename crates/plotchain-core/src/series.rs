// File: crates/plotchain-core/src/series.rs
// Summary: X-series model (numeric, timestamp, text) with best-effort time coercion and paired sorting.

use chrono::format::{parse, Parsed, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Formats tried, in order, when a text x-series is coerced without an explicit pattern.
const AUTO_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
];

/// Date-only formats tried after [`AUTO_FORMATS`].
const AUTO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d %b %Y", "%b %d %Y"];

/// Values along the x axis. The variant is the series' element type;
/// `Text` is the generic, not-yet-interpreted type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum XSeries {
    Numeric(Vec<f64>),
    Time(Vec<NaiveDateTime>),
    Text(Vec<String>),
}

impl XSeries {
    pub fn len(&self) -> usize {
        match self {
            XSeries::Numeric(v) => v.len(),
            XSeries::Time(v) => v.len(),
            XSeries::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            XSeries::Numeric(_) => "numeric",
            XSeries::Time(_) => "time",
            XSeries::Text(_) => "text",
        }
    }

    /// Coerce to timestamps.
    ///
    /// With a pattern every value is parsed with it (numbers via their
    /// decimal text). Without one only text series are tried, against a
    /// fixed list of common layouts. If any value fails the series is
    /// returned unchanged.
    pub fn coerce_time(self, time_format: Option<&str>) -> XSeries {
        if self.is_empty() || matches!(self, XSeries::Time(_)) {
            return self;
        }
        let parsed = match (&self, time_format) {
            (XSeries::Time(_), _) => None,
            (XSeries::Text(v), Some(fmt)) => parse_all(v.iter().map(String::as_str), |s| parse_with(s, fmt)),
            (XSeries::Numeric(v), Some(fmt)) => {
                let text: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                parse_all(text.iter().map(String::as_str), |s| parse_with(s, fmt))
            }
            (XSeries::Text(v), None) => parse_all(v.iter().map(String::as_str), parse_auto),
            (XSeries::Numeric(_), None) => None,
        };
        match parsed {
            Some(times) => XSeries::Time(times),
            None => {
                match time_format {
                    Some(fmt) => tracing::warn!(format = fmt, kind = self.kind(), "x values do not match time format; kept as given"),
                    None if matches!(self, XSeries::Text(_)) => {
                        tracing::debug!("text x values are not timestamps; kept as given")
                    }
                    None => {}
                }
                self
            }
        }
    }

    /// Stable ascending order of the x values, as indices.
    pub fn sort_order(&self) -> Vec<usize> {
        let mut idx: Vec<usize> = (0..self.len()).collect();
        match self {
            XSeries::Numeric(v) => idx.sort_by(|&a, &b| v[a].total_cmp(&v[b])),
            XSeries::Time(v) => idx.sort_by(|&a, &b| v[a].cmp(&v[b])),
            XSeries::Text(v) => idx.sort_by(|&a, &b| v[a].cmp(&v[b])),
        }
        idx
    }

    /// Reorder by `order` (a permutation from [`XSeries::sort_order`]).
    pub fn permute(&self, order: &[usize]) -> XSeries {
        match self {
            XSeries::Numeric(v) => XSeries::Numeric(order.iter().map(|&i| v[i]).collect()),
            XSeries::Time(v) => XSeries::Time(order.iter().map(|&i| v[i]).collect()),
            XSeries::Text(v) => XSeries::Text(order.iter().map(|&i| v[i].clone()).collect()),
        }
    }
}

/// Time coercion over (x, y) pairs. Blank text cells are dropped, with
/// their y values, when every other cell parses as a timestamp.
pub fn coerce_time_pairs(x: XSeries, y: Vec<f64>, time_format: Option<&str>) -> (XSeries, Vec<f64>) {
    let XSeries::Text(cells) = &x else {
        return (x.coerce_time(time_format), y);
    };
    let blanks = cells.iter().filter(|c| c.trim().is_empty()).count();
    if blanks == 0 || blanks == cells.len() {
        return (x.coerce_time(time_format), y);
    }
    let (kept, kept_y): (Vec<String>, Vec<f64>) = cells
        .iter()
        .zip(&y)
        .filter(|(c, _)| !c.trim().is_empty())
        .map(|(c, v)| (c.clone(), *v))
        .unzip();
    match XSeries::Text(kept).coerce_time(time_format) {
        XSeries::Time(t) => {
            tracing::debug!(skipped = blanks, "blank x cells dropped from time series");
            (XSeries::Time(t), kept_y)
        }
        _ => (x, y),
    }
}

/// Sort x and y together by ascending x, keeping equal keys in input order.
pub fn sort_pairs(x: XSeries, y: Vec<f64>) -> (XSeries, Vec<f64>) {
    let order = x.sort_order();
    let y = order.iter().map(|&i| y[i]).collect();
    (x.permute(&order), y)
}

fn parse_all<'a, F>(values: impl Iterator<Item = &'a str>, parse: F) -> Option<Vec<NaiveDateTime>>
where
    F: Fn(&str) -> Option<NaiveDateTime>,
{
    values.map(|s| parse(s.trim())).collect()
}

fn parse_with(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, fmt).ok().or_else(|| parse_partial(s, fmt))
}

/// Patterns that leave fields out (`%Y-%m-%d`, `%H:%M:%S`, `%Y-%m`): a
/// missing date is 1900-01-01, a missing month or day is 1, missing time
/// fields are zero.
fn parse_partial(s: &str, fmt: &str) -> Option<NaiveDateTime> {
    let mut parsed = Parsed::new();
    parse(&mut parsed, s, StrftimeItems::new(fmt)).ok()?;
    // setters fail on fields the input already fixed; those keep their value
    if parsed.to_naive_date().is_err() {
        let _ = parsed.set_year(1900);
        let _ = parsed.set_month(1);
        let _ = parsed.set_day(1);
    }
    let date = parsed.to_naive_date().ok()?;
    let _ = parsed.set_minute(0);
    let time = parsed.to_naive_time().unwrap_or(NaiveTime::MIN);
    Some(date.and_time(time))
}

fn parse_auto(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    AUTO_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            AUTO_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

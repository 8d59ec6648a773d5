// File: crates/plotchain-core/src/options.rs
// Summary: Global option set with per-field explicit flags, the stage merge rule, and flag stripping.

use serde::{Deserialize, Serialize};

/// One global option as carried between stages.
///
/// `Default` marks a value a stage supplied without the user asking for it;
/// `Explicit` marks a value given on the command line.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum Setting<T> {
    #[default]
    Unset,
    Default(T),
    Explicit(T),
}

impl<T> Setting<T> {
    /// Wrap a value that may or may not have been given by the user.
    pub fn from_parts(value: Option<T>, explicit: bool) -> Self {
        match (value, explicit) {
            (None, _) => Setting::Unset,
            (Some(v), true) => Setting::Explicit(v),
            (Some(v), false) => Setting::Default(v),
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Setting::Unset)
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, Setting::Explicit(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Setting::Unset => None,
            Setting::Default(v) | Setting::Explicit(v) => Some(v),
        }
    }

    /// Drop the explicit flag, keeping only the value.
    pub fn into_value(self) -> Option<T> {
        match self {
            Setting::Unset => None,
            Setting::Default(v) | Setting::Explicit(v) => Some(v),
        }
    }

    /// Merge `incoming` on top of `self`.
    ///
    /// An unset or defaulted current value takes whatever arrives. An
    /// explicit current value only yields to another explicit value. An
    /// absent incoming value never clears anything.
    pub fn merge(self, incoming: Setting<T>) -> Setting<T> {
        match (self, incoming) {
            (current, Setting::Unset) => current,
            (Setting::Unset, incoming) | (Setting::Default(_), incoming) => incoming,
            (Setting::Explicit(_), Setting::Explicit(v)) => Setting::Explicit(v),
            (current @ Setting::Explicit(_), Setting::Default(_)) => current,
        }
    }
}

/// Figure-wide options shared by every plot in a chain, still carrying flags.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub xlabel: Setting<String>,
    pub ylabel: Setting<String>,
    pub title: Setting<String>,
    pub xscale: Setting<f64>,
    pub yscale: Setting<f64>,
    pub xrange: Setting<(f64, f64)>,
    pub yrange: Setting<(f64, f64)>,
    pub figsize: Setting<(f64, f64)>,
    pub fontsize: Setting<f64>,
    pub xtick_fontsize: Setting<f64>,
    pub ytick_fontsize: Setting<f64>,
    pub xlabel_fontsize: Setting<f64>,
    pub ylabel_fontsize: Setting<f64>,
}

/// Option names as they appear in the chain envelope.
pub const OPTION_NAMES: [&str; 13] = [
    "xlabel",
    "ylabel",
    "title",
    "xscale",
    "yscale",
    "xrange",
    "yrange",
    "figsize",
    "fontsize",
    "xtick_fontsize",
    "ytick_fontsize",
    "xlabel_fontsize",
    "ylabel_fontsize",
];

impl GlobalOptions {
    /// Every field unset; the state a fresh process starts from.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Field-wise [`Setting::merge`] of `incoming` onto `self`.
    pub fn merge(self, incoming: GlobalOptions) -> GlobalOptions {
        GlobalOptions {
            xlabel: self.xlabel.merge(incoming.xlabel),
            ylabel: self.ylabel.merge(incoming.ylabel),
            title: self.title.merge(incoming.title),
            xscale: self.xscale.merge(incoming.xscale),
            yscale: self.yscale.merge(incoming.yscale),
            xrange: self.xrange.merge(incoming.xrange),
            yrange: self.yrange.merge(incoming.yrange),
            figsize: self.figsize.merge(incoming.figsize),
            fontsize: self.fontsize.merge(incoming.fontsize),
            xtick_fontsize: self.xtick_fontsize.merge(incoming.xtick_fontsize),
            ytick_fontsize: self.ytick_fontsize.merge(incoming.ytick_fontsize),
            xlabel_fontsize: self.xlabel_fontsize.merge(incoming.xlabel_fontsize),
            ylabel_fontsize: self.ylabel_fontsize.merge(incoming.ylabel_fontsize),
        }
    }

    /// Strip the explicit flags, producing the render configuration.
    pub fn resolve(self) -> ResolvedOptions {
        ResolvedOptions {
            xlabel: self.xlabel.into_value(),
            ylabel: self.ylabel.into_value(),
            title: self.title.into_value(),
            xscale: self.xscale.into_value(),
            yscale: self.yscale.into_value(),
            xrange: self.xrange.into_value(),
            yrange: self.yrange.into_value(),
            figsize: self.figsize.into_value(),
            fontsize: self.fontsize.into_value(),
            xtick_fontsize: self.xtick_fontsize.into_value(),
            ytick_fontsize: self.ytick_fontsize.into_value(),
            xlabel_fontsize: self.xlabel_fontsize.into_value(),
            ylabel_fontsize: self.ylabel_fontsize.into_value(),
        }
    }
}

/// Options with flags removed. Immutable input to the renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedOptions {
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    pub title: Option<String>,
    pub xscale: Option<f64>,
    pub yscale: Option<f64>,
    pub xrange: Option<(f64, f64)>,
    pub yrange: Option<(f64, f64)>,
    pub figsize: Option<(f64, f64)>,
    pub fontsize: Option<f64>,
    pub xtick_fontsize: Option<f64>,
    pub ytick_fontsize: Option<f64>,
    pub xlabel_fontsize: Option<f64>,
    pub ylabel_fontsize: Option<f64>,
}

/// Explicit option context for one stage: init, merge, finalize.
///
/// Replaces process-wide mutable option state. A stage creates one with
/// [`OptionContext::new`], merges the upstream set and its own set into it,
/// then either reads [`OptionContext::options`] for forwarding or consumes
/// it with [`OptionContext::finalize`] for rendering.
#[derive(Clone, Debug, Default)]
pub struct OptionContext {
    options: GlobalOptions,
    merges: usize,
}

impl OptionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, incoming: GlobalOptions) {
        let current = std::mem::take(&mut self.options);
        self.options = current.merge(incoming);
        self.merges += 1;
        tracing::debug!(merges = self.merges, "merged global options");
    }

    pub fn options(&self) -> &GlobalOptions {
        &self.options
    }

    pub fn finalize(self) -> ResolvedOptions {
        self.options.resolve()
    }
}

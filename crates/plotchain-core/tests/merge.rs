// File: crates/plotchain-core/tests/merge.rs
// Purpose: Global option precedence across stages (defaults, explicit overrides, absent values).

use plotchain_core::{GlobalOptions, OptionContext, Setting};

#[test]
fn explicit_replaces_carried_default() {
    assert_eq!(Setting::Default(5.0).merge(Setting::Explicit(7.0)), Setting::Explicit(7.0));
}

#[test]
fn later_explicit_wins_over_earlier_explicit() {
    assert_eq!(Setting::Explicit(5.0).merge(Setting::Explicit(7.0)), Setting::Explicit(7.0));
}

#[test]
fn absent_incoming_keeps_current() {
    assert_eq!(Setting::Explicit(5.0).merge(Setting::Unset), Setting::Explicit(5.0));
    assert_eq!(Setting::Default(5.0).merge(Setting::Unset), Setting::Default(5.0));
}

#[test]
fn unset_current_adopts_anything() {
    assert_eq!(Setting::Unset.merge(Setting::Default(1.0)), Setting::Default(1.0));
    assert_eq!(Setting::Unset.merge(Setting::Explicit(1.0)), Setting::Explicit(1.0));
}

#[test]
fn merging_the_same_explicit_value_twice_is_stable() {
    let once = Setting::Default(1.0).merge(Setting::Explicit(9.0));
    let twice = once.clone().merge(Setting::Explicit(9.0));
    assert_eq!(once, twice);
}

#[test]
fn fields_merge_independently() {
    let current = GlobalOptions {
        title: Setting::Explicit("head".into()),
        figsize: Setting::Default((6.4, 4.8)),
        xscale: Setting::Explicit(1.0),
        ..GlobalOptions::default()
    };
    let incoming = GlobalOptions {
        title: Setting::Default("tail".into()),
        figsize: Setting::Default((10.0, 5.0)),
        ylabel: Setting::Explicit("volts".into()),
        ..GlobalOptions::default()
    };
    let merged = current.merge(incoming);
    assert_eq!(merged.title, Setting::Explicit("head".into()));
    assert_eq!(merged.figsize, Setting::Default((10.0, 5.0)));
    assert_eq!(merged.xscale, Setting::Explicit(1.0));
    assert_eq!(merged.ylabel, Setting::Explicit("volts".into()));
    assert!(merged.xlabel.is_unset());
}

#[test]
fn context_lifecycle_strips_flags_on_finalize() {
    let upstream = GlobalOptions {
        title: Setting::Explicit("from stage 1".into()),
        fontsize: Setting::Default(10.0),
        ..GlobalOptions::default()
    };
    let stage = GlobalOptions {
        fontsize: Setting::Explicit(14.0),
        title: Setting::Unset,
        yrange: Setting::Explicit((0.0, 1.0)),
        ..GlobalOptions::default()
    };

    let mut ctx = OptionContext::new();
    assert!(ctx.options().is_empty());
    ctx.merge(upstream);
    ctx.merge(stage);
    assert_eq!(ctx.options().fontsize, Setting::Explicit(14.0));

    let resolved = ctx.finalize();
    assert_eq!(resolved.title.as_deref(), Some("from stage 1"));
    assert_eq!(resolved.fontsize, Some(14.0));
    assert_eq!(resolved.yrange, Some((0.0, 1.0)));
    assert_eq!(resolved.xlabel, None);
}

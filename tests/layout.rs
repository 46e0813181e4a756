mod common;

use fpfn_chart::layout::{self, BarOutline, ChartLayout, ChartOptions, LegendGlyph};
use fpfn_chart::noise::{GraphStyle, InjectionKind};

fn line_opts() -> ChartOptions {
    ChartOptions {
        style: GraphStyle::Line,
        kind: InjectionKind::Fn,
        injection_step: 12,
        crop_limit: Some(150.0),
    }
}

#[test]
fn ticks_label_entry_and_exit_phases() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    assert_eq!(layout.ticks.len(), 10);
    assert_eq!(layout.ticks[0].label, "10-entry");
    assert_eq!(layout.ticks[1].label, "10-exit");
    assert_eq!(layout.ticks[9].label, "14-exit");
    assert!(common::approx(layout.ticks[9].x, 9.0));
}

#[test]
fn dotted_segments_bridge_consecutive_turns() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    let solid = layout.segments.iter().filter(|s| !s.dotted).count();
    let dotted: Vec<_> = layout.segments.iter().filter(|s| s.dotted).collect();
    assert_eq!(solid, 20);
    assert_eq!(dotted.len(), 16);

    let bridge = dotted[0];
    assert_eq!(bridge.from, (1.0, 0.82));
    assert_eq!(bridge.to, (2.0, 0.81));
}

#[test]
fn bars_share_a_fixed_group_width() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    assert_eq!(layout.bars.len(), 10);

    let first = &layout.bars[0];
    let second = &layout.bars[1];
    assert!(common::approx(first.width, 0.35));
    assert!(common::approx(first.x, 0.325));
    assert!(common::approx(second.x, 0.675));
    assert!(common::approx(second.right() - first.left(), 0.7));
}

#[test]
fn bar_legend_labels_are_deduplicated() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    let labelled: Vec<_> = layout
        .bars
        .iter()
        .filter_map(|b| b.legend_label.as_deref())
        .collect();
    assert_eq!(labelled, vec!["Generated", "Removed"]);
    assert!(layout.bars[2].legend_label.is_none());
}

#[test]
fn tall_bars_are_torn_at_the_crop_limit() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    assert_eq!(layout.truncated_bars(), 1);
    assert_eq!(layout.count_range, 0.0..150.0);

    let torn = &layout.bars[3];
    assert!(common::approx(torn.value, 200.0));
    match &torn.outline {
        BarOutline::Truncated(verts) => {
            assert_eq!(verts.len(), 15);
            assert_eq!(verts[0], (torn.left(), 0.0));
            assert!(common::approx(verts[1].1, 147.0));
            assert_eq!(verts[14], (torn.right(), 0.0));
            let peak = verts.iter().map(|v| v.1).fold(0.0, f64::max);
            assert!(common::approx(peak, 150.0));
        }
        other => panic!("expected a torn bar, got {:?}", other),
    }

    let label = torn.value_label.as_ref().unwrap();
    assert_eq!(label.text, "200");
    assert!(common::approx(label.y, 152.0));

    let short = layout.bars[0].value_label.as_ref().unwrap();
    assert_eq!(short.text, "40");
    assert!(common::approx(short.y, 42.0));
}

#[test]
fn uncropped_bars_autoscale_without_labels() {
    let opts = ChartOptions {
        crop_limit: ChartOptions::crop(false, 150),
        ..line_opts()
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    assert_eq!(layout.truncated_bars(), 0);
    assert!(layout.bars.iter().all(|b| b.value_label.is_none()));
    assert!(common::approx(layout.count_range.end, 210.0));
    assert_eq!(ChartOptions::crop(true, 0), None);
}

#[test]
fn marker_and_residual_start_at_injection_step() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    assert!(common::approx(layout.marker.x, 4.0));
    assert_eq!(layout.marker.label, "Removal");

    let curve = layout.residual.as_ref().unwrap();
    assert_eq!(curve.points.first(), Some(&(4.0, 0.0)));
    assert_eq!(curve.points.len(), 6);
    assert!(common::approx(curve.range.end, 42.0));

    let projected = curve.project(&(0.0..1.0));
    assert!(common::approx(projected[1].1, 40.0 / 42.0));
}

#[test]
fn marker_outside_the_data_widens_the_x_range() {
    let opts = ChartOptions {
        injection_step: 30,
        ..line_opts()
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    assert!(common::approx(layout.marker.x, 40.0));
    assert!(layout.x_range.end > 40.0);
    // nothing left of the marker once the data ends before it
    assert!(layout.residual.is_none());
}

#[test]
fn legend_puts_marker_and_residual_last() {
    let layout = ChartLayout::build(&common::fn_log(), &line_opts());
    let labels: Vec<_> = layout.legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Recall",
            "Precision",
            "F1",
            "Accuracy",
            "Generated",
            "Removed",
            "Removal",
            "Removed FN Count"
        ]
    );
    assert_eq!(layout.legend[6].glyph, LegendGlyph::Marker);
    assert_eq!(layout.legend[7].glyph, LegendGlyph::Residual);
}

#[test]
fn bar_style_legend_follows_first_appearance() {
    let opts = ChartOptions {
        style: GraphStyle::Bar,
        ..line_opts()
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    assert!(layout.residual.is_none());
    assert_eq!(layout.bars.len(), 8);

    let labels: Vec<_> = layout.legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Recall",
            "Precision",
            "F1",
            "Accuracy",
            "FN Removed",
            "Forced Removed",
            "Recovered Delta",
            "Recovered Total",
            "Removal"
        ]
    );

    let lone = &layout.bars[0];
    assert!(common::approx(lone.width, 0.7));
    assert!(common::approx(lone.x, 2.5));
}

#[test]
fn fp_runs_label_injection() {
    let opts = ChartOptions {
        style: GraphStyle::Line,
        kind: InjectionKind::Fp,
        injection_step: 1,
        crop_limit: Some(150.0),
    };
    let layout = ChartLayout::build(&common::fp_log(), &opts);
    assert!(common::approx(layout.marker.x, 2.0));
    let last = layout.legend.last().unwrap();
    assert_eq!(last.label, "Injected FP Count");
}

#[test]
fn helpers_split_and_tick() {
    assert_eq!(layout::capitalize_first("f1"), "F1");
    assert_eq!(layout::capitalize_first(""), "");

    let pieces = layout::dotted_pieces((0.0, 0.0), (1.0, 2.0), 5);
    assert_eq!(pieces.len(), 3);
    assert_eq!(pieces[0], [(0.0, 0.0), (0.2, 0.4)]);

    assert_eq!(layout::nice_ticks(42.0, 5), vec![0.0, 10.0, 20.0, 30.0, 40.0]);
    assert_eq!(layout::nice_ticks(0.0, 5), vec![0.0]);
    assert_eq!(layout::nice_ticks(f64::INFINITY, 5), vec![0.0]);
    assert_eq!(layout::nice_ticks(f64::NAN, 5), vec![0.0]);
}

#[test]
fn extreme_injection_step_keeps_marker_finite() {
    let opts = ChartOptions {
        injection_step: i64::MAX,
        ..line_opts()
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    assert!(layout.marker.x.is_finite());
    assert!(layout.marker.x > 1e18);
    assert!(layout.residual.is_none());

    let opts = ChartOptions {
        injection_step: i64::MIN,
        ..line_opts()
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    assert!(layout.marker.x < -1e18);
    assert!(layout.x_range.start <= layout.marker.x);
}

#[test]
fn huge_counters_keep_ranges_finite() {
    let csv = "turn,entry_recall,entry_precision,entry_f1,entry_accuracy,exit_recall,exit_precision,exit_f1,exit_accuracy,generated,removed,fn_forced_removed,fn_recovered_delta\n\
               12,0.5,0.5,0.5,0.5,0.5,0.5,0.5,0.5,1e308,0,1e308,0\n\
               13,0.5,0.5,0.5,0.5,0.5,0.5,0.5,0.5,0,0,1e308,0\n";
    let log = fpfn_chart::perf::parse(csv.as_bytes()).unwrap();

    let uncropped = ChartOptions {
        crop_limit: None,
        ..line_opts()
    };
    let layout = ChartLayout::build(&log, &uncropped);
    assert!(layout.count_range.end.is_finite());
    let curve = layout.residual.as_ref().unwrap();
    assert!(curve.range.end.is_finite());
    assert!(curve.points.iter().all(|p| p.1.is_finite()));

    let cropped = ChartLayout::build(&log, &line_opts());
    let label = cropped.bars[0].value_label.as_ref().unwrap();
    assert!(label.text.starts_with("1000000000"));
    assert_eq!(label.text.len(), 309);
    assert_eq!(cropped.truncated_bars(), 1);
}

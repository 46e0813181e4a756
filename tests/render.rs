mod common;

use fpfn_chart::layout::{ChartLayout, ChartOptions};
use fpfn_chart::noise::{GraphStyle, InjectionKind};
use fpfn_chart::render;
use plotters::prelude::*;

fn render_svg(layout: &ChartLayout, caption: Option<&str>) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (1400, 600)).into_drawing_area();
        render::draw_chart(&root, layout, caption)?;
        root.present()?;
    }
    Ok(svg)
}

#[test]
fn line_chart_draws_all_three_axes() -> anyhow::Result<()> {
    let opts = ChartOptions {
        style: GraphStyle::Line,
        kind: InjectionKind::Fn,
        injection_step: 12,
        crop_limit: Some(150.0),
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    let svg = render_svg(&layout, Some("Kitsune"))?;

    assert!(svg.contains("<svg"));
    for needle in [
        "Turn Phase",
        "Metric Value",
        "Generated/Removed Count",
        "Removed FN Count",
        "12-entry",
        "14-exit",
        "Recall",
        "Removal",
        "200",
        "Kitsune",
    ] {
        assert!(svg.contains(needle), "missing {needle:?} in rendered chart");
    }
    Ok(())
}

#[test]
fn bar_chart_hides_residual_axis() -> anyhow::Result<()> {
    let opts = ChartOptions {
        style: GraphStyle::Bar,
        kind: InjectionKind::Fn,
        injection_step: 12,
        crop_limit: None,
    };
    let layout = ChartLayout::build(&common::fn_log(), &opts);
    let svg = render_svg(&layout, None)?;

    assert!(svg.contains("Forced Removed"));
    assert!(!svg.contains("Removed FN Count"));
    Ok(())
}

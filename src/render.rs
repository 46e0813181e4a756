//! Drawing of a [`ChartLayout`] with `plotters`.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::debug;

use crate::layout::{self, BarOutline, ChartLayout, LegendEntry, LegendGlyph, ResidualCurve};
use crate::output::ImageFormat;
use crate::palette;

/// Share of the canvas width given to the plot; the legend gets the rest.
const PLOT_FRACTION: f64 = 0.75;
const MARGIN: i32 = 15;
const X_LABEL_AREA: i32 = 100;
const Y_LABEL_AREA: i32 = 60;
const COUNT_LABEL_AREA: i32 = 60;
const RESIDUAL_AXIS_AREA: i32 = 70;
const LEGEND_ROW: i32 = 22;
const DOT_PIECES: usize = 9;
const MARKER_DOT_PIECES: usize = 61;

const FONT: &str = "sans-serif";

pub fn render_file(
    path: &Path,
    format: ImageFormat,
    size: (u32, u32),
    layout: &ChartLayout,
    caption: Option<&str>,
) -> Result<()> {
    debug!(path = %path.display(), ?format, width = size.0, height = size.1, "rendering chart");
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(&root, layout, caption)?;
            root.present()
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        ImageFormat::Png => render_png(path, size, layout, caption)?,
    }
    Ok(())
}

#[cfg(feature = "png")]
fn render_png(path: &Path, size: (u32, u32), layout: &ChartLayout, caption: Option<&str>) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_chart(&root, layout, caption)?;
    root.present()
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(not(feature = "png"))]
fn render_png(_path: &Path, _size: (u32, u32), _layout: &ChartLayout, _caption: Option<&str>) -> Result<()> {
    anyhow::bail!("PNG output needs the `png` feature; rebuild with `--features png` or use `--format svg`")
}

/// Draws the whole composite chart onto `root`.
///
/// The metric lines, the injection marker and the residual curve share the
/// primary coordinate; the residual curve is projected onto it and gets its
/// own hand-drawn axis to the right of the count axis. Noise bars use the
/// secondary coordinate.
pub fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, layout: &ChartLayout, caption: Option<&str>) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let (width, _) = root.dim_in_pixel();
    let split = (width as f64 * PLOT_FRACTION) as i32;
    let (plot_area, legend_area) = root.split_horizontally(split);

    let mut builder = ChartBuilder::on(&plot_area);
    builder
        .margin(MARGIN)
        .margin_right(MARGIN + RESIDUAL_AXIS_AREA)
        .x_label_area_size(X_LABEL_AREA)
        .y_label_area_size(Y_LABEL_AREA)
        .right_y_label_area_size(COUNT_LABEL_AREA);
    if let Some(caption) = caption {
        builder.caption(caption, (FONT, 22));
    }
    let mut chart = builder
        .build_cartesian_2d(layout.x_range.clone(), layout.metric_range.clone())?
        .set_secondary_coord(layout.x_range.clone(), layout.count_range.clone());

    let grid = BLACK.mix(palette::GRID_ALPHA * 0.5);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .x_label_formatter(&|_: &f64| String::new())
        .y_labels(8)
        .bold_line_style(grid)
        .light_line_style(WHITE.mix(0.0))
        .y_desc(layout::METRIC_DESC)
        .axis_desc_style((FONT, 15))
        .label_style((FONT, 12))
        .y_label_formatter(&|v: &f64| format!("{:.2}", v))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc(layout::COUNT_DESC)
        .axis_desc_style((FONT, 15))
        .label_style((FONT, 12))
        .y_label_formatter(&|v: &f64| format!("{:.0}", v))
        .draw()?;

    let (y_lo, y_hi) = (layout.metric_range.start, layout.metric_range.end);

    // x grid sits on the phase ticks rather than on round numbers
    chart.draw_series(
        layout
            .ticks
            .iter()
            .map(|t| PathElement::new(vec![(t.x, y_lo), (t.x, y_hi)], grid)),
    )?;

    for seg in &layout.segments {
        let color = palette::metric_color(seg.metric);
        if seg.dotted {
            chart.draw_series(
                layout::dotted_pieces(seg.from, seg.to, DOT_PIECES)
                    .into_iter()
                    .map(|[a, b]| PathElement::new(vec![a, b], color.stroke_width(2))),
            )?;
        } else {
            chart.draw_series(LineSeries::new([seg.from, seg.to], color.stroke_width(2)))?;
        }
        chart.draw_series([seg.from, seg.to].into_iter().map(|p| Circle::new(p, 4, color.filled())))?;
    }

    chart.draw_series(
        layout::dotted_pieces((layout.marker.x, y_lo), (layout.marker.x, y_hi), MARKER_DOT_PIECES)
            .into_iter()
            .map(|[a, b]| PathElement::new(vec![a, b], palette::RED.stroke_width(2))),
    )?;

    let value_style = (FONT, 11)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for bar in &layout.bars {
        let fill = bar.color.mix(palette::BAR_ALPHA).filled();
        match &bar.outline {
            BarOutline::Plain { top } => {
                chart.draw_secondary_series(std::iter::once(Rectangle::new(
                    [(bar.left(), 0.0), (bar.right(), *top)],
                    fill,
                )))?;
            }
            BarOutline::Truncated(verts) => {
                chart.draw_secondary_series(std::iter::once(Polygon::new(verts.clone(), fill)))?;
            }
        }
        if let Some(label) = &bar.value_label {
            chart.draw_secondary_series(std::iter::once(Text::new(
                label.text.clone(),
                (label.x, label.y),
                value_style.clone(),
            )))?;
        }
    }

    if let Some(curve) = &layout.residual {
        let projected = curve.project(&layout.metric_range);
        chart.draw_series(
            AreaSeries::new(projected, y_lo, palette::RED.mix(palette::RESIDUAL_FILL_ALPHA))
                .border_style(palette::RED.mix(palette::RESIDUAL_LINE_ALPHA).stroke_width(2)),
        )?;
    }

    let (left_px, top_px) = chart.backend_coord(&(layout.x_range.start, y_hi));
    let (right_px, bottom_px) = chart.backend_coord(&(layout.x_range.end, y_lo));

    root.draw(&PathElement::new(vec![(left_px, bottom_px), (right_px, bottom_px)], BLACK))?;
    let tick_style = (FONT, 12)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for tick in &layout.ticks {
        let (px, _) = chart.backend_coord(&(tick.x, y_lo));
        root.draw(&PathElement::new(vec![(px, bottom_px), (px, bottom_px + 5)], BLACK))?;
        root.draw(&Text::new(tick.label.clone(), (px, bottom_px + 8), tick_style.clone()))?;
    }
    let x_desc_style = (FONT, 15)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    root.draw(&Text::new(
        layout::X_DESC,
        ((left_px + right_px) / 2, bottom_px + X_LABEL_AREA - 4),
        x_desc_style,
    ))?;

    if let Some(curve) = &layout.residual {
        let axis_x = right_px + COUNT_LABEL_AREA + 10;
        draw_residual_axis(root, curve, axis_x, top_px, bottom_px)?;
    }

    draw_legend(&legend_area, &layout.legend)?;
    Ok(())
}

fn draw_residual_axis<DB>(
    root: &DrawingArea<DB, Shift>,
    curve: &ResidualCurve,
    axis_x: i32,
    top: i32,
    bottom: i32,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let color = palette::RED;
    root.draw(&PathElement::new(vec![(axis_x, top), (axis_x, bottom)], color))?;

    let label_style = (FONT, 12)
        .into_font()
        .color(&color)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let span = curve.range.end - curve.range.start;
    for tick in layout::nice_ticks(curve.range.end, 5) {
        let y = bottom - ((tick - curve.range.start) / span * (bottom - top) as f64).round() as i32;
        root.draw(&PathElement::new(vec![(axis_x, y), (axis_x + 5, y)], color))?;
        root.draw(&Text::new(format_tick(tick), (axis_x + 8, y), label_style.clone()))?;
    }

    let desc_style = (FONT, 15)
        .into_font()
        .transform(FontTransform::Rotate90)
        .color(&color)
        .pos(Pos::new(HPos::Center, VPos::Center));
    root.draw(&Text::new(
        curve.label.clone(),
        (axis_x + RESIDUAL_AXIS_AREA - 15, (top + bottom) / 2),
        desc_style,
    ))?;
    Ok(())
}

fn draw_legend<DB>(area: &DrawingArea<DB, Shift>, entries: &[LegendEntry]) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    if entries.is_empty() {
        return Ok(());
    }
    let (width, _) = area.dim_in_pixel();
    let x0 = 15;
    let top = MARGIN + 10;
    let bottom = top + entries.len() as i32 * LEGEND_ROW + 8;
    area.draw(&Rectangle::new(
        [(x0 - 8, top - 8), (width as i32 - 10, bottom)],
        BLACK.mix(0.3),
    ))?;

    let text_style = (FONT, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, entry) in entries.iter().enumerate() {
        let y = top + 6 + i as i32 * LEGEND_ROW;
        draw_glyph(area, entry.glyph, x0, y)?;
        area.draw(&Text::new(entry.label.clone(), (x0 + 40, y), text_style.clone()))?;
    }
    Ok(())
}

fn draw_glyph<DB>(area: &DrawingArea<DB, Shift>, glyph: LegendGlyph, x: i32, y: i32) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    match glyph {
        LegendGlyph::MetricLine(metric) => {
            let color = palette::metric_color(metric);
            area.draw(&PathElement::new(vec![(x, y), (x + 30, y)], color.stroke_width(2)))?;
            area.draw(&Circle::new((x + 15, y), 4, color.filled()))?;
        }
        LegendGlyph::Patch(color) => {
            area.draw(&Rectangle::new(
                [(x + 5, y - 6), (x + 25, y + 6)],
                color.mix(palette::BAR_ALPHA).filled(),
            ))?;
        }
        LegendGlyph::Marker => {
            for [a, b] in layout::dotted_pieces((x as f64, y as f64), ((x + 30) as f64, y as f64), 7) {
                area.draw(&PathElement::new(
                    vec![(a.0 as i32, a.1 as i32), (b.0 as i32, b.1 as i32)],
                    palette::RED.stroke_width(2),
                ))?;
            }
        }
        LegendGlyph::Residual => {
            area.draw(&Rectangle::new(
                [(x, y), (x + 30, y + 6)],
                palette::RED.mix(palette::RESIDUAL_FILL_ALPHA).filled(),
            ))?;
            area.draw(&PathElement::new(
                vec![(x, y), (x + 30, y)],
                palette::RED.mix(palette::RESIDUAL_LINE_ALPHA).stroke_width(2),
            ))?;
        }
    }
    Ok(())
}

fn format_tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

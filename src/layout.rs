//! Backend-independent chart geometry.
//!
//! Every turn row occupies two x slots: `2*i` for its entry phase and
//! `2*i + 1` for its exit phase. Metric values live on the primary axis,
//! noise bars on the count axis, and the residual curve on its own axis.

use std::collections::HashSet;
use std::ops::Range;

use plotters::style::RGBColor;
use tracing::debug;

use crate::noise::{self, GraphStyle, InjectionKind, NoiseBar};
use crate::perf::{Metric, PerfLog};

pub const X_DESC: &str = "Turn Phase";
pub const METRIC_DESC: &str = "Metric Value";
pub const COUNT_DESC: &str = "Generated/Removed Count";

const BAR_GROUP_WIDTH: f64 = 0.7;
const TOOTH_COUNT: usize = 6;
const TOOTH_HEIGHT_RATIO: f64 = 0.02;
const VALUE_LABEL_OFFSET: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub style: GraphStyle,
    pub kind: InjectionKind,
    pub injection_step: i64,
    /// Count-axis ceiling; bars above it are drawn torn. `None` disables cropping.
    pub crop_limit: Option<f64>,
}

impl ChartOptions {
    pub fn crop(crop_bars: bool, crop_limit: u32) -> Option<f64> {
        (crop_bars && crop_limit > 0).then_some(crop_limit as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTick {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSegment {
    pub metric: Metric,
    pub from: (f64, f64),
    pub to: (f64, f64),
    /// Dotted segments bridge one turn's exit to the next turn's entry.
    pub dotted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarOutline {
    Plain { top: f64 },
    Truncated(Vec<(f64, f64)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarShape {
    pub x: f64,
    pub width: f64,
    pub value: f64,
    pub color: RGBColor,
    /// Set only on the first bar carrying this label.
    pub legend_label: Option<String>,
    pub outline: BarOutline,
    pub value_label: Option<ValueLabel>,
}

impl BarShape {
    pub fn left(&self) -> f64 {
        self.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InjectionMarker {
    pub x: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResidualCurve {
    pub points: Vec<(f64, f64)>,
    pub label: String,
    pub range: Range<f64>,
}

impl ResidualCurve {
    /// Maps the curve onto another axis range so it can share a coordinate
    /// system with the metric lines.
    pub fn project(&self, target: &Range<f64>) -> Vec<(f64, f64)> {
        self.points
            .iter()
            .map(|&(x, y)| (x, rescale(y, &self.range, target)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LegendGlyph {
    MetricLine(Metric),
    Patch(RGBColor),
    Marker,
    Residual,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub glyph: LegendGlyph,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub ticks: Vec<PhaseTick>,
    pub segments: Vec<MetricSegment>,
    pub bars: Vec<BarShape>,
    pub marker: InjectionMarker,
    pub residual: Option<ResidualCurve>,
    pub legend: Vec<LegendEntry>,
    pub x_range: Range<f64>,
    pub metric_range: Range<f64>,
    pub count_range: Range<f64>,
}

impl ChartLayout {
    pub fn build(log: &PerfLog, opts: &ChartOptions) -> Self {
        let rows = log.rows();
        let mut ticks = Vec::with_capacity(rows.len() * 2);
        let mut segments = Vec::new();
        let mut bars = Vec::new();
        let mut seen_labels: HashSet<&'static str> = HashSet::new();
        let mut bar_labels: Vec<(String, RGBColor)> = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let x = (i * 2) as f64;

            for metric in Metric::ALL {
                let entry = row.entry.get(metric);
                let exit = row.exit.get(metric);
                segments.push(MetricSegment {
                    metric,
                    from: (x, entry),
                    to: (x + 1.0, exit),
                    dotted: false,
                });
                if let Some(next) = rows.get(i + 1) {
                    segments.push(MetricSegment {
                        metric,
                        from: (x + 1.0, exit),
                        to: (x + 2.0, next.entry.get(metric)),
                        dotted: true,
                    });
                }
            }

            let row_bars = noise::row_bars(row, opts.style, opts.kind);
            for (bx, width, bar) in place_bars(x + 0.5, &row_bars) {
                let legend_label = seen_labels.insert(bar.label).then(|| {
                    bar_labels.push((bar.label.to_string(), bar.color));
                    bar.label.to_string()
                });
                bars.push(shape_bar(bx, width, bar, legend_label, opts.crop_limit));
            }

            ticks.push(PhaseTick {
                x,
                label: format!("{}-entry", row.turn),
            });
            ticks.push(PhaseTick {
                x: x + 1.0,
                label: format!("{}-exit", row.turn),
            });
        }

        let marker = InjectionMarker {
            x: (opts.injection_step as f64 - log.min_turn() as f64) * 2.0,
            label: opts.kind.marker_label().to_string(),
        };

        let residual = match opts.style {
            GraphStyle::Line => residual_curve(log, opts, marker.x),
            GraphStyle::Bar => None,
        };

        let legend = legend_entries(&bar_labels, &marker, residual.as_ref());

        let last_x = ticks.last().map(|t| t.x).unwrap_or(0.0);
        let x_range = (0.0_f64.min(marker.x) - 0.5)..(last_x.max(marker.x) + 0.5);
        let metric_range = metric_range(&segments);
        let count_range = match opts.crop_limit {
            Some(limit) => 0.0..limit,
            None => {
                let max = bars.iter().map(|b| b.value).fold(0.0_f64, f64::max);
                0.0..padded(max).max(1.0)
            }
        };

        debug!(
            ticks = ticks.len(),
            segments = segments.len(),
            bars = bars.len(),
            residual = residual.is_some(),
            "chart layout built"
        );

        Self {
            ticks,
            segments,
            bars,
            marker,
            residual,
            legend,
            x_range,
            metric_range,
            count_range,
        }
    }

    pub fn truncated_bars(&self) -> usize {
        self.bars
            .iter()
            .filter(|b| matches!(b.outline, BarOutline::Truncated(_)))
            .count()
    }
}

/// Spreads `bars` evenly across a fixed-width group centred on `center`.
/// Returns `(center_x, width, bar)` per bar.
pub fn place_bars(center: f64, bars: &[NoiseBar]) -> Vec<(f64, f64, &NoiseBar)> {
    if bars.is_empty() {
        return Vec::new();
    }
    let width = BAR_GROUP_WIDTH / bars.len() as f64;
    let start = center - BAR_GROUP_WIDTH / 2.0 + width / 2.0;
    bars.iter()
        .enumerate()
        .map(|(i, bar)| (start + i as f64 * width, width, bar))
        .collect()
}

fn shape_bar(
    x: f64,
    width: f64,
    bar: &NoiseBar,
    legend_label: Option<String>,
    crop_limit: Option<f64>,
) -> BarShape {
    let (outline, value_label) = match crop_limit {
        Some(limit) => {
            let outline = if bar.value <= limit {
                BarOutline::Plain { top: bar.value }
            } else {
                BarOutline::Truncated(truncated_outline(x, width, limit))
            };
            let label = ValueLabel {
                x,
                y: bar.value.min(limit) + VALUE_LABEL_OFFSET,
                text: format!("{:.0}", bar.value.trunc()),
            };
            (outline, Some(label))
        }
        None => (BarOutline::Plain { top: bar.value }, None),
    };

    BarShape {
        x,
        width,
        value: bar.value,
        color: bar.color,
        legend_label,
        outline,
        value_label,
    }
}

/// Outline of a bar cut off at `crop_limit` with a saw-tooth top edge.
pub fn truncated_outline(x: f64, width: f64, crop_limit: f64) -> Vec<(f64, f64)> {
    let left = x - width / 2.0;
    let right = x + width / 2.0;
    let tooth_w = width / TOOTH_COUNT as f64;
    let tooth_h = crop_limit * TOOTH_HEIGHT_RATIO;

    let mut verts = Vec::with_capacity(3 + TOOTH_COUNT * 2);
    verts.push((left, 0.0));
    verts.push((left, crop_limit - tooth_h));
    for i in 0..TOOTH_COUNT {
        let i = i as f64;
        verts.push((left + tooth_w * (i + 0.5), crop_limit));
        verts.push((left + tooth_w * (i + 1.0), crop_limit - tooth_h));
    }
    verts.push((right, 0.0));
    verts
}

fn residual_curve(log: &PerfLog, opts: &ChartOptions, marker_x: f64) -> Option<ResidualCurve> {
    let points: Vec<(f64, f64)> = noise::residual_points(log.rows(), opts.kind, opts.injection_step)
        .into_iter()
        .filter(|(x, _)| *x >= marker_x)
        .collect();
    if points.is_empty() {
        return None;
    }
    let max = points.iter().map(|p| p.1).fold(0.0_f64, f64::max);
    let top = if max > 0.0 { padded(max) } else { 1.0 };
    Some(ResidualCurve {
        points,
        label: opts.kind.residual_label(),
        range: 0.0..top,
    })
}

fn legend_entries(
    bar_labels: &[(String, RGBColor)],
    marker: &InjectionMarker,
    residual: Option<&ResidualCurve>,
) -> Vec<LegendEntry> {
    let metrics = Metric::ALL.iter().map(|m| LegendEntry {
        label: m.name().to_string(),
        glyph: LegendGlyph::MetricLine(*m),
    });
    let bars = bar_labels.iter().map(|(label, color)| LegendEntry {
        label: label.clone(),
        glyph: LegendGlyph::Patch(*color),
    });
    let marker = std::iter::once(LegendEntry {
        label: marker.label.clone(),
        glyph: LegendGlyph::Marker,
    });
    let residual = residual.map(|r| LegendEntry {
        label: r.label.clone(),
        glyph: LegendGlyph::Residual,
    });

    metrics
        .chain(bars)
        .chain(marker)
        .chain(residual)
        .filter(|e| !e.label.is_empty())
        .map(|e| LegendEntry {
            label: capitalize_first(&e.label),
            ..e
        })
        .collect()
}

/// Five percent headroom above `max`, saturating at `f64::MAX`.
fn padded(max: f64) -> f64 {
    (max * 1.05).min(f64::MAX)
}

pub fn capitalize_first(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn metric_range(segments: &[MetricSegment]) -> Range<f64> {
    let values = segments.iter().flat_map(|s| [s.from.1, s.to.1]);
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 0.05)..(hi + 0.05);
    }
    (lo - span * 0.05)..(hi + span * 0.05)
}

pub fn rescale(value: f64, from: &Range<f64>, to: &Range<f64>) -> f64 {
    let span = from.end - from.start;
    if span == 0.0 {
        return to.start;
    }
    to.start + (value - from.start) / span * (to.end - to.start)
}

/// Splits a segment into `pieces` equal parts and keeps every other one,
/// starting with the first, to draw a dotted line.
pub fn dotted_pieces(from: (f64, f64), to: (f64, f64), pieces: usize) -> Vec<[(f64, f64); 2]> {
    let pieces = pieces.max(1);
    let lerp = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    (0..pieces)
        .step_by(2)
        .map(|i| {
            let a = i as f64 / pieces as f64;
            let b = (i + 1) as f64 / pieces as f64;
            [lerp(a), lerp(b)]
        })
        .collect()
}

/// Round tick values (1, 2 or 5 times a power of ten) from zero up to `max`.
pub fn nice_ticks(max: f64, target: usize) -> Vec<f64> {
    if !max.is_finite() || max <= 0.0 || target == 0 {
        return vec![0.0];
    }
    let raw = max / target as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10.0 * magnitude);

    let mut ticks = Vec::new();
    let mut k = 0u32;
    loop {
        let t = step * k as f64;
        if t > max + step * 1e-9 {
            break;
        }
        ticks.push(t);
        k += 1;
    }
    ticks
}

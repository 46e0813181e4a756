//! Plain-text companions to the chart: a per-turn table and a one-line
//! digest of what was drawn.

use crate::layout::ChartLayout;
use crate::noise::{self, InjectionKind};
use crate::perf::{Metric, PerfLog};

const TURN_WIDTH: usize = 6;
const METRIC_WIDTH: usize = 11;
const RESIDUAL_WIDTH: usize = 8;
const BAR_WIDTH: usize = 12;

pub fn bar(value_0_1: f64, width: usize) -> String {
    if width == 0 || value_0_1.is_nan() || value_0_1 <= 0.0 {
        return String::new();
    }
    let clamped = value_0_1.min(1.0);
    let filled = (clamped * width as f64).round() as usize;
    "#".repeat(filled.min(width))
}

/// Entry→exit metric values per turn, the residual noise left at each
/// turn's exit, and an F1 bar.
pub fn turn_table(log: &PerfLog, kind: InjectionKind, injection_step: i64) -> Vec<String> {
    let residual = noise::residual_points(log.rows(), kind, injection_step);

    let mut cells = vec![format!("{:<w$}", "Turn", w = TURN_WIDTH)];
    cells.extend(
        Metric::ALL
            .iter()
            .map(|m| format!("{:<w$}", m.name(), w = METRIC_WIDTH)),
    );
    cells.push(format!("{:<w$}", "Residual", w = RESIDUAL_WIDTH));
    cells.push(format!("{:<w$}", "F1 exit", w = BAR_WIDTH));
    let header = format_row(&cells);
    let border = format!(
        "+{}+",
        cells
            .iter()
            .map(|c| "-".repeat(c.chars().count() + 2))
            .collect::<Vec<_>>()
            .join("+")
    );

    let mut lines = vec![border.clone(), header, border.clone()];
    for (i, row) in log.rows().iter().enumerate() {
        let mut cells = vec![format!("{:<w$}", row.turn, w = TURN_WIDTH)];
        for metric in Metric::ALL {
            let change = format!("{:.2}→{:.2}", row.entry.get(metric), row.exit.get(metric));
            cells.push(format!("{:<w$}", change, w = METRIC_WIDTH));
        }
        let left = residual.get(i * 2 + 1).map(|p| p.1).unwrap_or(0.0);
        cells.push(format!("{:<w$}", left as i64, w = RESIDUAL_WIDTH));
        cells.push(format!("{:<w$}", bar(row.exit.f1, BAR_WIDTH), w = BAR_WIDTH));
        lines.push(format_row(&cells));
    }
    lines.push(border);
    lines
}

pub fn print_table(log: &PerfLog, kind: InjectionKind, injection_step: i64) -> Vec<String> {
    let lines = turn_table(log, kind, injection_step);
    for line in &lines {
        println!("{}", line);
    }
    lines
}

pub fn digest(layout: &ChartLayout) -> String {
    let residual_final = layout
        .residual
        .as_ref()
        .and_then(|r| r.points.last())
        .map(|p| p.1 as i64);
    format!(
        "[chart] turns={} bars={} cropped={} marker_x={} residual_final={}",
        layout.ticks.len() / 2,
        layout.bars.len(),
        layout.truncated_bars(),
        layout.marker.x,
        residual_final.map_or_else(|| "-".to_string(), |v| v.to_string())
    )
}

fn format_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

//! Label-noise accounting: which counters become bars, and how the
//! residual (still-present) noise accumulates over turns.

use plotters::style::RGBColor;

use crate::palette;
use crate::perf::{NoiseColumn, TurnRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InjectionKind {
    /// False negatives are forced out of the labels.
    Fn,
    /// False positives are injected into the labels.
    Fp,
}

impl InjectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            InjectionKind::Fn => "FN",
            InjectionKind::Fp => "FP",
        }
    }

    pub fn marker_label(self) -> &'static str {
        match self {
            InjectionKind::Fn => "Removal",
            InjectionKind::Fp => "Injection",
        }
    }

    pub fn residual_label(self) -> String {
        match self {
            InjectionKind::Fn => "Removed FN Count".to_string(),
            kind => format!("Injected {} Count", kind.as_str()),
        }
    }

    /// Columns whose difference is the per-turn change in residual noise.
    fn delta_columns(self) -> (NoiseColumn, NoiseColumn) {
        match self {
            InjectionKind::Fn => (NoiseColumn::FnForcedRemoved, NoiseColumn::FnRecoveredDelta),
            InjectionKind::Fp => (NoiseColumn::FpInjected, NoiseColumn::FpRemoved),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum GraphStyle {
    /// Generated/removed bars plus the cumulative residual curve.
    Line,
    /// One bar per non-zero noise counter.
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarCandidate {
    pub column: NoiseColumn,
    pub color: RGBColor,
    pub label: &'static str,
}

static FN_CANDIDATES: [BarCandidate; 4] = [
    BarCandidate {
        column: NoiseColumn::FnForcedRemoved,
        color: palette::SKYBLUE,
        label: "Forced Removed",
    },
    BarCandidate {
        column: NoiseColumn::FnRecoveredDelta,
        color: palette::SALMON,
        label: "Recovered Delta",
    },
    BarCandidate {
        column: NoiseColumn::FnRecoveredTotal,
        color: palette::ORANGE,
        label: "Recovered Total",
    },
    BarCandidate {
        column: NoiseColumn::FnRemoved,
        color: palette::GRAY,
        label: "FN Removed",
    },
];

static FP_CANDIDATES: [BarCandidate; 2] = [
    BarCandidate {
        column: NoiseColumn::FpInjected,
        color: palette::SKYBLUE,
        label: "Injected",
    },
    BarCandidate {
        column: NoiseColumn::FpRemoved,
        color: palette::SALMON,
        label: "Removed",
    },
];

pub fn bar_candidates(kind: InjectionKind) -> &'static [BarCandidate] {
    match kind {
        InjectionKind::Fn => &FN_CANDIDATES,
        InjectionKind::Fp => &FP_CANDIDATES,
    }
}

/// One bar before placement.
#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBar {
    pub value: f64,
    pub color: RGBColor,
    pub label: &'static str,
}

pub fn row_bars(row: &TurnRecord, style: GraphStyle, kind: InjectionKind) -> Vec<NoiseBar> {
    match style {
        GraphStyle::Bar => bar_candidates(kind)
            .iter()
            .filter_map(|c| {
                let value = row.noise(c.column);
                (value > 0.0).then_some(NoiseBar {
                    value,
                    color: c.color,
                    label: c.label,
                })
            })
            .collect(),
        GraphStyle::Line => vec![
            NoiseBar {
                value: row.noise(NoiseColumn::Generated),
                color: palette::SKYBLUE,
                label: "Generated",
            },
            NoiseBar {
                value: row.noise(NoiseColumn::Removed),
                color: palette::SALMON,
                label: "Removed",
            },
        ],
    }
}

pub fn residual_delta(row: &TurnRecord, kind: InjectionKind) -> f64 {
    let (added, taken) = kind.delta_columns();
    row.noise(added) - row.noise(taken)
}

/// Two points per row, at the row's entry and exit phase. The running total
/// only moves once `turn >= injection_step` and never drops below zero.
pub fn residual_points(rows: &[TurnRecord], kind: InjectionKind, injection_step: i64) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(rows.len() * 2);
    let mut cumulative = 0.0_f64;
    for (i, row) in rows.iter().enumerate() {
        let x = (i * 2) as f64;
        points.push((x, cumulative));
        if row.turn >= injection_step {
            cumulative = (cumulative + residual_delta(row, kind)).clamp(0.0, f64::MAX);
        }
        points.push((x + 1.0, cumulative));
    }
    points
}

pub fn required_columns(style: GraphStyle, kind: InjectionKind) -> Vec<NoiseColumn> {
    match style {
        GraphStyle::Bar => Vec::new(),
        GraphStyle::Line => {
            let (added, taken) = kind.delta_columns();
            vec![NoiseColumn::Generated, NoiseColumn::Removed, added, taken]
        }
    }
}

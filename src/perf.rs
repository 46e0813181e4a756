//! Loading of the per-turn performance log (`perf.csv`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::PerfLogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Recall,
    Precision,
    F1,
    Accuracy,
}

impl Metric {
    /// Plotting order, which is also the legend order.
    pub const ALL: [Metric; 4] = [
        Metric::Recall,
        Metric::Precision,
        Metric::F1,
        Metric::Accuracy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::Recall => "recall",
            Metric::Precision => "precision",
            Metric::F1 => "f1",
            Metric::Accuracy => "accuracy",
        }
    }

    pub fn entry_column(self) -> String {
        format!("entry_{}", self.name())
    }

    pub fn exit_column(self) -> String {
        format!("exit_{}", self.name())
    }
}

/// Label-noise counters a turn row may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiseColumn {
    Generated,
    Removed,
    FnForcedRemoved,
    FnRecoveredDelta,
    FnRecoveredTotal,
    FnRemoved,
    FpInjected,
    FpRemoved,
}

const NOISE_COLUMNS: usize = 8;

/// Largest turn magnitude an `f64` cell holds exactly.
const MAX_TURN: f64 = 9_007_199_254_740_992.0;

impl NoiseColumn {
    pub const ALL: [NoiseColumn; NOISE_COLUMNS] = [
        NoiseColumn::Generated,
        NoiseColumn::Removed,
        NoiseColumn::FnForcedRemoved,
        NoiseColumn::FnRecoveredDelta,
        NoiseColumn::FnRecoveredTotal,
        NoiseColumn::FnRemoved,
        NoiseColumn::FpInjected,
        NoiseColumn::FpRemoved,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NoiseColumn::Generated => "generated",
            NoiseColumn::Removed => "removed",
            NoiseColumn::FnForcedRemoved => "fn_forced_removed",
            NoiseColumn::FnRecoveredDelta => "fn_recovered_delta",
            NoiseColumn::FnRecoveredTotal => "fn_recovered_total",
            NoiseColumn::FnRemoved => "fn_removed",
            NoiseColumn::FpInjected => "fp_injected",
            NoiseColumn::FpRemoved => "fp_removed",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValues {
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
    pub accuracy: f64,
}

impl MetricValues {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Recall => self.recall,
            Metric::Precision => self.precision,
            Metric::F1 => self.f1,
            Metric::Accuracy => self.accuracy,
        }
    }

    fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Recall => self.recall = value,
            Metric::Precision => self.precision = value,
            Metric::F1 => self.f1 = value,
            Metric::Accuracy => self.accuracy = value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnRecord {
    pub turn: i64,
    pub entry: MetricValues,
    pub exit: MetricValues,
    noise: [f64; NOISE_COLUMNS],
}

impl TurnRecord {
    pub fn new(turn: i64, entry: MetricValues, exit: MetricValues) -> Self {
        Self {
            turn,
            entry,
            exit,
            noise: [0.0; NOISE_COLUMNS],
        }
    }

    /// Counter value, `0` when the column was absent or blank.
    pub fn noise(&self, column: NoiseColumn) -> f64 {
        self.noise[column.index()]
    }

    pub fn with_noise(mut self, column: NoiseColumn, value: f64) -> Self {
        self.noise[column.index()] = value;
        self
    }
}

/// A parsed log. Always holds at least one row.
#[derive(Debug, Clone)]
pub struct PerfLog {
    rows: Vec<TurnRecord>,
    noise_columns: Vec<NoiseColumn>,
}

impl PerfLog {
    pub fn new(rows: Vec<TurnRecord>, noise_columns: Vec<NoiseColumn>) -> Result<Self, PerfLogError> {
        if rows.is_empty() {
            return Err(PerfLogError::Empty);
        }
        Ok(Self {
            rows,
            noise_columns,
        })
    }

    pub fn rows(&self) -> &[TurnRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn min_turn(&self) -> i64 {
        self.rows.iter().map(|r| r.turn).min().unwrap_or(0)
    }

    pub fn has_column(&self, column: NoiseColumn) -> bool {
        self.noise_columns.contains(&column)
    }

    pub fn require(&self, columns: &[NoiseColumn]) -> Result<(), PerfLogError> {
        match columns.iter().find(|c| !self.has_column(**c)) {
            Some(missing) => Err(PerfLogError::MissingColumn(missing.column().to_string())),
            None => Ok(()),
        }
    }
}

pub fn load<P: AsRef<Path>>(path: P) -> Result<PerfLog, PerfLogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PerfLogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let log = parse(BufReader::new(file))?;
    debug!(path = %path.display(), rows = log.len(), "performance log loaded");
    Ok(log)
}

pub fn parse<R: BufRead>(reader: R) -> Result<PerfLog, PerfLogError> {
    let mut lines = reader.lines();

    let header_line = loop {
        match lines.next() {
            Some(line) => {
                let line = line?;
                if !line.trim().is_empty() {
                    break line;
                }
            }
            None => return Err(PerfLogError::MissingHeader),
        }
    };

    let col_idx: HashMap<String, usize> = header_line
        .split(',')
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let find = |name: &str| -> Result<usize, PerfLogError> {
        col_idx
            .get(name)
            .copied()
            .ok_or_else(|| PerfLogError::MissingColumn(name.to_string()))
    };

    let turn_idx = find("turn")?;
    let mut metric_idx = Vec::with_capacity(Metric::ALL.len());
    for metric in Metric::ALL {
        let entry = metric.entry_column();
        let exit = metric.exit_column();
        metric_idx.push((metric, find(&entry)?, entry, find(&exit)?, exit));
    }
    let noise_idx: Vec<(NoiseColumn, usize)> = NoiseColumn::ALL
        .iter()
        .filter_map(|c| col_idx.get(c.column()).map(|&i| (*c, i)))
        .collect();

    let mut rows = Vec::new();
    for (offset, line) in lines.enumerate() {
        let line = line?;
        let line_no = offset + 2;
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();

        let turn = parse_turn(&fields, turn_idx, line_no)?;
        let mut entry = MetricValues::default();
        let mut exit = MetricValues::default();
        for (metric, entry_i, entry_name, exit_i, exit_name) in &metric_idx {
            entry.set(*metric, parse_required(&fields, *entry_i, entry_name, line_no)?);
            exit.set(*metric, parse_required(&fields, *exit_i, exit_name, line_no)?);
        }

        let mut record = TurnRecord::new(turn, entry, exit);
        for (column, i) in &noise_idx {
            let value = parse_count(&fields, *i, column.column(), line_no)?;
            record = record.with_noise(*column, value);
        }
        rows.push(record);
    }

    PerfLog::new(rows, noise_idx.into_iter().map(|(c, _)| c).collect())
}

fn invalid(line: usize, column: &str, value: &str) -> PerfLogError {
    PerfLogError::InvalidValue {
        line,
        column: column.to_string(),
        value: value.to_string(),
    }
}

fn parse_required(fields: &[&str], i: usize, column: &str, line: usize) -> Result<f64, PerfLogError> {
    let raw = fields.get(i).copied().unwrap_or("");
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(line, column, raw))
}

fn parse_turn(fields: &[&str], i: usize, line: usize) -> Result<i64, PerfLogError> {
    let value = parse_required(fields, i, "turn", line)?;
    if value.fract() != 0.0 || value.abs() > MAX_TURN {
        return Err(invalid(line, "turn", fields.get(i).copied().unwrap_or("")));
    }
    Ok(value as i64)
}

/// Blank or missing counter cells count as zero.
fn parse_count(fields: &[&str], i: usize, column: &str, line: usize) -> Result<f64, PerfLogError> {
    match fields.get(i).copied() {
        None | Some("") => Ok(0.0),
        Some(raw) if raw.eq_ignore_ascii_case("nan") => Ok(0.0),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| invalid(line, column, raw)),
    }
}

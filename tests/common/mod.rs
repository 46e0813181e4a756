#![allow(dead_code)]

use fpfn_chart::perf::{self, PerfLog};

/// Five turns; noise removal starts at turn 12 and the turn-11 removal
/// count overflows the default 150 crop.
pub const FN_RUN: &str = "\
turn,entry_recall,entry_precision,entry_f1,entry_accuracy,exit_recall,exit_precision,exit_f1,exit_accuracy,generated,removed,fn_forced_removed,fn_recovered_delta,fn_recovered_total,fn_removed
10,0.80,0.70,0.75,0.90,0.82,0.72,0.77,0.91,40,5,0,0,0,0
11,0.81,0.71,0.76,0.90,0.83,0.73,0.78,0.92,35,200,0,0,0,3
12,0.79,0.70,0.74,0.89,0.70,0.69,0.69,0.88,30,4,50,10,10,0
13,0.71,0.69,0.70,0.88,0.75,0.70,0.72,0.89,25,6,0,20,30,0
14,0.76,0.71,0.73,0.90,0.80,0.72,0.76,0.91,20,2,5,0,30,0
";

pub const FP_RUN: &str = "\
turn,entry_recall,entry_precision,entry_f1,entry_accuracy,exit_recall,exit_precision,exit_f1,exit_accuracy,generated,removed,fp_injected,fp_removed
0,0.5,0.5,0.5,0.5,0.6,0.6,0.6,0.6,10,1,0,0
1,0.6,0.6,0.6,0.6,0.6,0.5,0.55,0.6,12,2,30,50
2,0.6,0.5,0.55,0.6,0.65,0.55,0.6,0.62,9,3,20,5
";

pub fn fn_log() -> PerfLog {
    perf::parse(FN_RUN.as_bytes()).expect("fixture parses")
}

pub fn fp_log() -> PerfLog {
    perf::parse(FP_RUN.as_bytes()).expect("fixture parses")
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

use std::path::PathBuf;

use clap::Parser;

use crate::layout::ChartOptions;
use crate::noise::{GraphStyle, InjectionKind};
use crate::output::{ImageFormat, OutputMode, OutputTarget};

pub const PERF_FILE: &str = "perf.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub results_dir: PathBuf,
    pub input: Option<PathBuf>,
    pub graph_dir: PathBuf,
    pub run_name: String,
    pub dataset: String,
    pub crop_bars: bool,
    pub crop_limit: u32,
    pub injection_step: i64,
    pub injection_kind: InjectionKind,
    pub graph_style: GraphStyle,
    pub separate_learn_adapt: bool,
    pub mode: OutputMode,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub caption: bool,
    pub summary: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("./results"),
            input: None,
            graph_dir: PathBuf::from("graph"),
            run_name: "fpfn_kitsune_fp12".to_string(),
            dataset: "Kitsune".to_string(),
            crop_bars: true,
            crop_limit: 150,
            injection_step: 12,
            injection_kind: InjectionKind::Fn,
            graph_style: GraphStyle::Line,
            separate_learn_adapt: false,
            mode: OutputMode::Save,
            format: ImageFormat::Svg,
            width: 1400,
            height: 600,
            caption: true,
            summary: false,
        }
    }
}

impl Config {
    pub fn input_path(&self) -> PathBuf {
        self.input
            .clone()
            .unwrap_or_else(|| self.results_dir.join(PERF_FILE))
    }

    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            style: self.graph_style,
            kind: self.injection_kind,
            injection_step: self.injection_step,
            crop_limit: ChartOptions::crop(self.crop_bars, self.crop_limit),
        }
    }

    pub fn output_target(&self) -> OutputTarget {
        OutputTarget {
            mode: self.mode,
            graph_dir: self.graph_dir.clone(),
            run_name: self.run_name.clone(),
            format: self.format,
            size: (self.width, self.height),
        }
    }

    pub fn caption_text(&self) -> Option<String> {
        if !self.caption {
            return None;
        }
        match (self.dataset.trim(), self.run_name.trim()) {
            ("", "") => None,
            ("", run) => Some(run.to_string()),
            (dataset, "") => Some(dataset.to_string()),
            (dataset, run) => Some(format!("{} · {}", dataset, run)),
        }
    }

    /// Layers parsed arguments (and their `FPFN_*` environment fallbacks)
    /// over the defaults.
    pub fn from_args(args: Args) -> Self {
        let mut cfg = Config::default();

        if let Some(dir) = args.results_dir {
            cfg.results_dir = dir;
        }
        cfg.input = args.input.or(cfg.input);
        if let Some(dir) = args.graph_dir {
            cfg.graph_dir = dir;
        }
        if let Some(name) = args.run_name.filter(|n| !n.trim().is_empty()) {
            cfg.run_name = name;
        }
        if let Some(dataset) = args.dataset {
            cfg.dataset = dataset;
        }
        if args.no_crop {
            cfg.crop_bars = false;
        }
        if let Some(limit) = args.crop_limit {
            cfg.crop_limit = limit;
        }
        if let Some(step) = args.injection_step {
            cfg.injection_step = step;
        }
        if let Some(kind) = args.injection_kind {
            cfg.injection_kind = kind;
        }
        if let Some(style) = args.graph_style {
            cfg.graph_style = style;
        }
        if args.separate_learn_adapt {
            cfg.separate_learn_adapt = true;
        }
        if args.show {
            cfg.mode = OutputMode::Show;
        }
        if let Some(format) = args.format {
            cfg.format = format;
        }
        if let Some(w) = args.width.filter(|w| *w > 0) {
            cfg.width = w;
        }
        if let Some(h) = args.height.filter(|h| *h > 0) {
            cfg.height = h;
        }
        if args.no_caption {
            cfg.caption = false;
        }
        if args.summary {
            cfg.summary = true;
        }

        cfg
    }
}

#[derive(Debug, Default, Parser)]
#[command(
    name = "fpfn-chart",
    about = "Plot metric evolution and label-noise counts across learning turns"
)]
pub struct Args {
    /// Directory holding perf.csv
    #[arg(long, env = "FPFN_RESULTS_DIR")]
    pub results_dir: Option<PathBuf>,

    /// Explicit performance log path (overrides --results-dir)
    #[arg(short, long, env = "FPFN_INPUT")]
    pub input: Option<PathBuf>,

    /// Directory saved charts are written to
    #[arg(long, env = "FPFN_GRAPH_DIR")]
    pub graph_dir: Option<PathBuf>,

    /// Base name of the saved chart file
    #[arg(long, env = "FPFN_RUN_NAME")]
    pub run_name: Option<String>,

    /// Dataset name shown in the caption
    #[arg(long, env = "FPFN_DATASET")]
    pub dataset: Option<String>,

    /// Draw bars at full height instead of cropping them
    #[arg(long, env = "FPFN_NO_CROP")]
    pub no_crop: bool,

    /// Count-axis ceiling; taller bars get a torn top
    #[arg(long, env = "FPFN_CROP_LIMIT")]
    pub crop_limit: Option<u32>,

    /// Turn at which noise injection/removal starts
    #[arg(long, env = "FPFN_INJECTION_STEP", allow_negative_numbers = true)]
    pub injection_step: Option<i64>,

    /// Which label noise the run applies
    #[arg(long, value_enum, env = "FPFN_INJECTION_KIND")]
    pub injection_kind: Option<InjectionKind>,

    /// How noise counters are drawn
    #[arg(long, value_enum, env = "FPFN_GRAPH_STYLE")]
    pub graph_style: Option<GraphStyle>,

    /// Learn and adapt phases are charted separately; skip the combined chart
    #[arg(long, env = "FPFN_SEPARATE_LEARN_ADAPT")]
    pub separate_learn_adapt: bool,

    /// Open the chart in the system viewer instead of saving it
    #[arg(long, env = "FPFN_SHOW")]
    pub show: bool,

    /// Image format
    #[arg(long, value_enum, env = "FPFN_FORMAT")]
    pub format: Option<ImageFormat>,

    /// Canvas width in pixels
    #[arg(long, env = "FPFN_WIDTH")]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long, env = "FPFN_HEIGHT")]
    pub height: Option<u32>,

    /// Leave out the dataset/run caption
    #[arg(long, env = "FPFN_NO_CAPTION")]
    pub no_caption: bool,

    /// Print a per-turn table to stdout
    #[arg(long, env = "FPFN_SUMMARY")]
    pub summary: bool,
}

pub fn from_env_or_args() -> Config {
    Config::from_args(Args::parse())
}

//! Named colors used across the chart.

use plotters::style::RGBColor;

use crate::perf::Metric;

pub const GREEN: RGBColor = RGBColor(0x00, 0x80, 0x00);
pub const ORANGE: RGBColor = RGBColor(0xFF, 0xA5, 0x00);
pub const BLUE: RGBColor = RGBColor(0x00, 0x00, 0xFF);
pub const PURPLE: RGBColor = RGBColor(0x80, 0x00, 0x80);
pub const SKYBLUE: RGBColor = RGBColor(0x87, 0xCE, 0xEB);
pub const SALMON: RGBColor = RGBColor(0xFA, 0x80, 0x72);
pub const GRAY: RGBColor = RGBColor(0x80, 0x80, 0x80);
pub const RED: RGBColor = RGBColor(0xFF, 0x00, 0x00);

pub const BAR_ALPHA: f64 = 0.6;
pub const GRID_ALPHA: f64 = 0.3;
pub const RESIDUAL_LINE_ALPHA: f64 = 0.5;
pub const RESIDUAL_FILL_ALPHA: f64 = 0.1;

pub fn metric_color(metric: Metric) -> RGBColor {
    match metric {
        Metric::Recall => GREEN,
        Metric::Precision => ORANGE,
        Metric::F1 => BLUE,
        Metric::Accuracy => PURPLE,
    }
}

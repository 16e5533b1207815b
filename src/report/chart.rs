use std::ops::RangeInclusive;

use handlebars::Handlebars;
use serde::Serialize;

use super::format_millis;
use crate::error::ReportError;
use crate::results::{BenchmarkResults, SuiteResults};

const TEMPLATE_NAME: &str = "bar_chart";
const BAR_CHART_TEMPLATE: &str = include_str!("../../resources/bar_chart.svg.hbs");

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 480.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 44.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Space left empty at both sides of each group of bars, in units of one group.
pub const GROUP_BORDER: f64 = 0.05;

const LEGEND_ROW: f64 = 16.0;

/// Grouped bar chart: one group per case label, one bar per series inside each group.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub labels: Vec<String>,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

impl BarChart {
    pub fn for_benchmark(suite: &SuiteResults, benchmark: &BenchmarkResults) -> Self {
        let series = suite
            .containers
            .iter()
            .map(|container| Series {
                name: container.clone(),
                values: benchmark
                    .times(container)
                    .map(|t| t.to_vec())
                    .unwrap_or_else(|| vec![None; suite.labels.len()]),
            })
            .collect();

        Self {
            title: format!("{} of std::uint{}_t", benchmark.name, suite.element_bits),
            x_label: "Container size".to_string(),
            y_label: "Milliseconds".to_string(),
            labels: suite.labels.clone(),
            series,
        }
    }

    fn bar_width(&self) -> f64 {
        (1.0 - GROUP_BORDER * 2.0) / self.series.len().max(1) as f64
    }
}

/// Logarithmic axis spanning whole decades around the plotted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogAxis {
    pub min_decade: i32,
    pub max_decade: i32,
}

impl LogAxis {
    /// Non-positive values have no place on a log scale and are ignored.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Self {
        let (min, max) = values
            .into_iter()
            .filter(|v| 0.0 < *v && v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if min.is_infinite() {
            return Self { min_decade: 0, max_decade: 1 };
        }

        let min_decade = min.log10().floor() as i32;
        let max_decade = (max.log10().ceil() as i32).max(min_decade + 1);
        Self { min_decade, max_decade }
    }

    pub fn decades(&self) -> RangeInclusive<i32> {
        self.min_decade..=self.max_decade
    }

    /// Position of `value` along the axis, 0.0 at the lowest decade and 1.0 at the highest.
    pub fn fraction(&self, value: f64) -> f64 {
        let span = (self.max_decade - self.min_decade) as f64;
        ((value.log10() - self.min_decade as f64) / span).clamp(0.0, 1.0)
    }
}

/// Sample of a "jet" style colour map at `x` in `[0, 1]`, as an `#rrggbb` string.
///
/// Each channel is the symmetric ramp `1.5 - |4x - c|`, an approximation of matplotlib's jet:
/// the endpoints match, but channel knees sit at quarter steps (red saturates at 0.625, not 0.66).
pub fn jet(x: f64) -> String {
    let x = x.clamp(0.0, 1.0);
    let channel = |center: f64| {
        let c = (1.5 - (4.0 * x - center).abs()).clamp(0.0, 1.0);
        (c * 255.0).round() as u8
    };
    format!("#{:02x}{:02x}{:02x}", channel(3.0), channel(2.0), channel(1.0))
}

pub struct ChartRenderer {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for ChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRenderer").field("template", &TEMPLATE_NAME).finish()
    }
}

impl ChartRenderer {
    pub fn new() -> Result<Self, ReportError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, BAR_CHART_TEMPLATE)?;
        Ok(Self { registry })
    }

    #[tracing::instrument(level = "debug", skip(self, chart), fields(title=%chart.title))]
    pub fn render(&self, chart: &BarChart) -> Result<String, ReportError> {
        let context = ChartContext::layout(chart);
        tracing::debug!(bars=%context.bars.len(), "rendering bar chart");
        Ok(self.registry.render(TEMPLATE_NAME, &context)?)
    }
}

#[derive(Debug, Serialize)]
struct ChartContext {
    width: String,
    height: String,
    title: String,
    title_x: String,
    title_y: String,
    x_label: String,
    x_label_x: String,
    x_label_y: String,
    y_label: String,
    y_label_x: String,
    y_label_y: String,
    plot: PlotArea,
    bars: Vec<BarContext>,
    x_ticks: Vec<XTick>,
    y_ticks: Vec<YTick>,
    y_minor_ticks: Vec<YTick>,
    legend: Legend,
}

#[derive(Debug, Serialize)]
struct PlotArea {
    left: String,
    top: String,
    width: String,
    height: String,
}

#[derive(Debug, Serialize)]
struct BarContext {
    x: String,
    y: String,
    width: String,
    height: String,
    color: String,
    container: String,
    label: String,
    millis: String,
}

#[derive(Debug, Serialize)]
struct XTick {
    x: String,
    y1: String,
    y2: String,
    text_y: String,
    label: String,
}

#[derive(Debug, Serialize)]
struct YTick {
    y: String,
    x1: String,
    x2: String,
    text_x: String,
    exponent: i32,
}

#[derive(Debug, Serialize)]
struct Legend {
    x: String,
    y: String,
    width: String,
    height: String,
    entries: Vec<LegendEntry>,
}

#[derive(Debug, Serialize)]
struct LegendEntry {
    swatch_x: String,
    swatch_y: String,
    text_x: String,
    text_y: String,
    color: String,
    name: String,
}

fn px(v: f64) -> String {
    format!("{:.2}", v)
}

impl ChartContext {
    fn layout(chart: &BarChart) -> Self {
        let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_h = HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
        let plot_bottom = MARGIN_TOP + plot_h;

        let nr_groups = chart.labels.len().max(1) as f64;
        let nr_series = chart.series.len().max(1) as f64;
        let group_px = plot_w / nr_groups;
        let bar_width = chart.bar_width();

        let axis = LogAxis::spanning(chart.series.iter().flat_map(|s| s.values.iter().flatten().copied()));
        let y_at = |value: f64| plot_bottom - axis.fraction(value) * plot_h;

        let mut bars = vec![];
        for (n, series) in chart.series.iter().enumerate() {
            let color = jet(n as f64 / nr_series);
            for (i, value) in series.values.iter().enumerate() {
                let millis = match value {
                    Some(ms) if 0.0 < *ms => *ms,
                    _ => continue,
                };

                let x = MARGIN_LEFT + (i as f64 + bar_width * n as f64 + GROUP_BORDER) * group_px;
                let y = y_at(millis);
                bars.push(BarContext {
                    x: px(x),
                    y: px(y),
                    width: px(bar_width * group_px),
                    height: px(plot_bottom - y),
                    color: color.clone(),
                    container: series.name.clone(),
                    label: chart.labels.get(i).cloned().unwrap_or_default(),
                    millis: format_millis(millis),
                });
            }
        }

        let x_ticks = chart
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let center = bar_width * nr_series / 2.0 + GROUP_BORDER;
                XTick {
                    x: px(MARGIN_LEFT + (i as f64 + center) * group_px),
                    y1: px(plot_bottom),
                    y2: px(plot_bottom + 4.0),
                    text_y: px(plot_bottom + 18.0),
                    label: label.clone(),
                }
            })
            .collect();

        let y_tick = |y: f64, len: f64, exponent: i32| YTick {
            y: px(y),
            x1: px(MARGIN_LEFT - len),
            x2: px(MARGIN_LEFT),
            text_x: px(MARGIN_LEFT - 7.0),
            exponent,
        };

        let y_ticks = axis
            .decades()
            .map(|k| y_tick(y_at(10_f64.powi(k)), 4.0, k))
            .collect();

        let y_minor_ticks = axis
            .decades()
            .filter(|k| *k < axis.max_decade)
            .flat_map(|k| (2..=9).map(move |m| (k, m as f64 * 10_f64.powi(k))))
            .map(|(k, v)| y_tick(y_at(v), 2.0, k))
            .collect();

        let longest_name = chart.series.iter().map(|s| s.name.chars().count()).max().unwrap_or(0) as f64;
        let legend_x = MARGIN_LEFT + 8.0;
        let legend_y = MARGIN_TOP + 8.0;
        let entries = chart
            .series
            .iter()
            .enumerate()
            .map(|(n, series)| {
                let row_y = legend_y + 6.0 + LEGEND_ROW * n as f64;
                LegendEntry {
                    swatch_x: px(legend_x + 6.0),
                    swatch_y: px(row_y + 4.5),
                    text_x: px(legend_x + 32.0),
                    text_y: px(row_y + 8.0),
                    color: jet(n as f64 / nr_series),
                    name: series.name.clone(),
                }
            })
            .collect();

        let legend = Legend {
            x: px(legend_x),
            y: px(legend_y),
            width: px(40.0 + longest_name * 6.5),
            height: px(12.0 + LEGEND_ROW * chart.series.len() as f64),
            entries,
        };

        Self {
            width: px(WIDTH),
            height: px(HEIGHT),
            title: chart.title.clone(),
            title_x: px(MARGIN_LEFT + plot_w / 2.0),
            title_y: px(MARGIN_TOP - 16.0),
            x_label: chart.x_label.clone(),
            x_label_x: px(MARGIN_LEFT + plot_w / 2.0),
            x_label_y: px(HEIGHT - 16.0),
            y_label: chart.y_label.clone(),
            y_label_x: px(22.0),
            y_label_y: px(MARGIN_TOP + plot_h / 2.0),
            plot: PlotArea {
                left: px(MARGIN_LEFT),
                top: px(MARGIN_TOP),
                width: px(plot_w),
                height: px(plot_h),
            },
            bars,
            x_ticks,
            y_ticks,
            y_minor_ticks,
            legend,
        }
    }
}

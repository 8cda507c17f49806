//! Server-side rendered dashboard page (no JavaScript).
//!
//! The page reloads itself through `<meta http-equiv="refresh">`; the chart
//! is inline SVG and the gauge a native `<meter>`.

use askama::Template;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Response};

use gridwatch_adapter_dashboard::Dashboard;
use gridwatch_adapter_dashboard::chart::LineChart;
use gridwatch_adapter_dashboard::gauge::Gauge;
use gridwatch_adapter_dashboard::text::TextField;

use crate::error::PageError;
use crate::state::AppState;

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 200.0;
/// Series colours, cycled.
const PALETTE: [&str; 4] = ["#1f77b4", "#ff7f0e", "#2ca02c", "#9467bd"];

/// Dashboard page template.
#[derive(Template)]
#[template(path = "index.html")]
pub struct DashboardTemplate {
    refresh_seconds: u32,
    status_text: String,
    status_class: &'static str,
    latest: Option<String>,
    fields: Vec<TextField>,
    chart_title: String,
    chart: Option<ChartView>,
    gauge: Option<GaugeView>,
}

impl DashboardTemplate {
    /// Lay out `dashboard` for the page, reloading every `refresh_seconds`.
    #[must_use]
    pub fn new(dashboard: Dashboard, refresh_seconds: u32) -> Self {
        let status_class = if dashboard.status.is_error {
            "status error"
        } else {
            "status"
        };
        let chart_title = dashboard
            .chart
            .measurement
            .map_or_else(|| "Chart".to_string(), |m| capitalize(m.label()));

        Self {
            refresh_seconds,
            status_text: dashboard.status.text,
            status_class,
            latest: dashboard.latest_timestamp,
            fields: dashboard.fields,
            chart_title,
            chart: ChartView::new(&dashboard.chart),
            gauge: dashboard.gauge.as_ref().map(GaugeView::new),
        }
    }
}

impl IntoResponse for DashboardTemplate {
    fn into_response(self) -> Response {
        match self.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => PageError::from(err).into_response(),
        }
    }
}

/// `GET /`: the live dashboard.
pub async fn index(State(state): State<AppState>) -> DashboardTemplate {
    DashboardTemplate::new(state.dashboard.snapshot(), state.page_refresh_secs)
}

/// Inline SVG line chart, already projected onto the canvas.
struct ChartView {
    width: f64,
    height: f64,
    polylines: Vec<Polyline>,
    circles: Vec<Circle>,
    axis: Option<Axis>,
    legend: Vec<LegendEntry>,
}

struct Polyline {
    color: &'static str,
    points: String,
}

struct Circle {
    color: &'static str,
    x: String,
    y: String,
}

/// First and last timestamp under the x axis.
struct Axis {
    baseline: f64,
    first: String,
    last: String,
}

struct LegendEntry {
    color: &'static str,
    name: String,
}

impl ChartView {
    /// `None` while the chart has no plottable value.
    fn new(chart: &LineChart) -> Option<Self> {
        let (lo, hi) = chart.bounds()?;
        let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };
        let scale = Scale {
            count: chart.len(),
            lo,
            hi,
        };

        let mut polylines = Vec::new();
        let mut circles = Vec::new();
        for (idx, series) in chart.series.iter().enumerate() {
            let color = PALETTE[idx % PALETTE.len()];
            let mut segment: Vec<String> = Vec::new();
            for (pos, point) in series.points.iter().enumerate() {
                if let Some(value) = point {
                    let (x, y) = scale.point(pos, *value);
                    segment.push(format!("{x:.1},{y:.1}"));
                    circles.push(Circle {
                        color,
                        x: format!("{x:.1}"),
                        y: format!("{y:.1}"),
                    });
                } else if !segment.is_empty() {
                    polylines.push(Polyline {
                        color,
                        points: segment.join(" "),
                    });
                    segment.clear();
                }
            }
            if !segment.is_empty() {
                polylines.push(Polyline {
                    color,
                    points: segment.join(" "),
                });
            }
        }

        let axis = match (chart.labels.first(), chart.labels.last()) {
            (Some(first), Some(last)) => Some(Axis {
                baseline: CHART_HEIGHT + 16.0,
                first: first.clone(),
                last: last.clone(),
            }),
            _ => None,
        };

        let legend = chart
            .series
            .iter()
            .enumerate()
            .map(|(idx, series)| LegendEntry {
                color: PALETTE[idx % PALETTE.len()],
                name: series.name.clone(),
            })
            .collect();

        Some(Self {
            width: CHART_WIDTH,
            height: CHART_HEIGHT + 20.0,
            polylines,
            circles,
            axis,
            legend,
        })
    }
}

/// Gauge caption, scale and zone-coloured value.
struct GaugeView {
    label: String,
    min: f64,
    max: f64,
    value: f64,
    display: String,
    color: String,
}

impl GaugeView {
    fn new(gauge: &Gauge) -> Self {
        Self {
            label: gauge.label.clone(),
            min: gauge.min,
            max: gauge.max,
            value: gauge.value,
            display: format!("{:.2}", gauge.value),
            color: gauge
                .zone()
                .map_or_else(|| "inherit".to_string(), |zone| zone.color.clone()),
        }
    }
}

/// Maps window positions and values onto the SVG canvas.
struct Scale {
    count: usize,
    lo: f64,
    hi: f64,
}

impl Scale {
    #[allow(clippy::cast_precision_loss)]
    fn point(&self, pos: usize, value: f64) -> (f64, f64) {
        let x = if self.count <= 1 {
            CHART_WIDTH / 2.0
        } else {
            pos as f64 * CHART_WIDTH / (self.count - 1) as f64
        };
        let y = CHART_HEIGHT - (value - self.lo) / (self.hi - self.lo) * CHART_HEIGHT;
        (x, y)
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

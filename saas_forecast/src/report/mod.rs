//! Chart descriptions and output sinks
//!
//! Analysis stages describe what to draw as a [`Chart`] and hand it to a
//! [`ChartSink`]. The binaries use [`PngChartRenderer`]; tests use
//! [`RecordingSink`] to inspect charts without touching the filesystem.

use crate::error::Result;

pub mod charts;
pub mod png;

pub use png::PngChartRenderer;

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Line,
    Scatter,
    Bar,
}

/// A named set of `(x, y)` points. Non-finite points are not drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: String,
    pub kind: SeriesKind,
    pub points: Vec<(f64, f64)>,
}

impl ChartSeries {
    pub fn new(label: impl Into<String>, kind: SeriesKind, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            kind,
            points,
        }
    }

    pub fn line(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self::new(label, SeriesKind::Line, points)
    }

    pub fn scatter(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self::new(label, SeriesKind::Scatter, points)
    }

    pub fn bar(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self::new(label, SeriesKind::Bar, points)
    }

    /// Points that can be drawn
    pub fn finite_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
    }
}

/// Dashed horizontal line, e.g. break-even
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceLine {
    pub label: String,
    pub y: f64,
}

/// One set of axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: String,
    pub series: Vec<ChartSeries>,
    pub reference: Option<ReferenceLine>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_series(mut self, series: ChartSeries) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_reference(mut self, label: impl Into<String>, y: f64) -> Self {
        self.reference = Some(ReferenceLine {
            label: label.into(),
            y,
        });
        self
    }
}

/// A chart with one or more vertically stacked panels
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// File stem of the output, e.g. `total_mrr_plot`
    pub name: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub panels: Vec<Panel>,
}

impl Chart {
    /// Chart with a single empty panel
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        let title = title.into();
        Self {
            name: name.into(),
            panels: vec![Panel::new(title.clone())],
            title,
            x_label: x_label.into(),
            y_label: y_label.into(),
        }
    }

    /// Chart with the given panels
    pub fn stacked(name: impl Into<String>, title: impl Into<String>, panels: Vec<Panel>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            x_label: String::new(),
            y_label: String::new(),
            panels,
        }
    }

    /// Add a series to the first panel
    pub fn with_series(mut self, series: ChartSeries) -> Self {
        if let Some(panel) = self.panels.first_mut() {
            panel.series.push(series);
        }
        self
    }

    /// Add a dashed reference line to the first panel
    pub fn with_reference(mut self, label: impl Into<String>, y: f64) -> Self {
        if let Some(panel) = self.panels.first_mut() {
            panel.reference = Some(ReferenceLine {
                label: label.into(),
                y,
            });
        }
        self
    }

    /// Output file name with extension
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.name, extension)
    }

    /// Series across all panels
    pub fn series(&self) -> impl Iterator<Item = &ChartSeries> {
        self.panels.iter().flat_map(|p| p.series.iter())
    }
}

/// Destination for rendered charts
pub trait ChartSink {
    fn render(&mut self, chart: &Chart) -> Result<()>;
}

/// Keeps every chart in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    charts: Vec<Chart>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn charts(&self) -> &[Chart] {
        &self.charts
    }

    /// Names of the recorded charts in render order
    pub fn names(&self) -> Vec<&str> {
        self.charts.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.name == name)
    }
}

impl ChartSink for RecordingSink {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

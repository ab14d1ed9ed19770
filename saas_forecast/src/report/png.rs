//! Minimal PNG chart renderer
//!
//! Draws axes with tick marks, a light grid, the series of each panel and a
//! colour-swatch legend onto a white canvas. Text is not rendered; titles and
//! labels stay on the [`Chart`] for sinks that can show them.

use crate::error::{ForecastError, Result};
use crate::report::{Chart, ChartSink, Panel, SeriesKind};
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GRID: Rgb<u8> = Rgb([225, 225, 225]);
const REFERENCE: Rgb<u8> = Rgb([214, 39, 40]);

const PALETTE: [Rgb<u8>; 10] = [
    Rgb([31, 119, 180]),
    Rgb([255, 127, 14]),
    Rgb([44, 160, 44]),
    Rgb([148, 103, 189]),
    Rgb([140, 86, 75]),
    Rgb([227, 119, 194]),
    Rgb([127, 127, 127]),
    Rgb([188, 189, 34]),
    Rgb([23, 190, 207]),
    Rgb([214, 39, 40]),
];

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 20;
const MARGIN_TOP: u32 = 20;
const MARGIN_BOTTOM: u32 = 40;
const PANEL_GAP: u32 = 30;
const GRID_LINES: u32 = 5;
const DASH: i64 = 8;
const TICK: i64 = 5;
const LEGEND_SWATCH: i64 = 10;
const LEGEND_PAD: i64 = 6;

/// Pixel rectangle of a panel's plotting area
#[derive(Debug, Clone, Copy)]
struct Area {
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

/// Data range mapped onto an [`Area`]
#[derive(Debug, Clone, Copy)]
struct Bounds {
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,
}

impl Bounds {
    fn of(panel: &Panel) -> Option<Self> {
        let mut points = panel.series.iter().flat_map(|s| s.finite_points()).peekable();
        points.peek()?;

        let mut bounds = Bounds {
            x_min: f64::INFINITY,
            x_max: f64::NEG_INFINITY,
            y_min: f64::INFINITY,
            y_max: f64::NEG_INFINITY,
        };
        for (x, y) in points {
            bounds.x_min = bounds.x_min.min(x);
            bounds.x_max = bounds.x_max.max(x);
            bounds.y_min = bounds.y_min.min(y);
            bounds.y_max = bounds.y_max.max(y);
        }

        if panel.series.iter().any(|s| s.kind == SeriesKind::Bar) {
            bounds.y_min = bounds.y_min.min(0.0);
            bounds.y_max = bounds.y_max.max(0.0);
            bounds.x_min -= 0.5;
            bounds.x_max += 0.5;
        }
        if let Some(reference) = panel.reference.as_ref().filter(|r| r.y.is_finite()) {
            bounds.y_min = bounds.y_min.min(reference.y);
            bounds.y_max = bounds.y_max.max(reference.y);
        }

        if bounds.x_max - bounds.x_min <= f64::EPSILON {
            bounds.x_min -= 1.0;
            bounds.x_max += 1.0;
        }
        let span = bounds.y_max - bounds.y_min;
        if span <= f64::EPSILON {
            bounds.y_min -= 1.0;
            bounds.y_max += 1.0;
        } else {
            bounds.y_min -= span * 0.05;
            bounds.y_max += span * 0.05;
        }

        Some(bounds)
    }

    fn project(&self, area: &Area, x: f64, y: f64) -> (i64, i64) {
        let fx = (x - self.x_min) / (self.x_max - self.x_min);
        let fy = (y - self.y_min) / (self.y_max - self.y_min);
        (
            area.left + (fx * area.width as f64).round() as i64,
            area.top + area.height - (fy * area.height as f64).round() as i64,
        )
    }
}

fn put(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line; `dashed` skips every other run of [`DASH`] pixels
fn draw_line(img: &mut RgbImage, from: (i64, i64), to: (i64, i64), color: Rgb<u8>, dashed: bool) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut step = 0i64;

    loop {
        if !dashed || (step / DASH) % 2 == 0 {
            put(img, x, y, color);
        }
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
        step += 1;
    }
}

fn fill_rect(img: &mut RgbImage, left: i64, top: i64, right: i64, bottom: i64, color: Rgb<u8>) {
    for y in top.min(bottom)..=top.max(bottom) {
        for x in left.min(right)..=left.max(right) {
            put(img, x, y, color);
        }
    }
}

fn draw_frame(img: &mut RgbImage, area: &Area) {
    let right = area.left + area.width;
    let bottom = area.top + area.height;

    for i in 1..=GRID_LINES as i64 {
        let y = area.top + area.height * i / (GRID_LINES as i64 + 1);
        let x = area.left + area.width * i / (GRID_LINES as i64 + 1);
        draw_line(img, (area.left, y), (right, y), GRID, false);
        draw_line(img, (x, area.top), (x, bottom), GRID, false);
    }

    for i in 0..=GRID_LINES as i64 + 1 {
        let y = area.top + area.height * i / (GRID_LINES as i64 + 1);
        let x = area.left + area.width * i / (GRID_LINES as i64 + 1);
        draw_line(img, (area.left - TICK, y), (area.left, y), BLACK, false);
        draw_line(img, (x, bottom), (x, bottom + TICK), BLACK, false);
    }

    draw_line(img, (area.left, area.top), (area.left, bottom), BLACK, false);
    draw_line(img, (area.left, bottom), (right, bottom), BLACK, false);
}

/// Pixel box `(left, top, right, bottom)` of the `slot`-th legend swatch,
/// stacked down the top-right corner of the panel
fn legend_slot(area: &Area, slot: usize) -> (i64, i64, i64, i64) {
    let right = area.left + area.width - LEGEND_PAD;
    let top = area.top + LEGEND_PAD + slot as i64 * (LEGEND_SWATCH + LEGEND_PAD / 2);
    (right - LEGEND_SWATCH, top, right, top + LEGEND_SWATCH)
}

fn draw_swatch(img: &mut RgbImage, area: &Area, slot: usize, color: Rgb<u8>) {
    let (left, top, right, bottom) = legend_slot(area, slot);
    fill_rect(img, left, top, right, bottom, BLACK);
    fill_rect(img, left + 1, top + 1, right - 1, bottom - 1, color);
}

fn draw_legend(img: &mut RgbImage, panel: &Panel, area: &Area) {
    let mut slot = 0;
    for (index, series) in panel.series.iter().enumerate() {
        if series.label.is_empty() {
            continue;
        }
        draw_swatch(img, area, slot, PALETTE[index % PALETTE.len()]);
        slot += 1;
    }
    if panel.reference.is_some() {
        draw_swatch(img, area, slot, REFERENCE);
    }
}

fn draw_panel(img: &mut RgbImage, panel: &Panel, area: &Area) {
    draw_frame(img, area);

    let bounds = match Bounds::of(panel) {
        Some(bounds) => bounds,
        None => return,
    };

    let bar_series = panel
        .series
        .iter()
        .filter(|s| s.kind == SeriesKind::Bar)
        .count()
        .max(1) as i64;
    let bar_slots = panel
        .series
        .iter()
        .filter(|s| s.kind == SeriesKind::Bar)
        .map(|s| s.points.len())
        .max()
        .unwrap_or(1)
        .max(1) as i64;
    let bar_width = (area.width / (bar_slots * (bar_series + 1))).max(1);
    let mut bar_index = 0i64;

    for (index, series) in panel.series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];

        match series.kind {
            SeriesKind::Line => {
                let mut previous: Option<(i64, i64)> = None;
                for &(x, y) in &series.points {
                    if !(x.is_finite() && y.is_finite()) {
                        previous = None;
                        continue;
                    }
                    let point = bounds.project(area, x, y);
                    if let Some(from) = previous {
                        draw_line(img, from, point, color, false);
                        draw_line(img, (from.0, from.1 + 1), (point.0, point.1 + 1), color, false);
                    }
                    previous = Some(point);
                }
            }
            SeriesKind::Scatter => {
                for (x, y) in series.finite_points() {
                    let (px, py) = bounds.project(area, x, y);
                    fill_rect(img, px - 2, py - 2, px + 2, py + 2, color);
                }
            }
            SeriesKind::Bar => {
                let (_, baseline) = bounds.project(area, bounds.x_min, 0.0);
                let offset = (bar_index - (bar_series - 1) / 2) * bar_width - bar_width / 2;
                for (x, y) in series.finite_points() {
                    let (px, py) = bounds.project(area, x, y);
                    fill_rect(img, px + offset, py, px + offset + bar_width - 1, baseline, color);
                }
                bar_index += 1;
            }
        }
    }

    if let Some(reference) = panel.reference.as_ref().filter(|r| r.y.is_finite()) {
        let (_, y) = bounds.project(area, bounds.x_min, reference.y);
        draw_line(img, (area.left, y), (area.left + area.width, y), REFERENCE, true);
    }

    draw_legend(img, panel, area);
}

/// Writes each chart as `<output_dir>/<name>.png`, overwriting existing files
#[derive(Debug, Clone)]
pub struct PngChartRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl PngChartRenderer {
    /// Create a renderer, creating `output_dir` if needed
    pub fn new<P: AsRef<Path>>(output_dir: P) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            output_dir,
            width: 1400,
            height: 700,
        })
    }

    /// Set the canvas size in pixels
    pub fn with_size(mut self, width: u32, height: u32) -> Result<Self> {
        if width <= MARGIN_LEFT + MARGIN_RIGHT || height <= MARGIN_TOP + MARGIN_BOTTOM {
            return Err(ForecastError::InvalidParameter(format!(
                "Canvas {}x{} is too small",
                width, height
            )));
        }
        self.width = width;
        self.height = height;
        Ok(self)
    }

    /// Where `chart` is written
    pub fn path_for(&self, chart: &Chart) -> PathBuf {
        self.output_dir.join(chart.file_name("png"))
    }

    /// Draw `chart` into an image buffer
    pub fn draw(&self, chart: &Chart) -> RgbImage {
        let mut img: RgbImage = ImageBuffer::from_pixel(self.width, self.height, WHITE);
        let panels = chart.panels.len().max(1) as u32;

        let usable = self
            .height
            .saturating_sub(MARGIN_TOP + MARGIN_BOTTOM + PANEL_GAP * (panels - 1));
        let panel_height = (usable / panels).max(1);

        for (i, panel) in chart.panels.iter().enumerate() {
            let area = Area {
                left: MARGIN_LEFT as i64,
                top: (MARGIN_TOP + i as u32 * (panel_height + PANEL_GAP)) as i64,
                width: (self.width - MARGIN_LEFT - MARGIN_RIGHT) as i64,
                height: panel_height as i64,
            };
            draw_panel(&mut img, panel, &area);
        }

        img
    }
}

impl ChartSink for PngChartRenderer {
    fn render(&mut self, chart: &Chart) -> Result<()> {
        let path = self.path_for(chart);
        self.draw(chart).save(&path)?;
        tracing::debug!(path = %path.display(), "chart written");
        Ok(())
    }
}

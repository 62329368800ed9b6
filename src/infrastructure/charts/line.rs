use plotters::coord::Shift;
use plotters::prelude::*;

use super::{draw_error, palette_color, value_range, Chart};
use crate::domain::dataset::{Cell, Dataset};
use crate::domain::error::{AppError, Result};

const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// Points of one series split at missing values
#[derive(Debug, Clone, PartialEq)]
pub struct LineSeriesData {
    pub name: String,
    pub segments: Vec<Vec<(f64, f64)>>,
}

/// Every column after the first plotted against the first
pub struct LineChart {
    x_name: String,
    /// Tick labels when the first column is not numeric; x is the row position
    x_labels: Option<Vec<String>>,
    series: Vec<LineSeriesData>,
}

impl LineChart {
    pub fn new(dataset: &Dataset) -> Result<Self> {
        let x_column = dataset.column(0).ok_or_else(|| {
            AppError::InvalidData("line chart needs at least one column".to_string())
        })?;
        if dataset.column_count() < 2 {
            return Err(AppError::InvalidData(
                "line chart needs a second column to plot against the first".to_string(),
            ));
        }

        let (xs, x_labels): (Vec<Option<f64>>, Option<Vec<String>>) = if x_column.kind.is_numeric() {
            (x_column.cells.iter().map(Cell::as_finite_f64).collect(), None)
        } else {
            (
                (0..x_column.len()).map(|i| Some(i as f64)).collect(),
                Some(x_column.cells.iter().map(|c| c.to_string()).collect()),
            )
        };

        let series = dataset.columns()[1..]
            .iter()
            .map(|column| {
                column.require_numeric()?;

                let mut segments = Vec::new();
                let mut current = Vec::new();
                for (x, cell) in xs.iter().zip(&column.cells) {
                    match (x, cell.as_finite_f64()) {
                        (Some(x), Some(y)) => current.push((*x, y)),
                        _ if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                        _ => {}
                    }
                }
                if !current.is_empty() {
                    segments.push(current);
                }

                Ok(LineSeriesData {
                    name: column.name.clone(),
                    segments,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            x_name: x_column.name.clone(),
            x_labels,
            series,
        })
    }

    pub fn series(&self) -> &[LineSeriesData] {
        &self.series
    }

    fn points(&self) -> impl Iterator<Item = &(f64, f64)> {
        self.series.iter().flat_map(|s| s.segments.iter().flatten())
    }

    fn x_tick(&self, v: f64) -> String {
        match &self.x_labels {
            Some(labels) => {
                let idx = v.round();
                if (v - idx).abs() < 1e-6 && idx >= 0.0 {
                    labels.get(idx as usize).cloned().unwrap_or_default()
                } else {
                    String::new()
                }
            }
            None => format!("{:.2}", v),
        }
    }
}

impl Chart for LineChart {
    fn size(&self) -> (u32, u32) {
        FIGURE_SIZE
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (x_lo, x_hi) = value_range(self.points().map(|p| p.0), 0.0)?;
        let (y_lo, y_hi) = value_range(self.points().map(|p| p.1), 0.05)?;

        let tick_count = match &self.x_labels {
            Some(labels) => labels.len().clamp(1, 10),
            None => 10,
        };

        let mut chart = ChartBuilder::on(root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_desc(self.x_name.as_str())
            .x_labels(tick_count)
            .x_label_formatter(&|v| self.x_tick(*v))
            .y_label_formatter(&|v| format!("{:.2}", v))
            .draw()
            .map_err(draw_error)?;

        for (i, series) in self.series.iter().enumerate() {
            let color = palette_color(i);
            for (j, segment) in series.segments.iter().enumerate() {
                let anno = chart
                    .draw_series(LineSeries::new(segment.iter().copied(), color.stroke_width(2)))
                    .map_err(draw_error)?;
                if j == 0 {
                    anno.label(series.name.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(draw_error)?;

        Ok(())
    }
}

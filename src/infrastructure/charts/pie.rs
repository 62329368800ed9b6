use std::f64::consts::PI;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{draw_error, palette_color, Chart};
use crate::domain::dataset::Dataset;
use crate::domain::error::{AppError, Result};
use crate::domain::statistics::value_counts;

const FIGURE_SIZE: (u32, u32) = (800, 800);
const LABEL_DISTANCE: f64 = 1.1;
const PCT_DISTANCE: f64 = 0.6;

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    /// Radians, counter-clockwise from 3 o'clock
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSlice {
    pub fn percent_label(&self) -> String {
        percent_label(self.fraction)
    }
}

/// Percentage to one decimal place, e.g. `33.3%`
pub fn percent_label(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Slices in the given order, starting at angle 0 and going counter-clockwise
pub fn pie_slices(counts: &[(String, usize)]) -> Vec<PieSlice> {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    let mut angle = 0.0;
    counts
        .iter()
        .map(|(label, count)| {
            let fraction = *count as f64 / total as f64;
            let start_angle = angle;
            angle += fraction * 2.0 * PI;
            PieSlice {
                label: label.clone(),
                count: *count,
                fraction,
                start_angle,
                end_angle: angle,
            }
        })
        .collect()
}

/// Value-frequency breakdown of the first column
pub struct PieChart {
    title: String,
    slices: Vec<PieSlice>,
}

impl PieChart {
    pub fn new(dataset: &Dataset) -> Result<Self> {
        let column = dataset
            .column(0)
            .ok_or_else(|| AppError::InvalidData("pie chart needs at least one column".to_string()))?;

        let slices = pie_slices(&value_counts(column));
        if slices.is_empty() {
            return Err(AppError::InvalidData(format!(
                "column '{}' has no values to chart",
                column.name
            )));
        }

        Ok(Self {
            title: column.name.clone(),
            slices,
        })
    }

    pub fn slices(&self) -> &[PieSlice] {
        &self.slices
    }
}

impl Chart for PieChart {
    fn size(&self) -> (u32, u32) {
        FIGURE_SIZE
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let area = root
            .titled(&self.title, ("sans-serif", 24))
            .map_err(draw_error)?;

        let (width, height) = area.dim_in_pixel();
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let radius = width.min(height) as f64 * 0.35;
        let point = |angle: f64, r: f64| -> (i32, i32) {
            // screen y grows downwards
            ((cx + r * angle.cos()).round() as i32, (cy - r * angle.sin()).round() as i32)
        };

        let centered = Pos::new(HPos::Center, VPos::Center);
        let label_style = TextStyle::from(("sans-serif", 18).into_font()).pos(centered);
        let pct_style = TextStyle::from(("sans-serif", 16).into_font()).pos(centered);

        for (i, slice) in self.slices.iter().enumerate() {
            let sweep = slice.end_angle - slice.start_angle;
            let steps = ((sweep / 0.02).ceil() as usize).max(2);

            let mut points = vec![point(0.0, 0.0)];
            points.extend((0..=steps).map(|s| {
                point(slice.start_angle + sweep * s as f64 / steps as f64, radius)
            }));
            area.draw(&Polygon::new(points, palette_color(i).filled()))
                .map_err(draw_error)?;

            let mid = slice.start_angle + sweep / 2.0;
            area.draw(&Text::new(
                slice.label.clone(),
                point(mid, radius * LABEL_DISTANCE),
                label_style.clone(),
            ))
            .map_err(draw_error)?;
            area.draw(&Text::new(
                slice.percent_label(),
                point(mid, radius * PCT_DISTANCE),
                pct_style.clone(),
            ))
            .map_err(draw_error)?;
        }

        Ok(())
    }
}

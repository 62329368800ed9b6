use plotters::coord::Shift;
use plotters::prelude::*;

use super::{checked_span, draw_error, palette_color, Chart};
use crate::domain::dataset::{Column, Dataset};
use crate::domain::error::{AppError, Result};

const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// Equal-width bins; `edges` has one more entry than `counts`
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBins {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

/// Bin `values` into `bins` equal-width buckets over their min..max.
/// The last bucket is closed on the right. Identical values span v-0.5..v+0.5.
/// Fails with `AppError::InvalidData` when the span overflows an `f64`.
pub fn histogram_bins(values: &[f64], bins: usize) -> Result<HistogramBins> {
    let bins = bins.max(1);
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if values.is_empty() {
        lo = 0.0;
        hi = 1.0;
    } else if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let (lo, hi) = checked_span(lo, hi)?;

    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(HistogramBins { edges, counts })
}

/// (rows, cols) of the subplot grid for `n` plots, as pandas lays out `DataFrame.hist`
pub fn grid_layout(n: usize) -> (usize, usize) {
    match n {
        0 | 1 => (1, 1),
        2 => (1, 2),
        3 | 4 => (2, 2),
        _ => {
            let mut k = 1;
            while k * k < n {
                k += 1;
            }
            if (k - 1) * k >= n {
                (k, k - 1)
            } else {
                (k, k)
            }
        }
    }
}

/// One histogram per numeric column on a fixed-size figure
pub struct HistogramGrid<'a> {
    columns: Vec<&'a Column>,
    bins: usize,
}

impl<'a> HistogramGrid<'a> {
    pub fn new(dataset: &'a Dataset, bins: usize) -> Result<Self> {
        let columns: Vec<&Column> = dataset.numeric_columns().collect();
        if columns.is_empty() {
            return Err(AppError::ColumnType(
                "histogram needs at least one numeric column".to_string(),
            ));
        }
        Ok(Self { columns, bins })
    }

    pub fn subplot_count(&self) -> usize {
        self.columns.len()
    }

    fn draw_one<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        column: &Column,
    ) -> Result<()> {
        let hist = histogram_bins(&column.finite_values(), self.bins)?;
        let x_lo = hist.edges[0];
        let x_hi = hist.edges[hist.edges.len() - 1];
        let y_hi = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;

        let mut chart = ChartBuilder::on(area)
            .caption(&column.name, ("sans-serif", 16))
            .margin(8)
            .x_label_area_size(28)
            .y_label_area_size(36)
            .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)
            .map_err(draw_error)?;

        chart
            .configure_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&|v| format!("{:.2}", v))
            .y_label_formatter(&|v| format!("{:.0}", v))
            .draw()
            .map_err(draw_error)?;

        let color = palette_color(0);
        chart
            .draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
                Rectangle::new(
                    [(hist.edges[i], 0.0), (hist.edges[i + 1], count as f64)],
                    color.filled(),
                )
            }))
            .map_err(draw_error)?;

        Ok(())
    }
}

impl Chart for HistogramGrid<'_> {
    fn size(&self) -> (u32, u32) {
        FIGURE_SIZE
    }

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let (rows, cols) = grid_layout(self.columns.len());
        let areas = root.split_evenly((rows, cols));

        for (area, column) in areas.iter().zip(&self.columns) {
            self.draw_one(area, column)?;
        }
        Ok(())
    }
}

//! Chart rendering on top of [`plotters`].
//!
//! Every chart draws into a backend created by [`render`] for that single
//! call, so concurrent requests never share drawing state. Output is SVG by
//! default; PNG needs the `raster` feature (and system fonts for labels).

mod histogram;
mod line;
mod pie;

pub use histogram::{grid_layout, histogram_bins, HistogramBins, HistogramGrid};
pub use line::{LineChart, LineSeriesData};
pub use pie::{percent_label, pie_slices, PieChart, PieSlice};

use base64::Engine as _;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::ChartFormat;

/// matplotlib's default "tab10" cycle
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];

pub fn palette_color(idx: usize) -> RGBColor {
    PALETTE[idx % PALETTE.len()]
}

/// Encoded image ready for inline embedding
#[derive(Debug, Clone, PartialEq)]
pub struct ChartImage {
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ChartImage {
    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.base64())
    }
}

pub trait Chart {
    /// Figure size in pixels
    fn size(&self) -> (u32, u32);

    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Draw `chart` into a fresh backend and encode the result
pub fn render<C: Chart>(chart: &C, format: ChartFormat) -> Result<ChartImage> {
    match format {
        ChartFormat::Svg => render_svg(chart),
        ChartFormat::Png => render_png(chart),
    }
}

fn render_svg<C: Chart>(chart: &C) -> Result<ChartImage> {
    let mut buf = String::new();
    {
        let root = SVGBackend::with_string(&mut buf, chart.size()).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        chart.draw(&root)?;
        root.present().map_err(draw_error)?;
    }
    Ok(ChartImage {
        mime: "image/svg+xml",
        bytes: buf.into_bytes(),
    })
}

#[cfg(feature = "raster")]
fn render_png<C: Chart>(chart: &C) -> Result<ChartImage> {
    let (width, height) = chart.size();
    let mut rgb = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut rgb, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;
        chart.draw(&root)?;
        root.present().map_err(draw_error)?;
    }

    let image = image::RgbImage::from_raw(width, height, rgb)
        .ok_or_else(|| AppError::RenderError("bitmap buffer has the wrong size".to_string()))?;
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(draw_error)?;

    Ok(ChartImage {
        mime: "image/png",
        bytes: out.into_inner(),
    })
}

#[cfg(not(feature = "raster"))]
fn render_png<C: Chart>(_chart: &C) -> Result<ChartImage> {
    Err(AppError::RenderError(
        "PNG output requires the `raster` feature".to_string(),
    ))
}

pub(crate) fn draw_error<E: std::fmt::Display>(err: E) -> AppError {
    AppError::RenderError(err.to_string())
}

/// Axis range covering `values`, widened when empty or degenerate.
/// Fails when the padded range does not fit in an `f64`.
pub(crate) fn value_range(values: impl IntoIterator<Item = f64>, pad: f64) -> Result<(f64, f64)> {
    let (lo, hi) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if lo > hi {
        return Ok((0.0, 1.0));
    }
    let (lo, hi) = if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        let margin = (hi - lo) * pad;
        (lo - margin, hi + margin)
    };
    checked_span(lo, hi)
}

pub(crate) fn checked_span(lo: f64, hi: f64) -> Result<(f64, f64)> {
    if lo.is_finite() && hi.is_finite() && (hi - lo).is_finite() && hi > lo {
        Ok((lo, hi))
    } else {
        Err(AppError::InvalidData(format!(
            "value range {} to {} is too wide to chart",
            lo, hi
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Blank;

    impl Chart for Blank {
        fn size(&self) -> (u32, u32) {
            (40, 30)
        }

        fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
            root.draw(&Rectangle::new([(5, 5), (20, 20)], palette_color(0).filled()))
                .map_err(draw_error)
        }
    }

    #[test]
    fn test_render_svg() {
        let image = render(&Blank, ChartFormat::Svg).unwrap();
        assert_eq!(image.mime, "image/svg+xml");
        let svg = String::from_utf8(image.bytes.clone()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(image.to_data_uri().starts_with("data:image/svg+xml;base64,"));
    }

    #[cfg(feature = "raster")]
    #[test]
    fn test_render_png_signature() {
        let image = render(&Blank, ChartFormat::Png).unwrap();
        assert_eq!(image.mime, "image/png");
        assert_eq!(&image.bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[cfg(not(feature = "raster"))]
    #[test]
    fn test_png_without_feature_is_render_error() {
        let err = render(&Blank, ChartFormat::Png).unwrap_err();
        assert!(matches!(err, AppError::RenderError(_)));
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range([1.0, 3.0], 0.0).unwrap(), (1.0, 3.0));
        assert_eq!(value_range([2.0, 2.0], 0.05).unwrap(), (1.5, 2.5));
        assert_eq!(value_range(std::iter::empty(), 0.05).unwrap(), (0.0, 1.0));
        assert_eq!(value_range([0.0, 10.0], 0.1).unwrap(), (-1.0, 11.0));
    }

    #[test]
    fn test_value_range_rejects_overflowing_span() {
        let err = value_range([-1e308, 1e308], 0.05).unwrap_err();
        assert!(matches!(err, AppError::InvalidData(_)));
        assert!(value_range([f64::MAX, f64::MAX], 0.0).is_err());
        assert!(value_range([0.0, f64::INFINITY], 0.0).is_err());
    }
}

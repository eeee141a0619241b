//! Price histogram: binning and SVG rendering.

use super::clean::CleanedRecord;
use super::SummaryError;
use anyhow::{anyhow, Result};
use plotters::prelude::*;
use serde::Serialize;
use std::path::Path;
use tracing::info;

pub const TITLE: &str = "Price distribution of eBay search results";
pub const X_LABEL: &str = "Price (€)";
pub const Y_LABEL: &str = "Frequency";

const CHART_SIZE: (u32, u32) = (1000, 500);

/// One histogram bar covering `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u32,
}

/// Equal-width frequency histogram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width intervals spanning their range.
    ///
    /// The last bin also holds the maximum. When every value is equal the
    /// range is widened to half a unit on each side.
    pub fn new(values: &[f64], bins: usize) -> Result<Self, SummaryError> {
        if values.is_empty() {
            return Err(SummaryError::EmptyTable);
        }
        let bins = bins.max(1);

        let (mut lower, mut upper) =
            values.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lower == upper {
            lower -= 0.5;
            upper += 0.5;
        }

        let width = (upper - lower) / bins as f64;
        let mut counts = vec![0u32; bins];
        for &value in values {
            let index = (((value - lower) / width) as usize).min(bins - 1);
            counts[index] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lower + width * i as f64,
                upper: if i + 1 == bins { upper } else { lower + width * (i + 1) as f64 },
                count,
            })
            .collect();

        Ok(Self { bins })
    }

    /// Sum of all bin counts.
    pub fn total(&self) -> u32 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Height of the tallest bar.
    pub fn max_count(&self) -> u32 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    fn range(&self) -> (f64, f64) {
        let lower = self.bins.first().map_or(0.0, |b| b.lower);
        let upper = self.bins.last().map_or(1.0, |b| b.upper);
        (lower, upper)
    }
}

/// Draws the price histogram and writes it as SVG to `path`.
pub fn render_histogram(cleaned: &[CleanedRecord], bins: usize, path: &Path) -> Result<()> {
    let prices: Vec<f64> = cleaned.iter().map(|r| r.price).collect();
    let histogram = Histogram::new(&prices, bins)?;
    let (x_min, x_max) = histogram.range();

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| draw_error(path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(TITLE, ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, 0u32..histogram.max_count() + 1)
        .map_err(|e| draw_error(path, e))?;

    chart
        .configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(Y_LABEL)
        .draw()
        .map_err(|e| draw_error(path, e))?;

    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new([(bin.lower, 0), (bin.upper, bin.count)], BLUE.mix(0.6).filled())
        }))
        .map_err(|e| draw_error(path, e))?;

    // Bar edges
    chart
        .draw_series(histogram.bins.iter().map(|bin| {
            Rectangle::new([(bin.lower, 0), (bin.upper, bin.count)], BLACK.stroke_width(1))
        }))
        .map_err(|e| draw_error(path, e))?;

    root.present().map_err(|e| draw_error(path, e))?;

    info!("Histogram saved to {}", path.display());
    Ok(())
}

fn draw_error(path: &Path, err: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("Failed to draw histogram to {}: {}", path.display(), err)
}

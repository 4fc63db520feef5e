//! PNG rendering of overlaid q / rho histograms.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use grisk_core::{q_column, rho_column, GriskError, GriskResult, ScenarioRecord, SegmentId};
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageEncoder, ImageError, Rgb, RgbImage};
use tracing::info;

use crate::histogram::{shared_range, Histogram, DEFAULT_BINS};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const AXIS: Rgb<u8> = Rgb([40, 40, 40]);
/// Failure probability q
const Q_COLOR: Rgb<u8> = Rgb([31, 119, 180]);
/// Compound probability rho
const RHO_COLOR: Rgb<u8> = Rgb([255, 127, 14]);
const BAR_ALPHA: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub bins: usize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            margin: 40,
            bins: DEFAULT_BINS,
        }
    }
}

fn blend(base: Rgb<u8>, over: Rgb<u8>, alpha: f32) -> Rgb<u8> {
    let mix = |b: u8, o: u8| (f32::from(b) * (1.0 - alpha) + f32::from(o) * alpha).round() as u8;
    Rgb([
        mix(base[0], over[0]),
        mix(base[1], over[1]),
        mix(base[2], over[2]),
    ])
}

fn draw_bars(img: &mut RgbImage, hist: &Histogram, scale_max: usize, color: Rgb<u8>, opts: &PlotOptions) {
    let plot_w = opts.width - 2 * opts.margin;
    let plot_h = opts.height - 2 * opts.margin;
    let baseline = opts.height - opts.margin;
    let bins = hist.bins() as u32;
    for (bin, &count) in hist.counts.iter().enumerate() {
        if count == 0 || scale_max == 0 {
            continue;
        }
        let x0 = opts.margin + bin as u32 * plot_w / bins;
        let x1 = opts.margin + (bin as u32 + 1) * plot_w / bins;
        let bar_h = (count as f64 / scale_max as f64 * f64::from(plot_h)).round() as u32;
        for x in x0..x1.max(x0 + 1) {
            for y in (baseline - bar_h)..baseline {
                let pixel = img.get_pixel_mut(x, y);
                *pixel = blend(*pixel, color, BAR_ALPHA);
            }
        }
    }
}

fn draw_axes(img: &mut RgbImage, opts: &PlotOptions) {
    let baseline = opts.height - opts.margin;
    for x in opts.margin..=(opts.width - opts.margin) {
        img.put_pixel(x, baseline, AXIS);
    }
    for y in opts.margin..=baseline {
        img.put_pixel(opts.margin, y, AXIS);
    }
}

/// Draw `q` and `rho` histograms over a shared bin range.
pub fn render_overlay(q: &Histogram, rho: &Histogram, opts: &PlotOptions) -> GriskResult<RgbImage> {
    if opts.width <= 2 * opts.margin || opts.height <= 2 * opts.margin {
        return Err(GriskError::Validation(format!(
            "plot {}x{} too small for margin {}",
            opts.width, opts.height, opts.margin
        )));
    }
    let mut img = RgbImage::from_pixel(opts.width, opts.height, BACKGROUND);
    let scale_max = q.max_count().max(rho.max_count());
    draw_bars(&mut img, q, scale_max, Q_COLOR, opts);
    draw_bars(&mut img, rho, scale_max, RHO_COLOR, opts);
    draw_axes(&mut img, opts);
    Ok(img)
}

pub fn write_png(img: &RgbImage, path: &Path) -> GriskResult<()> {
    let file =
        File::create(path).map_err(|source| GriskError::io("creating histogram", path, source))?;
    let encoder = PngEncoder::new_with_quality(
        BufWriter::new(file),
        CompressionType::Default,
        FilterType::Adaptive,
    );
    encoder
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| match e {
            ImageError::IoError(source) => GriskError::io("writing histogram", path, source),
            other => GriskError::Other(format!("encoding histogram '{}': {other}", path.display())),
        })
}

/// File name for a segment's histogram.
pub fn histogram_file_name(segment: SegmentId) -> String {
    format!("Segment_{}_Failure_Probabilities.png", segment.value())
}

/// Write one overlaid q / rho histogram per segment into `dir`.
pub fn render_segment_histograms(
    dir: &Path,
    records: &[ScenarioRecord],
    opts: &PlotOptions,
) -> GriskResult<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|source| GriskError::io("creating plot directory", dir, source))?;
    let mut written = Vec::new();
    for segment in SegmentId::all() {
        let q = q_column(records, segment);
        let rho = rho_column(records, segment);
        let range = shared_range(&[&q, &rho]).ok_or_else(|| {
            GriskError::Validation(format!("{segment}: no values to plot"))
        })?;
        let q_hist = Histogram::with_range(&q, opts.bins, range)?;
        let rho_hist = Histogram::with_range(&rho, opts.bins, range)?;
        let img = render_overlay(&q_hist, &rho_hist, opts)?;
        let path = dir.join(histogram_file_name(segment));
        write_png(&img, &path)?;
        info!(path = %path.display(), "histogram written");
        written.push(path);
    }
    Ok(written)
}

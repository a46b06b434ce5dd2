use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contours::{find_contours, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::core::MotionConfig;
use crate::video::{AnalysisFrame, ChangeRegion, MotionDetector, MotionError};

const HIGHLIGHT_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const HIGHLIGHT_THICKNESS: u32 = 2;
/// Largest analysis frame side; taller frames are not analysed.
pub const MAX_ANALYSIS_DIM: u32 = 8192;

/// Sigma OpenCV derives for a Gaussian kernel of `kernel_size` when sigma is 0.
pub fn blur_sigma(kernel_size: u32) -> f32 {
    0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Resize to the analysis width, drop to luma, then blur.
pub fn prepare(frame: &DynamicImage, config: &MotionConfig) -> Result<AnalysisFrame, MotionError> {
    let (width, height) = (frame.width(), frame.height());
    if width == 0 || height == 0 {
        return Err(MotionError::EmptyFrame { width, height });
    }

    let analysis_width = config.analysis_width.max(1);
    let scale_factor = analysis_width as f64 / width as f64;
    let analysis_height = (height as f64 * scale_factor).round().max(1.0);
    if analysis_width > MAX_ANALYSIS_DIM || analysis_height > MAX_ANALYSIS_DIM as f64 {
        return Err(MotionError::AnalysisTooLarge {
            width: analysis_width,
            height: analysis_height as u64,
        });
    }
    let analysis_height = analysis_height as u32;

    let resized = frame.resize_exact(analysis_width, analysis_height, FilterType::Triangle);
    let gray = resized.to_luma8();
    let image = gaussian_blur_f32(&gray, blur_sigma(config.blur_kernel));

    Ok(AnalysisFrame { image, scale_factor })
}

/// Regions of `current` that differ from `previous`, in original frame
/// coordinates.
pub fn detect(
    previous: &GrayImage,
    current: &GrayImage,
    scale_factor: f64,
    config: &MotionConfig,
) -> Result<Vec<ChangeRegion>, MotionError> {
    if previous.dimensions() != current.dimensions() {
        return Err(MotionError::DimensionMismatch {
            previous: previous.dimensions(),
            current: current.dimensions(),
        });
    }
    if !scale_factor.is_finite() || scale_factor <= 0.0 {
        return Err(MotionError::InvalidScale(scale_factor));
    }

    let delta = absolute_difference(previous, current);
    let mut mask = binary_threshold(&delta, config.threshold);
    if config.dilate_iterations > 0 {
        // k iterations of a 3x3 kernel == one pass with Chebyshev radius k
        mask = dilate(&mask, Norm::LInf, config.dilate_iterations);
    }

    // Blobs touching the image border are only traced as outer borders
    // when the mask is surrounded by background.
    let padded = pad_with_background(&mask);
    let regions = find_contours::<u32>(&padded)
        .into_iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
        .map(|contour| unpad(&contour.points))
        .filter(|points| contour_area(points) >= config.min_area)
        .filter_map(|points| bounding_box(&points))
        .map(|region| region.rescale(scale_factor))
        .collect();

    Ok(regions)
}

fn pad_with_background(mask: &GrayImage) -> GrayImage {
    let mut padded = GrayImage::new(mask.width() + 2, mask.height() + 2);
    image::imageops::replace(&mut padded, mask, 1, 1);
    padded
}

fn unpad(points: &[Point<u32>]) -> Vec<Point<u32>> {
    points
        .iter()
        .map(|p| Point::new(p.x.saturating_sub(1), p.y.saturating_sub(1)))
        .collect()
}

pub fn absolute_difference(a: &GrayImage, b: &GrayImage) -> GrayImage {
    GrayImage::from_fn(a.width(), a.height(), |x, y| {
        Luma([a.get_pixel(x, y)[0].abs_diff(b.get_pixel(x, y)[0])])
    })
}

/// Pixels strictly above `threshold` become 255, everything else 0.
pub fn binary_threshold(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        if image.get_pixel(x, y)[0] > threshold {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Shoelace area of the polygon through the contour points.
pub fn contour_area(points: &[Point<u32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(p, q)| p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64)
        .sum();
    twice_area.abs() as f64 / 2.0
}

pub fn bounding_box(points: &[Point<u32>]) -> Option<ChangeRegion> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(ChangeRegion {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

pub fn draw_regions(frame: &mut RgbImage, regions: &[ChangeRegion]) {
    for region in regions {
        for inset in 0..HIGHLIGHT_THICKNESS {
            let width = region.width.saturating_sub(2 * inset);
            let height = region.height.saturating_sub(2 * inset);
            if width == 0 || height == 0 {
                break;
            }
            let rect = Rect::at((region.x + inset) as i32, (region.y + inset) as i32).of_size(width, height);
            draw_hollow_rect_mut(frame, rect, HIGHLIGHT_COLOR);
        }
    }
}

/// Motion detector backed by `imageproc`.
pub struct ImageMotionDetector {
    config: MotionConfig,
}

impl ImageMotionDetector {
    pub fn new(config: MotionConfig) -> Self {
        Self { config }
    }
}

impl MotionDetector for ImageMotionDetector {
    fn is_available(&self) -> bool {
        true
    }

    fn prepare(&self, frame: &DynamicImage) -> Option<AnalysisFrame> {
        match prepare(frame, &self.config) {
            Ok(analysis) => Some(analysis),
            Err(e) => {
                log::warn!("Skipping motion analysis for this frame: {}", e);
                None
            }
        }
    }

    fn detect(&self, previous: &AnalysisFrame, current: &AnalysisFrame) -> Vec<ChangeRegion> {
        match detect(&previous.image, &current.image, current.scale_factor, &self.config) {
            Ok(regions) => {
                log::debug!("Detected {} changed regions", regions.len());
                regions
            }
            Err(e) => {
                log::warn!("Motion detection failed, showing frame without highlights: {}", e);
                Vec::new()
            }
        }
    }

    fn highlight(&self, frame: &mut RgbImage, regions: &[ChangeRegion]) {
        draw_regions(frame, regions);
    }
}

use image::{DynamicImage, GrayImage, RgbImage};
use thiserror::Error;

use crate::core::MotionConfig;

/// Whether this build carries the image-analysis pipeline.
pub const MOTION_SUPPORTED: bool = cfg!(feature = "motion");

/// Rectangle that changed between two consecutive frames, in original frame
/// pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChangeRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ChangeRegion {
    /// Maps a box measured on an analysis frame back onto the original frame.
    pub fn rescale(self, scale_factor: f64) -> Self {
        let back = |v: u32| (v as f64 / scale_factor).round() as u32;
        Self {
            x: back(self.x),
            y: back(self.y),
            width: back(self.width).max(1),
            height: back(self.height).max(1),
        }
    }
}

/// Downscaled, grayscale, blurred copy of a frame used only for differencing.
#[derive(Debug, Clone)]
pub struct AnalysisFrame {
    pub image: GrayImage,
    /// `analysis width / original width` for the frame this was built from.
    pub scale_factor: f64,
}

impl AnalysisFrame {
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("Frame has no pixels ({width}x{height})")]
    EmptyFrame { width: u32, height: u32 },

    #[error("Analysis frames differ in size: previous {previous:?}, current {current:?}")]
    DimensionMismatch {
        previous: (u32, u32),
        current: (u32, u32),
    },

    #[error("Analysis frame would be {width}x{height}, too large to analyse")]
    AnalysisTooLarge { width: u32, height: u64 },

    #[error("Invalid scale factor {0}")]
    InvalidScale(f64),
}

/// Change detection between consecutive frames.
///
/// Implementations never fail a navigation step: anything that goes wrong
/// inside the pipeline is logged and reported as "no regions".
pub trait MotionDetector {
    fn is_available(&self) -> bool;

    fn prepare(&self, frame: &DynamicImage) -> Option<AnalysisFrame>;

    fn detect(&self, previous: &AnalysisFrame, current: &AnalysisFrame) -> Vec<ChangeRegion>;

    fn highlight(&self, frame: &mut RgbImage, regions: &[ChangeRegion]);
}

/// Stand-in used when highlighting is disabled or not compiled in.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMotionDetector;

impl MotionDetector for NoopMotionDetector {
    fn is_available(&self) -> bool {
        false
    }

    fn prepare(&self, _frame: &DynamicImage) -> Option<AnalysisFrame> {
        None
    }

    fn detect(&self, _previous: &AnalysisFrame, _current: &AnalysisFrame) -> Vec<ChangeRegion> {
        Vec::new()
    }

    fn highlight(&self, _frame: &mut RgbImage, _regions: &[ChangeRegion]) {}
}

/// Picks the detector once at startup.
pub fn detector_for(config: &MotionConfig) -> Box<dyn MotionDetector> {
    if !config.enabled {
        log::info!("Motion highlighting disabled by configuration");
        return Box::new(NoopMotionDetector);
    }

    pipeline_detector(config)
}

#[cfg(feature = "motion")]
fn pipeline_detector(config: &MotionConfig) -> Box<dyn MotionDetector> {
    log::info!(
        "Motion highlighting enabled (analysis width {}, threshold {}, min area {})",
        config.analysis_width,
        config.threshold,
        config.min_area
    );
    Box::new(crate::video::ImageMotionDetector::new(config.clone()))
}

#[cfg(not(feature = "motion"))]
fn pipeline_detector(_config: &MotionConfig) -> Box<dyn MotionDetector> {
    log::warn!("Motion highlighting requested but this build has no image-analysis support");
    Box::new(NoopMotionDetector)
}

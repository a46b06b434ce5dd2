pub mod motion;
#[cfg(feature = "motion")]
pub mod pipeline;

pub use motion::*;
#[cfg(feature = "motion")]
pub use pipeline::ImageMotionDetector;

use image::RgbImage;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::core::{AppConfig, Direction, FrameSet, Navigator, Target, ViewerError, ViewerResult};
use crate::video::{AnalysisFrame, ChangeRegion, MotionDetector};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Ready,
}

/// Operations the UI can request from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Previous,
    GoTo(usize),
    OpenDirectory(PathBuf),
    SetStepSize(NonZeroUsize),
}

/// Everything the UI needs to show one navigation step.
#[derive(Debug, Clone)]
pub struct RenderedFrame {
    pub index: usize,
    pub total: usize,
    pub path: PathBuf,
    pub image: RgbImage,
    pub regions: Vec<ChangeRegion>,
    pub caption: String,
}

pub fn status_caption(index: usize, total: usize, path: &Path) -> String {
    format!("[{}/{}] {}", index + 1, total, path.display())
}

/// Frame set, position and the last analysis frame for one open directory.
///
/// All operations take `&mut self` and run to completion, so requests from
/// the UI are handled strictly one after another.
pub struct ViewerSession {
    frames: Option<FrameSet>,
    navigator: Navigator,
    detector: Box<dyn MotionDetector>,
    previous_analysis: Option<AnalysisFrame>,
}

impl ViewerSession {
    pub fn new(config: &AppConfig, detector: Box<dyn MotionDetector>) -> Self {
        Self {
            frames: None,
            navigator: Navigator::new(config.step_size()),
            detector,
            previous_analysis: None,
        }
    }

    pub fn state(&self) -> SessionState {
        match self.frames {
            Some(_) => SessionState::Ready,
            None => SessionState::Empty,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.navigator.current()
    }

    pub fn frame_count(&self) -> usize {
        self.frames.as_ref().map(FrameSet::len).unwrap_or(0)
    }

    pub fn directory(&self) -> Option<&Path> {
        self.frames.as_ref().map(FrameSet::root)
    }

    pub fn step_size(&self) -> NonZeroUsize {
        self.navigator.step_size()
    }

    pub fn set_step_size(&mut self, step_size: NonZeroUsize) {
        log::debug!("Step size set to {}", step_size);
        self.navigator.set_step_size(step_size);
    }

    pub fn motion_available(&self) -> bool {
        self.detector.is_available()
    }

    pub fn dispatch(&mut self, command: ViewerCommand) -> ViewerResult<Option<RenderedFrame>> {
        match command {
            ViewerCommand::Next => self.next().map(Some),
            ViewerCommand::Previous => self.previous().map(Some),
            ViewerCommand::GoTo(index) => self.go_to(index).map(Some),
            ViewerCommand::OpenDirectory(path) => self.open_directory(&path).map(Some),
            ViewerCommand::SetStepSize(step_size) => {
                self.set_step_size(step_size);
                Ok(None)
            }
        }
    }

    /// Replaces the frame set and shows the first frame.
    ///
    /// On failure the previously open directory (if any) stays as it was.
    pub fn open_directory(&mut self, path: &Path) -> ViewerResult<RenderedFrame> {
        log::info!("Opening directory: {}", path.display());
        let frames = FrameSet::build(path)?;

        self.navigator.reset_to(frames.len());
        self.frames = Some(frames);
        self.previous_analysis = None;

        self.go_to(0)
    }

    pub fn next(&mut self) -> ViewerResult<RenderedFrame> {
        self.navigate(Target::Step(Direction::Forward))
    }

    pub fn previous(&mut self) -> ViewerResult<RenderedFrame> {
        self.navigate(Target::Step(Direction::Backward))
    }

    pub fn go_to(&mut self, index: usize) -> ViewerResult<RenderedFrame> {
        self.navigate(Target::Index(index))
    }

    fn navigate(&mut self, target: Target) -> ViewerResult<RenderedFrame> {
        let frames = self.frames.as_ref().ok_or(ViewerError::NoDirectory)?;
        let index = self.navigator.validate(self.navigator.compute_target(target))?;
        let path = frames.path_at(index)?.to_path_buf();
        let total = frames.len();

        let decoded = image::open(&path).map_err(|source| ViewerError::FrameLoad {
            path: path.clone(),
            source,
        })?;
        self.navigator.commit(index as i64)?;
        log::debug!("Showing frame {} of {}: {}", index + 1, total, path.display());

        let analysis = self.detector.prepare(&decoded);
        let regions = match (&self.previous_analysis, &analysis) {
            (Some(previous), Some(current)) => self.detector.detect(previous, current),
            _ => Vec::new(),
        };
        self.previous_analysis = analysis;

        let mut image = decoded.into_rgb8();
        if !regions.is_empty() {
            self.detector.highlight(&mut image, &regions);
        }

        Ok(RenderedFrame {
            index,
            total,
            caption: status_caption(index, total, &path),
            path,
            image,
            regions,
        })
    }
}

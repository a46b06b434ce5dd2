#[cfg(test)]
mod tests {

    use std::cell::Cell;
    use std::num::NonZeroUsize;
    use std::path::Path;
    use std::rc::Rc;

    use image::{DynamicImage, GrayImage, Rgb, RgbImage};

    use crate::core::{status_caption, AppConfig, SessionState, ViewerCommand, ViewerError, ViewerSession};
    use crate::video::{AnalysisFrame, ChangeRegion, MotionDetector, NoopMotionDetector};

    /// Detector that reports one fixed region per comparison and counts calls.
    struct RecordingDetector {
        detect_calls: Rc<Cell<usize>>,
        highlight_calls: Rc<Cell<usize>>,
    }

    const FAKE_REGION: ChangeRegion = ChangeRegion { x: 1, y: 2, width: 3, height: 4 };

    impl MotionDetector for RecordingDetector {
        fn is_available(&self) -> bool {
            true
        }

        fn prepare(&self, frame: &DynamicImage) -> Option<AnalysisFrame> {
            Some(AnalysisFrame {
                image: GrayImage::new(frame.width(), frame.height()),
                scale_factor: 1.0,
            })
        }

        fn detect(&self, _previous: &AnalysisFrame, _current: &AnalysisFrame) -> Vec<ChangeRegion> {
            self.detect_calls.set(self.detect_calls.get() + 1);
            vec![FAKE_REGION]
        }

        fn highlight(&self, _frame: &mut RgbImage, _regions: &[ChangeRegion]) {
            self.highlight_calls.set(self.highlight_calls.get() + 1);
        }
    }

    fn write_frame(path: &Path) {
        write_frame_with_square(path, None);
    }

    fn write_frame_with_square(path: &Path, square_at: Option<(u32, u32)>) {
        let mut image = RgbImage::from_pixel(400, 300, Rgb([60, 60, 60]));
        if let Some((sx, sy)) = square_at {
            for y in sy..sy + 80 {
                for x in sx..sx + 80 {
                    image.put_pixel(x, y, Rgb([250, 250, 250]));
                }
            }
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        image.save(path).unwrap();
    }

    fn frames_dir(count: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..count {
            write_frame(&dir.path().join(format!("{:05}-capture.jpg", i + 1)));
        }
        dir
    }

    fn noop_session() -> ViewerSession {
        ViewerSession::new(&AppConfig::default(), Box::new(NoopMotionDetector))
    }

    fn recording_session() -> (ViewerSession, Rc<Cell<usize>>, Rc<Cell<usize>>) {
        let detect_calls = Rc::new(Cell::new(0));
        let highlight_calls = Rc::new(Cell::new(0));
        let detector = RecordingDetector {
            detect_calls: detect_calls.clone(),
            highlight_calls: highlight_calls.clone(),
        };
        (
            ViewerSession::new(&AppConfig::default(), Box::new(detector)),
            detect_calls,
            highlight_calls,
        )
    }

    fn step(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = noop_session();

        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.current_index(), None);
        assert_eq!(session.frame_count(), 0);
        assert!(!session.motion_available());
    }

    #[test]
    fn test_open_directory_shows_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(&dir.path().join("a.jpg"));
        write_frame(&dir.path().join("c.jpg"));
        write_frame(&dir.path().join("b.jpg"));
        let mut session = noop_session();

        let rendered = session.open_directory(dir.path()).unwrap();

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.frame_count(), 3);
        assert_eq!(rendered.index, 0);
        assert_eq!(rendered.total, 3);
        assert!(rendered.path.ends_with("a.jpg"));
        assert_eq!(rendered.caption, format!("[1/3] {}", dir.path().join("a.jpg").display()));
        assert_eq!(rendered.image.dimensions(), (400, 300));
    }

    #[test]
    fn test_next_and_previous_follow_sorted_order() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(&dir.path().join("a.jpg"));
        write_frame(&dir.path().join("c.jpg"));
        write_frame(&dir.path().join("b.jpg"));
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();

        assert!(session.next().unwrap().path.ends_with("b.jpg"));
        assert!(session.next().unwrap().path.ends_with("c.jpg"));
        assert!(session.previous().unwrap().path.ends_with("b.jpg"));
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn test_navigation_requires_open_directory() {
        let mut session = noop_session();

        assert!(matches!(session.next(), Err(ViewerError::NoDirectory)));
        assert!(matches!(session.previous(), Err(ViewerError::NoDirectory)));
        assert!(matches!(session.go_to(0), Err(ViewerError::NoDirectory)));
    }

    #[test]
    fn test_step_past_end_leaves_position() {
        let dir = frames_dir(5);
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();
        session.go_to(4).unwrap();
        session.set_step_size(step(2));

        let result = session.next();

        assert!(matches!(result, Err(ViewerError::OutOfBounds { target: 6, count: 5 })));
        assert_eq!(session.current_index(), Some(4));
    }

    #[test]
    fn test_step_size_applies_both_ways() {
        let dir = frames_dir(10);
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();
        session.set_step_size(step(3));

        assert_eq!(session.next().unwrap().index, 3);
        assert_eq!(session.next().unwrap().index, 6);
        assert_eq!(session.next().unwrap().index, 9);
        assert!(session.next().is_err());
        assert_eq!(session.previous().unwrap().index, 6);
        assert_eq!(session.previous().unwrap().index, 3);
        assert_eq!(session.previous().unwrap().index, 0);
        assert!(matches!(session.previous(), Err(ViewerError::OutOfBounds { target: -3, .. })));
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn test_go_to_ignores_step_size() {
        let dir = frames_dir(6);
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();
        session.set_step_size(step(4));

        for k in [5, 0, 3, 1] {
            assert_eq!(session.go_to(k).unwrap().index, k);
            assert_eq!(session.current_index(), Some(k));
        }
        assert!(session.go_to(6).is_err());
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn test_go_to_current_is_idempotent() {
        let dir = frames_dir(4);
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();
        let first = session.go_to(2).unwrap();

        let second = session.go_to(2).unwrap();

        assert_eq!(session.current_index(), Some(2));
        assert_eq!(first.caption, second.caption);
        assert_eq!(first.path, second.path);
    }

    #[test]
    fn test_empty_directory_keeps_session_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = noop_session();

        let result = session.open_directory(dir.path());

        assert!(matches!(result, Err(ViewerError::EmptyDirectory(_))));
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[test]
    fn test_failed_open_keeps_previous_directory() {
        let frames = frames_dir(3);
        let empty = tempfile::tempdir().unwrap();
        let mut session = noop_session();
        session.open_directory(frames.path()).unwrap();
        session.go_to(2).unwrap();

        assert!(session.open_directory(empty.path()).is_err());

        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(session.directory(), Some(frames.path()));
        assert_eq!(session.current_index(), Some(2));
        assert_eq!(session.frame_count(), 3);
    }

    #[test]
    fn test_reopening_resets_position() {
        let first = frames_dir(5);
        let second = frames_dir(2);
        let mut session = noop_session();
        session.open_directory(first.path()).unwrap();
        session.go_to(4).unwrap();

        let rendered = session.open_directory(second.path()).unwrap();

        assert_eq!(rendered.index, 0);
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.frame_count(), 2);
    }

    #[test]
    fn test_corrupt_frame_aborts_only_that_step() {
        let dir = tempfile::tempdir().unwrap();
        write_frame(&dir.path().join("a.jpg"));
        std::fs::write(dir.path().join("b.jpg"), b"not a jpeg").unwrap();
        write_frame(&dir.path().join("c.jpg"));
        let mut session = noop_session();
        session.open_directory(dir.path()).unwrap();

        let result = session.next();

        assert!(matches!(result, Err(ViewerError::FrameLoad { .. })));
        assert_eq!(session.current_index(), Some(0));
        assert_eq!(session.go_to(2).unwrap().index, 2);
    }

    #[test]
    fn test_first_frame_has_no_predecessor() {
        let dir = frames_dir(3);
        let (mut session, detect_calls, highlight_calls) = recording_session();

        let first = session.open_directory(dir.path()).unwrap();

        assert!(first.regions.is_empty());
        assert_eq!(detect_calls.get(), 0);
        assert_eq!(highlight_calls.get(), 0);

        let second = session.next().unwrap();

        assert_eq!(second.regions, vec![FAKE_REGION]);
        assert_eq!(detect_calls.get(), 1);
        assert_eq!(highlight_calls.get(), 1);
    }

    #[test]
    fn test_reopening_clears_previous_analysis() {
        let first = frames_dir(2);
        let second = frames_dir(2);
        let (mut session, detect_calls, _) = recording_session();
        session.open_directory(first.path()).unwrap();
        session.next().unwrap();
        assert_eq!(detect_calls.get(), 1);

        let rendered = session.open_directory(second.path()).unwrap();

        assert!(rendered.regions.is_empty());
        assert_eq!(detect_calls.get(), 1);
    }

    #[test]
    fn test_failed_step_does_not_touch_previous_analysis() {
        let dir = frames_dir(2);
        let (mut session, detect_calls, _) = recording_session();
        session.open_directory(dir.path()).unwrap();

        assert!(session.previous().is_err());
        assert_eq!(detect_calls.get(), 0);
    }

    #[test]
    fn test_dispatch_routes_commands() {
        let dir = frames_dir(6);
        let mut session = noop_session();

        let opened = session
            .dispatch(ViewerCommand::OpenDirectory(dir.path().to_path_buf()))
            .unwrap()
            .unwrap();
        assert_eq!(opened.index, 0);

        assert!(session.dispatch(ViewerCommand::SetStepSize(step(2))).unwrap().is_none());
        assert_eq!(session.step_size(), step(2));

        assert_eq!(session.dispatch(ViewerCommand::Next).unwrap().unwrap().index, 2);
        assert_eq!(session.dispatch(ViewerCommand::GoTo(5)).unwrap().unwrap().index, 5);
        assert_eq!(session.dispatch(ViewerCommand::Previous).unwrap().unwrap().index, 3);
    }

    #[test]
    fn test_session_uses_configured_step_size() {
        let mut config = AppConfig::default();
        config.step_size = 5;
        let session = ViewerSession::new(&config, Box::new(NoopMotionDetector));

        assert_eq!(session.step_size(), step(5));
    }

    #[test]
    fn test_status_caption_is_one_based() {
        let caption = status_caption(0, 12, Path::new("/frames/00001-capture.jpg"));

        assert_eq!(caption, "[1/12] /frames/00001-capture.jpg");
    }

    #[cfg(feature = "motion")]
    mod motion {
        use super::*;
        use crate::core::MotionConfig;
        use crate::video::ImageMotionDetector;

        fn motion_session() -> ViewerSession {
            let detector = ImageMotionDetector::new(MotionConfig::default());
            ViewerSession::new(&AppConfig::default(), Box::new(detector))
        }

        #[test]
        fn test_identical_frames_are_not_highlighted() {
            let dir = tempfile::tempdir().unwrap();
            write_frame_with_square(&dir.path().join("a.jpg"), Some((50, 50)));
            write_frame_with_square(&dir.path().join("b.jpg"), Some((50, 50)));
            let mut session = motion_session();
            session.open_directory(dir.path()).unwrap();

            let rendered = session.next().unwrap();

            assert!(rendered.regions.is_empty());
        }

        #[test]
        fn test_moving_square_is_highlighted() {
            let dir = tempfile::tempdir().unwrap();
            write_frame_with_square(&dir.path().join("a.jpg"), Some((40, 40)));
            write_frame_with_square(&dir.path().join("b.jpg"), Some((260, 180)));
            let mut session = motion_session();
            session.open_directory(dir.path()).unwrap();

            let rendered = session.next().unwrap();

            assert!(!rendered.regions.is_empty());
            for region in &rendered.regions {
                assert!(region.x + region.width <= 400 + 2);
                assert!(region.y + region.height <= 300 + 2);
            }
            // The square's new position lies inside one of the boxes
            assert!(rendered.regions.iter().any(|r| {
                r.x <= 260 && r.y <= 180 && r.x + r.width >= 340 && r.y + r.height >= 260
            }));
            // Box outline drawn in green on the displayed image
            let r = rendered.regions[0];
            assert_eq!(*rendered.image.get_pixel(r.x.min(399), r.y.min(299)), Rgb([0, 255, 0]));
        }
    }
}

use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::{ViewerError, ViewerResult};

const FRAME_EXTENSION: &str = "jpg";

/// A single still image in the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub index: usize,
    pub path: PathBuf,
}

/// Ordered, immutable list of frames found under one directory.
///
/// Frames are sorted by their full path string, so `index` is always the
/// position in that order and covers `0..len()` without gaps.
#[derive(Debug, Clone)]
pub struct FrameSet {
    root: PathBuf,
    frames: Vec<Frame>,
}

impl FrameSet {
    /// Recursively collects every `*.jpg` file under `directory`.
    pub fn build(directory: &Path) -> ViewerResult<Self> {
        let mut paths: Vec<PathBuf> = WalkDir::new(directory)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("Skipping unreadable entry under {}: {}", directory.display(), e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && is_frame_file(entry.path()))
            .map(DirEntry::into_path)
            .collect();

        if paths.is_empty() {
            return Err(ViewerError::EmptyDirectory(directory.to_path_buf()));
        }

        paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        paths.dedup();

        let frames = paths
            .into_iter()
            .enumerate()
            .map(|(index, path)| Frame { index, path })
            .collect::<Vec<_>>();

        log::info!("Found {} jpg images in {}", frames.len(), directory.display());

        Ok(Self {
            root: directory.to_path_buf(),
            frames,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn path_at(&self, index: usize) -> ViewerResult<&Path> {
        self.frames
            .get(index)
            .map(|frame| frame.path.as_path())
            .ok_or(ViewerError::IndexOutOfRange {
                index,
                len: self.frames.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }
}

fn is_frame_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(FRAME_EXTENSION)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

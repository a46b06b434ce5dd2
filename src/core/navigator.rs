use std::num::NonZeroUsize;

use crate::core::{ViewerError, ViewerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// What a navigation request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Step(Direction),
    Index(usize),
}

/// Position within a frame set of `count` frames.
///
/// `current` is `None` until the first frame is committed. Targets are
/// computed as signed values so that a step before the first frame can be
/// rejected instead of wrapping.
#[derive(Debug, Clone)]
pub struct Navigator {
    current: Option<usize>,
    step_size: NonZeroUsize,
    count: usize,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(NonZeroUsize::MIN)
    }
}

impl Navigator {
    pub fn new(step_size: NonZeroUsize) -> Self {
        Self {
            current: None,
            step_size,
            count: 0,
        }
    }

    pub fn reset_to(&mut self, count: usize) {
        self.count = count;
        self.current = None;
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn step_size(&self) -> NonZeroUsize {
        self.step_size
    }

    pub fn set_step_size(&mut self, step_size: NonZeroUsize) {
        self.step_size = step_size;
    }

    pub fn compute_target(&self, target: Target) -> i64 {
        match target {
            Target::Index(index) => index as i64,
            Target::Step(direction) => {
                let current = self.current.map(|i| i as i64).unwrap_or(-1);
                let step = self.step_size.get() as i64;
                match direction {
                    Direction::Forward => current + step,
                    Direction::Backward => current - step,
                }
            }
        }
    }

    /// Checks `target` against `0..count` without moving.
    pub fn validate(&self, target: i64) -> ViewerResult<usize> {
        if target < 0 || target >= self.count as i64 {
            return Err(ViewerError::OutOfBounds {
                target,
                count: self.count,
            });
        }
        Ok(target as usize)
    }

    pub fn commit(&mut self, target: i64) -> ViewerResult<usize> {
        let index = self.validate(target)?;
        self.current = Some(index);
        Ok(index)
    }
}

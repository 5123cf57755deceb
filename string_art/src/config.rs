use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::{geometry::Point, Float};

/// Parameters of a single path computation.
///
/// A config is immutable once handed to [`crate::Algorithm`]; several
/// independent runs may share one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config<S> {
    /// Number of nails on the circle.
    pub nail_count: usize,
    /// Circle radius in pixels.
    pub radius: S,
    /// Circle center in pixels.
    pub center: Point<S>,
    /// Maximum number of steps, stalled steps included.
    pub max_steps: usize,
    /// Intensity removed from every pixel a thread crosses, in `(0, 1]`.
    pub thread_strength: S,
    /// Nominal thread width in pixels.
    pub line_weight: usize,
    /// Stop once the residual is nearly blank.
    pub auto_stop: bool,
    /// Residual maximum at or below which auto stop triggers.
    pub residual_threshold: S,
    /// Consecutive steps without a positive candidate before giving up.
    pub max_no_improve: usize,
}

impl<S: Float> Config<S>
where
    f32: AsPrimitive<S>,
    usize: AsPrimitive<S>,
{
    /// Defaults tuned for an A3 sheet, for a square image of side `size`.
    /// The circle fills the image.
    pub fn for_size(size: usize) -> Self {
        let half = size.as_() * S::HALF;
        Self {
            nail_count: 180,
            radius: half,
            center: Point { x: half, y: half },
            max_steps: 3500,
            thread_strength: 0.22f32.as_(),
            line_weight: 12,
            auto_stop: true,
            residual_threshold: 0.02f32.as_(),
            max_no_improve: 300,
        }
    }
}

impl<S: Float> Config<S> {
    pub fn validate(&self) -> Result<(), Error> {
        if self.nail_count < 2 {
            return Err(Error::NailCount(self.nail_count));
        }
        if !(self.radius > S::ZERO) || !self.radius.is_finite() {
            return Err(Error::Radius(self.radius.to_string()));
        }
        if !self.center.x.is_finite() || !self.center.y.is_finite() {
            return Err(Error::Center(self.center.to_string()));
        }
        if !(self.thread_strength > S::ZERO && self.thread_strength <= S::ONE) {
            return Err(Error::ThreadStrength(self.thread_strength.to_string()));
        }
        if self.line_weight == 0 {
            return Err(Error::LineWeight);
        }
        if !(self.residual_threshold >= S::ZERO) {
            return Err(Error::ResidualThreshold(self.residual_threshold.to_string()));
        }
        if self.max_no_improve == 0 {
            return Err(Error::MaxNoImprove);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("At least 2 nails are needed, found {0}")]
    NailCount(usize),
    #[error("Radius must be a positive number, found {0}")]
    Radius(String),
    #[error("Center must be a finite point, found {0}")]
    Center(String),
    #[error("Thread strength must be in (0, 1], found {0}")]
    ThreadStrength(String),
    #[error("Line weight must be at least 1")]
    LineWeight,
    #[error("Residual threshold must not be negative, found {0}")]
    ResidualThreshold(String),
    #[error("The stall limit must be at least 1")]
    MaxNoImprove,
}

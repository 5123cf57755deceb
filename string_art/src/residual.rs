//! Scoring and darkening chords on the residual grid.

use crate::{darkness::Darkness, geometry::Segment, image::Residual, Float};

impl<S: Float> Residual<S> {
    /// Sum of the residual intensity under the rasterized `segment`.
    ///
    /// Pixels outside the grid are ignored, so a segment lying completely
    /// outside scores `0`. A segment whose truncated endpoints fall on the
    /// same pixel has zero length and also scores `0`. `line_weight` is the
    /// nominal thread width; the score samples a single pixel wide path
    /// whatever its value.
    pub fn score(&self, segment: &Segment<S>, _line_weight: usize) -> S {
        let truncated = segment.trunc();
        if truncated.start == truncated.end {
            return S::ZERO;
        }
        self.grid()
            .get_pixel_indexes_in_segment(segment)
            .fold(S::ZERO, |acc, idx| acc + self.pixels()[idx])
    }

    /// Darkens every in-bounds pixel under `segment`.
    pub fn apply(&mut self, segment: &Segment<S>, darkness: &impl Darkness<S>, _line_weight: usize) {
        let grid = *self.grid();
        let pixels = self.pixels_mut();
        for idx in grid.get_pixel_indexes_in_segment(segment) {
            pixels[idx] = darkness.compute(pixels[idx]);
        }
    }

    /// Largest remaining intensity, `0` for an all-zero grid.
    pub fn max(&self) -> S {
        self.pixels().iter().fold(S::ZERO, |acc, &v| acc.max(v))
    }

    pub fn total(&self) -> S {
        self.pixels().iter().fold(S::ZERO, |acc, &v| acc + v)
    }
}

use std::fmt;

use bresenham::Bresenham;

use super::Point;
use crate::{raster, Float};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment<T> {
    pub start: Point<T>,
    pub end: Point<T>,
}

impl<T: fmt::Display> fmt::Display for Segment<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:2}, {:2}]", self.start, self.end)
    }
}

impl<T> Segment<T> {
    pub fn new(start: Point<T>, end: Point<T>) -> Self {
        Self { start, end }
    }
}

impl<T: Float> Segment<T> {
    pub fn length(&self) -> T {
        self.start.distance(&self.end)
    }

    /// Direction from start to end in degrees, in `[0, 360)`.
    pub fn angle(&self) -> T {
        let dy = self.end.y - self.start.y;
        let dx = self.end.x - self.start.x;
        let degrees = dy.atan2(dx).to_degrees();
        (degrees + T::THREE_SIXTY) % T::THREE_SIXTY
    }

    pub fn parallel_at_distance(&self, distance: T) -> Self {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let length = num_traits::Float::sqrt(dx * dx + dy * dy);
        if length <= T::EPSILON {
            return *self;
        }
        let offset = Point {
            x: -dy / length * distance,
            y: dx / length * distance,
        };
        Segment::new(self.start + offset, self.end + offset)
    }

    pub fn trunc(&self) -> Self {
        Self {
            start: self.start.trunc(),
            end: self.end.trunc(),
        }
    }

    /// Pixels crossed by the segment once both endpoints are truncated to
    /// integers. Yields nothing for non finite coordinates.
    pub fn pixels(&self) -> impl Iterator<Item = Point<isize>> {
        raster::rasterize(self.start.x, self.start.y, self.end.x, self.end.y)
    }
}

impl<T: num_traits::NumCast> Segment<T> {
    pub fn cast<I: num_traits::NumCast>(self) -> Option<Segment<I>> {
        self.start
            .cast()
            .and_then(|start| self.end.cast().map(|end| Segment { start, end }))
    }
}

impl Segment<isize> {
    /// Stroke pixels for drawing. Leaves out the end pixel, which is fine when
    /// painting many overlapping lines.
    pub fn stroke_between(&self) -> impl Iterator<Item = Point<isize>> {
        Bresenham::new((self.start.x, self.start.y), (self.end.x, self.end.y))
            .map(|(x, y)| Point { x, y })
    }
}

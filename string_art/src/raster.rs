//! Integer line rasterization used for scoring and darkening chords.
//!
//! [`Pixels`] walks from the start pixel to the end pixel, both included,
//! keeping the accumulated error against the ideal line and stepping one axis
//! at a time. The produced path is 8-connected and covers
//! `max(|dx|, |dy|) + 1` pixels.
//!
//! The stepping rule is not symmetric: rasterizing `a -> b` and `b -> a` may
//! visit different pixels on lines with an odd slope. Callers that only sum or
//! darken the pixels are unaffected by the order, but the start point is the
//! one the rule is anchored on, so chords are always rasterized from the
//! nail the thread is leaving.

use std::iter::FusedIterator;

use crate::geometry::Point;

/// Iterator over the pixels of a segment between two integer points.
#[derive(Clone, Debug)]
pub struct Pixels {
    curr: Point<isize>,
    end: Point<isize>,
    dx: isize,
    dy: isize,
    sx: isize,
    sy: isize,
    err: isize,
    done: bool,
}

impl Pixels {
    pub fn new(start: Point<isize>, end: Point<isize>) -> Self {
        let dx = (end.x - start.x).abs();
        let dy = (end.y - start.y).abs();
        Self {
            curr: start,
            end,
            dx,
            dy,
            sx: if start.x < end.x { 1 } else { -1 },
            sy: if start.y < end.y { 1 } else { -1 },
            err: dx - dy,
            done: false,
        }
    }
}

impl Iterator for Pixels {
    type Item = Point<isize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let point = self.curr;
        if point == self.end {
            self.done = true;
        } else {
            let e2 = 2 * self.err;
            if e2 > -self.dy {
                self.err -= self.dy;
                self.curr.x += self.sx;
            }
            if e2 < self.dx {
                self.err += self.dx;
                self.curr.y += self.sy;
            }
        }
        Some(point)
    }
}

impl FusedIterator for Pixels {}

/// Rasterizes the segment `(x0, y0) -> (x1, y1)`.
///
/// Coordinates are truncated toward zero before walking the line, so the
/// sub-pixel part of the endpoints is lost. Returns an empty iterator when a
/// coordinate is not finite or does not fit an `isize`.
pub fn rasterize<S: num_traits::Float>(x0: S, y0: S, x1: S, y1: S) -> impl Iterator<Item = Point<isize>> {
    let start = Point::new(x0, y0).cast::<isize>();
    let end = Point::new(x1, y1).cast::<isize>();
    start
        .zip(end)
        .into_iter()
        .flat_map(|(start, end)| Pixels::new(start, end))
}

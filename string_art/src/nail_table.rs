use num_traits::AsPrimitive;

use crate::{
    config,
    geometry::{Point, Segment},
    verboser::{self, Message},
    Float,
};

/// Immutable nail positions, indexed by their place on the circle.
#[derive(Clone, Debug, PartialEq)]
pub struct NailTable<S> {
    nails: Vec<Point<S>>,
}

impl<S: Float> NailTable<S> {
    /// Places `nail_count` nails evenly on a circle.
    ///
    /// Nail 0 sits at 90 degrees, `center + (0, radius)`, and every following
    /// nail advances `360 / nail_count` degrees, which runs clockwise in image
    /// coordinates.
    pub fn circle(
        nail_count: usize,
        radius: S,
        center: Point<S>,
        verboser: &mut impl verboser::Verboser,
    ) -> Result<Self, config::Error>
    where
        usize: AsPrimitive<S>,
    {
        if nail_count < 2 {
            return Err(config::Error::NailCount(nail_count));
        }
        if !(radius > S::ZERO) || !radius.is_finite() {
            return Err(config::Error::Radius(radius.to_string()));
        }
        let nails = (0..nail_count)
            .map(|i| {
                verboser.verbose(Message::CreatingNail(i));
                let theta = S::FRAC_PI_2 + S::TWO * S::PI * i.as_() / nail_count.as_();
                center.polar(radius, theta)
            })
            .collect();
        verboser.verbose(Message::CreatingNail(nail_count));
        Ok(Self { nails })
    }

    /// Builds a table from arbitrary positions. No validation is done, a table
    /// with a single nail is accepted and simply yields no candidate chords.
    pub fn from_points(nails: Vec<Point<S>>) -> Self {
        Self { nails }
    }

    pub fn nails(&self) -> &[Point<S>] {
        &self.nails
    }

    pub fn len(&self) -> usize {
        self.nails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nails.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Point<S>> {
        self.nails.get(index).copied()
    }

    /// Chord from nail `from` to nail `to`. Panics if either index is out of range.
    pub fn segment(&self, from: usize, to: usize) -> Segment<S> {
        Segment::new(self.nails[from], self.nails[to])
    }
}

use num_traits::{NumCast, Unsigned};
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{Point, Segment},
    Float,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T = usize> {
    pub height: T,
    pub width: T,
}

impl<T> Grid<T> {
    pub fn new(height: T, width: T) -> Self {
        Self { height, width }
    }
}

impl<T: Copy> Grid<T> {
    pub fn square(size: T) -> Self {
        Self {
            height: size,
            width: size,
        }
    }
}

impl<T: NumCast + Unsigned + PartialOrd + Copy> Grid<T> {
    /// Row-major indexes of the pixels crossed by `seg`, out of bounds pixels removed.
    pub fn get_pixel_indexes_in_segment<F: Float>(&self, seg: &Segment<F>) -> impl Iterator<Item = T> + '_ {
        self.get_pixel_coords_in_segment(seg)
            .filter_map(|point| self.index_of(point))
    }

    pub fn get_pixel_coords_in_segment<F: Float>(&self, seg: &Segment<F>) -> impl Iterator<Item = Point<T>> + '_ {
        seg.pixels().filter_map(|point| point.cast::<T>())
    }

    pub fn index_of(&self, point: Point<T>) -> Option<T> {
        if point.x < self.width && point.y < self.height {
            Some(point.y * self.width + point.x)
        } else {
            None
        }
    }

    pub fn len(&self) -> T {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width.is_zero() || self.height.is_zero()
    }
}

use std::ops::Deref;

use crate::{geometry::Point, Grid};

mod preprocess;

pub use preprocess::Preprocess;

/// Row-major pixel buffer of a fixed [`Grid`].
#[derive(Clone, Debug, PartialEq)]
pub struct PixelData<T> {
    pixels: Vec<T>,
    grid: Grid,
}

/// The residual intensity grid consumed by the path builder: one value in
/// `[0, 1]` per pixel, where higher means "still needs thread".
pub type Residual<S> = PixelData<S>;

impl<T> PixelData<T> {
    /// Wraps `pixels` as a square buffer of side `size`.
    pub fn square(pixels: Vec<T>, size: usize) -> Result<Self, Error> {
        Self::from_raw(pixels, Grid::square(size))
    }

    pub fn from_raw(pixels: Vec<T>, grid: Grid) -> Result<Self, Error> {
        if grid.is_empty() {
            return Err(Error::Empty);
        }
        if grid.width != grid.height {
            return Err(Error::NotSquare(grid.width, grid.height));
        }
        if pixels.len() != grid.len() {
            return Err(Error::SizeMismatch {
                expected: grid.len(),
                found: pixels.len(),
            });
        }
        Ok(Self { pixels, grid })
    }

    pub fn new(size: usize, mut builder: impl FnMut(Point<usize>) -> T) -> Result<Self, Error> {
        let grid = Grid::square(size);
        let pixels = (0..grid.height)
            .flat_map(|y| (0..grid.width).map(move |x| Point { x, y }))
            .map(&mut builder)
            .collect();
        Self::from_raw(pixels, grid)
    }

    pub fn pixels(&self) -> &[T] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [T] {
        &mut self.pixels
    }

    pub fn get(&self, point: Point<usize>) -> Option<&T> {
        self.grid.index_of(point).and_then(|idx| self.pixels.get(idx))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

impl<T: Clone> PixelData<T> {
    pub fn filled(size: usize, value: T) -> Result<Self, Error> {
        Self::square(vec![value; size * size], size)
    }
}

impl<T> Deref for PixelData<T> {
    type Target = Grid;

    fn deref(&self) -> &Self::Target {
        &self.grid
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("The image has no pixels")]
    Empty,
    #[error("The image must be square, found {0}x{1}")]
    NotSquare(usize, usize),
    #[error("Expected {expected} pixels, found {found}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("Target size must be greater than zero")]
    ZeroSize,
    #[error(transparent)]
    Decode(#[from] ::image::ImageError),
}

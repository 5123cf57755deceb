use crate::Float;

/// How much intensity a thread pass removes from a pixel.
pub trait Darkness<S>: Send + Sync {
    fn compute(&self, weight: S) -> S;
}

/// Subtracts a constant thread strength, never going below zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlatDarkness<S>(pub S);

impl<T: Float> Darkness<T> for FlatDarkness<T> {
    fn compute(&self, weight: T) -> T {
        (weight - self.0).max(T::ZERO)
    }
}

pub mod geometry {
    pub mod point;
    pub mod segment;

    pub use point::Point;
    pub use segment::Segment;
}

mod algorithm;
pub mod config;
pub mod darkness;
mod float;
pub mod grid;
pub mod image;
pub mod instructions;
mod nail_table;
pub mod preview;
pub mod raster;
mod residual;
pub mod scheme;
pub mod verboser;

pub use algorithm::*;
pub use config::Config;
pub use darkness::{Darkness, FlatDarkness};
pub use float::Float;
pub use grid::Grid;
pub use crate::image::{Preprocess, Residual};
pub use instructions::{Instruction, Instructions};
pub use nail_table::*;
pub use preview::PreviewStyle;

use std::path::Path;

use ::image::{imageops, DynamicImage, GrayImage};
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use super::{Error, Residual};
use crate::{
    verboser::{Message, Verboser},
    Float,
};

/// Turns a source picture into the residual grid the path builder works on.
///
/// The picture is converted to grayscale, cropped to its centered square,
/// resized to `size`x`size`, normalized to `[0, 1]`, optionally inverted so
/// dark areas attract thread, and finally stretched to use the full range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preprocess {
    pub size: u32,
    pub invert: bool,
}

impl Default for Preprocess {
    fn default() -> Self {
        Self {
            size: 800,
            invert: true,
        }
    }
}

impl Preprocess {
    pub fn new(size: u32, invert: bool) -> Self {
        Self { size, invert }
    }

    pub fn open<S: Float>(
        &self,
        path: impl AsRef<Path>,
        verboser: &mut impl Verboser,
    ) -> Result<Residual<S>, Error>
    where
        u8: AsPrimitive<S>,
    {
        self.run(&::image::open(path)?, verboser)
    }

    pub fn run<S: Float>(
        &self,
        image: &DynamicImage,
        verboser: &mut impl Verboser,
    ) -> Result<Residual<S>, Error>
    where
        u8: AsPrimitive<S>,
    {
        if self.size == 0 {
            return Err(Error::ZeroSize);
        }
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::Empty);
        }
        verboser.verbose(Message::Preprocessing);
        let gray = self.square(image.to_luma8());
        let mut pixels: Vec<S> = gray
            .pixels()
            .map(|pixel| {
                let value = pixel.0[0].as_() / S::TWO_FIVE_FIVE;
                if self.invert {
                    S::ONE - value
                } else {
                    value
                }
            })
            .collect();
        stretch_contrast(&mut pixels);
        Residual::square(pixels, self.size as usize)
    }

    fn square(&self, gray: GrayImage) -> GrayImage {
        let side = gray.width().min(gray.height());
        let left = (gray.width() - side) / 2;
        let top = (gray.height() - side) / 2;
        let cropped = imageops::crop_imm(&gray, left, top, side, side).to_image();
        imageops::resize(
            &cropped,
            self.size,
            self.size,
            imageops::FilterType::Lanczos3,
        )
    }
}

/// Maps the darkest pixel to 0 and the brightest to 1. Flat images are left untouched.
pub fn stretch_contrast<S: Float>(pixels: &mut [S]) {
    let (min, max) = pixels
        .iter()
        .fold((S::INFINITY, -S::INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    if max > min {
        let range = max - min;
        for value in pixels.iter_mut() {
            *value = (*value - min) / range;
        }
    }
}

//! Raster preview of the finished piece.

use num_traits::AsPrimitive;

use crate::{algorithm::Computation, geometry::Point, grid::Grid, Float};

/// Canvas side the nail marker sizes are tuned for.
const REFERENCE_SIZE: usize = 800;

/// Colors and opacity used by [`Computation::build_rgb`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewStyle {
    pub paper: [u8; 3],
    pub thread: [u8; 3],
    /// Opacity of a single thread pass, out of 255.
    pub alpha: u8,
    pub nail: [u8; 3],
    pub start: [u8; 3],
}

impl Default for PreviewStyle {
    fn default() -> Self {
        Self {
            paper: [252, 250, 245],
            thread: [25, 25, 25],
            alpha: 15,
            nail: [15, 15, 15],
            start: [200, 0, 0],
        }
    }
}

impl<S: Float> Computation<S>
where
    usize: AsPrimitive<S>,
{
    /// Renders the path on a paper colored canvas the size of the residual
    /// grid, blending every chord once per pass.
    pub fn build_rgb(&self, style: &PreviewStyle) -> ::image::RgbImage {
        let grid = *self.residual().grid();
        let alpha = style.alpha as f32 / 255.0;
        let thread = style.thread.map(f32::from);
        let mut canvas: Vec<[f32; 3]> = vec![style.paper.map(f32::from); grid.len()];

        let width = stroke_width(self.config().line_weight);
        let mut covered = Vec::new();
        for segment in self.segments() {
            covered.clear();
            for k in 0..width {
                let shift: S = k.as_() - (width - 1).as_() * S::HALF;
                let Some(line) = segment.parallel_at_distance(shift).trunc().cast::<isize>() else {
                    continue;
                };
                covered.extend(
                    line.stroke_between()
                        .chain(std::iter::once(line.end))
                        .filter_map(|p| index_of(&grid, p)),
                );
            }
            covered.sort_unstable();
            covered.dedup();
            for &idx in covered.iter() {
                for (c, t) in canvas[idx].iter_mut().zip(thread) {
                    *c += (t - *c) * alpha;
                }
            }
        }

        let nail_radius = (4 * grid.width / REFERENCE_SIZE).max(2) as isize;
        for nail in self.table().nails() {
            fill_disc(&mut canvas, &grid, *nail, nail_radius, style.nail);
        }
        if let Some(start) = self.table().get(0) {
            fill_disc(&mut canvas, &grid, start, nail_radius + 2, style.start);
        }

        let buffer = canvas
            .iter()
            .flat_map(|pixel| pixel.map(|c| c.round().clamp(0.0, 255.0) as u8))
            .collect();
        ::image::RgbImage::from_raw(grid.width as u32, grid.height as u32, buffer)
            .unwrap_or_else(|| ::image::RgbImage::new(0, 0))
    }
}

/// Preview stroke width in pixels for a nominal thread width.
pub fn stroke_width(line_weight: usize) -> usize {
    (line_weight / 5).max(2)
}

fn index_of(grid: &Grid, point: Point<isize>) -> Option<usize> {
    grid.index_of(Point {
        x: usize::try_from(point.x).ok()?,
        y: usize::try_from(point.y).ok()?,
    })
}

fn fill_disc<S: Float>(
    canvas: &mut [[f32; 3]],
    grid: &Grid,
    center: Point<S>,
    radius: isize,
    color: [u8; 3],
) {
    let Some(center) = center.trunc().cast::<isize>() else {
        return;
    };
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            if let Some(idx) = index_of(grid, Point { x: center.x + dx, y: center.y + dy }) {
                canvas[idx] = color.map(f32::from);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compute, image::Residual, verboser::Silent, Config};

    #[test]
    fn stroke_width_has_a_floor() {
        assert_eq!(stroke_width(1), 2);
        assert_eq!(stroke_width(12), 2);
        assert_eq!(stroke_width(20), 4);
    }

    #[test]
    fn empty_path_is_plain_paper_with_nails() {
        let mut config = Config::<f32>::for_size(64);
        config.max_steps = 0;
        let residual = Residual::filled(64, 1.0).unwrap();
        let computation = compute(&config, residual, &mut Silent).unwrap();
        let style = PreviewStyle::default();
        let rgb = computation.build_rgb(&style);
        assert_eq!(rgb.dimensions(), (64, 64));
        assert_eq!(rgb.get_pixel(32, 32).0, style.paper);
        // nail 0 sits at (32, 64), its marker reaches into the last rows
        assert_eq!(rgb.get_pixel(32, 63).0, style.start);
    }

    #[test]
    fn threads_darken_the_paper() {
        let mut config = Config::<f64>::for_size(64);
        config.nail_count = 16;
        config.max_steps = 40;
        let residual = Residual::filled(64, 1.0).unwrap();
        let computation = compute(&config, residual, &mut Silent).unwrap();
        assert!(!computation.path().is_empty());
        let style = PreviewStyle::default();
        let rgb = computation.build_rgb(&style);
        let darkened = rgb.pixels().filter(|p| p.0[0] < style.paper[0]).count();
        assert!(darkened > 0);
    }
}

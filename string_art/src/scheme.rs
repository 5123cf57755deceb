//! Printable nail placement scheme.
//!
//! The scheme is laid out in millimeters on a real page so that a print at
//! 100% gives the true nail positions.

use svg::{
    node::element::{Circle, Line, Polygon, Rectangle, Text},
    Document,
};

use crate::{algorithm::Computation, geometry::Point, Float};

/// Nails highlighted in red, counting from nail 0.
pub const HIGHLIGHT_EVERY: usize = 10;

const MM_PER_POINT: f64 = 25.4 / 72.0;
const BASE_FONT_PT: f64 = 8.0;

/// Page the scheme is printed on. All lengths in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SchemePage {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    /// Physical diameter of the nail circle.
    pub diameter_mm: f64,
    /// Distance between a nail and its number.
    pub label_offset_mm: f64,
}

impl Default for SchemePage {
    /// A3 portrait, 35 mm margin, 227 mm circle.
    fn default() -> Self {
        Self {
            width_mm: 297.0,
            height_mm: 420.0,
            margin_mm: 35.0,
            diameter_mm: 227.0,
            label_offset_mm: 8.0,
        }
    }
}

impl SchemePage {
    fn center(&self) -> Point<f64> {
        Point::new(self.width_mm / 2.0, self.height_mm / 2.0)
    }
}

impl<S: Float> Computation<S> {
    /// Draws the circle, reference ticks every 30 degrees, every nail with its
    /// number, a star on nail 0, the title and a legend.
    ///
    /// Nail positions are mapped from image pixels to the page with
    /// `diameter_mm / (2 * radius)` millimeters per pixel, around the page center.
    pub fn build_scheme_svg(&self, page: &SchemePage) -> Document {
        let radius = self.config().radius.to_f64().unwrap_or(f64::NAN);
        let center = self.config().center;
        let mm_per_px = page.diameter_mm / (2.0 * radius);
        let page_center = page.center();
        let circle_radius = page.diameter_mm / 2.0;
        let to_page = |p: Point<S>| {
            let dx = (p.x - center.x).to_f64().unwrap_or(f64::NAN);
            let dy = (p.y - center.y).to_f64().unwrap_or(f64::NAN);
            page_center + Point::new(dx, dy) * mm_per_px
        };
        let nails: Vec<Point<f64>> = self.table().nails().iter().map(|&n| to_page(n)).collect();

        let spacing = std::f64::consts::PI * page.diameter_mm / nails.len().max(1) as f64;
        let font_pt = BASE_FONT_PT.max((BASE_FONT_PT * 200.0 / nails.len().max(1) as f64).trunc());
        let font_size = (font_pt * MM_PER_POINT).min(spacing * 0.9);

        let mut doc = Document::new()
            .set("width", format!("{}mm", page.width_mm))
            .set("height", format!("{}mm", page.height_mm))
            .set("viewBox", format!("0 0 {} {}", fmt(page.width_mm), fmt(page.height_mm)))
            .add(
                Rectangle::new()
                    .set("width", fmt(page.width_mm))
                    .set("height", fmt(page.height_mm))
                    .set("fill", "white"),
            );

        for degrees in (0..360).step_by(30) {
            let angle = f64::from(degrees).to_radians();
            let inner = page_center.polar(circle_radius * 0.95, angle);
            let outer = page_center.polar(circle_radius * 1.05, angle);
            doc = doc.add(
                Line::new()
                    .set("x1", fmt(inner.x))
                    .set("y1", fmt(inner.y))
                    .set("x2", fmt(outer.x))
                    .set("y2", fmt(outer.y))
                    .set("stroke", "gray")
                    .set("stroke-width", "0.2")
                    .set("opacity", 0.3),
            );
        }

        doc = doc.add(
            Circle::new()
                .set("cx", fmt(page_center.x))
                .set("cy", fmt(page_center.y))
                .set("r", fmt(circle_radius))
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", "0.9"),
        );

        for (i, &nail) in nails.iter().enumerate() {
            let highlighted = i > 0 && i % HIGHLIGHT_EVERY == 0;
            let (r, color) = if highlighted { (1.4, "red") } else { (0.9, "black") };
            doc = doc.add(
                Circle::new()
                    .set("cx", fmt(nail.x))
                    .set("cy", fmt(nail.y))
                    .set("r", fmt(r))
                    .set("fill", color)
                    .set("stroke", "black")
                    .set("stroke-width", "0.2"),
            );

            let label = outward(page_center, nail, page.label_offset_mm);
            doc = doc.add(
                Text::new(i.to_string())
                    .set("x", fmt(label.x))
                    .set("y", fmt(label.y))
                    .set("font-family", "sans-serif")
                    .set("font-size", fmt(font_size))
                    .set("font-weight", if highlighted { "bold" } else { "normal" })
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "central"),
            );
        }

        if let Some(&start) = nails.first() {
            doc = doc.add(
                Polygon::new()
                    .set("points", star(start, 4.0))
                    .set("fill", "red")
                    .set("stroke", "black")
                    .set("stroke-width", "0.4"),
            );
        }

        let title_y = page.margin_mm * 0.4;
        doc = doc
            .add(
                caption(
                    format!("String Art Nail Scheme - {} nails", nails.len()),
                    Point::new(page.width_mm / 2.0, title_y),
                    18.0,
                )
                .set("font-weight", "bold")
                .set("text-anchor", "middle"),
            )
            .add(
                caption(
                    format!(
                        "Circle Diameter: {:.0}mm | Margin: {}mm",
                        page.diameter_mm, page.margin_mm
                    ),
                    Point::new(page.width_mm / 2.0, title_y + 8.0),
                    12.0,
                )
                .set("font-style", "italic")
                .set("text-anchor", "middle"),
            );

        let legend = Point::new(page.margin_mm * 0.7, page.height_mm - page.margin_mm * 0.5);
        doc.add(
            caption("★ Start (Nail 0)".to_string(), legend, 10.0)
                .set("fill", "red")
                .set("font-weight", "bold"),
        )
        .add(
            caption(
                format!("● Every {HIGHLIGHT_EVERY}th nail"),
                legend + Point::new(0.0, 6.0),
                10.0,
            )
            .set("fill", "red"),
        )
    }
}

fn fmt(value: f64) -> String {
    format!("{:.2}", value)
}

fn caption(content: String, at: Point<f64>, size_pt: f64) -> Text {
    Text::new(content)
        .set("x", fmt(at.x))
        .set("y", fmt(at.y))
        .set("font-family", "sans-serif")
        .set("font-size", fmt(size_pt * MM_PER_POINT))
        .set("dominant-baseline", "central")
}

/// `point` pushed `distance` further away from `center`.
fn outward(center: Point<f64>, point: Point<f64>, distance: f64) -> Point<f64> {
    let delta = point - center;
    let length = point.distance(&center);
    if length > f64::EPSILON {
        point + delta * (distance / length)
    } else {
        point
    }
}

/// Five pointed star centered on `at`, as an SVG `points` list.
fn star(at: Point<f64>, radius: f64) -> String {
    let inner = radius * 0.4;
    (0..10)
        .map(|k| {
            let r = if k % 2 == 0 { radius } else { inner };
            let angle = -std::f64::consts::FRAC_PI_2 + std::f64::consts::PI * f64::from(k) / 5.0;
            let p = at.polar(r, angle);
            format!("{},{}", fmt(p.x), fmt(p.y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

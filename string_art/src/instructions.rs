//! Step by step winding instructions.

use std::fmt::Write as _;

use serde::Serialize;

use crate::{algorithm::Computation, Float};

/// Extra thread recommended on top of the measured length.
pub const SAFETY_MARGIN: f64 = 1.2;

const SECTIONS: usize = 10;

/// One winding step with its physical measures.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    pub step: usize,
    pub from: usize,
    pub to: usize,
    pub length_mm: f64,
    /// Chord direction in degrees, in `[0, 360)`.
    pub angle_deg: f64,
    pub progress: f64,
    /// Which tenth of the job the step falls in, from 1.
    pub section: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructions {
    rows: Vec<Instruction>,
    total_length_mm: f64,
}

impl<S: Float> Computation<S> {
    /// Instructions for a board whose nail circle is `diameter_mm` wide.
    pub fn build_instructions(&self, diameter_mm: f64) -> Instructions {
        let radius = self.config().radius.to_f64().unwrap_or(f64::NAN);
        let mm_per_px = diameter_mm / (2.0 * radius);
        let total = self.path().len();
        let per_section = total / SECTIONS + 1;

        let rows: Vec<Instruction> = self
            .path()
            .iter()
            .zip(self.segments())
            .map(|(step, segment)| Instruction {
                step: step.step,
                from: step.from,
                to: step.to,
                length_mm: segment.length().to_f64().unwrap_or_default() * mm_per_px,
                angle_deg: segment.angle().to_f64().unwrap_or_default(),
                progress: step.step as f64 / total as f64 * 100.0,
                section: (step.step - 1) / per_section + 1,
            })
            .collect();
        let total_length_mm = rows.iter().map(|row| row.length_mm).sum();
        Instructions {
            rows,
            total_length_mm,
        }
    }
}

impl Instructions {
    pub fn rows(&self) -> &[Instruction] {
        &self.rows
    }

    pub fn total_length_mm(&self) -> f64 {
        self.total_length_mm
    }

    /// Thread to buy, in meters.
    pub fn recommended_length_m(&self) -> f64 {
        self.total_length_mm / 1000.0 * SAFETY_MARGIN
    }

    /// One row per step followed by a summary block.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from("Step,From_Nail,To_Nail,Length_mm,Angle_deg,Progress_%,Section\n");
        for row in self.rows.iter() {
            let _ = writeln!(
                csv,
                "{},{},{},{:.1},{:.1},{:.1},{}",
                row.step, row.from, row.to, row.length_mm, row.angle_deg, row.progress, row.section
            );
        }
        let _ = write!(
            csv,
            "\nSUMMARY,,,,,,\n\
             Total Steps,{},,,,,\n\
             Total Thread Length (mm),{:.1},,,,,\n\
             Total Thread Length (m),{:.2},,,,,\n\
             Recommended Thread,{:.2}m,(+20% safety margin),,,,\n",
            self.rows.len(),
            self.total_length_mm,
            self.total_length_mm / 1000.0,
            self.recommended_length_m(),
        );
        csv
    }

    pub fn to_txt(&self) -> String {
        let mut txt = format!("STRING ART INSTRUCTIONS\n{}\n\n", "=".repeat(50));
        for row in self.rows.iter() {
            let _ = writeln!(
                txt,
                "Step {:4}: Connect nail {:3} to nail {:3}",
                row.step, row.from, row.to
            );
        }
        txt
    }
}

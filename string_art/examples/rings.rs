use std::{env, fs, path::PathBuf};

use string_art::{
    compute, scheme::SchemePage, verboser::Message, Config, PreviewStyle, Residual,
};

/// Winds a synthetic target of concentric rings and writes every output next
/// to each other.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| env::temp_dir().join("string_art_rings"));
    fs::create_dir_all(&out)?;

    let size = 400;
    let center = size as f32 / 2.0;
    let residual = Residual::new(size, |p| {
        let d = ((p.x as f32 - center).powi(2) + (p.y as f32 - center).powi(2)).sqrt();
        if (d / 40.0) as usize % 2 == 0 {
            1.0
        } else {
            0.1
        }
    })?;

    let mut config = Config::<f32>::for_size(size);
    config.nail_count = 120;
    config.max_steps = 1500;

    let computation = compute(&config, residual, &mut |message: Message| {
        if let Message::Computing(step) = message {
            if step % 250 == 0 {
                println!("step {step}");
            }
        }
    })?;
    println!(
        "{} chords, stopped: {}",
        computation.path().len(),
        computation.reason()
    );

    svg::save(
        out.join("nails_scheme.svg"),
        &computation.build_scheme_svg(&SchemePage::default()),
    )?;
    computation
        .build_rgb(&PreviewStyle::default())
        .save(out.join("drawing_simulation.png"))?;
    fs::write(
        out.join("instructions.csv"),
        computation.build_instructions(227.0).to_csv(),
    )?;
    println!("written to {}", out.display());
    Ok(())
}

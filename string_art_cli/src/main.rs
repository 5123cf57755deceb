use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, ValueEnum};
use num_traits::AsPrimitive;
use serde::de::DeserializeOwned;
use string_art::{
    compute, scheme::SchemePage, verboser::Message, Config, Float, Preprocess, PreviewStyle,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input image path.
    #[arg()]
    input: PathBuf,

    /// Side in pixels of the square working image.
    #[arg(short, long, default_value_t = 800)]
    size: u32,

    /// Number of nails surrounding the image.
    #[arg(short, long)]
    nails: Option<usize>,

    /// Maximum number of steps.
    #[arg(long)]
    steps: Option<usize>,

    /// Intensity removed by each thread pass, in (0, 1].
    #[arg(long)]
    strength: Option<f32>,

    /// Nominal thread width in pixels.
    #[arg(long)]
    line_weight: Option<usize>,

    /// Keep going after the image is nearly covered.
    #[arg(long)]
    no_auto_stop: bool,

    /// Residual maximum at which auto stop triggers.
    #[arg(long)]
    threshold: Option<f32>,

    /// Consecutive steps without improvement before stopping.
    #[arg(long)]
    max_no_improve: Option<usize>,

    /// Attract thread to bright areas instead of dark ones.
    #[arg(long)]
    no_invert: bool,

    /// Precision of calculations (Single/Double).
    #[arg(short, long, default_value_t = Precision::Single)]
    precision: Precision,

    /// Physical diameter of the nail circle in millimeters.
    #[arg(long, default_value_t = 227.0)]
    diameter_mm: f64,

    /// JSON file with a full configuration. Flags still override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory. Defaults to `output` next to the input image.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Instructions file format.
    #[arg(short, long, default_value_t = Format::Csv)]
    format: Format,
}

#[derive(Clone, Copy, Debug)]
enum Precision {
    Single,
    Double,
}

impl ValueEnum for Precision {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Single, Self::Double]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Single => clap::builder::PossibleValue::new("Single")
                .alias("single")
                .alias("f32"),
            Self::Double => clap::builder::PossibleValue::new("Double")
                .alias("double")
                .alias("f64"),
        })
    }
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Single => "Single",
            Self::Double => "Double",
        })
    }
}

#[derive(Clone, Copy, Debug)]
enum Format {
    Csv,
    Txt,
    Json,
}

impl ValueEnum for Format {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Csv, Self::Txt, Self::Json]
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(match self {
            Self::Csv => clap::builder::PossibleValue::new("csv").alias("CSV"),
            Self::Txt => clap::builder::PossibleValue::new("txt")
                .alias("TXT")
                .alias("text"),
            Self::Json => clap::builder::PossibleValue::new("json").alias("JSON"),
        })
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Csv => "csv",
            Self::Txt => "txt",
            Self::Json => "json",
        })
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(fmt::layer().with_target(false))
        .init();

    let args = Args::parse();
    match args.precision {
        Precision::Single => with_precision::<f32>(&args),
        Precision::Double => with_precision::<f64>(&args),
    }
}

fn with_precision<S: Float + DeserializeOwned>(args: &Args) -> anyhow::Result<()>
where
    f32: AsPrimitive<S>,
    usize: AsPrimitive<S>,
    u8: AsPrimitive<S>,
{
    let config = load_config::<S>(args)?;
    config.validate().context("invalid configuration")?;

    let mut verboser = |message: Message| match message {
        Message::Preprocessing => tracing::info!("preprocessing image"),
        Message::Computing(step) if step % 100 == 0 => tracing::info!(step, "computing"),
        Message::Stalled(stalls) => tracing::debug!(stalls, "stalled"),
        _ => {}
    };

    let residual = Preprocess::new(args.size, !args.no_invert)
        .open(&args.input, &mut verboser)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let computation = compute(&config, residual, &mut verboser)?;
    tracing::info!(
        lines = computation.path().len(),
        steps = computation.steps(),
        reason = %computation.reason(),
        "done"
    );

    let out = match &args.output {
        Some(out) => out.clone(),
        None => args
            .input
            .parent()
            .unwrap_or(Path::new("."))
            .join("output"),
    };
    fs::create_dir_all(&out)
        .with_context(|| format!("output directory {} can not be created", out.display()))?;

    let scheme = out.join("nails_scheme.svg");
    let page = SchemePage {
        diameter_mm: args.diameter_mm,
        ..SchemePage::default()
    };
    svg::save(&scheme, &computation.build_scheme_svg(&page))
        .with_context(|| format!("failed writing {}", scheme.display()))?;
    tracing::info!(path = %scheme.display(), "scheme saved");

    let preview = out.join("drawing_simulation.png");
    computation
        .build_rgb(&PreviewStyle::default())
        .save(&preview)
        .with_context(|| format!("failed writing {}", preview.display()))?;
    tracing::info!(path = %preview.display(), "preview saved");

    let instructions = computation.build_instructions(args.diameter_mm);
    let (file, contents) = match args.format {
        Format::Csv => ("instructions.csv", instructions.to_csv()),
        Format::Txt => ("instructions.txt", instructions.to_txt()),
        Format::Json => (
            "instructions.json",
            serde_json::to_string_pretty(&instructions)?,
        ),
    };
    let file = out.join(file);
    fs::write(&file, contents).with_context(|| format!("failed writing {}", file.display()))?;
    tracing::info!(
        path = %file.display(),
        total_m = instructions.total_length_mm() / 1000.0,
        recommended_m = instructions.recommended_length_m(),
        "instructions saved"
    );
    Ok(())
}

fn load_config<S: Float + DeserializeOwned>(args: &Args) -> anyhow::Result<Config<S>>
where
    f32: AsPrimitive<S>,
    usize: AsPrimitive<S>,
{
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => Config::<S>::for_size(args.size as usize),
    };
    if let Some(nails) = args.nails {
        config.nail_count = nails;
    }
    if let Some(steps) = args.steps {
        config.max_steps = steps;
    }
    if let Some(strength) = args.strength {
        config.thread_strength = strength.as_();
    }
    if let Some(line_weight) = args.line_weight {
        config.line_weight = line_weight;
    }
    if args.no_auto_stop {
        config.auto_stop = false;
    }
    if let Some(threshold) = args.threshold {
        config.residual_threshold = threshold.as_();
    }
    if let Some(max_no_improve) = args.max_no_improve {
        config.max_no_improve = max_no_improve;
    }
    Ok(config)
}

//! Headless preview for the sketches: run one against the in-memory raster
//! and save the result as a PNG.

use std::fs;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sketches::{SketchConfig, SketchKind, Vector2};

mod render;

use render::{RenderPlan, parse_point};

const DEFAULT_SEED: u64 = 1;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read config {path}: {source}")]
    ReadConfig { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Config(#[from] sketches::ConfigError),
    #[error("render failed: {0}")]
    Surface(#[from] sketches::SurfaceError),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("pixel buffer does not match {width}x{height}")]
    Buffer { width: u32, height: u32 },
}

#[derive(Parser, Debug)]
#[command(name = "algodraw", about = "Render the portfolio sketches headless to PNG")]
struct Cli {
    /// Seed for every random and noise source; overrides the config file.
    #[arg(long, env = "ALGODRAW_SEED")]
    seed: Option<u64>,

    /// JSON sketch config, same shape as the page passes to `mountWithConfig`.
    #[arg(long, env = "ALGODRAW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the sketches and the container each binds to.
    List,
    /// Run a sketch for a number of frames and save the last one.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[arg(value_enum)]
    sketch: SketchArg,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = 600)]
    height: u32,
    #[arg(long, default_value_t = 300)]
    frames: usize,
    #[arg(long, short)]
    out: PathBuf,
    /// Click at X,Y before running. Repeatable; cycles the hero layout.
    #[arg(long = "click", value_parser = parse_point)]
    clicks: Vec<Vector2>,
    /// Hold the pointer at X,Y, which draws the static squares' rings towards it.
    #[arg(long, value_parser = parse_point)]
    pointer: Option<Vector2>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum SketchArg {
    Hero,
    Static,
    Growing,
}

impl From<SketchArg> for SketchKind {
    fn from(arg: SketchArg) -> Self {
        match arg {
            SketchArg::Hero => Self::Hero,
            SketchArg::Static => Self::StaticSquares,
            SketchArg::Growing => Self::GrowingSquares,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SketchConfig, CliError> {
    let Some(path) = path else {
        return Ok(SketchConfig::default());
    };
    let json = fs::read_to_string(path).map_err(|source| CliError::ReadConfig { path: path.clone(), source })?;
    Ok(SketchConfig::from_json(&json)?)
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for kind in SketchKind::ALL {
                println!("{kind:?}\t#{}", kind.container_id());
            }
            Ok(())
        }
        Command::Render(args) => {
            let config = load_config(cli.config.as_ref())?;
            let seed = cli.seed.or(config.seed).unwrap_or(DEFAULT_SEED);
            let plan = RenderPlan {
                kind: args.sketch.into(),
                width: args.width,
                height: args.height,
                frames: args.frames,
                clicks: args.clicks,
                pointer: args.pointer,
            };
            let raster = render::render(&config, seed, &plan)?;
            render::save_png(&raster, plan.width, plan.height, &args.out)?;
            tracing::info!(sketch = %plan.kind, frames = plan.frames, seed, out = %args.out.display(), "rendered");
            Ok(())
        }
    }
}

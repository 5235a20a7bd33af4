use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use gophers::{
    AssetSource, AssetStore, FfmpegSink, FfmpegSinkOpts, FrameGate, FrameSink, PngSequenceSink,
    RasterSurface, ShowConfig, play, trace,
};

#[derive(Parser, Debug)]
#[command(name = "gophers", version, about = "Two gophers burning books, one frame at a time")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the animation as a numbered PNG sequence.
    Frames(FramesArgs),
    /// Write the animation as an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Run the simulation without drawing and print every gopher state change.
    Trace(TraceArgs),
}

#[derive(Args, Debug)]
struct ShowArgs {
    /// JSON show configuration; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for loads and bumps.
    #[arg(long)]
    seed: Option<u64>,

    /// Frames to present before stopping.
    #[arg(long)]
    frames: Option<u64>,

    /// Directory with replacement artwork (`<name>.png` or `<name>.svg`).
    #[arg(long)]
    assets: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct FramesArgs {
    /// Output directory.
    #[arg(long)]
    out: PathBuf,

    /// Pace frames at the configured fps instead of as fast as possible.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    #[command(flatten)]
    show: ShowArgs,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of replacing an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    #[command(flatten)]
    show: ShowArgs,
}

#[derive(Args, Debug)]
struct TraceArgs {
    /// Number of scheduler steps to run.
    #[arg(long, default_value_t = 2000)]
    steps: u64,

    /// JSON show configuration; only its `sim` section is used.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for loads and bumps.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frames(args) => cmd_frames(args),
        Command::Render(args) => cmd_render(args),
        Command::Trace(args) => cmd_trace(args),
    }
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> anyhow::Result<ShowConfig> {
    let mut config = match path {
        Some(path) => ShowConfig::from_json_file(path)?,
        None => ShowConfig::default(),
    };
    if let Some(seed) = seed {
        config.sim.seed = seed;
    }
    Ok(config)
}

fn show_config(args: &ShowArgs) -> anyhow::Result<ShowConfig> {
    let mut config = load_config(args.config.as_deref(), args.seed)?;
    if let Some(frames) = args.frames {
        config.max_frames = frames;
    }
    if let Some(dir) = &args.assets {
        config.assets_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn asset_store(config: &ShowConfig) -> AssetStore {
    let source = match &config.assets_dir {
        Some(dir) => AssetSource::Dir(dir.clone()),
        None => AssetSource::Builtin,
    };
    AssetStore::load(source)
}

fn run(config: &ShowConfig, gate: FrameGate, sink: Box<dyn FrameSink>) -> anyhow::Result<u64> {
    let assets = asset_store(config);
    let mut surface = RasterSurface::new(config.canvas, config.frame_rate()?, gate, sink)?;
    let report = play(config, &mut surface, assets)?;
    Ok(report.frames)
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let config = show_config(&args.show)?;
    let gate = if args.realtime {
        FrameGate::paced(config.frame_rate()?)?
    } else {
        FrameGate::immediate()
    };
    let frames = run(&config, gate, Box::new(PngSequenceSink::new(&args.out)))?;
    eprintln!("wrote {frames} frames to {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let config = show_config(&args.show)?;
    let mut opts = FfmpegSinkOpts::new(&args.out);
    opts.overwrite = !args.no_overwrite;
    let frames = run(&config, FrameGate::immediate(), Box::new(FfmpegSink::new(opts)))?;
    eprintln!("wrote {} ({frames} frames)", args.out.display());
    Ok(())
}

fn cmd_trace(args: TraceArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.seed)?;
    let (transitions, stats) = trace(&config.sim, args.steps)?;
    for t in &transitions {
        let cart = t.cart.map_or_else(|| "-".to_string(), |l| l.to_string());
        println!(
            "step {:>6} {:<5} {} -> {} cart={cart}",
            t.step,
            t.actor.name(),
            t.from,
            t.to
        );
    }
    println!(
        "steps={} trips={}/{} replenished={} burned={} books={}",
        stats.steps, stats.trips[0], stats.trips[1], stats.replenished, stats.burned, stats.books
    );
    Ok(())
}

use std::{
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};

const BACKGROUND: starlit::Rgba8 = starlit::Rgba8 {
    r: 6,
    g: 8,
    b: 20,
    a: 255,
};

#[derive(Parser, Debug)]
#[command(name = "starlit", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a field and render one frame as a PNG.
    Frame(FrameArgs),
    /// Dump the meteor motion-curve catalog as JSON.
    Curves(CurvesArgs),
    /// Run the meteor cadences headless and print events as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct SceneArgs {
    /// Logical viewport width.
    #[arg(long)]
    width: f64,

    /// Logical viewport height.
    #[arg(long)]
    height: f64,

    /// Scene config JSON; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible scene (overrides the config).
    #[arg(long)]
    seed: Option<u64>,

    /// Device tier (overrides the config).
    #[arg(long, value_enum)]
    tier: Option<TierChoice>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Device pixel ratio of the backing pixmap.
    #[arg(long, default_value_t = 1.0)]
    dpr: f64,

    /// Seconds since the scene epoch.
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CurvesArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct SimulateArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Simulated duration in seconds.
    #[arg(long)]
    seconds: f64,

    /// Tick step in milliseconds.
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u64).range(1..))]
    step_ms: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TierChoice {
    Reduced,
    Full,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Curves(args) => cmd_curves(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &SceneArgs) -> anyhow::Result<starlit::SceneConfig> {
    let mut config = match &args.config {
        Some(path) => starlit::SceneConfig::from_json_path(path)?,
        None => starlit::SceneConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(tier) = args.tier {
        config.device_tier = match tier {
            TierChoice::Reduced => starlit::DeviceTier::Reduced,
            TierChoice::Full => starlit::DeviceTier::Full,
        };
    }
    config.validate()?;
    Ok(config)
}

fn seconds(value: f64, flag: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(value)
        .with_context(|| format!("{flag} must be a non-negative number of seconds"))
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let config = load_config(&args.scene)?;
    let now = seconds(args.time, "--time")?;
    let (width, height) = (args.scene.width, args.scene.height);

    let surface = starlit::Viewport::new(width, height)
        .and_then(|vp| starlit::CpuSurface::new(vp, args.dpr, Some(BACKGROUND)));
    let mut scene = starlit::Scene::new(
        config,
        width,
        height,
        surface,
        starlit::ManualFrameClock::new(),
        starlit::RecordingHost::new(),
    )?;

    let outcome = scene.pump_frame(now);
    let starlit::FrameOutcome::Drawn { stars, planets } = outcome else {
        anyhow::bail!("no frame was drawn ({outcome:?})");
    };
    let renderer = scene.renderer().context("renderer unavailable")?;
    let image = renderer.surface().readback().to_image()?;

    ensure_parent(&args.out)?;
    image
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({stars} stars, {planets} planets)",
        args.out.display()
    );
    Ok(())
}

fn cmd_curves(args: CurvesArgs) -> anyhow::Result<()> {
    let config = load_config(&args.scene)?;
    let viewport = starlit::Viewport::new(args.scene.width, args.scene.height)?;

    let table = starlit::MeteorTrajectoryEngine::new(&config.meteors)
        .table(viewport.diagonal())?;
    let catalog = starlit::KeyframeSynthesizer::new(&config.meteors).catalog(&table);
    let json = catalog.to_json()?;

    match &args.out {
        Some(path) => {
            ensure_parent(path)?;
            std::fs::write(path, json)
                .with_context(|| format!("write curves '{}'", path.display()))?;
            eprintln!("wrote {} ({} curves)", path.display(), catalog.len());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let config = load_config(&args.scene)?;
    let end = seconds(args.seconds, "--seconds")?;
    let step = Duration::from_millis(args.step_ms);

    let mut scene = starlit::Scene::new(
        config,
        args.scene.width,
        args.scene.height,
        Err::<starlit::CpuSurface, _>(starlit::StarlitError::surface("headless simulation")),
        starlit::ManualFrameClock::new(),
        starlit::RecordingHost::new(),
    )?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut now = Duration::ZERO;
    while now <= end {
        for event in scene.tick(now) {
            let line = serde_json::to_string(&event).context("serialize meteor event")?;
            writeln!(out, "{line}").context("write event")?;
        }
        now += step;
    }
    for event in scene.dispose(end) {
        let line = serde_json::to_string(&event).context("serialize meteor event")?;
        writeln!(out, "{line}").context("write event")?;
    }

    let host = scene.host();
    eprintln!(
        "simulated {:.1}s: {} spawned, {} retired",
        end.as_secs_f64(),
        host.spawned,
        host.retired
    );
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use sha2::{Digest as _, Sha256};

use promoreel::{
    CpuSurface, FfmpegRecorder, FrameSource as _, InMemoryRecorder, PlaybackSession,
    RecordingSurface, ReelConfig, SceneFrame, Timeline, compose_frame,
};

#[derive(Parser, Debug)]
#[command(name = "promoreel", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG and print its pixel digest.
    Frame(FrameArgs),
    /// Record the full promo (requires `ffmpeg` on PATH unless `--recorder raw`).
    Render(RenderArgs),
    /// Print the scene windows and their activation table as JSON.
    Timeline(TimelineArgs),
    /// Print the draw commands of one frame as JSON.
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// Configuration JSON. Defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Font file used for all text.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Device pixels per logical pixel.
    #[arg(long)]
    pixel_ratio: Option<f64>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    /// Playback time in milliseconds.
    #[arg(long)]
    at_ms: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecorderKind {
    /// Encode WebM/MP4 through the system ffmpeg.
    Ffmpeg,
    /// Write uncompressed RGBA frames back to back.
    Raw,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Directory the artifact is written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Encoding backend.
    #[arg(long, value_enum, default_value_t = RecorderKind::Ffmpeg)]
    recorder: RecorderKind,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Debug)]
struct TimelineArgs {
    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Playback time in milliseconds.
    #[arg(long)]
    at_ms: f64,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Timeline(args) => cmd_timeline(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ReelConfig> {
    let cfg = match path {
        Some(p) => ReelConfig::from_path(p)
            .with_context(|| format!("load config '{}'", p.display()))?,
        None => ReelConfig::default(),
    };
    Ok(cfg.with_env_overrides())
}

fn resolve_config(args: &ConfigArgs) -> anyhow::Result<ReelConfig> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(font) = &args.font {
        cfg.font_path = Some(font.clone());
    }
    if let Some(ratio) = args.pixel_ratio {
        cfg.pixel_ratio = ratio;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_surface(cfg: &ReelConfig) -> anyhow::Result<CpuSurface> {
    let surface = CpuSurface::new(cfg.canvas(), cfg.pixel_ratio)?;
    Ok(match &cfg.font_path {
        Some(path) => surface.with_font_path(path)?,
        None => surface,
    })
}

fn ensure_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("create output dir '{}'", dir.display()))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.config)?;
    let timeline = Timeline::promo(cfg.duration_ms, cfg.fps()?)?;
    let mut surface = build_surface(&cfg)?;

    let canvas = cfg.canvas();
    let frame = SceneFrame::new(f64::from(canvas.width), f64::from(canvas.height), &cfg.copy);
    let progress = timeline.global_progress(args.at_ms);
    compose_frame(&mut surface, &timeline, &frame, progress)?;
    let pixels = surface.read_frame()?.to_straight();

    if let Some(parent) = args.out.parent() {
        ensure_dir(parent)?;
    }
    image::save_buffer_with_format(
        &args.out,
        &pixels.data,
        pixels.width,
        pixels.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    let digest = Sha256::digest(&pixels.data);
    println!("sha256:{digest:x}");
    eprintln!(
        "wrote {} ({}x{}, progress {progress:.4})",
        args.out.display(),
        pixels.width,
        pixels.height
    );
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = resolve_config(&args.config)?;
    let surface = build_surface(&cfg)?;
    ensure_dir(&args.out_dir)?;

    let (file_name, bytes, frames) = match args.recorder {
        RecorderKind::Ffmpeg => {
            let mut session = PlaybackSession::new(&cfg, surface, FfmpegRecorder::default())?;
            let artifact = session.record()?;
            let bytes = session
                .capture()
                .artifact_bytes()
                .context("artifact bytes were released")?;
            (artifact.file_name(), bytes, artifact.frame_count)
        }
        RecorderKind::Raw => {
            let mut session = PlaybackSession::new(&cfg, surface, InMemoryRecorder::new())?;
            let artifact = session.record()?;
            let bytes = session
                .capture()
                .artifact_bytes()
                .context("artifact bytes were released")?;
            (
                format!("{}.rgba", cfg.artifact_stem),
                bytes,
                artifact.frame_count,
            )
        }
    };

    let out = args.out_dir.join(file_name);
    std::fs::write(&out, &bytes).with_context(|| format!("write '{}'", out.display()))?;
    eprintln!("wrote {} ({frames} frames, {} bytes)", out.display(), bytes.len());
    Ok(())
}

fn cmd_timeline(args: TimelineArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    cfg.validate()?;
    let timeline = Timeline::promo(cfg.duration_ms, cfg.fps()?)?;

    let windows: Vec<_> = timeline
        .windows()
        .iter()
        .map(|w| {
            serde_json::json!({
                "id": w.id,
                "start": w.start,
                "end": w.end,
                "start_ms": w.start * timeline.duration_ms(),
                "end_ms": w.end * timeline.duration_ms(),
            })
        })
        .collect();
    let activation: Vec<_> = (0..=20)
        .map(|i| {
            let p = f64::from(i) / 20.0;
            let active: Vec<_> = timeline
                .active_scenes(p)
                .map(|a| serde_json::json!({ "id": a.window.id, "local": a.local }))
                .collect();
            serde_json::json!({
                "progress": p,
                "at_ms": p * timeline.duration_ms(),
                "active": active,
            })
        })
        .collect();

    let doc = serde_json::json!({
        "duration_ms": timeline.duration_ms(),
        "fps": timeline.fps().as_f64(),
        "frame_count": timeline.frame_count(),
        "windows": windows,
        "activation": activation,
    });
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let cfg = load_config(args.config.as_deref())?;
    cfg.validate()?;
    let timeline = Timeline::promo(cfg.duration_ms, cfg.fps()?)?;
    let canvas = cfg.canvas();
    let mut surface = RecordingSurface::new(canvas);
    let frame = SceneFrame::new(f64::from(canvas.width), f64::from(canvas.height), &cfg.copy);
    compose_frame(
        &mut surface,
        &timeline,
        &frame,
        timeline.global_progress(args.at_ms),
    )?;
    println!("{}", serde_json::to_string_pretty(surface.commands())?);
    Ok(())
}

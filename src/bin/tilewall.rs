use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tilewall::CameraTarget as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tilewall", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite one wall texture and write it as PNG.
    Texture(TextureArgs),
    /// Render the room from the configured camera as PNG or JPEG.
    Frame(FrameArgs),
    /// Export the camera walkthrough as GIF or MP4 (MP4 requires `ffmpeg` on PATH).
    Animate(AnimateArgs),
    /// Play the camera walkthrough in real time, logging every camera value.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct TextureArgs {
    /// Room configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Which wall to composite.
    #[arg(long, value_enum, default_value_t = WallChoice::Back)]
    wall: WallChoice,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Room configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output path (`.png`, `.jpg` or `.jpeg`).
    #[arg(long)]
    out: PathBuf,

    /// Square output size in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Room configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Output path (`.gif` or `.mp4`).
    #[arg(long)]
    out: PathBuf,

    /// Square output size in pixels.
    #[arg(long, default_value_t = 512)]
    size: u32,
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Room configuration JSON.
    #[arg(long)]
    config: PathBuf,

    /// Tick rate of the preview clock.
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum WallChoice {
    Back,
    Left,
    Right,
}

impl WallChoice {
    fn face(self) -> tilewall::RoomFace {
        match self {
            Self::Back => tilewall::RoomFace::Back,
            Self::Left => tilewall::RoomFace::Left,
            Self::Right => tilewall::RoomFace::Right,
        }
    }
}

fn main() -> anyhow::Result<()> {
    initialise_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Texture(args) => cmd_texture(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
        Command::Preview(args) => cmd_preview(args),
    }
}

fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_session(path: &Path) -> anyhow::Result<tilewall::RoomSession> {
    let cfg = tilewall::RoomConfig::load(path)
        .with_context(|| format!("load room config '{}'", path.display()))?;
    Ok(tilewall::RoomSession::from_config(&cfg)?)
}

fn cmd_texture(args: TextureArgs) -> anyhow::Result<()> {
    let session = load_session(&args.config)?;
    let texture = session.wall_texture(args.wall.face())?;
    let image = texture.to_rgba_image()?;
    tilewall::write_still(&image, &args.out)
        .with_context(|| format!("write texture '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({}x{})",
        args.out.display(),
        texture.width,
        texture.height
    );
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.config)?;
    let mut renderer =
        tilewall::SoftwareRoomRenderer::new(tilewall::RenderSettings::square(args.size));
    let frame = session.render_still(&mut renderer)?;
    tilewall::write_still(&frame.to_rgba_image()?, &args.out)
        .with_context(|| format!("write frame '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let mut session = load_session(&args.config)?;
    let mut renderer =
        tilewall::SoftwareRoomRenderer::new(tilewall::RenderSettings::square(args.size));
    let mut encoder = tilewall::encoder_for_path(&args.out)?;

    let mut last_percent = None;
    let summary = session.export_animation(&mut renderer, encoder.as_mut(), |p| {
        let percent = (p * 100.0).round() as u32;
        if last_percent != Some(percent) {
            last_percent = Some(percent);
            eprint!("\rrendering... {percent}%");
        }
    })?;
    eprintln!();
    if summary.skipped_steps > 0 {
        eprintln!("skipped {} invalid animation step(s)", summary.skipped_steps);
    }
    eprintln!("wrote {} ({} frames)", args.out.display(), summary.frames);
    Ok(())
}

/// Forwards camera values to the rig and logs each one.
struct LoggedCamera<'a> {
    rig: &'a mut tilewall::CameraRig,
}

impl tilewall::CameraTarget for LoggedCamera<'_> {
    fn set_param(&mut self, param: tilewall::CameraParam, value: f64) {
        tracing::info!(param = param.as_str(), value, "camera");
        self.rig.set_param(param, value);
    }

    fn request_render(&mut self) {
        self.rig.request_render();
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be non-zero");
    }
    let mut session = load_session(&args.config)?;
    let mut pump = tilewall::FramePump::new();
    let on_finish: Box<dyn FnOnce()> = Box::new(|| eprintln!("preview finished"));
    if !session.start_preview(&mut pump, Some(on_finish)) {
        anyhow::bail!("preview is already running");
    }

    let (animator, rig) = session.preview_parts();
    let mut camera = LoggedCamera { rig };
    let interval = Duration::from_secs_f64(1.0 / f64::from(args.fps));
    let ticks = tilewall::run_realtime(animator, &mut pump, &mut camera, interval);

    let params = session.camera().params;
    eprintln!(
        "{ticks} ticks; camera pan={:.2} zoom={:.2} tilt={:.1}",
        params.pan, params.zoom, params.tilt_deg
    );
    Ok(())
}

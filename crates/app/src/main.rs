use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, Subcommand};
use lyric_studio_core::{
    load_background_image, read_project_file, surface, ClockSource, FrameComposer, FrameInput,
    FrameTicker, LyricStudioError, ManualClock, ParticleField, RenderSurface, SyncStore,
};
use tracing_subscriber::EnvFilter;

fn main() -> lyric_studio_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Preview {
            project,
            seconds,
            resolution,
            background,
        } => run_preview(&project, seconds, resolution.as_deref(), background.as_deref()),
        Commands::Convert {
            input,
            output,
            format,
        } => run_convert(&input, &output, &format),
    }
}

fn run_preview(
    project: &Path,
    seconds: Option<f64>,
    resolution: Option<&str>,
    background: Option<&Path>,
) -> lyric_studio_core::Result<()> {
    let snapshot = read_project_file(project)?;
    let resolution = match resolution {
        Some(value) => value.parse()?,
        None => snapshot.resolution,
    };
    let background = background.map(load_background_image).transpose()?;

    let mut store = SyncStore::new();
    snapshot.restore_into(&mut store);

    let mut surface = surface::acquire(resolution.width(), resolution.height())?;
    tracing::info!(backend = ?surface.kind(), %resolution, lines = store.len(), "preview starting");

    let mut particles = ParticleField::new();
    particles.set_enabled(
        snapshot.particle_effects,
        resolution.width(),
        resolution.height(),
    );

    let last_mark = store.track().iter().map(|line| line.time).fold(0.0, f64::max);
    let duration = seconds.unwrap_or_else(|| (last_mark + 5.0).max(10.0));
    let mut clock = ManualClock::with_duration(duration);
    clock.play();

    let composer = FrameComposer::new();
    let mut ticker = FrameTicker::new();
    let started = Instant::now();
    let mut last_tick = started;
    let mut frames = 0u64;
    ticker.start(started);

    while clock.current_time() < duration {
        let now = Instant::now();
        if ticker.poll(now) {
            clock.advance(now.duration_since(last_tick).as_secs_f64());
            last_tick = now;

            let input = FrameInput {
                style: &snapshot.style,
                track: store.track(),
                active_index: store.resolve_active(clock.current_time()),
                current_time: clock.current_time(),
                duration: clock.duration(),
                background: background.as_ref(),
                particles: &particles,
                overlays: snapshot.overlays,
            };
            match composer.compose(surface.as_mut(), &input) {
                Ok(()) => frames += 1,
                // Not fatal: skip this tick, retry on the next one.
                Err(err) => tracing::warn!(%err, "composition skipped this tick"),
            }
        }
        thread::sleep(Duration::from_millis(1));
    }
    ticker.cancel();

    tracing::info!(frames, elapsed = ?started.elapsed(), "preview finished");
    Ok(())
}

fn run_convert(input: &Path, output: &Path, format: &str) -> lyric_studio_core::Result<()> {
    let data = fs::read_to_string(input)?;
    let mut store = SyncStore::new();
    store.import_json(&data)?;

    let rendered = match format {
        "json" => store.export_json()?,
        "lrc" => store.export_lrc(),
        other => {
            return Err(LyricStudioError::invalid_input(format!(
                "unknown export format `{other}` (expected json or lrc)"
            )))
        }
    };
    fs::write(output, rendered)?;

    tracing::info!(lines = store.len(), output = %output.display(), "track converted");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Lyric video sync and preview studio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the headless preview loop over a saved project file.
    Preview {
        /// Path to the project snapshot JSON.
        project: PathBuf,
        /// Simulated playback length in seconds; defaults to just past the
        /// last marked line.
        #[arg(short, long)]
        seconds: Option<f64>,
        /// Output resolution, either WIDTHxHEIGHT or one of the presets.
        #[arg(short, long)]
        resolution: Option<String>,
        /// Background image drawn behind the lyrics.
        #[arg(short, long)]
        background: Option<PathBuf>,
    },
    /// Convert a synced track between the JSON and LRC formats.
    Convert {
        /// Path to a JSON track export.
        input: PathBuf,
        /// Destination file.
        output: PathBuf,
        /// Output format: json or lrc.
        #[arg(short, long, default_value = "lrc")]
        format: String,
    },
}

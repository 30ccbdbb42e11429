use std::path::PathBuf;

use clap::{Parser, Subcommand};
use pulseline_core::{
    CollectingSurface, PulseVizError, RendererConfig, SolidLineRenderer,
};
use tracing_subscriber::EnvFilter;

fn main() -> pulseline_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            units,
            frames,
            config,
        } => run_demo(units, frames, config.as_deref()),
        Commands::Defaults => {
            println!("{}", RendererConfig::default().to_json());
            Ok(())
        }
    }
}

/// Drives the renderer with a synthetic FFT stream and reports what the
/// draw boundary saw. Stands in for a host view until one is wired up.
fn run_demo(
    units: Option<usize>,
    frames: u32,
    config_path: Option<&std::path::Path>,
) -> pulseline_core::Result<()> {
    let mut config = match config_path {
        Some(path) => {
            let json = std::fs::read_to_string(path).map_err(|err| {
                PulseVizError::invalid_config(format!("cannot read {}: {err}", path.display()))
            })?;
            RendererConfig::from_json(&json)?
        }
        None => RendererConfig::default(),
    };
    if let Some(units) = units {
        config.units = units;
    }

    tracing::info!(units = config.units, frames, "starting demo stream");

    let mut renderer = SolidLineRenderer::new(config)?;
    renderer.on_size_changed(960.0, 160.0);
    renderer.on_stream_analyzed(true);

    let mut surface = CollectingSurface::new();
    let units = renderer.config().units;
    let mut draws = 0u32;
    for step in 0..frames {
        renderer.on_fft_update(&synthetic_frame(units, step));
        if renderer.tick(16.0) {
            renderer.draw(&mut surface);
            draws += 1;
        }
    }
    renderer.on_stream_analyzed(false);
    renderer.destroy();

    let paint = format!("#{:08X}", renderer.paint_color().0);
    tracing::info!(draws, paint = %paint, "demo stream finished");
    Ok(())
}

/// Builds one plausible FFT frame: two header bytes followed by signed
/// re/im pairs sweeping through slow sine waves so the bars visibly move.
fn synthetic_frame(units: usize, step: u32) -> Vec<u8> {
    let mut frame = vec![0u8; units * 2 + 2];
    for i in 0..units {
        let phase = step as f32 * 0.35 + i as f32 * 0.2;
        let re = (phase.sin() * 80.0) as i8;
        let im = ((phase * 0.5).cos() * 60.0) as i8;
        frame[i * 2 + 2] = re as u8;
        frame[i * 2 + 3] = im as u8;
    }
    frame
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Audio spectrum bar visualiser", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Feed a synthetic FFT stream through the renderer and log the result.
    Demo {
        /// Override the configured number of bars.
        #[arg(short, long)]
        units: Option<usize>,
        /// Number of scheduler ticks to simulate.
        #[arg(short, long, default_value_t = 240)]
        frames: u32,
        /// Optional JSON config snapshot to load.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Print the default configuration snapshot as JSON.
    Defaults,
}

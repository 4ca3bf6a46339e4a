mod live;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use gn_core::{
    ChoiceCount, Frame, GravConfig, RenderSink, Replay, angle_from_direction,
    name_direction_with, parse_samples,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "gravnav", about = "Shake to decide which way to go")]
struct Cli {
    /// Config file (TOML); falls back to $GRAVNAV_CONFIG, then defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Name a single direction
    Name {
        /// 1-based direction index
        dir: u32,

        /// Number of choices (overrides config)
        #[arg(long)]
        choices: Option<u32>,
    },

    /// List every direction with its arrow angle
    Table {
        /// Number of choices (overrides config)
        #[arg(long)]
        choices: Option<u32>,
    },

    /// Simulate one shake and print every frame until the arrow settles
    Simulate {
        /// Shake delta; random above the shake threshold when omitted
        #[arg(long)]
        delta: Option<f64>,

        /// Seed for the random delta
        #[arg(long)]
        seed: Option<u64>,

        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Replay recorded samples (`t_ms x y z` per line) on a virtual clock
    Replay {
        /// Sample file, or `-` for stdin
        path: PathBuf,

        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Read samples from stdin in real time and animate as they arrive
    Live {
        /// Emit one JSON object per frame
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn config_path(cli: &Cli) -> Option<PathBuf> {
    cli.config
        .clone()
        .or_else(|| std::env::var("GRAVNAV_CONFIG").ok().map(PathBuf::from))
}

fn load_config(cli: &Cli) -> Result<GravConfig> {
    let Some(path) = config_path(cli) else {
        return Ok(GravConfig::default());
    };
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = GravConfig::from_toml_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn with_choices(mut config: GravConfig, choices: Option<u32>) -> Result<GravConfig> {
    if let Some(n) = choices {
        config.num_choices = ChoiceCount::new(n)?;
    }
    Ok(config)
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Name { dir, choices } => cmd_name(&cli, *dir, *choices),
        Commands::Table { choices } => cmd_table(&cli, *choices),
        Commands::Simulate { delta, seed, json } => cmd_simulate(&cli, *delta, *seed, *json),
        Commands::Replay { path, json } => cmd_replay(&cli, path, *json),
        Commands::Live { json } => cmd_live(&cli, *json).await,
        Commands::Config => cmd_config(&cli),
    }
}

// ---------------------------------------------------------------------------
// Frame output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct FrameLine<'a> {
    at_ms: u64,
    #[serde(flatten)]
    frame: &'a Frame,
}

/// Prints frames to stdout as they are rendered.
struct FramePrinter {
    json: bool,
    frames: usize,
}

impl FramePrinter {
    fn new(json: bool) -> Self {
        Self { json, frames: 0 }
    }
}

impl RenderSink for FramePrinter {
    fn render(&mut self, at_ms: u64, frame: &Frame) {
        self.frames += 1;
        if self.json {
            match serde_json::to_string(&FrameLine { at_ms, frame }) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::warn!("failed to encode frame: {e}"),
            }
        } else {
            println!(
                "{at_ms:>7}ms  {:>6.1}°  {:<24} intensity={:.1}",
                frame.angle_degrees, frame.text, frame.intensity
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_name(cli: &Cli, dir: u32, choices: Option<u32>) -> Result<()> {
    let config = with_choices(load_config(cli)?, choices)?;
    let text = name_direction_with(&config.phrasebook(), dir, config.num_choices.get())?;
    println!("{text}");
    Ok(())
}

fn cmd_table(cli: &Cli, choices: Option<u32>) -> Result<()> {
    let config = with_choices(load_config(cli)?, choices)?;
    let phrases = config.phrasebook();
    let n = config.num_choices;
    for dir in n.indices() {
        let text = name_direction_with(&phrases, dir, n.get())?;
        println!("{dir:>3}  {:>6.1}°  {text}", angle_from_direction(dir, n));
    }
    Ok(())
}

fn cmd_simulate(cli: &Cli, delta: Option<f64>, seed: Option<u64>, json: bool) -> Result<()> {
    let config = load_config(cli)?;
    let delta = match delta {
        Some(d) => d,
        None => {
            let mut rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => SmallRng::from_os_rng(),
            };
            rng.random_range(config.shake_threshold..config.shake_threshold * 6.0)
        }
    };
    if delta <= config.stop_threshold {
        bail!(
            "delta {delta} would stop immediately (stop threshold is {})",
            config.stop_threshold
        );
    }
    tracing::info!(delta, choices = %config.num_choices, "simulating shake");

    let mut replay = Replay::new(config.detector(), config.scheduler());
    let mut printer = FramePrinter::new(json);
    replay.shake(delta)?;
    let end = replay.finish(&mut printer)?;

    if !json {
        println!(
            "settled after {} frames at {end}ms (delta={delta:.1})",
            printer.frames
        );
    }
    Ok(())
}

fn read_samples_text(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read samples from stdin")?;
        Ok(text)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn cmd_replay(cli: &Cli, path: &Path, json: bool) -> Result<()> {
    let config = load_config(cli)?;
    let text = read_samples_text(path)?;
    let samples = parse_samples(&text).context("failed to parse samples")?;

    let mut replay = Replay::new(config.detector(), config.scheduler());
    let mut printer = FramePrinter::new(json);
    for sample in &samples {
        replay.feed(sample, &mut printer)?;
    }
    let end = replay.finish(&mut printer)?;

    if !json {
        println!(
            "samples={} shakes={} frames={} end={end}ms",
            samples.len(),
            replay.shakes(),
            printer.frames
        );
    }
    Ok(())
}

async fn cmd_live(cli: &Cli, json: bool) -> Result<()> {
    let config = load_config(cli)?;
    let reader = tokio::io::BufReader::new(tokio::io::stdin());
    let mut printer = FramePrinter::new(json);
    let summary =
        live::run_live(reader, config.detector(), config.scheduler(), &mut printer).await?;

    if !json {
        println!(
            "samples={} shakes={} frames={}{}",
            summary.samples,
            summary.shakes,
            summary.frames,
            if summary.interrupted { " (interrupted)" } else { "" }
        );
    }
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gn_core::FrameLog;

    #[test]
    fn test_with_choices_overrides() {
        let config = with_choices(GravConfig::default(), Some(7)).unwrap();
        assert_eq!(config.num_choices.get(), 7);
        assert!(with_choices(GravConfig::default(), Some(1)).is_err());
    }

    #[test]
    fn test_frame_line_flattens() {
        let frame = Frame {
            intensity: 90.0,
            direction: 3,
            angle_degrees: 450.0,
            text: "go right".into(),
        };
        let value = serde_json::to_value(FrameLine {
            at_ms: 12,
            frame: &frame,
        })
        .unwrap();
        assert_eq!(value["at_ms"], 12);
        assert_eq!(value["direction"], 3);
        assert_eq!(value["text"], "go right");
    }

    #[test]
    fn test_printer_counts_frames() {
        let mut log = FrameLog::default();
        let mut printer = FramePrinter::new(true);
        let mut replay = Replay::new(
            GravConfig::default().detector(),
            GravConfig::default().scheduler(),
        );
        replay.shake(2000.0).unwrap();
        replay.finish(&mut log).unwrap();
        for (at, frame) in &log.frames {
            printer.render(*at, frame);
        }
        assert_eq!(printer.frames, log.frames.len());
    }
}

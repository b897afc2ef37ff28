#![deny(unsafe_code)]
//! CLI binary for the plexus particle field.
//!
//! Subcommands:
//! - `render`: generate a field, advance N ticks, write a PNG
//! - `replay <seed.json>`: re-render a frame recorded by `render --emit-seed`
//! - `animate`: run the scheduler at a fixed frame rate, writing numbered PNGs
//! - `frame`: advance N ticks and print the frame's draw commands as JSON
//! - `params`: print the tuning parameters and their schema

mod clock;
mod error;

use clap::{Args, Parser, Subcommand};
use clock::PacedClock;
use error::CliError;
use plexus_core::{DisplayList, Field, FieldConfig, Raster, Renderer, Scheduler, Seed, Srgb};
use plexus_snapshot::png::{frame_path, write_png};
use plexus_snapshot::Backdrop;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "plexus", about = "Ambient particle-field renderer")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SessionArgs {
    /// Surface (or viewport, for `animate`) width in pixels.
    #[arg(short = 'W', long, default_value_t = 800.0)]
    width: f64,

    /// Surface (or viewport, for `animate`) height in pixels.
    #[arg(short = 'H', long, default_value_t = 600.0)]
    height: f64,

    /// PRNG seed for deterministic output.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// JSON config file (a full or partial FieldConfig).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parameter overrides as a JSON object, applied on top of --config.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Args)]
struct BackdropArgs {
    /// Page background the canvas is composited onto.
    #[arg(long, default_value = "#0c1222")]
    background: String,

    /// Opacity of the particle canvas over the background.
    #[arg(long, default_value_t = 0.6)]
    canvas_opacity: f64,

    /// Keep the canvas transparent instead of compositing a background.
    #[arg(long)]
    transparent: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Advance a field N ticks and write one PNG frame.
    Render {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        backdrop: BackdropArgs,

        /// Number of simulation ticks before painting.
        #[arg(short, long, default_value_t = 1000)]
        ticks: u64,

        /// Output file path.
        #[arg(short, long, default_value = "plexus.png")]
        output: PathBuf,

        /// Also write a seed file that `replay` can re-render.
        #[arg(long)]
        emit_seed: Option<PathBuf>,
    },
    /// Re-render the frame described by a seed file.
    Replay {
        /// Seed file written by `render --emit-seed`.
        seed_file: PathBuf,

        #[command(flatten)]
        backdrop: BackdropArgs,

        /// Output file path.
        #[arg(short, long, default_value = "plexus.png")]
        output: PathBuf,
    },
    /// Run the animation loop at a fixed frame rate and write numbered frames.
    Animate {
        #[command(flatten)]
        session: SessionArgs,

        #[command(flatten)]
        backdrop: BackdropArgs,

        /// Number of frames to run.
        #[arg(short, long, default_value_t = 120)]
        frames: u64,

        /// Target frames per second (0 = as fast as possible).
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Write every k-th frame.
        #[arg(long, default_value_t = 10)]
        every: u64,

        /// Directory for frame_NNNNN.png files.
        #[arg(short, long, default_value = "frames")]
        out_dir: PathBuf,
    },
    /// Advance N ticks and print the frame's draw commands as JSON.
    Frame {
        #[command(flatten)]
        session: SessionArgs,

        /// Number of simulation ticks before painting.
        #[arg(short, long, default_value_t = 0)]
        ticks: u64,
    },
    /// Print the current parameters and their schema.
    Params {
        /// JSON config file to report instead of the defaults.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn read_json(path: &Path) -> Result<Value, CliError> {
    let text = fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| CliError::Input(format!("{}: invalid JSON: {e}", path.display())))
}

fn load_config(path: Option<&Path>) -> Result<FieldConfig, CliError> {
    match path {
        Some(path) => serde_json::from_value(read_json(path)?)
            .map_err(|e| CliError::Input(format!("{}: {e}", path.display()))),
        None => Ok(FieldConfig::default()),
    }
}

/// Resolves `--config` then layers `--params` on top.
fn resolve_config(session: &SessionArgs) -> Result<FieldConfig, CliError> {
    let base = load_config(session.config.as_deref())?;
    let overrides: Value = serde_json::from_str(&session.params)
        .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
    let Value::Object(overrides) = overrides else {
        return Err(CliError::Input("--params must be a JSON object".into()));
    };
    let mut merged = base.params();
    if let Value::Object(fields) = &mut merged {
        fields.extend(overrides);
    }
    let config = FieldConfig::from_json(&merged)?;
    config.validate()?;
    Ok(config)
}

fn resolve_backdrop(args: &BackdropArgs) -> Result<Option<Backdrop>, CliError> {
    if args.transparent {
        return Ok(None);
    }
    let background = Srgb::from_hex(&args.background)?;
    Ok(Some(Backdrop::new(background, args.canvas_opacity)))
}

/// Paints a replayed field into a fresh raster the size of its bounds.
fn paint_raster(field: &Field, config: &FieldConfig) -> Result<Raster, CliError> {
    let mut raster = Raster::for_surface(field.width(), field.height())?;
    Renderer::from_config(config).paint(field, &mut raster);
    Ok(raster)
}

fn report(json: bool, info: Value, human: String) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!("{human}");
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Render {
            session,
            backdrop,
            ticks,
            output,
            emit_seed,
        } => {
            let seed = Seed {
                width: session.width,
                height: session.height,
                seed: session.seed,
                ticks,
                config: resolve_config(&session)?,
            };
            let backdrop = resolve_backdrop(&backdrop)?;
            let field = seed.replay()?;
            let raster = paint_raster(&field, &seed.config)?;
            write_png(&raster, backdrop.as_ref(), &output)?;

            if let Some(seed_path) = &emit_seed {
                fs::write(seed_path, serde_json::to_string_pretty(&seed)?)
                    .map_err(|e| CliError::Io(format!("{}: {e}", seed_path.display())))?;
            }

            report(
                cli.json,
                serde_json::json!({
                    "width": seed.width,
                    "height": seed.height,
                    "particles": field.len(),
                    "ticks": ticks,
                    "seed": seed.seed,
                    "output": output.display().to_string(),
                    "seed_file": emit_seed.as_ref().map(|p| p.display().to_string()),
                }),
                format!(
                    "rendered {} particles ({}x{}, {ticks} ticks, seed {}) -> {}",
                    field.len(),
                    seed.width,
                    seed.height,
                    seed.seed,
                    output.display()
                ),
            )?;
        }
        Command::Replay {
            seed_file,
            backdrop,
            output,
        } => {
            let seed: Seed = serde_json::from_value(read_json(&seed_file)?)
                .map_err(|e| CliError::Input(format!("{}: {e}", seed_file.display())))?;
            let backdrop = resolve_backdrop(&backdrop)?;
            let field = seed.replay()?;
            let raster = paint_raster(&field, &seed.config)?;
            write_png(&raster, backdrop.as_ref(), &output)?;

            report(
                cli.json,
                serde_json::json!({
                    "seed_file": seed_file.display().to_string(),
                    "ticks": seed.ticks,
                    "output": output.display().to_string(),
                }),
                format!(
                    "replayed {} ({} ticks) -> {}",
                    seed_file.display(),
                    seed.ticks,
                    output.display()
                ),
            )?;
        }
        Command::Animate {
            session,
            backdrop,
            frames,
            fps,
            every,
            out_dir,
        } => {
            let config = resolve_config(&session)?;
            let backdrop = resolve_backdrop(&backdrop)?;
            let every = every.max(1);
            fs::create_dir_all(&out_dir)
                .map_err(|e| CliError::Io(format!("{}: {e}", out_dir.display())))?;

            let mut scheduler: Scheduler<Raster, PacedClock> =
                Scheduler::new(config, session.seed);
            scheduler.start(
                Some(Raster::default()),
                Some(PacedClock::new(fps)),
                session.width,
                session.height,
            )?;

            let mut written = 0u64;
            let result = animate(&mut scheduler, frames, every, |index, raster| {
                write_png(raster, backdrop.as_ref(), &frame_path(&out_dir, index))?;
                written += 1;
                Ok(())
            });
            let ticks = scheduler.ticks();
            scheduler.teardown();
            result?;

            report(
                cli.json,
                serde_json::json!({
                    "frames": ticks,
                    "written": written,
                    "fps": fps,
                    "out_dir": out_dir.display().to_string(),
                }),
                format!(
                    "animated {ticks} frames at {fps} fps, wrote {written} -> {}",
                    out_dir.display()
                ),
            )?;
        }
        Command::Frame { session, ticks } => {
            let seed = Seed {
                width: session.width,
                height: session.height,
                seed: session.seed,
                ticks,
                config: resolve_config(&session)?,
            };
            let field = seed.replay()?;
            let mut list = DisplayList::new(field.width(), field.height());
            Renderer::from_config(&seed.config).paint(&field, &mut list);
            println!("{}", serde_json::to_string_pretty(&list)?);
        }
        Command::Params { config } => {
            let config = load_config(config.as_deref())?;
            let params = config.params();
            if cli.json {
                let info = serde_json::json!({
                    "params": params,
                    "schema": FieldConfig::param_schema(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else if let Value::Object(fields) = params {
                println!("Parameters:");
                for (name, value) in fields {
                    println!("  {name} = {value}");
                }
            }
        }
    }

    Ok(())
}

/// Pumps the scheduler until `frames` ticks have run, handing every
/// `every`-th frame (and the first) to `on_frame`.
fn animate(
    scheduler: &mut Scheduler<Raster, PacedClock>,
    frames: u64,
    every: u64,
    mut on_frame: impl FnMut(u64, &Raster) -> Result<(), CliError>,
) -> Result<(), CliError> {
    let mut emit = |scheduler: &Scheduler<Raster, PacedClock>| -> Result<(), CliError> {
        let index = scheduler.ticks();
        if index == 1 || index % every == 0 {
            if let Some(raster) = scheduler.surface() {
                on_frame(index, raster)?;
            }
        }
        Ok(())
    };
    emit(&*scheduler)?;
    while scheduler.ticks() < frames {
        let Some(handle) = scheduler.clock_mut().and_then(PacedClock::wait) else {
            break;
        };
        if scheduler.on_frame(handle)? {
            emit(&*scheduler)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        log::debug!("exiting with {e:?}");
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}

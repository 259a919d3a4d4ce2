//! # Warpfield Headless Runner
//!
//! Runs one session on a software surface and logs what the worker reports.
//!
//! ```bash
//! warpfield_headless                       # defaults, 3 seconds
//! warpfield_headless starfield.toml        # config file
//! warpfield_headless --seconds 10 --size 1920x1080
//! RUST_LOG=warpfield_core=debug warpfield_headless
//! ```

use std::process::ExitCode;
use std::time::{Duration, Instant};

use warpfield_core::PixelSurface;
use warpfield_shared::{Config, ResizeRequest, WorkerEvent};
use warpfield_worker::{spawn, WorkerOptions, WorkerResult};

const DEFAULT_FILTER: &str = "warpfield_core=info,warpfield_worker=info,warpfield_headless=info";

/// Command-line options
struct Args {
    config_path: Option<String>,
    seconds: f64,
    width: f32,
    height: f32,
    seed: Option<u64>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Self {
            config_path: None,
            seconds: 3.0,
            width: 1280.0,
            height: 720.0,
            seed: None,
        };

        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--seconds" => {
                    let value = it.next().ok_or("--seconds needs a value")?;
                    args.seconds = value
                        .parse::<f64>()
                        .ok()
                        .filter(|s| (0.0..=86_400.0).contains(s))
                        .ok_or_else(|| format!("invalid --seconds '{value}'"))?;
                }
                "--size" => {
                    let value = it.next().ok_or("--size needs WIDTHxHEIGHT")?;
                    let (w, h) = value
                        .split_once('x')
                        .ok_or_else(|| format!("invalid --size '{value}'"))?;
                    args.width = w.parse().map_err(|_| format!("invalid width '{w}'"))?;
                    args.height = h.parse().map_err(|_| format!("invalid height '{h}'"))?;
                }
                "--seed" => {
                    let value = it.next().ok_or("--seed needs a value")?;
                    let seed = value
                        .parse()
                        .map_err(|_| format!("invalid --seed '{value}'"))?;
                    args.seed = Some(seed);
                }
                flag if flag.starts_with("--") => return Err(format!("unknown flag '{flag}'")),
                path => args.config_path = Some(path.to_string()),
            }
        }
        Ok(args)
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_FILTER.to_string());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn run(args: &Args, config: Config) -> WorkerResult<()> {
    let host = spawn::<PixelSurface>(WorkerOptions {
        seed: args.seed,
        ..WorkerOptions::default()
    })?;

    let hold = config.hold_until_anchor;
    host.init(PixelSurface::new(0, 0), config)?;
    host.resize(ResizeRequest::centered(args.width, args.height, 1.0))?;
    if hold {
        host.set_ready(true)?;
    }

    let started = Instant::now();
    let run_for = Duration::from_secs_f64(args.seconds);
    while let Some(remaining) = run_for.checked_sub(started.elapsed()) {
        match host.next_event(remaining.min(Duration::from_millis(100))) {
            Some(WorkerEvent::Visible { at }) => tracing::info!("Visible at {:.1} ms", at),
            Some(WorkerEvent::Perf { fps, at }) => {
                tracing::info!("Perf: {:.1} fps at {:.1} ms", fps, at);
            }
            None => {}
        }
    }

    let stats = host.shutdown()?;
    tracing::info!(
        "Done: {} ticks ({} held), avg {} us, max {} us, {} events dropped",
        stats.ticks,
        stats.held_ticks,
        stats.avg_tick_us,
        stats.max_tick_us,
        stats.dropped_events
    );
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let args = match Args::parse() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("error: {msg}");
            eprintln!(
                "usage: warpfield_headless [config.toml] [--seconds N] [--size WxH] [--seed N]"
            );
            return ExitCode::from(2);
        }
    };

    let config = match &args.config_path {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };

    match run(&args, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

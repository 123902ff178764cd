//! warehouse: runs the grid warehouse simulation headless and streams every
//! entity change to stdout as JSON lines, ready to pipe into a renderer.
//!
//! ```text
//! warehouse [--config <file.json>] [--realtime]
//! ```
//!
//! Without `--realtime` the run is as fast as possible.  With it, the world
//! ticks on a background thread every `tick_interval_ms`.  Logs go to
//! stderr (`RUST_LOG`, default `info`).

mod config;
mod stream;

use std::env;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::{Context, Result};

use wh_core::WarehouseConfig;
use wh_sim::{PollingDriver, WorldBuilder};

use stream::JsonLines;

struct Args {
    config:   Option<PathBuf>,
    realtime: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args { config: None, realtime: false };
    let mut it = env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = it.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            "--realtime" => args.realtime = true,
            other if !other.starts_with('-') && args.config.is_none() => {
                args.config = Some(PathBuf::from(other));
            }
            other => anyhow::bail!("unknown argument {other}"),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => {
            log::info!("using config {}", path.display());
            config::load(path)?
        }
        None => WarehouseConfig::default(),
    };

    // ── Build ─────────────────────────────────────────────────────────────
    let t0 = Instant::now();
    let world = WorldBuilder::new(config).build()?;
    log::info!("built in {:.1?}", t0.elapsed());

    let mut out = JsonLines::new(io::stdout());
    out.write_initial(world.snapshot_all()).context("writing initial state")?;

    // ── Run ───────────────────────────────────────────────────────────────
    let t1 = Instant::now();
    if args.realtime {
        let interval = world.clock.interval();
        let shared = Arc::new(Mutex::new(world));
        let driver = PollingDriver::spawn(Arc::clone(&shared), JsonLines::new(io::stdout()), interval)?;
        let realtime_out = driver.join()?;
        let world = shared.lock().map_err(|_| anyhow::anyhow!("world mutex poisoned"))?;
        world.audit()?;
        log::info!(
            "{} ticks, {} events streamed in {:.1?}; {} racks stored, {} packages staged",
            world.current_tick().0,
            realtime_out.events(),
            t1.elapsed(),
            world.racks().len(),
            world.bay().packages()
        );
    } else {
        let mut world = world;
        world.run(&mut out);
        world.audit()?;
        log::info!(
            "{} ticks, {} events in {:.1?}; {} racks stored, {} packages staged",
            world.current_tick().0,
            out.events(),
            t1.elapsed(),
            world.racks().len(),
            world.bay().packages()
        );
    }

    Ok(())
}

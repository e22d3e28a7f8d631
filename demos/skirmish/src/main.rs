//! skirmish: a party of three crosses a yard watched by a guard.
//!
//! The hero walks past the guard and provokes an attack of opportunity: the
//! guard's hook pauses the hero, resolves the swing on its own thread and
//! releases the pause.  Two companions follow in the background.  A second
//! march is then cut short by a global interrupt, and every actor is pulled
//! back onto a free cell.
//!
//! ```text
//! cargo run -p skirmish -- [config.json]
//! RUST_LOG=debug cargo run -p skirmish
//! ```

mod guard;

use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use stride_core::{ActorId, Cell, MovementConfig, MovementMode};
use stride_mover::MoverHandle;
use stride_scheduler::{MovementScheduler, SchedulerBuilder, TickDriver};
use stride_world::{ActorRegistry, ActorSpec, GridWorld, World};

use guard::Guard;

// ── Constants ─────────────────────────────────────────────────────────────────

const YARD_WIDTH:      i32      = 12;
const YARD_HEIGHT:     i32      = 6;
const GUARD_POST:      Cell     = Cell { x: 5, y: 4 };
const MOVE_BUDGET:     Duration = Duration::from_secs(10);
const INTERRUPT_AFTER: Duration = Duration::from_millis(400);

fn main() {
    init_tracing();
    if let Err(err) = run() {
        error!(error = %err, "skirmish failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn load_config() -> Result<MovementConfig> {
    match std::env::args().nth(1) {
        Some(path) => MovementConfig::from_json_path(Path::new(&path))
            .with_context(|| format!("loading movement config from {path}")),
        None => Ok(MovementConfig::default()),
    }
}

fn run() -> Result<()> {
    let config = load_config()?;
    let started = Instant::now();

    // ── Yard ──────────────────────────────────────────────────────────────
    let grid = Arc::new(GridWorld::with_bounds(YARD_WIDTH, YARD_HEIGHT));
    let hero = grid.spawn(ActorSpec::at(Cell::new(0, 3)).selectable())?;
    let scout = grid.spawn(ActorSpec::at(Cell::new(0, 2)).selectable())?;
    // Runs out of action points two thirds of the way across.
    let porter = grid.spawn(ActorSpec::at(Cell::new(0, 1)).selectable().action_points(6))?;
    let guard_id = grid.spawn(ActorSpec::at(GUARD_POST))?;

    let guard = Arc::new(Guard::new(guard_id, grid.clone(), config.step_interval_ms * 3));
    let world = World::from_grid(grid.clone()).with_opportunity_hook(guard.clone());

    let scheduler = Arc::new(SchedulerBuilder::new(config, world).build()?);
    scheduler.set_movement_mode(MovementMode::GroupFollow);
    let driver = TickDriver::spawn(scheduler.clone())?;

    // ── First march: past the guard ───────────────────────────────────────
    let party = march(&scheduler, &[
        (hero, straight(Cell::new(0, 3), 8, 0), false),
        (scout, straight(Cell::new(0, 2), 7, 0), true),
        (porter, straight(Cell::new(0, 1), 9, 0), true),
    ])?;
    for handle in &party {
        if !handle.wait_timeout(MOVE_BUDGET) {
            anyhow::bail!("{} did not finish its march in time", handle.actor());
        }
    }
    info!(
        swings = guard.swings(),
        porter_ap = grid.actor(porter).and_then(|r| r.action_points).unwrap_or(0),
        "first march complete"
    );

    // ── Second march: cut short ───────────────────────────────────────────
    let from = grid.position(hero)?;
    let party = march(&scheduler, &[
        (hero, straight(from, 3, 2), false),
        (scout, straight(grid.position(scout)?, 4, 0), true),
    ])?;
    thread::sleep(INTERRUPT_AFTER);
    info!(locked = scheduler.is_locked(), "calling the party back");
    scheduler.interrupt();
    for handle in &party {
        handle.wait_timeout(MOVE_BUDGET);
    }

    let ticks = driver.shutdown()?;
    report(&grid, ticks, started.elapsed())
}

/// Start one move per `(actor, path, background)` entry.
fn march(scheduler: &MovementScheduler, moves: &[(ActorId, Vec<Cell>, bool)]) -> Result<Vec<MoverHandle>> {
    let mut handles = Vec::with_capacity(moves.len());
    for (actor, path, background) in moves {
        let handle = scheduler.add_move(*actor, path, true)?;
        handle.set_background(*background);
        let actor = *actor;
        handle.on_complete(move || info!(actor = %actor, "arrived"))?;
        handles.push(handle);
    }
    Ok(handles)
}

/// `steps` cells from `from`, heading east when `dy == 0`, otherwise east
/// then down `dy` rows.
fn straight(from: Cell, steps: i32, dy: i32) -> Vec<Cell> {
    let mut path: Vec<Cell> = (1..=steps).map(|dx| Cell::new(from.x + dx, from.y)).collect();
    let end = from.x + steps;
    path.extend((1..=dy).map(|d| Cell::new(end, from.y + d)));
    path
}

fn report(grid: &GridWorld, ticks: u64, elapsed: Duration) -> Result<()> {
    let actors: Vec<_> = grid
        .positions()
        .into_iter()
        .map(|(id, cell)| serde_json::json!({ "actor": id.0, "x": cell.x, "y": cell.y }))
        .collect();
    let summary = serde_json::json!({
        "ticks":      ticks,
        "elapsed_ms": elapsed.as_millis() as u64,
        "actors":     actors,
    });
    info!(ticks, elapsed_ms = elapsed.as_millis() as u64, "skirmish finished");
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

//! Soft Body Simulation
//!
//! Headless frame driver: loads a configuration, replays a scripted input
//! timeline and steps the simulation at a fixed time step.

mod script;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use script::{demo_script, Action, DriverConfig, Script};
use softbody_simulation::{RenderedParticle, SoftBodySimulation};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(about = "Run the soft body simulation without a window")]
struct Args {
    /// TOML file with `frames`, `[simulation]` and `[[script]]` entries
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short, long)]
    frames: Option<u64>,

    /// Particle count (overrides the config file)
    #[arg(short = 'n', long)]
    particles: Option<usize>,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Sleep between frames to hold the configured time step
    #[arg(long)]
    realtime: bool,

    /// Print the final frame as `x y radius` lines
    #[arg(long)]
    dump: bool,
}

fn load_config(path: Option<&Path>) -> Result<DriverConfig> {
    let Some(path) = path else {
        return Ok(DriverConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = toml::from_str(&text)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// The simulation plus the pointer state a window would normally track
struct Driver {
    sim: SoftBodySimulation,
    pointer: Vec2,
}

impl Driver {
    fn apply(&mut self, action: &Action) {
        match *action {
            Action::PointerDown { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.sim.on_pointer_down(x, y);
            }
            Action::PointerDrag { x, y } => {
                self.pointer = Vec2::new(x, y);
                self.sim.on_pointer_drag(x, y);
            }
            Action::DragBy { dx, dy } => {
                self.pointer += Vec2::new(dx, dy);
                self.sim.on_pointer_drag(self.pointer.x, self.pointer.y);
            }
            Action::PointerUp => self.sim.on_pointer_up(),
            Action::Grab { index } => match self.sim.particles().get(index) {
                Some(particle) => {
                    let offset = self.sim.config().pointer_offset;
                    self.pointer = particle.position + Vec2::splat(offset);
                    self.sim.on_pointer_down(self.pointer.x, self.pointer.y);
                }
                None => log::warn!("script grabs missing particle {}", index),
            },
            Action::Impulse => self.sim.on_impulse_requested(),
            Action::Scatter => self.sim.on_scatter_requested(),
            Action::Configure {
                k,
                mass,
                rest_length,
                gravity,
                damping,
            } => {
                // Rejected parameters leave the previous ones in effect
                if let Err(e) = self.sim.configure(k, mass, rest_length, gravity, damping) {
                    log::warn!("script configure ignored: {}", e);
                }
            }
            Action::Resize { particle_count } => {
                if let Err(e) = self.sim.resize(particle_count) {
                    log::warn!("script resize to {} ignored: {}", particle_count, e);
                }
            }
        }
        log::debug!("applied {:?} -> {:?}", action, self.sim.interaction_mode());
    }
}

fn bounds(frame: &[RenderedParticle]) -> (Vec2, Vec2) {
    frame.iter().fold(
        (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(p.position), max.max(p.position)),
    )
}

fn main() -> Result<()> {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(frames) = args.frames {
        config.frames = frames;
    }
    if let Some(particles) = args.particles {
        config.simulation.particle_count = particles;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = Some(seed);
    }

    log::info!("Starting soft body simulation...");

    let sim = SoftBodySimulation::new(config.simulation.clone())
        .context("invalid simulation configuration")?;
    let mut script = if config.script.is_empty() {
        Script::new(demo_script())
    } else {
        Script::new(config.script.clone())
    };
    log::info!("✓ {} scripted events over {} frames", script.len(), config.frames);

    let dt = sim.config().time_step;
    let frame_budget = Duration::from_secs_f32(dt);
    let mut driver = Driver {
        sim,
        pointer: Vec2::ZERO,
    };

    let run_started = Instant::now();
    for frame in 0..config.frames {
        let frame_started = Instant::now();

        for event in script.advance(frame) {
            driver.apply(&event.action);
        }
        driver.sim.tick(dt)?;

        if config.log_every > 0 && frame % config.log_every == 0 {
            let stats = driver.sim.stats();
            let (min, max) = bounds(&driver.sim.render());
            log::info!(
                "frame {:>5} t={:.2}s n={} locked={} centroid=({:.1}, {:.1}) extent={:.1}x{:.1} KE={:.1} vmax={:.1}",
                frame,
                stats.elapsed,
                stats.particle_count,
                stats.locked_count,
                stats.centroid.x,
                stats.centroid.y,
                max.x - min.x,
                max.y - min.y,
                stats.kinetic_energy,
                stats.max_speed
            );
        }

        if args.realtime {
            std::thread::sleep(frame_budget.saturating_sub(frame_started.elapsed()));
        }
    }

    let elapsed = run_started.elapsed();
    log::info!(
        "✓ Ran {} frames in {:.2?} ({:.0} frames/s)",
        config.frames,
        elapsed,
        config.frames as f64 / elapsed.as_secs_f64().max(1e-9)
    );

    if args.dump {
        for p in driver.sim.render() {
            println!("{} {} {}", p.position.x, p.position.y, p.radius);
        }
    }

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use rail_sim::simulation::{self, Pacing, Preset, Severity, SimWorld, TickObserver, TickOutput};

#[derive(Parser)]
#[command(name = "rail_sim")]
#[command(about = "Fixed-block signaling and ATP simulation on a looped track")]
struct Cli {
    /// Scenario to load before starting the clock
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    scenario: Preset,

    /// Number of simulation ticks to run (100 ms of simulated time each)
    #[arg(long, default_value = "300")]
    ticks: u32,

    /// Pace ticks in real time instead of running them back to back
    #[arg(long)]
    realtime: bool,

    /// Print a summary every N ticks (0 disables periodic summaries)
    #[arg(long, default_value = "50")]
    summary_every: u64,

    /// Draw the track strip with each summary
    #[arg(long)]
    map: bool,
}

/// Forwards events to the logger and prints periodic summaries
struct ConsoleObserver {
    summary_every: u64,
    map: bool,
}

impl TickObserver for ConsoleObserver {
    fn on_tick(&mut self, world: &SimWorld, output: &TickOutput) {
        for event in &output.events {
            match event.severity {
                Severity::Info => info!("{}", event),
                Severity::Warning => warn!("{}", event),
            }
        }

        if self.summary_every > 0 && output.tick > 0 && output.tick % self.summary_every == 0 {
            println!(
                "--- After tick {} ({:.1}s simulated time) ---",
                output.tick,
                output.time_ms as f64 / 1000.0
            );
            world.print_summary();
            if self.map {
                world.draw_track();
            }
            println!();
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut world = SimWorld::with_preset(cli.scenario)?;
    for event in world.log().iter() {
        info!("{}", event);
    }

    println!("Initial state:");
    world.print_summary();
    if cli.map {
        world.draw_track();
    }
    println!();

    let pacing = if cli.realtime {
        Pacing::RealTime
    } else {
        Pacing::AsFastAsPossible
    };

    let mut observer = ConsoleObserver {
        summary_every: cli.summary_every,
        map: cli.map,
    };

    world.set_running(true);
    let stats = simulation::run(&mut world, cli.ticks, pacing, &mut observer);
    world.set_running(false);

    println!("=== Final State ===");
    world.print_summary();
    if cli.map {
        world.draw_track();
    }

    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks run: {}", stats.ticks_run);
    info!("Simulated time: {:.1}s", world.time_ms() as f64 / 1000.0);
    info!("Events emitted: {}", stats.events_emitted);
    info!("Warnings emitted: {}", stats.warnings_emitted);
    info!("ATP stops: {}", stats.atp_stops);
    info!("Lap restarts: {}", stats.lap_restarts);

    Ok(())
}

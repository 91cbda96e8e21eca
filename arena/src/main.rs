//! # Arena Runtime
//!
//! Entry point for the `arena` binary.

use std::path::PathBuf;

use anyhow::Result;
use arena::app::{self, EvaluateOptions, ReplayOptions};
use clap::{Parser, Subcommand};
use physics::PlantTopology;
use tracing_subscriber::EnvFilter;

/// Evaluate cart-pendulum controllers
#[derive(Parser)]
#[command(name = "arena", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a population of randomly initialised networks
    Evaluate {
        /// Plant layout: `single` or `double`
        #[arg(long, default_value = "single")]
        topology: PlantTopology,
        /// Number of candidates in the batch
        #[arg(long, default_value_t = 32)]
        population: usize,
        /// Hidden layer width
        #[arg(long, default_value_t = 8)]
        hidden: usize,
        /// Worker threads (defaults to ARENA_WORKERS, then available cores)
        #[arg(long)]
        workers: Option<usize>,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Episode length in simulated seconds
        #[arg(long)]
        duration: Option<f64>,
        /// Write the best network to this file
        #[arg(long, value_name = "FILE")]
        save_best: Option<PathBuf>,
    },
    /// Run one episode with a saved network
    Replay {
        #[arg(long, default_value = "single")]
        topology: PlantTopology,
        /// Network artifact written by `evaluate --save-best`
        #[arg(long, value_name = "FILE")]
        controller: PathBuf,
        #[arg(long)]
        duration: Option<f64>,
        /// Print every tick
        #[arg(long)]
        trace: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Evaluate {
            topology,
            population,
            hidden,
            workers,
            seed,
            duration,
            save_best,
        } => {
            let report = app::evaluate(&EvaluateOptions {
                topology,
                population,
                hidden,
                workers,
                seed,
                duration,
                save_best,
            })?;
            let summary = &report.summary;
            println!("evaluated: {}", summary.evaluated);
            println!("failed:    {}", summary.failed);
            match &summary.best {
                Some((id, fitness)) => println!("best:      #{id} ({fitness:.3})"),
                None => println!("best:      none"),
            }
            if let Some(mean) = summary.mean_fitness {
                println!("mean:      {mean:.3}");
            }
            println!("elapsed:   {:.2?}", summary.elapsed);
        }
        Commands::Replay {
            topology,
            controller,
            duration,
            trace,
        } => {
            let report = app::replay(&ReplayOptions {
                topology,
                controller,
                duration,
            })?;
            if trace {
                println!("tick,elapsed,force,cart_x,angles");
                for tick in &report.trajectory.ticks {
                    let angles: Vec<String> = tick.poses.iter().skip(1).map(|(_, a)| format!("{a:.4}")).collect();
                    let cart_x = tick.poses.first().map_or(f64::NAN, |(pos, _)| pos.x);
                    println!(
                        "{},{:.4},{:.2},{:.2},{}",
                        tick.tick,
                        tick.elapsed,
                        tick.force,
                        cart_x,
                        angles.join(";")
                    );
                }
            }
            println!("cumulative error: {:?}", &*report.cumulative);
            println!("fitness:          {:.3}", report.fitness);
        }
    }
    Ok(())
}

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workout_tracker_data_management::{storage::FileStorage, WorkoutTracker, WorkoutView};
use workout_tracker_lib::{Position, Workout, WorkoutInput};

// CLI for manual data operations
#[derive(Parser)]
#[command(name = "workouts", about = "Inspect and edit the locally stored workouts")]
struct Cli {
    /// Store directory, defaults to the project's data directory
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List stored workouts in the order they were added
    List,
    /// Add a workout
    Add {
        #[command(subcommand)]
        workout: AddWorkout,
    },
    /// Delete every stored workout
    Clear,
}

#[derive(Subcommand)]
enum AddWorkout {
    Running {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,
        #[arg(long, allow_negative_numbers = true)]
        cadence: f64,
    },
    Cycling {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        #[arg(long, allow_negative_numbers = true)]
        distance: f64,
        #[arg(long, allow_negative_numbers = true)]
        duration: f64,
        #[arg(long, allow_negative_numbers = true)]
        elevation: f64,
    },
}

/// Prints list items and alerts, the map parts have nothing to show in a terminal.
struct ConsoleView {
    quiet: bool,
}

impl WorkoutView for ConsoleView {
    fn show_map(&mut self, _center: Position, _zoom: f64) {}

    fn set_view(&mut self, _center: Position, _zoom: f64) {}

    fn render_marker(&mut self, _workout: &Workout) {}

    fn render_workout(&mut self, workout: &Workout) {
        if self.quiet {
            return;
        }

        let (metric, metric_unit) = workout.metric_summary();
        let (extra, extra_unit) = workout.variant_summary();
        println!(
            "{} {} [{}] {} km, {} min, {} {}, {} {} at ({:.5}, {:.5})",
            workout.workout_type().icon(),
            workout.description,
            workout.id,
            workout.distance_km,
            workout.duration_min,
            metric,
            metric_unit,
            extra,
            extra_unit,
            workout.position.latitude(),
            workout.position.longitude(),
        );
    }

    fn clear_workouts(&mut self) {}

    fn show_form(&mut self) {}

    fn hide_form(&mut self) {}

    fn alert(&mut self, message: &str) {
        eprintln!("{message}");
    }

    fn reload(&mut self) {
        println!("All workouts deleted");
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=info,workout_tracker_data_management=info", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let storage = match cli.dir {
        Some(dir) => FileStorage::open(dir),
        None => FileStorage::open_default(),
    }
    .context("Failed to open workout store")?;
    tracing::debug!("Using store at {:?}", storage.dir());

    let mut tracker = WorkoutTracker::new(ConsoleView { quiet: false }, storage);

    match cli.command {
        Command::List => {
            tracker.restore().context("Failed to load workouts")?;
            if tracker.workouts().is_empty() {
                println!("No workouts stored");
            }
        }
        Command::Add { workout } => {
            // Only the new workout is printed
            tracker.view_mut().quiet = true;
            tracker.restore().context("Failed to load workouts")?;
            tracker.view_mut().quiet = false;
            let (position, input) = match workout {
                AddWorkout::Running { lat, lng, distance, duration, cadence } => {
                    (Position::new(lat, lng), WorkoutInput::running(distance, duration, cadence))
                }
                AddWorkout::Cycling { lat, lng, distance, duration, elevation } => {
                    (Position::new(lat, lng), WorkoutInput::cycling(distance, duration, elevation))
                }
            };
            tracker.on_map_click(position);
            tracker.submit(input).context("Failed to add workout")?;
        }
        Command::Clear => {
            tracker.reset().context("Failed to clear workouts")?;
        }
    }

    Ok(())
}

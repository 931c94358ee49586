use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use waymark_navigation::{
    session::event::{NavigationEvent, event_channel},
    simulation::{SimulatedEngine, SimulationParams},
    view::NavigationView,
};

use crate::{directions::CliDirections, file_utils::read_props, parsers};

const PROGRESS_STEPS: u64 = 1000;

#[derive(Args)]
pub struct NavigateArgs {
    /// Navigation props JSON file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Use straight-line directions instead of the directions API
    #[arg(long)]
    offline: bool,

    /// Interval between simulated location updates
    #[arg(long, value_parser = parsers::parse_duration, default_value = "200ms")]
    tick: std::time::Duration,

    /// How much faster than the expected travel time to drive
    #[arg(long, default_value_t = 20.0)]
    speed: f64,

    /// Only show the progress bar, not the events
    #[arg(short, long)]
    quiet: bool,
}

pub async fn run(args: NavigateArgs) -> anyhow::Result<()> {
    let mut props = read_props(&args.input)?;
    if !props.should_simulate_route {
        info!("Enabling route simulation, no device location is available");
        props.should_simulate_route = true;
    }

    let directions = CliDirections::from_env(args.offline, None)?;
    let engine = SimulatedEngine::new(SimulationParams {
        tick: args.tick,
        speed_multiplier: args.speed,
    });

    let (sender, mut receiver) = event_channel();
    let view = NavigationView::new(props, directions, engine, sender);

    view.layout().await?;

    let legs = view
        .compiled_route()
        .map(|route| route.leg_count())
        .ok_or_else(|| anyhow::anyhow!("No navigation session was started"))?;

    let progress_bar = ProgressBar::new(PROGRESS_STEPS);
    progress_bar.set_style(ProgressStyle::with_template(
        "{bar:40} {percent:>3}% {msg}",
    )?);

    let mut arrivals = 0;
    while arrivals < legs {
        let Some(event) = receiver.recv().await else {
            break;
        };

        if !args.quiet {
            progress_bar.suspend(|| match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(err) => warn!("Cannot serialize event: {}", err),
            });
        }

        match event {
            NavigationEvent::RouteProgressChange {
                fraction_traveled,
                distance_remaining,
                ..
            } => {
                progress_bar.set_position((fraction_traveled * PROGRESS_STEPS as f64) as u64);
                progress_bar.set_message(format!("{:.0}m remaining", distance_remaining));
            }
            NavigationEvent::Arrive { .. } => arrivals += 1,
            NavigationEvent::CancelNavigation { .. } | NavigationEvent::Error { .. } => break,
            NavigationEvent::LocationChange { .. } => {}
        }
    }

    progress_bar.finish_with_message(format!("arrived, {arrivals}/{legs} legs"));
    view.remove();

    Ok(())
}

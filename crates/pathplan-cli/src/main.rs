//! Plans diversion, search or itinerary waypoints and prints them as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use pathplan_cli::cli::read_input;
use pathplan_cli::{
    divert, search, visit, Args, Command, DiversionRequest, ItineraryRequest, SearchRequest,
    Settings,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = Settings::from_env();

    // Logs go to stderr; stdout carries only the plan.
    let filter = EnvFilter::from_default_env().add_directive("pathplan=info".parse()?);
    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let output = match args.command {
        Command::Divert { input } => {
            let raw = read_input(&input)?;
            let request: DiversionRequest =
                serde_json::from_str(&raw).context("parsing diversion request")?;
            divert(&request)?
        }
        Command::Search {
            input,
            overlap,
            min_ring_points,
        } => {
            if let Some(overlap) = overlap {
                settings.overlap_multiplier = overlap;
            }
            if let Some(points) = min_ring_points {
                settings.min_points_per_ring = points;
            }
            let raw = read_input(&input)?;
            let request: SearchRequest =
                serde_json::from_str(&raw).context("parsing search request")?;
            search(&request, &settings.planner())?
        }
        Command::Visit { input } => {
            let raw = read_input(&input)?;
            let request: ItineraryRequest =
                serde_json::from_str(&raw).context("parsing itinerary request")?;
            visit(&request)?
        }
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{json}");
    Ok(())
}

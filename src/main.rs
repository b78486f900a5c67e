use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;

use crate::{
    bluebikes::Dataset,
    buckets::DEFAULT_HALF_WIDTH,
    data::{MinuteOfDay, Station},
    scale::RadiusScale,
    traffic::{TimeFilter, TrafficAggregator},
};

mod bluebikes;
mod buckets;
mod data;
mod error;
mod scale;
mod traffic;

/// summarizes bike share station traffic, optionally around a time of day
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// station catalog json, `{"data": {"stations": [...]}}`
    #[arg(short, long)]
    stations: PathBuf,
    /// trip csv with start/end station ids and timestamps
    #[arg(short, long)]
    trips: PathBuf,
    /// minute of the day to filter on, or -1 for all trips
    #[arg(short, long, default_value_t = TimeFilter::SLIDER_UNFILTERED, allow_hyphen_values = true)]
    minute: i32,
    /// minutes on either side of the filter minute
    #[arg(long, default_value_t = DEFAULT_HALF_WIDTH)]
    half_width: MinuteOfDay,
    /// marker radius of the busiest station
    #[arg(long, default_value_t = 25.0)]
    max_radius: f64,
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let filter = TimeFilter::from_slider(args.minute)?;

    log::info!("processing dataset");
    let dataset = Dataset::load(&args.stations, &args.trips)?;
    let stations = dataset
        .stations
        .into_iter()
        .map(Station::from)
        .collect::<Vec<_>>();
    let (trips, skipped) = buckets::parse_trips(dataset.trips);
    if !skipped.is_empty() {
        log::warn!("{} trips skipped", skipped.len());
    }

    log::info!("creating aggregator");
    let aggregator = TrafficAggregator::new(&stations, trips, args.half_width)?;
    log::info!(
        "bucketed {} trips across {} stations",
        aggregator.buckets().len(),
        aggregator.station_ids().len()
    );

    let traffic = aggregator.query_by_minute(filter)?;
    let scale = RadiusScale::fit(&traffic, args.max_radius);

    println!("Traffic at {}", filter.label()?);
    for station in stations.iter().sorted_by(|a, b| a.id.cmp(&b.id)) {
        let Some(station_traffic) = traffic.get(&station.id) else {
            continue;
        };
        println!(
            "{}\t{}\t{:.5},{:.5}\t{:.1}\t{}",
            station.id,
            station.name,
            station.longitude,
            station.latitude,
            scale.radius(station_traffic.total),
            station_traffic
        );
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(_) => log::info!("finished."),
        Err(e) => {
            log::error!("failed summarizing traffic: {e}");
            std::process::exit(1);
        }
    }
}

use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    sync::Arc,
};

use itertools::Itertools;

use crate::{buckets::*, data::*, error::ProcessingError};

/// Trip volume through one station for a single query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationTraffic {
    pub station_id: StationId,
    pub arrivals: usize,
    pub departures: usize,
    pub total: usize,
}

impl StationTraffic {
    pub fn new(station_id: StationId, arrivals: usize, departures: usize) -> Self {
        Self {
            station_id,
            arrivals,
            departures,
            total: arrivals + departures,
        }
    }
}

impl Display for StationTraffic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} trips ({} departures, {} arrivals)",
            self.total, self.departures, self.arrivals
        )
    }
}

pub type Traffic = HashMap<StationId, StationTraffic>;

/// Counts departures over `departing` and arrivals over `arriving`.
/// Stations outside `station_ids` are counted and then dropped.
fn tally(
    departing: &[Arc<Trip>],
    arriving: &[Arc<Trip>],
    station_ids: &HashSet<StationId>,
) -> Traffic {
    let departures = departing
        .iter()
        .map(|trip| trip.start_station_id.as_str())
        .counts();
    let arrivals = arriving
        .iter()
        .map(|trip| trip.end_station_id.as_str())
        .counts();

    station_ids
        .iter()
        .map(|id| {
            let traffic = StationTraffic::new(
                id.to_owned(),
                arrivals.get(id.as_str()).copied().unwrap_or_default(),
                departures.get(id.as_str()).copied().unwrap_or_default(),
            );
            (id.to_owned(), traffic)
        })
        .collect()
}

/// Per station arrival and departure counts over exactly `trips`.
pub fn aggregate(trips: &[Arc<Trip>], station_ids: &HashSet<StationId>) -> Traffic {
    tally(trips, trips, station_ids)
}

/// Position of the time-of-day slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFilter {
    Unfiltered,
    Minute(MinuteOfDay),
}

impl TimeFilter {
    pub const SLIDER_UNFILTERED: i32 = -1;

    /// Maps a slider value, `-1` meaning no filter.
    pub fn from_slider(value: i32) -> Result<Self, ProcessingError> {
        if value == Self::SLIDER_UNFILTERED {
            return Ok(Self::Unfiltered);
        }

        ProcessingError::check_range(
            "slider",
            value.into(),
            Self::SLIDER_UNFILTERED.into(),
            (MINUTES_PER_DAY - 1).into(),
        )?;
        Ok(Self::Minute(value as MinuteOfDay))
    }

    pub fn label(&self) -> Result<String, ProcessingError> {
        match self {
            TimeFilter::Unfiltered => Ok(String::from("(any time)")),
            TimeFilter::Minute(minute) => format_minute(*minute),
        }
    }
}

#[derive(Debug)]
pub struct TrafficAggregator {
    trips: Vec<Arc<Trip>>,
    station_ids: HashSet<StationId>,
    buckets: MinuteBuckets,
    half_width: MinuteOfDay,
}

impl TrafficAggregator {
    pub fn new(
        stations: &[Station],
        trips: Vec<Arc<Trip>>,
        half_width: MinuteOfDay,
    ) -> Result<Self, ProcessingError> {
        ProcessingError::check_range("half_width", half_width.into(), 0, MAX_HALF_WIDTH.into())?;

        let buckets = MinuteBuckets::build(&trips);
        log::debug!(
            "bucketed {} trips for {} stations",
            buckets.len(),
            stations.len()
        );

        Ok(Self {
            station_ids: stations.iter().map(|station| station.id.to_owned()).collect(),
            trips,
            buckets,
            half_width,
        })
    }

    pub fn trips(&self) -> &[Arc<Trip>] {
        &self.trips
    }

    pub fn station_ids(&self) -> &HashSet<StationId> {
        &self.station_ids
    }

    pub fn buckets(&self) -> &MinuteBuckets {
        &self.buckets
    }

    /// Departures are windowed by departure time and arrivals by arrival
    /// time, each independently of the other end of the trip.
    pub fn query_by_minute(&self, filter: TimeFilter) -> Result<Traffic, ProcessingError> {
        match filter {
            TimeFilter::Unfiltered => Ok(aggregate(&self.trips, &self.station_ids)),
            TimeFilter::Minute(minute) => {
                let departing =
                    windowed_trips(self.buckets.departures(), minute, self.half_width)?;
                let arriving =
                    windowed_trips(self.buckets.arrivals(), minute, self.half_width)?;
                log::debug!(
                    "minute {minute}: {} departing, {} arriving",
                    departing.len(),
                    arriving.len()
                );
                Ok(tally(&departing, &arriving, &self.station_ids))
            }
        }
    }
}

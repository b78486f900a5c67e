use std::sync::Arc;

use crate::{bluebikes::RawTrip, data::*, error::ProcessingError};

pub const DEFAULT_HALF_WIDTH: MinuteOfDay = 60;
pub const MAX_HALF_WIDTH: MinuteOfDay = MINUTES_PER_DAY / 2;

/// Trips indexed by minute of the day, one list per minute.
pub type Bucket = Vec<Vec<Arc<Trip>>>;

/// Every trip sits in exactly one departure bucket (its start minute)
/// and exactly one arrival bucket (its end minute).
#[derive(Debug)]
pub struct MinuteBuckets {
    departures: Bucket,
    arrivals: Bucket,
}

impl MinuteBuckets {
    pub fn build<'a>(trips: impl IntoIterator<Item = &'a Arc<Trip>>) -> Self {
        let mut buckets = Self {
            departures: vec![Vec::new(); MINUTES_PER_DAY.into()],
            arrivals: vec![Vec::new(); MINUTES_PER_DAY.into()],
        };

        for trip in trips {
            buckets.departures[usize::from(trip.start_minute())].push(Arc::clone(trip));
            buckets.arrivals[usize::from(trip.end_minute())].push(Arc::clone(trip));
        }

        buckets
    }

    pub fn departures(&self) -> &Bucket {
        &self.departures
    }

    pub fn arrivals(&self) -> &Bucket {
        &self.arrivals
    }

    pub fn len(&self) -> usize {
        self.departures.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Converts raw rows into trips, skipping the ones whose timestamps don't parse.
pub fn parse_trips(
    raw_trips: impl IntoIterator<Item = RawTrip>,
) -> (Vec<Arc<Trip>>, Vec<ProcessingError>) {
    let mut trips = Vec::new();
    let mut skipped = Vec::new();

    for raw_trip in raw_trips {
        match Trip::try_from(raw_trip) {
            Ok(trip) => trips.push(Arc::new(trip)),
            Err(error) => {
                log::warn!("skipping trip: {error}");
                skipped.push(error);
            }
        }
    }

    if !skipped.is_empty() {
        log::info!(
            "kept {} trips, skipped {} with invalid timestamps",
            trips.len(),
            skipped.len()
        );
    }

    (trips, skipped)
}

/// Trips in the circular range `[center - half_width, center + half_width)`
/// of minutes, wrapping around midnight.
pub fn windowed_trips(
    bucket: &Bucket,
    center: MinuteOfDay,
    half_width: MinuteOfDay,
) -> Result<Vec<Arc<Trip>>, ProcessingError> {
    ProcessingError::check_range(
        "center_minute",
        center.into(),
        0,
        (MINUTES_PER_DAY - 1).into(),
    )?;
    ProcessingError::check_range("half_width", half_width.into(), 0, MAX_HALF_WIDTH.into())?;

    let day = i32::from(MINUTES_PER_DAY);
    let center = i32::from(center);
    let half_width = i32::from(half_width);

    Ok(((center - half_width)..(center + half_width))
        .map(|minute| minute.rem_euclid(day) as usize)
        .filter_map(|minute| bucket.get(minute))
        .flatten()
        .cloned()
        .collect())
}

#[cfg(test)]
mod test {
    use chrono::NaiveDate;

    use super::*;

    fn trip_at(start: MinuteOfDay, end: MinuteOfDay) -> Arc<Trip> {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let at = |minute: MinuteOfDay| {
            day.and_hms_opt((minute / 60).into(), (minute % 60).into(), 0)
                .unwrap()
        };
        Arc::new(Trip {
            start_station_id: String::from("A"),
            end_station_id: String::from("B"),
            started_at: at(start),
            ended_at: at(end),
        })
    }

    fn minutes(trips: &[Arc<Trip>]) -> Vec<MinuteOfDay> {
        trips.iter().map(|trip| trip.start_minute()).collect()
    }

    #[test]
    fn test_build_places_each_trip_once() {
        let trips = vec![trip_at(485, 500), trip_at(1430, 10), trip_at(600, 600)];
        let buckets = MinuteBuckets::build(&trips);

        assert_eq!(buckets.len(), 3);
        assert_eq!(
            buckets.arrivals().iter().map(Vec::len).sum::<usize>(),
            3
        );
        assert_eq!(buckets.departures()[485].len(), 1);
        assert_eq!(buckets.arrivals()[500].len(), 1);
        assert_eq!(buckets.departures()[1430].len(), 1);
        assert_eq!(buckets.arrivals()[10].len(), 1);
        assert_eq!(buckets.departures()[600].len(), 1);
        assert_eq!(buckets.arrivals()[600].len(), 1);
    }

    #[test]
    fn test_build_empty() {
        let buckets = MinuteBuckets::build(&Vec::<Arc<Trip>>::new());
        assert!(buckets.is_empty());
        assert_eq!(buckets.departures().len(), usize::from(MINUTES_PER_DAY));
        assert_eq!(buckets.arrivals().len(), usize::from(MINUTES_PER_DAY));
        assert!(buckets.arrivals().iter().all(Vec::is_empty));
    }

    #[test]
    fn test_parse_trips_skips_invalid_timestamps() {
        let raw = |started_at: &str| RawTrip {
            ride_id: None,
            start_station_id: String::from("A"),
            end_station_id: String::from("B"),
            started_at: started_at.to_owned(),
            ended_at: String::from("2024-03-01 09:00:00"),
        };
        let (trips, skipped) = parse_trips(vec![
            raw("2024-03-01 08:00:00"),
            raw("garbage"),
            raw("2024-03-01 08:30:00"),
        ]);

        assert_eq!(trips.len(), 2);
        assert_eq!(skipped.len(), 1);
        assert_eq!(MinuteBuckets::build(&trips).len(), 2);
    }

    #[test]
    fn test_windowed_trips_wraps_around_midnight() {
        let trips = vec![
            trip_at(1430, 1435),
            trip_at(100, 110),
            trip_at(1409, 1420),
            trip_at(1410, 1420),
            trip_at(89, 95),
            trip_at(90, 95),
        ];
        let buckets = MinuteBuckets::build(&trips);

        let mut found = minutes(&windowed_trips(buckets.departures(), 30, 60).unwrap());
        found.sort();
        assert_eq!(found, vec![89, 1410, 1430]);
    }

    #[test]
    fn test_windowed_trips_at_day_edges() {
        let trips = vec![trip_at(0, 5), trip_at(1439, 5), trip_at(60, 70), trip_at(1379, 1390)];
        let buckets = MinuteBuckets::build(&trips);

        let mut found = minutes(&windowed_trips(buckets.departures(), 0, 60).unwrap());
        found.sort();
        assert_eq!(found, vec![0, 1439]);

        let mut found = minutes(&windowed_trips(buckets.departures(), 1439, 60).unwrap());
        found.sort();
        assert_eq!(found, vec![0, 1379, 1439]);
    }

    #[test]
    fn test_windowed_trips_widths() {
        let trips = vec![trip_at(0, 5), trip_at(485, 500), trip_at(1200, 1210)];
        let buckets = MinuteBuckets::build(&trips);

        assert!(windowed_trips(buckets.departures(), 485, 0)
            .unwrap()
            .is_empty());
        assert_eq!(
            windowed_trips(buckets.departures(), 485, 1).unwrap().len(),
            1
        );
        assert_eq!(
            windowed_trips(buckets.departures(), 485, MAX_HALF_WIDTH)
                .unwrap()
                .len(),
            3
        );
    }

    #[test]
    fn test_windowed_trips_rejects_out_of_range() {
        let buckets = MinuteBuckets::build(&Vec::<Arc<Trip>>::new());

        assert_eq!(
            windowed_trips(buckets.departures(), 1440, 60).unwrap_err(),
            ProcessingError::InvalidArgument {
                name: "center_minute",
                value: 1440,
                min: 0,
                max: 1439,
            }
        );
        assert!(matches!(
            windowed_trips(buckets.departures(), 0, 721),
            Err(ProcessingError::InvalidArgument {
                name: "half_width",
                ..
            })
        ));
    }
}

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};

use crate::{bluebikes, error::ProcessingError};

pub type StationId = String;

/// Minute of the local day, `hour * 60 + minute`.
pub type MinuteOfDay = u16;

pub const MINUTES_PER_DAY: MinuteOfDay = 1440;

#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub id: StationId,
    pub name: String,
    pub longitude: f64,
    pub latitude: f64,
}

impl From<bluebikes::RawStation> for Station {
    fn from(value: bluebikes::RawStation) -> Self {
        Self {
            id: value.short_name,
            name: value.name,
            longitude: value.lon,
            latitude: value.lat,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Trip {
    pub start_station_id: StationId,
    pub end_station_id: StationId,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
}

impl Trip {
    pub fn start_minute(&self) -> MinuteOfDay {
        minute_of_day(&self.started_at)
    }

    pub fn end_minute(&self) -> MinuteOfDay {
        minute_of_day(&self.ended_at)
    }
}

impl TryFrom<bluebikes::RawTrip> for Trip {
    type Error = ProcessingError;

    fn try_from(value: bluebikes::RawTrip) -> Result<Self, Self::Error> {
        let ride_id = value.ride_id.unwrap_or_default();
        let parse = |text: &str| {
            parse_timestamp(text).ok_or_else(|| ProcessingError::InvalidTimestamp {
                ride_id: ride_id.to_owned(),
                value: text.to_owned(),
            })
        };

        Ok(Self {
            started_at: parse(&value.started_at)?,
            ended_at: parse(&value.ended_at)?,
            start_station_id: value.start_station_id,
            end_station_id: value.end_station_id,
        })
    }
}

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Wall clock time as written; an explicit offset keeps the wall clock at that offset.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.naive_local());
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
}

pub fn minute_of_day(datetime: &NaiveDateTime) -> MinuteOfDay {
    (datetime.hour() * 60 + datetime.minute()) as MinuteOfDay
}

/// Renders a minute of the day as `HH:MM AM/PM`.
pub fn format_minute(minute: MinuteOfDay) -> Result<String, ProcessingError> {
    let invalid = || ProcessingError::InvalidArgument {
        name: "minute",
        value: minute.into(),
        min: 0,
        max: (MINUTES_PER_DAY - 1).into(),
    };

    if minute >= MINUTES_PER_DAY {
        return Err(invalid());
    }

    let time = NaiveTime::from_hms_opt((minute / 60).into(), (minute % 60).into(), 0)
        .ok_or_else(invalid)?;

    Ok(time.format("%I:%M %p").to_string())
}

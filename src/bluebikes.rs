use std::{fs::File, io::BufReader, path::Path};

use serde::Deserialize;

use crate::error::LoadError;

#[derive(Deserialize, Debug, Clone)]
pub struct RawStation {
    pub short_name: String,
    #[serde(default)]
    pub name: String,
    pub lon: f64,
    pub lat: f64,
}

#[derive(Deserialize, Debug)]
struct StationCatalog {
    data: StationList,
}

#[derive(Deserialize, Debug)]
struct StationList {
    stations: Vec<RawStation>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawTrip {
    #[serde(default)]
    pub ride_id: Option<String>,
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: String,
    pub ended_at: String,
}

#[derive(Debug)]
pub struct Dataset {
    pub stations: Vec<RawStation>,
    pub trips: Vec<RawTrip>,
}

impl Dataset {
    pub fn load(stations: &Path, trips: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            stations: load_stations(stations)?,
            trips: load_trips(trips)?,
        })
    }
}

/// Reads a station catalog shaped `{"data": {"stations": [...]}}`.
pub fn load_stations(path: &Path) -> Result<Vec<RawStation>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog: StationCatalog = serde_json::from_reader(BufReader::new(file))?;

    if catalog.data.stations.is_empty() {
        return Err(LoadError::NoStations {
            path: path.display().to_string(),
        });
    }

    log::info!(
        "loaded {} stations from {}",
        catalog.data.stations.len(),
        path.display()
    );
    Ok(catalog.data.stations)
}

pub fn load_trips(path: &Path) -> Result<Vec<RawTrip>, LoadError> {
    let trips = csv::Reader::from_path(path)?
        .deserialize()
        .collect::<Result<Vec<RawTrip>, csv::Error>>()?;

    log::info!("loaded {} trips from {}", trips.len(), path.display());
    Ok(trips)
}

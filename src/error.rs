use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("Unparseable timestamp {value:?} on Trip {ride_id:?}")]
    InvalidTimestamp { ride_id: String, value: String },

    #[error("Argument {name} = {value} is outside of [{min}, {max}]")]
    InvalidArgument {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ProcessingError {
    pub fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), Self> {
        if (min..=max).contains(&value) {
            Ok(())
        } else {
            Err(Self::InvalidArgument {
                name,
                value,
                min,
                max,
            })
        }
    }
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed reading {path:?}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed trip csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed station catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Station catalog {path:?} contains no stations")]
    NoStations { path: String },
}

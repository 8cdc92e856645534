use serde::de::DeserializeOwned;
use std::{
    fs::{self, File},
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, trace};
use zip::ZipArchive;

mod config;
pub mod models;
pub use config::*;
pub use models::*;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Csv file {0} is missing header")]
    MissingHeader(String),
    #[error("Could not find file with name: {0}")]
    FileNotFound(String),
    #[error("No station information source was given")]
    MissingStations,
    #[error("No trip source was given")]
    MissingTrips,
}

#[derive(Debug, Default, Clone)]
pub enum StorageType {
    #[default]
    None,
    Csv(PathBuf),
    Zip(PathBuf),
}

impl StorageType {
    /// Picks the storage from the file extension, anything but `.zip` is read as csv.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let is_zip = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if is_zip {
            Self::Zip(path.to_owned())
        } else {
            Self::Csv(path.to_owned())
        }
    }
}

/// Where the station registry and the trip history are read from.
#[derive(Default)]
pub struct Source {
    config: Config,
    stations: Option<PathBuf>,
    trips: StorageType,
}

impl Source {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// GBFS `station_information` json file.
    pub fn with_stations<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.stations = Some(path.as_ref().to_owned());
        self
    }

    /// Trip history, either a csv file or a zip archive holding one.
    pub fn with_trips<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.trips = StorageType::from_path(path);
        self
    }

    /// Reads `Config::stations_file_name` from `dir` and the trip history from
    /// the first `.csv` or `.zip` file of `dir`, ordered by name.
    pub fn from_dir<P: AsRef<Path>>(mut self, dir: P) -> Result<Self, self::Error> {
        let dir = dir.as_ref();
        self.stations = Some(dir.join(&self.config.stations_file_name));
        self.trips = StorageType::from_path(trips_file_in(dir)?);
        Ok(self)
    }

    pub fn stream_stations<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, SourceStation)),
    {
        let path = self.stations.as_ref().ok_or(Error::MissingStations)?;
        let file = File::open(path)?;
        stream_stations_from_reader(file, f)
    }

    pub fn stream_trips<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, SourceTrip)),
    {
        match &self.trips {
            StorageType::None => Err(Error::MissingTrips),
            StorageType::Csv(path) => {
                let file = File::open(path)?;
                stream_csv(file, &path.to_string_lossy(), self.config.delimiter, f)
            }
            StorageType::Zip(path) => {
                let zip_file = File::open(path)?;
                let mut archive = ZipArchive::new(zip_file)?;
                let name = trips_entry_name(&archive, self.config.trips_file_name.as_deref())?;
                let index = archive
                    .index_for_name(&name)
                    .ok_or(Error::FileNotFound(name.clone()))?;
                let file = archive.by_index(index)?;
                stream_csv(file, &name, self.config.delimiter, f)
            }
        }
    }
}

/// Reads a GBFS `station_information` document.
/// Stations that fail to deserialize are skipped.
pub fn stream_stations_from_reader<R, F>(reader: R, f: F) -> Result<(), self::Error>
where
    R: Read,
    F: FnMut((usize, SourceStation)),
{
    let feed: StationFeed = serde_json::from_reader(BufReader::new(reader))?;
    feed.data
        .stations
        .into_iter()
        .filter_map(|value| {
            serde_json::from_value::<SourceStation>(value)
                .inspect_err(|err| trace!("Skipping station: {err}"))
                .ok()
        })
        .enumerate()
        .for_each(f);
    Ok(())
}

/// Reads a trip history csv. Rows that fail to deserialize are skipped.
pub fn stream_trips_from_reader<R, F>(reader: R, delimiter: u8, f: F) -> Result<(), self::Error>
where
    R: Read,
    F: FnMut((usize, SourceTrip)),
{
    stream_csv(reader, "trips", delimiter, f)
}

fn stream_csv<R, T, F>(reader: R, name: &str, delimiter: u8, f: F) -> Result<(), self::Error>
where
    R: Read,
    T: DeserializeOwned,
    F: FnMut((usize, T)),
{
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    if reader.headers()?.is_empty() {
        return Err(Error::MissingHeader(name.to_string()));
    }

    let mut skipped: usize = 0;
    reader
        .deserialize()
        .filter_map(|row| match row {
            Ok(value) => Some(value),
            Err(err) => {
                trace!("Skipping row in {name}: {err}");
                skipped += 1;
                None
            }
        })
        .enumerate()
        .for_each(f);
    if skipped > 0 {
        debug!("Skipped {skipped} unreadable rows in {name}");
    }
    Ok(())
}

fn trips_file_in(dir: &Path) -> Result<PathBuf, self::Error> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| {
                    ext.eq_ignore_ascii_case("csv") || ext.eq_ignore_ascii_case("zip")
                })
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or(Error::FileNotFound(format!("{}/*.csv", dir.display())))
}

fn trips_entry_name(
    archive: &ZipArchive<File>,
    wanted: Option<&str>,
) -> Result<String, self::Error> {
    if let Some(name) = wanted {
        return Ok(name.to_string());
    }
    archive
        .file_names()
        .filter(|name| name.to_ascii_lowercase().ends_with(".csv"))
        .filter(|name| !name.starts_with("__MACOSX"))
        .min_by_key(|name| archive.index_for_name(name))
        .map(String::from)
        .ok_or(Error::FileNotFound("*.csv".to_string()))
}

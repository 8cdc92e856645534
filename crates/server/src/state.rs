use bikeflow::prelude::*;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

pub struct AppState {
    pub stations_path: PathBuf,
    pub trips_path: PathBuf,
    /// Replaced as a whole on reload, never mutated in place.
    pub repository: RwLock<Option<Repository>>,
}

impl AppState {
    pub fn new(stations_path: PathBuf, trips_path: PathBuf) -> Self {
        Self {
            stations_path,
            trips_path,
            repository: RwLock::new(None),
        }
    }

    pub fn source(&self) -> Source {
        self.source_with_trips(&self.trips_path)
    }

    pub fn source_with_trips<P: AsRef<Path>>(&self, trips_path: P) -> Source {
        Source::new()
            .with_stations(&self.stations_path)
            .with_trips(trips_path)
    }

    /// Sibling of the trips file that downloads are written to. It keeps the
    /// extension so it is read the same way as the trips file.
    pub fn download_path(&self) -> PathBuf {
        let file_name = self
            .trips_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.trips_path
            .with_file_name(format!("download-{file_name}"))
    }
}

#[test]
fn download_path_keeps_extension() {
    let state = AppState::new("data/stations.json".into(), "data/trips.zip".into());
    assert_eq!(state.download_path(), PathBuf::from("data/download-trips.zip"));
}

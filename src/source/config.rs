pub struct Config {
    /// GBFS station information file, used when reading from a directory.
    pub stations_file_name: String,
    /// Name of the trips csv inside a zip archive.
    /// When None the first csv entry of the archive is used.
    pub trips_file_name: Option<String>,
    pub delimiter: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stations_file_name: "station_information.json".into(),
            trips_file_name: None,
            delimiter: b',',
        }
    }
}

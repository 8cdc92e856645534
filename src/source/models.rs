use serde::{Deserialize, Deserializer, Serialize, de::IgnoredAny};

/// GBFS `station_information` feed.
#[derive(Deserialize, Debug)]
pub struct StationFeed {
    pub data: StationFeedData,
}

#[derive(Deserialize, Debug)]
pub struct StationFeedData {
    /// Kept untyped so a single malformed station does not fail the feed.
    pub stations: Vec<serde_json::Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SourceStation {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub capacity: Option<u32>,
}

/// One row of a trip history csv. Columns not named here are ignored.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SourceTrip {
    #[serde(default)]
    pub ride_id: Option<String>,
    pub started_at: String,
    pub ended_at: String,
    #[serde(default)]
    pub start_station_id: Option<String>,
    #[serde(default)]
    pub end_station_id: Option<String>,
}

// Some feeds publish coordinates as strings.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Some(value),
        Some(Raw::Text(value)) => value.trim().parse().ok(),
        None => None,
    })
}

// Optional counts, anything that is not a whole non-negative number is dropped.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(value)) => Some(value),
        Some(Raw::Text(value)) => value.trim().parse().ok(),
        Some(Raw::Other(_)) | None => None,
    };
    Ok(value
        .filter(|value| value.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(value))
        .map(|value| value as u32))
}

#[test]
fn station_with_string_coordinates() {
    let value = serde_json::json!({
        "short_name": "A32000",
        "lat": "42.36",
        "lon": -71.09,
        "name": "Kendall T"
    });
    let station: SourceStation = serde_json::from_value(value).unwrap();
    assert_eq!(station.lat, Some(42.36));
    assert_eq!(station.lon, Some(-71.09));
    assert_eq!(station.capacity, None);
}

#[test]
fn station_missing_fields() {
    let value = serde_json::json!({ "name": "Nowhere" });
    let station: SourceStation = serde_json::from_value(value).unwrap();
    assert!(station.short_name.is_none());
    assert!(station.lat.is_none());
}

#[test]
fn station_with_loose_capacity() {
    let value = serde_json::json!({
        "station_id": 72,
        "short_name": "A32000",
        "lat": 42.36,
        "lon": -71.09,
        "capacity": 19.0
    });
    let station: SourceStation = serde_json::from_value(value).unwrap();
    assert_eq!(station.capacity, Some(19));

    let value = serde_json::json!({ "short_name": "B", "capacity": "many" });
    let station: SourceStation = serde_json::from_value(value).unwrap();
    assert_eq!(station.capacity, None);

    let value = serde_json::json!({ "short_name": "C", "capacity": 2.5 });
    let station: SourceStation = serde_json::from_value(value).unwrap();
    assert_eq!(station.capacity, None);
}

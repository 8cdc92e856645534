use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bikeflow::prelude::*;
use futures_util::StreamExt;
use reqwest::header::ACCEPT_ENCODING;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::{error, info};

pub async fn age(
    Query(_): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    if state.trips_path.exists() {
        let last_modifed = seconds_since_modified(&state.trips_path)?;
        Ok(last_modifed.to_string().into_response())
    } else {
        Err(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn seconds_since_modified<P: AsRef<Path>>(path: P) -> Result<u64, StatusCode> {
    let meta_data = fs::metadata(path).map_err(|err| {
        error!("Failed to get metadata: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let modified = meta_data.modified().map_err(|err| {
        error!("Failed to get modified: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let duration = modified.elapsed().map_err(|err| {
        error!("Failed to elapsed time since modified: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(duration.as_secs())
}

/// Downloads a new trip history and swaps in a freshly built repository.
pub async fn fetch_url(
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, StatusCode> {
    let Some(q) = params.get("q") else {
        return Err(StatusCode::BAD_REQUEST);
    };

    let response = reqwest::Client::new()
        .get(q)
        .header(ACCEPT_ENCODING, "gzip, deflate")
        .send()
        .await
        .map_err(|err| {
            error!("Failed to fetch: {err}");
            StatusCode::BAD_REQUEST
        })?;

    if !response.status().is_success() {
        let body = response.text().await.unwrap_or_default();
        error!("Response is not success: {body}");
        return Err(StatusCode::BAD_REQUEST);
    }

    let download_path = state.download_path();
    let mut file = File::create(&download_path).await.map_err(|err| {
        error!("Failed to create file: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let data = chunk.map_err(|err| {
            error!("Failed to fetch chunk: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

        file.write_all(&data).await.map_err(|err| {
            error!("Failed to write to file: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    }

    file.flush().await.map_err(|err| {
        error!("Failed to flush file: {err}");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    drop(file);

    install_trips(&state, download_path).await?;
    Ok(().into_response())
}

/// Loads a downloaded trip history and, once it loads, moves it over the
/// trips file and swaps in the new repository. On failure the download is
/// removed and the current file and repository stay in place.
async fn install_trips(state: &AppState, download_path: PathBuf) -> Result<(), StatusCode> {
    let now = Instant::now();
    let source = state.source_with_trips(&download_path);
    let loaded = tokio::task::spawn_blocking(move || Repository::new().load_source(source))
        .await
        .map_err(|err| {
            error!("Loading task failed: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    let repository = match loaded {
        Ok(repository) => repository,
        Err(err) => {
            error!("Failed to load trip data: {err}");
            if let Err(err) = tokio::fs::remove_file(&download_path).await {
                error!("Failed to remove download: {err}");
            }
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    tokio::fs::rename(&download_path, &state.trips_path)
        .await
        .map_err(|err| {
            error!("Failed to replace trip file: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    info!(
        "Reloaded {} trips in {:?}",
        repository.trips.len(),
        now.elapsed()
    );

    let _ = state.repository.write().await.replace(repository);
    Ok(())
}

#[cfg(test)]
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("bikeflow-{name}-{}", std::process::id()));
    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../tests/data");
    fs::create_dir_all(&dir).unwrap();
    fs::copy(data.join("station_information.json"), dir.join("stations.json")).unwrap();
    fs::copy(data.join("trips.csv"), dir.join("trips.csv")).unwrap();
    dir
}

#[tokio::test]
async fn install_trips_replaces_file_and_repository() {
    let dir = scratch_dir("install");
    let state = AppState::new(dir.join("stations.json"), dir.join("trips.csv"));
    fs::copy(dir.join("trips.csv"), state.download_path()).unwrap();

    install_trips(&state, state.download_path()).await.unwrap();
    assert!(!state.download_path().exists());
    let repository = state.repository.read().await;
    assert_eq!(repository.as_ref().map(|r| r.trips.len()), Some(5));
    drop(repository);
    fs::remove_dir_all(dir).unwrap();
}

#[tokio::test]
async fn install_trips_keeps_current_data_on_bad_download() {
    let dir = scratch_dir("bad-download");
    let state = AppState::new(dir.join("stations.json"), dir.join("trips.csv"));
    let before = fs::read(&state.trips_path).unwrap();
    fs::write(state.download_path(), "").unwrap();

    let result = install_trips(&state, state.download_path()).await;
    assert_eq!(result, Err(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(!state.download_path().exists());
    assert_eq!(fs::read(&state.trips_path).unwrap(), before);
    assert!(state.repository.read().await.is_none());
    fs::remove_dir_all(dir).unwrap();
}

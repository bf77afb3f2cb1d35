//! The cooperative runtime loops.
//!
//! One tokio task owns the [`App`] and every mutation goes through the
//! `select!` below, preserving the single-writer discipline: the frame
//! interval steps the pipeline, the spawn interval adds rocks, the sensor
//! interval polls the ingestion server, and vision/geo results arrive as
//! messages from their own tasks.

use crate::app::clock::FrameClock;
use crate::app::state::App;
use anyhow::Result;
use chrono::Utc;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use talus_core::scoring::SiteEvidence;
use talus_data::{Detection, SensorsLatestResponse};
use talus_net::{InferenceClient, LookupClient};
use tokio::sync::mpsc;

pub struct RuntimeOptions {
    /// Base URL of the sensor ingestion server.
    pub sensor_url: String,
    /// Free-text site query resolved once at startup.
    pub site_query: Option<String>,
    /// Stop after this long; `None` runs until Ctrl+C.
    pub duration: Option<Duration>,
    /// Where preference changes are persisted.
    pub prefs_path: PathBuf,
    /// Directory of camera frames for the vision loop; `None` disables it.
    pub frames_dir: Option<PathBuf>,
    /// Detection model for the vision loop.
    pub model_id: Option<String>,
    pub api_key: Option<String>,
}

pub async fn run(mut app: App, opts: RuntimeOptions) -> Result<()> {
    let lookups = LookupClient::new()?;
    if let Some(query) = opts.site_query.as_deref() {
        resolve_site(&lookups, query, &mut app).await;
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        tracing::info!("Ctrl+C received, shutting down");
        shutdown_clone.store(true, Ordering::SeqCst);
    });

    let frame_period = Duration::from_millis(1_000 / app.config.simulation.target_fps.max(1));
    let mut frame = tokio::time::interval(frame_period);
    frame.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut spawn =
        tokio::time::interval(Duration::from_millis(app.config.simulation.spawn_interval_ms));
    let mut sensors = tokio::time::interval(Duration::from_millis(
        app.config.simulation.sensor_poll_interval_ms,
    ));
    sensors.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let sensor_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;
    let sensor_endpoint = format!(
        "{}/api/sensors/latest",
        opts.sensor_url.trim_end_matches('/')
    );

    let mut vision = VisionLoop::start(&opts, app.config.vision.fps);
    let mut clock = FrameClock::start();
    let deadline = opts.duration.map(|d| Instant::now() + d);

    while !shutdown.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        tokio::select! {
            _ = frame.tick() => {
                let dt = clock.tick();
                app.frame(dt, Utc::now().timestamp_millis());
            }
            _ = spawn.tick() => {
                app.spawn_rock();
            }
            _ = sensors.tick() => {
                match poll_sensors(&sensor_client, &sensor_endpoint).await {
                    Ok(latest) => {
                        if !latest.connected {
                            tracing::debug!("Sensor node disconnected; using placeholder reading");
                        }
                        app.ingest_hardware(&latest.reading);
                    }
                    Err(e) => {
                        tracing::warn!("Sensor poll failed: {}", e);
                        app.metrics.increment_counter("sensor_poll_failures");
                    }
                }
            }
            Some(outcome) = vision.results.recv() => {
                match outcome {
                    Ok(detections) => { app.ingest_vision(&detections); }
                    Err(message) => app.vision_failed(&message),
                }
            }
        }
    }

    tracing::info!(
        ticks = app.metrics.tick_count(),
        alerts = app.metrics.alerts_fired(),
        "Runtime stopped"
    );
    app.prefs.save(&opts.prefs_path)?;
    Ok(())
}

async fn poll_sensors(
    client: &reqwest::Client,
    endpoint: &str,
) -> Result<SensorsLatestResponse> {
    let response = client.get(endpoint).send().await?.error_for_status()?;
    Ok(response.json().await?)
}

/// Resolves the site and runs the one-shot lookup chain. Each failing
/// lookup degrades to its neutral contribution.
async fn resolve_site(lookups: &LookupClient, query: &str, app: &mut App) {
    let place = match lookups.geocode(query).await {
        Ok(place) => place,
        Err(e) => {
            tracing::warn!("Geocoding '{}' failed: {}", query, e);
            app.metrics.increment_counter("lookup_failures");
            return;
        }
    };
    tracing::info!("Monitoring site: {}", place.pretty());

    let (elevations, features, rainfall) = tokio::join!(
        lookups.elevation_grid(place.lat, place.lon),
        lookups.feature_counts(place.lat, place.lon),
        lookups.rainfall(place.lat, place.lon),
    );
    let elevations = elevations.unwrap_or_else(|e| {
        tracing::warn!("Elevation lookup failed: {}", e);
        app.metrics.increment_counter("lookup_failures");
        Vec::new()
    });
    let features = features.unwrap_or_else(|e| {
        tracing::warn!("Feature lookup failed: {}", e);
        app.metrics.increment_counter("lookup_failures");
        Default::default()
    });
    app.rainfall = rainfall.unwrap_or_else(|e| {
        tracing::warn!("Rainfall lookup failed: {}", e);
        app.metrics.increment_counter("lookup_failures");
        Default::default()
    });

    let stats = app.apply_site_evidence(&SiteEvidence { elevations, features });
    tracing::info!(
        hazard = stats.hazard_index,
        confidence = stats.confidence,
        "Geospatial site score"
    );
    app.site = Some(place);
}

/// Owns the throttled inference sampling: frames are read from a
/// directory in a round-robin and posted to the model at the configured
/// fps. When inference lags, ticks are dropped rather than queued.
struct VisionLoop {
    results: mpsc::Receiver<std::result::Result<Vec<Detection>, String>>,
}

impl VisionLoop {
    fn start(opts: &RuntimeOptions, fps: f64) -> Self {
        let (tx, rx) = mpsc::channel(4);
        if let (Some(dir), Some(model_id)) = (opts.frames_dir.clone(), opts.model_id.clone()) {
            let api_key = opts.api_key.clone();
            tokio::spawn(async move {
                if let Err(e) = sample_frames(dir, model_id, api_key, fps, tx).await {
                    tracing::warn!("Vision loop stopped: {}", e);
                }
            });
        }
        Self { results: rx }
    }
}

async fn sample_frames(
    dir: PathBuf,
    model_id: String,
    api_key: Option<String>,
    fps: f64,
    tx: mpsc::Sender<std::result::Result<Vec<Detection>, String>>,
) -> Result<()> {
    let client = InferenceClient::new(model_id, api_key)?;
    let mut frames: Vec<PathBuf> = std::fs::read_dir(&dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    frames.sort();
    anyhow::ensure!(!frames.is_empty(), "no frames in {}", dir.display());

    let period = Duration::from_secs_f64(1.0 / fps.max(1.0));
    let mut next = Instant::now();
    let mut index = 0usize;
    loop {
        tokio::time::sleep_until(tokio::time::Instant::from_std(next)).await;
        // inference runs inline, so a slow call simply pushes `next` past
        // the missed ticks and those frames are skipped, never queued
        let frame = &frames[index % frames.len()];
        index += 1;
        let outcome = match std::fs::read(frame) {
            Ok(bytes) => client
                .infer_image(bytes)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(format!("failed to read {}: {}", frame.display(), e)),
        };
        if tx.send(outcome).await.is_err() {
            return Ok(());
        }
        let now = Instant::now();
        next += period;
        if next < now {
            let skipped = (now - next).as_secs_f64() / period.as_secs_f64();
            if skipped >= 1.0 {
                tracing::debug!(skipped = skipped as u64, "Vision sampling fell behind");
            }
            next = now;
        }
    }
}

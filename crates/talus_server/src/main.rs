//! Sensor ingestion server.
//!
//! Field hardware posts readings to `POST /api/sensors/latest`; the
//! dashboard runtime polls `GET /api/sensors/latest`. A node counts as
//! connected for 30 seconds after its last post; after that the GET
//! response degrades to a synthesized plausible reading so consumers
//! never render a hard failure.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use chrono::Utc;
use rand::Rng;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use talus_data::{HardwareReading, SensorsLatestResponse};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// How long after the last post a node still counts as connected.
const CONNECTED_WINDOW_MS: i64 = 30_000;

struct AppState {
    latest: Mutex<Option<StoredReading>>,
}

struct StoredReading {
    reading: HardwareReading,
    received_at_ms: i64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "talus_server=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = Arc::new(AppState {
        latest: Mutex::new(None),
    });
    let app = router(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], 8091));

    tracing::info!("Talus sensor server listening on {}", addr);
    tracing::info!("    Ingest:  POST http://{}/api/sensors/latest", addr);
    tracing::info!("    Latest:  GET  http://{}/api/sensors/latest", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/sensors/latest",
            get(get_sensors_latest).post(post_sensors_latest),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Stores the posted reading, filling a missing timestamp with now.
async fn post_sensors_latest(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    Json(mut reading): Json<HardwareReading>,
) -> impl IntoResponse {
    if reading.timestamp.is_none() {
        reading.timestamp = Some(Utc::now().to_rfc3339());
    }
    let now_ms = Utc::now().timestamp_millis();
    match state.latest.lock() {
        Ok(mut latest) => {
            *latest = Some(StoredReading {
                reading,
                received_at_ms: now_ms,
            });
        }
        Err(e) => {
            tracing::error!("Failed to lock reading mutex: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "ok": false })),
            );
        }
    }
    tracing::debug!("Stored hardware reading");
    (StatusCode::CREATED, Json(serde_json::json!({ "ok": true })))
}

async fn get_sensors_latest(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
) -> Json<SensorsLatestResponse> {
    let now_ms = Utc::now().timestamp_millis();
    let response = match state.latest.lock() {
        Ok(latest) => respond(latest.as_ref(), now_ms),
        Err(e) => {
            tracing::error!("Failed to lock reading mutex: {}", e);
            respond(None, now_ms)
        }
    };
    Json(response)
}

/// Pure decision: real reading within the window, placeholder otherwise.
fn respond(latest: Option<&StoredReading>, now_ms: i64) -> SensorsLatestResponse {
    match latest {
        Some(stored) if now_ms - stored.received_at_ms < CONNECTED_WINDOW_MS => {
            SensorsLatestResponse {
                connected: true,
                reading: stored.reading.clone(),
            }
        }
        _ => SensorsLatestResponse {
            connected: false,
            reading: sample(),
        },
    }
}

/// A plausible resting-node reading for the disconnected placeholder.
fn sample() -> HardwareReading {
    let mut rng = rand::thread_rng();
    HardwareReading {
        accel_x: Some(0.0),
        accel_y: Some(0.0),
        accel_z: Some(1.0),
        gyro_x: Some(0.0),
        gyro_y: Some(0.0),
        gyro_z: Some(0.0),
        temperature_bme: Some(24.0 + rng.gen::<f64>() * 3.0),
        temperature_mpu: Some(30.0 + rng.gen::<f64>() * 2.0),
        humidity: Some(45.0 + rng.gen::<f64>() * 20.0),
        pressure: Some(1000.0 + rng.gen::<f64>() * 20.0),
        altitude: Some(250.0 + rng.gen::<f64>() * 10.0),
        rain_detected: Some(u8::from(rng.gen::<f64>() < 0.1)),
        soil_moisture_wet: Some(u8::from(rng.gen::<f64>() < 0.15)),
        vibration_detected: Some(u8::from(rng.gen::<f64>() < 0.2)),
        timestamp: Some(Utc::now().to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    fn create_app() -> Router {
        router(Arc::new(AppState {
            latest: Mutex::new(None),
        }))
    }

    #[test]
    fn test_respond_within_window() {
        let stored = StoredReading {
            reading: HardwareReading {
                humidity: Some(51.0),
                ..Default::default()
            },
            received_at_ms: 1_000,
        };
        let response = respond(Some(&stored), 1_000 + CONNECTED_WINDOW_MS - 1);
        assert!(response.connected);
        assert_eq!(response.reading.humidity, Some(51.0));
    }

    #[test]
    fn test_respond_after_window_synthesizes() {
        let stored = StoredReading {
            reading: HardwareReading::default(),
            received_at_ms: 1_000,
        };
        let response = respond(Some(&stored), 1_000 + CONNECTED_WINDOW_MS);
        assert!(!response.connected);
        // placeholder is fully populated so consumers have values to show
        assert_eq!(response.reading.populated_fields(), 14);
    }

    #[test]
    fn test_respond_with_no_reading() {
        let response = respond(None, 0);
        assert!(!response.connected);
        assert!(response.reading.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_post_then_get_round_trip() {
        let state = Arc::new(AppState {
            latest: Mutex::new(None),
        });
        let app = router(state);

        let post = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sensors/latest")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"humidity":62.5,"vibration_detected":1}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(post.status(), StatusCode::CREATED);
        let body = axum::body::to_bytes(post.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["ok"], true);

        let get_response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sensors/latest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(get_response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(get_response.into_body(), usize::MAX)
            .await
            .unwrap();
        let latest: SensorsLatestResponse = serde_json::from_slice(&body).unwrap();
        assert!(latest.connected);
        assert_eq!(latest.reading.humidity, Some(62.5));
        assert_eq!(latest.reading.vibration_detected, Some(1));
        // server filled in the missing timestamp
        assert!(latest.reading.timestamp.is_some());
    }

    #[tokio::test]
    async fn test_get_without_post_is_disconnected() {
        let app = create_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/sensors/latest")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let latest: SensorsLatestResponse = serde_json::from_slice(&body).unwrap();
        assert!(!latest.connected);
    }

    #[tokio::test]
    async fn test_malformed_post_rejected() {
        let app = create_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/sensors/latest")
                    .header("content-type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}

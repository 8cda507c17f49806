//! End-to-end tests for the full gridwatchd stack.
//!
//! Each test serves a fake spreadsheet endpoint on a loopback port, points
//! the real HTTP data source at it, runs the refresh controller with the
//! real dashboard renderer, and inspects the result through the axum router
//! via `tower::ServiceExt::oneshot`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use gridwatch_adapter_dashboard::{Dashboard, DashboardConfig, DashboardHandle, DashboardRenderer};
use gridwatch_adapter_http_axum::router;
use gridwatch_adapter_http_axum::state::AppState;
use gridwatch_adapter_http_reqwest::{HttpDatasetSource, HttpSourceConfig};
use gridwatch_app::ports::RefreshCallbacks;
use gridwatch_app::refresh_controller::{RefreshConfig, RefreshController, RefreshHandle};
use gridwatch_domain::field::FieldMapping;
use gridwatch_domain::reading::{Reading, extract_field};
use gridwatch_domain::state::RefreshState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::watch;
use tower::ServiceExt;

const INTERVAL: Duration = Duration::from_millis(50);
const WAIT: Duration = Duration::from_secs(5);

fn readings(count: u32) -> Value {
    let rows: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "timestamp": format!("2025-03-01T10:{:02}:{:02}Z", i / 60, i % 60),
                "V1": format!("{i}.0"),
                "V2": 230.0,
                "Freq1": "50.01",
                "AED1": "12.5",
                "Tem1": "21.34",
                "Humidity1": "40",
            })
        })
        .collect();
    Value::Array(rows)
}

/// Serve `router` on a loopback port and return the `/exec` URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/exec")
}

/// Sheet endpoint that answers with the given status for the first
/// `failures` requests, then with `body`. Returns the URL and a hit counter.
async fn sheet(failures: usize, body: Value) -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);
    let app = Router::new().route(
        "/exec",
        get(move || {
            let counter = Arc::clone(&counter);
            let body = body.clone();
            async move {
                if counter.fetch_add(1, Ordering::SeqCst) < failures {
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                } else {
                    axum::Json(body).into_response()
                }
            }
        }),
    );
    (serve(app).await, hits)
}

fn source(url: String) -> HttpDatasetSource {
    HttpDatasetSource::new(&HttpSourceConfig {
        url,
        timeout_secs: 2,
    })
    .unwrap()
}

fn controller() -> RefreshController {
    RefreshController::new(RefreshConfig {
        interval: INTERVAL,
        window_size: 20,
    })
}

/// Start the full stack and return the controller handle plus an HTTP app.
fn stack(url: String) -> (RefreshHandle, Router) {
    let mapping = FieldMapping::default();
    let config = DashboardConfig::default();
    let dashboard = DashboardHandle::new(Dashboard::new(&mapping, &config));
    let renderer = DashboardRenderer::new(dashboard.clone(), mapping, config);
    let handle = controller().start(source(url), renderer);
    let app = router::build(AppState::new(dashboard, handle.subscribe()));
    (handle, app)
}

async fn wait_for(rx: &mut watch::Receiver<RefreshState>, f: impl FnMut(&RefreshState) -> bool) {
    tokio::time::timeout(WAIT, rx.wait_for(f))
        .await
        .expect("state should be reached in time")
        .unwrap();
}

async fn get_body(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_render_latest_reading_and_recent_window() {
    let (url, _) = sheet(0, readings(25)).await;
    let (handle, app) = stack(url);
    let mut rx = handle.subscribe();

    wait_for(&mut rx, RefreshState::is_ready).await;

    let (status, body) = get_body(app.clone(), "/api/dashboard").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["fields"][0]["display"], "25.00 V");
    assert_eq!(json["fields"][2]["display"], "12.500000 A");
    assert_eq!(json["fields"][3]["display"], "21.3 °C");
    assert_eq!(json["chart"]["labels"].as_array().unwrap().len(), 20);
    assert_eq!(json["chart"]["labels"][0], "10:00:06");
    assert_eq!(json["chart"]["series"][0]["points"][0], 6.0);
    assert_eq!(json["chart"]["series"][0]["points"][19], 25.0);
    assert_eq!(json["gauge"]["value"], 12.5);
    assert_eq!(json["latest_timestamp"], "2025-03-01T10:00:25Z");
    assert!(
        json["status"]["text"]
            .as_str()
            .unwrap()
            .starts_with("Last updated: ")
    );

    let (_, body) = get_body(app.clone(), "/api/state").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert!(matches!(json["status"].as_str(), Some("ready" | "loading")));

    let (status, html) = get_body(app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("25.00 V"));
    assert!(html.contains("<polyline"));

    handle.join().await.unwrap();
}

#[tokio::test]
async fn should_show_no_data_for_empty_dataset() {
    let (url, _) = sheet(0, json!([])).await;
    let (handle, app) = stack(url);
    let mut rx = handle.subscribe();

    wait_for(&mut rx, |state| *state == RefreshState::Empty).await;

    let (_, html) = get_body(app, "/").await;
    assert!(html.contains(r#"<p class="status">No data available</p>"#));
    assert!(html.contains("No chart data"));

    handle.join().await.unwrap();
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Outcome {
    Ready { latest_v1: f64, window: usize },
    Empty,
    Error(String),
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Outcome>>>);

impl Recorder {
    fn outcomes(&self) -> Vec<Outcome> {
        self.0.lock().unwrap().clone()
    }
}

impl RefreshCallbacks for Recorder {
    fn on_ready(&mut self, latest: &Reading, window: &[Reading]) {
        self.0.lock().unwrap().push(Outcome::Ready {
            latest_v1: extract_field(latest, "V1"),
            window: window.len(),
        });
    }

    fn on_empty(&mut self) {
        self.0.lock().unwrap().push(Outcome::Empty);
    }

    fn on_error(&mut self, message: &str) {
        self.0.lock().unwrap().push(Outcome::Error(message.to_string()));
    }
}

#[tokio::test]
async fn should_recover_after_server_error() {
    let (url, _) = sheet(1, readings(3)).await;
    let recorder = Recorder::default();
    let handle = controller().start(source(url), recorder.clone());
    let mut rx = handle.subscribe();

    wait_for(&mut rx, RefreshState::is_ready).await;
    handle.join().await.unwrap();

    let outcomes = recorder.outcomes();
    assert_eq!(
        outcomes[0],
        Outcome::Error("data source returned HTTP 500".to_string())
    );
    assert_eq!(
        outcomes[1],
        Outcome::Ready {
            latest_v1: 3.0,
            window: 3
        }
    );
}

#[tokio::test]
async fn should_report_error_status_on_dashboard() {
    let (url, _) = sheet(usize::MAX, json!([])).await;
    let (handle, app) = stack(url);
    let mut rx = handle.subscribe();

    wait_for(&mut rx, RefreshState::is_error).await;

    let (_, body) = get_body(app, "/api/dashboard").await;
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        json["status"]["text"],
        "Error loading data: data source returned HTTP 500"
    );
    assert_eq!(json["status"]["is_error"], true);
    assert_eq!(json["fields"][0]["display"], "—");

    handle.join().await.unwrap();
}

#[tokio::test]
async fn should_report_parse_error_for_non_array_body() {
    let (url, _) = sheet(0, json!({"error": "Sheet not found"})).await;
    let recorder = Recorder::default();
    let handle = controller().start(source(url), recorder.clone());
    let mut rx = handle.subscribe();

    wait_for(&mut rx, RefreshState::is_error).await;
    handle.join().await.unwrap();

    match &recorder.outcomes()[0] {
        Outcome::Error(message) => {
            assert!(message.starts_with("data source returned a malformed dataset: "));
            assert!(message.contains("expected a sequence"));
        }
        other => panic!("expected an error outcome, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Stop
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stop_polling_after_join() {
    let (url, hits) = sheet(0, readings(2)).await;
    let recorder = Recorder::default();
    let handle = controller().start(source(url), recorder.clone());
    let mut rx = handle.subscribe();

    wait_for(&mut rx, RefreshState::is_ready).await;
    handle.join().await.unwrap();
    assert_eq!(*rx.borrow(), RefreshState::Idle);

    let hits_after_stop = hits.load(Ordering::SeqCst);
    let outcomes_after_stop = recorder.outcomes().len();
    tokio::time::sleep(INTERVAL * 4).await;

    assert_eq!(hits.load(Ordering::SeqCst), hits_after_stop);
    assert_eq!(recorder.outcomes().len(), outcomes_after_stop);
}

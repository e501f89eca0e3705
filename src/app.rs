use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::model::{ResultData, ResultStatus, StudentInfo, Subject};
use crate::remote::RemoteClient;
use crate::report;
use crate::scoring;
use crate::store::ResultStore;

pub struct AppState {
    store: Mutex<ResultStore>,
    remote: RemoteClient,
}

impl AppState {
    pub fn new(store: ResultStore, remote: RemoteClient) -> Arc<Self> {
        Arc::new(AppState {
            store: Mutex::new(store),
            remote,
        })
    }
}

#[derive(Deserialize)]
struct GenerateRequest {
    student: StudentInfo,
    subjects: Vec<Subject>,
}

#[derive(Serialize)]
struct GenerateResponse {
    result: ResultData,
    percentage: f64,
    status: ResultStatus,
}

#[derive(Serialize)]
struct SaveResponse {
    status: String,
    message: String,
    remote_id: Option<String>,
}

#[derive(Serialize)]
struct HistoryEntry {
    result: ResultData,
    percentage: f64,
    status: ResultStatus,
}

#[derive(Serialize)]
struct ErrorResponse {
    status: String,
    message: String,
}

fn error_body(message: &str) -> Json<ErrorResponse> {
    Json(ErrorResponse {
        status: "error".to_string(),
        message: message.to_string(),
    })
}

pub async fn run(
    addr: &str,
    store: ResultStore,
    remote: RemoteClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = AppState::new(store, remote);
    let app = router(app_state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/generate", post(generate_result))
        .route("/api/results", get(list_results).post(save_result))
        .route("/api/results/:id", get(get_result).delete(delete_result))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Validate the entry form and take an immutable result snapshot.
async fn generate_result(Json(req): Json<GenerateRequest>) -> Response {
    if !scoring::is_form_valid(&req.student, &req.subjects) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            error_body("Form is incomplete or a subject has marks above its maximum."),
        )
            .into_response();
    }

    let result = ResultData::generate(req.student, &req.subjects);
    let percentage = scoring::compute_percentage(&result.subjects);
    let status = scoring::classify_result(percentage, &result.subjects);
    Json(GenerateResponse {
        result,
        percentage,
        status,
    })
    .into_response()
}

/// Save a result: one best-effort remote attempt, then an unconditional
/// local write. The remote outcome only changes the confirmation message.
async fn save_result(State(state): State<Arc<AppState>>, Json(result): Json<ResultData>) -> Response {
    let remote = state.remote.save_remote(&result).await;

    let local = {
        let mut store = state.store.lock().unwrap();
        store.save(&result)
    };

    match (local, remote.ok) {
        (Ok(()), true) => Json(SaveResponse {
            status: "ok".to_string(),
            message: "Result saved to server and history.".to_string(),
            remote_id: remote.remote_id,
        })
        .into_response(),
        (Ok(()), false) => Json(SaveResponse {
            status: "local".to_string(),
            message: "Server save failed; saved to history locally.".to_string(),
            remote_id: None,
        })
        .into_response(),
        (Err(e), _) => {
            warn!("local save of {} failed: {}", result.id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Unexpected error while saving."),
            )
                .into_response()
        }
    }
}

async fn list_results(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let results = state.store.lock().unwrap().list_saved();
    let entries: Vec<HistoryEntry> = results
        .into_iter()
        .map(|result| {
            let percentage = scoring::compute_percentage(&result.subjects);
            let status = scoring::classify_result(percentage, &result.subjects);
            HistoryEntry {
                result,
                percentage,
                status,
            }
        })
        .collect();
    Json(entries)
}

/// One saved result with its rendered marksheet. A preview without a
/// backing result is a precondition failure, reported as 404.
async fn get_result(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let results = state.store.lock().unwrap().list_saved();
    match results.into_iter().find(|r| r.id == id) {
        Some(result) => {
            let percentage = scoring::compute_percentage(&result.subjects);
            let status = scoring::classify_result(percentage, &result.subjects);
            let marksheet = report::render_marksheet(&result);
            Json(serde_json::json!({
                "result": result,
                "percentage": percentage,
                "status": status,
                "marksheet": marksheet,
            }))
            .into_response()
        }
        None => (StatusCode::NOT_FOUND, error_body("Result not found.")).into_response(),
    }
}

async fn delete_result(Path(id): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let outcome = {
        let mut store = state.store.lock().unwrap();
        store.delete(&id)
    };
    match outcome {
        Ok(()) => Json(serde_json::json!({ "status": "ok" })).into_response(),
        Err(e) => {
            warn!("delete of {} failed: {}", id, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                error_body("Unexpected error while deleting."),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn test_state(dir: &tempfile::TempDir) -> Arc<AppState> {
        let store = ResultStore::open(dir.path().join("history.json"));
        // Nothing listens on this port; remote saves fail fast.
        let remote = RemoteClient::new("http://127.0.0.1:9");
        AppState::new(store, remote)
    }

    fn generate_body() -> String {
        serde_json::json!({
            "student": {
                "name": "John Doe",
                "rollNumber": "2024001",
                "registrationNumber": "",
                "universityName": "State University",
                "courseName": "B.Tech CSE",
                "semester": 3,
                "academicYear": "2024-25"
            },
            "subjects": [
                { "id": "s-1", "name": "Maths", "maxMarks": 100.0, "marksObtained": 80.0 },
                { "id": "s-2", "name": "", "maxMarks": 100.0, "marksObtained": 0.0 }
            ]
        })
        .to_string()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn generate_filters_blanks_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));
        let response = app
            .oneshot(post_json("/api/generate", generate_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["result"]["subjects"].as_array().unwrap().len(), 1);
        assert_eq!(body["percentage"], 80.0);
        assert_eq!(body["status"], "Distinction");
    }

    #[tokio::test]
    async fn generate_rejects_an_invalid_form() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));
        let mut body: Value = serde_json::from_str(&generate_body()).unwrap();
        body["student"]["universityName"] = Value::String(String::new());

        let response = app
            .oneshot(post_json("/api/generate", body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["status"], "error");
    }

    #[tokio::test]
    async fn save_falls_back_to_local_when_remote_is_down() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(&dir);
        let app = router(state.clone());

        let generated = json_body(
            app.clone()
                .oneshot(post_json("/api/generate", generate_body()))
                .await
                .unwrap(),
        )
        .await;
        let result = generated["result"].clone();

        let response = app
            .clone()
            .oneshot(post_json("/api/results", result.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "local");
        assert!(body["remote_id"].is_null());

        // The local copy was persisted regardless of the remote outcome.
        let listed = json_body(
            app.oneshot(
                Request::builder()
                    .uri("/api/results")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap(),
        )
        .await;
        assert_eq!(listed.as_array().unwrap().len(), 1);
        assert_eq!(listed[0]["result"]["id"], result["id"]);
        assert_eq!(listed[0]["status"], "Distinction");
    }

    #[tokio::test]
    async fn unknown_result_is_a_404_and_delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let app = router(test_state(&dir));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/results/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/results/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

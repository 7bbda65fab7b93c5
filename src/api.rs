//! REST API handlers for the rota generator.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::assigner::RotaAssigner;
use crate::demo_data::{self, DemoData};
use crate::dto::{ErrorResponse, HealthResponse, InfoResponse, RotaDto, RotaRequestDto};
use crate::error::RotaError;

/// Application state shared across handlers.
///
/// Generated rotas live here until deleted or the server stops.
pub struct AppState {
    rotas: RwLock<HashMap<String, RotaDto>>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            rotas: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// A rejected rota request, rendered as 400 with a JSON body.
pub struct ApiError(RotaError);

impl From<RotaError> for ApiError {
    fn from(err: RotaError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(&self.0))).into_response()
    }
}

// ============================================================================
// Router and Handlers
// ============================================================================

/// Creates the API router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health & Info
        .route("/health", get(health))
        .route("/info", get(info))
        // Demo data
        .route("/demo-data", get(list_demo_data))
        .route("/demo-data/{id}", get(get_demo_data))
        // Rotas
        .route("/rotas", post(create_rota).get(list_rotas))
        .route("/rotas/{id}", get(get_rota).delete(delete_rota))
        .with_state(state)
}

/// GET /health - Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "UP" })
}

/// GET /info - Application info endpoint.
async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Shift Rota Generator",
        version: env!("CARGO_PKG_VERSION"),
        engine: "greedy-balanced",
    })
}

/// GET /demo-data - List available demo data sets.
async fn list_demo_data() -> Json<Vec<&'static str>> {
    Json(demo_data::list_demo_data())
}

/// GET /demo-data/{id} - A ready-to-post rota request.
async fn get_demo_data(Path(id): Path<String>) -> Result<Json<RotaRequestDto>, StatusCode> {
    match id.parse::<DemoData>() {
        Ok(demo) => {
            let (employees, config) = demo_data::generate(demo);
            Ok(Json(RotaRequestDto::from_domain(&employees, &config)))
        }
        Err(_) => Err(StatusCode::NOT_FOUND),
    }
}

/// POST /rotas - Validate, generate and store a rota.
async fn create_rota(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RotaRequestDto>,
) -> Result<Json<RotaDto>, ApiError> {
    let (employees, config) = request
        .to_domain()
        .inspect_err(|err| debug!(error = %err, "Rejected rota request"))?;
    let rota = RotaAssigner::new(employees, config)?.assign();

    let id = uuid::Uuid::new_v4().to_string();
    let dto = RotaDto::from_rota(id.clone(), &rota);
    state.rotas.write().insert(id.clone(), dto.clone());
    debug!(%id, "Stored rota");

    Ok(Json(dto))
}

/// GET /rotas - List stored rota IDs.
async fn list_rotas(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    let mut ids: Vec<String> = state.rotas.read().keys().cloned().collect();
    ids.sort();
    Json(ids)
}

/// GET /rotas/{id} - Fetch a stored rota.
async fn get_rota(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<RotaDto>, StatusCode> {
    state
        .rotas
        .read()
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// DELETE /rotas/{id} - Forget a stored rota.
async fn delete_rota(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> StatusCode {
    match state.rotas.write().remove(&id) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState::new()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "UP");
    }

    #[tokio::test]
    async fn test_demo_data_endpoints() {
        let app = app();
        let (status, body) = send(&app, Method::GET, "/demo-data", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, serde_json::json!(["SMALL", "LARGE"]));

        let (status, body) = send(&app, Method::GET, "/demo-data/small", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["employees"].as_array().map(Vec::len), Some(9));

        let (status, _) = send(&app, Method::GET, "/demo-data/huge", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_fetch_delete_rota() {
        let app = app();
        let request = r#"{"employees": ["Amy", "Beth", "Carl"], "startDate": "2025-01-06", "numDays": 7, "seed": 42}"#;

        let (status, created) = send(&app, Method::POST, "/rotas", Some(request)).await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_str().unwrap().to_string();
        assert_eq!(created["dates"][0], "2025-01-06");
        assert_eq!(created["rows"].as_array().map(Vec::len), Some(3));
        assert_eq!(created["warnings"].as_array().map(Vec::len), Some(3));
        for row in created["summary"].as_array().unwrap() {
            assert_eq!(row["weeklyOffs"], 1);
        }

        let (status, listed) = send(&app, Method::GET, "/rotas", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, serde_json::json!([id.clone()]));

        let (status, fetched) = send(&app, Method::GET, &format!("/rotas/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, created);

        let (status, _) = send(&app, Method::DELETE, &format!("/rotas/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(&app, Method::GET, &format!("/rotas/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, Method::DELETE, &format!("/rotas/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_same_request_same_grid() {
        let app = app();
        let request = r#"{"employeeCount": 9, "month": 3, "year": 2025, "maxPerShift": 2, "seed": 11}"#;

        let (_, first) = send(&app, Method::POST, "/rotas", Some(request)).await;
        let (_, second) = send(&app, Method::POST, "/rotas", Some(request)).await;
        assert_ne!(first["id"], second["id"]);
        assert_eq!(first["rows"], second["rows"]);
        assert_eq!(first["summary"], second["summary"]);
    }

    #[tokio::test]
    async fn test_rejected_requests() {
        let app = app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/rotas",
            Some(r#"{"employees": [], "startDate": "2025-01-06", "numDays": 7}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "EMPTY_ROSTER");

        let (status, body) = send(
            &app,
            Method::POST,
            "/rotas",
            Some(r#"{"employeeCount": 3, "month": 1, "year": 2025, "weeklyOffMode": "fixedWeekdays", "offWeekdays": []}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_CONFIGURATION");

        let (status, body) = send(
            &app,
            Method::POST,
            "/rotas",
            Some(r#"{"employeeCount": 3, "startDate": "2025-01-06", "numDays": 5000}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "INVALID_CONFIGURATION");

        let (_, listed) = send(&app, Method::GET, "/rotas", None).await;
        assert_eq!(listed, serde_json::json!([]));
    }
}

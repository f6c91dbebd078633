use crate::assessment::{
    AssessmentForm, CollectedNotices, ExportOutcome, FieldKey, GroupKey, GroupView,
    NoticeSurface, RenderableSummary, Subject, SLOT_COUNT,
};
use crate::export::{BitmapRasterizer, DocumentExporter};
use crate::i18n::{Catalog, Locale};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub readiness: Arc<AtomicBool>,
    pub metrics: Option<PrometheusHandle>,
    pub catalog: Arc<Catalog>,
    pub exporter: Arc<DocumentExporter<BitmapRasterizer>>,
    pub default_locale: Locale,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        exporter: DocumentExporter<BitmapRasterizer>,
        default_locale: Locale,
    ) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: None,
            catalog,
            exporter: Arc::new(exporter),
            default_locale,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub subject: Subject,
    #[serde(default, deserialize_with = "deserialize_raw_scores")]
    pub movement: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_raw_scores")]
    pub outcome: Vec<String>,
    #[serde(default)]
    pub locale: Option<Locale>,
}

impl AssessmentRequest {
    fn raw_scores(&self, group: GroupKey) -> &[String] {
        match group {
            GroupKey::Movement => &self.movement,
            GroupKey::Outcome => &self.outcome,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub locale: Locale,
    pub groups: Vec<GroupView>,
    pub notices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RenderableSummary>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/assessments/result", post(assessment_result_endpoint))
        .route("/api/v1/assessments/export", post(assessment_export_endpoint))
        .with_state(state)
}

async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn assessment_result_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AssessmentRequest>,
) -> Response {
    let (mut form, notices) = match replay(&state, &payload) {
        Ok(replayed) => replayed,
        Err(rejection) => return rejection,
    };

    let result = form.submit();
    let view = form.view();
    Json(AssessmentResponse {
        locale: view.locale,
        groups: view.groups,
        notices: notices.messages(),
        result,
    })
    .into_response()
}

async fn assessment_export_endpoint(
    State(state): State<AppState>,
    Json(payload): Json<AssessmentRequest>,
) -> Response {
    let (mut form, notices) = match replay(&state, &payload) {
        Ok(replayed) => replayed,
        Err(rejection) => return rejection,
    };
    form.submit();

    match form.export(state.exporter.as_ref()).await {
        Ok(ExportOutcome::Exported(document)) => {
            info!(filename = %document.filename, pages = document.page_count, "pdf served");
            let disposition = format!("attachment; filename=\"{}\"", document.filename);
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                document.bytes,
            )
                .into_response()
        }
        Ok(ExportOutcome::Busy) => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "export_in_progress" })),
        )
            .into_response(),
        Ok(ExportOutcome::Unavailable) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "nothing_to_export",
                "notices": notices.messages(),
            })),
        )
            .into_response(),
        Err(err) => {
            warn!(kind = err.kind(), "pdf export failed");
            let notice = form_notice(&state, form.locale(), err.notice_key());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.kind(), "notice": notice })),
            )
                .into_response()
        }
    }
}

/// Builds a form from the request body, replaying every raw score in field
/// order. Bodies with more than six scores per group are rejected.
fn replay(
    state: &AppState,
    payload: &AssessmentRequest,
) -> Result<(AssessmentForm, Arc<CollectedNotices>), Response> {
    for group in GroupKey::ordered() {
        let supplied = payload.raw_scores(group).len();
        if supplied > SLOT_COUNT {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("{group} accepts at most {SLOT_COUNT} scores, got {supplied}"),
                })),
            )
                .into_response());
        }
    }

    let notices = Arc::new(CollectedNotices::default());
    let surface: Arc<dyn NoticeSurface> = notices.clone();
    let locale = payload.locale.unwrap_or(state.default_locale);
    let mut form = AssessmentForm::new(state.catalog.clone(), surface, locale);
    form.set_subject(payload.subject.clone());

    for group in GroupKey::ordered() {
        for (field, raw) in FieldKey::for_group(group).zip(payload.raw_scores(group)) {
            form.input(field, raw);
        }
    }

    Ok((form, notices))
}

fn form_notice(state: &AppState, locale: Locale, key: &str) -> String {
    state.catalog.lookup(locale, key).to_string()
}

/// Scores arrive as strings, numbers or null; all become the raw text a user
/// would have typed.
fn deserialize_raw_scores<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values
        .into_iter()
        .map(|value| match value {
            Value::Null => String::new(),
            Value::String(raw) => raw,
            other => other.to_string(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExportConfig;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn state() -> AppState {
        AppState::new(
            Arc::new(Catalog::builtin()),
            DocumentExporter::with_config(ExportConfig::default()),
            Locale::Id,
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn readiness_reflects_the_flag() {
        let state = state();
        let app = router(state.clone());
        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        state.readiness.store(true, Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn result_endpoint_scores_and_localizes() {
        let response = router(state())
            .oneshot(post_json(
                "/api/v1/assessments/result",
                json!({
                    "subject": { "name": "Budi", "age": "15", "gender": "male" },
                    "movement": [20, "20", 20, 20, 20, 20],
                    "outcome": [18, 18, 18, 18, 18, "40"],
                    "locale": "en",
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["locale"], "en");
        assert_eq!(body["notices"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["groups"][0]["mean_display"], "20.0 (Good)");
        assert_eq!(body["groups"][1]["mean_display"], "15.0 (Fair)");
        assert_eq!(body["result"]["total"]["mean_text"], "17.5");
        assert_eq!(body["result"]["total"]["band"], "good");
    }

    #[tokio::test]
    async fn gender_codes_and_free_text_are_accepted() {
        for (gender, expected) in [("L", "Laki-laki"), ("P", "Perempuan"), ("x", "-")] {
            let response = router(state())
                .oneshot(post_json(
                    "/api/v1/assessments/result",
                    json!({
                        "subject": { "name": "Sari", "age": "14", "gender": gender },
                        "movement": [20, 20, 20, 20, 20, 20],
                        "outcome": [20, 20, 20, 20, 20, 20],
                    }),
                ))
                .await
                .expect("response");
            assert_eq!(response.status(), StatusCode::OK, "gender {gender}");

            let body = json_body(response).await;
            assert_eq!(body["result"]["subject_rows"][2]["value"], expected);
        }
    }

    #[tokio::test]
    async fn result_is_omitted_when_a_group_is_empty() {
        let response = router(state())
            .oneshot(post_json(
                "/api/v1/assessments/result",
                json!({ "movement": [10, 10], "outcome": [] }),
            ))
            .await
            .expect("response");
        let body = json_body(response).await;
        assert_eq!(body["locale"], "id");
        assert!(body.get("result").is_none());
        assert_eq!(body["groups"][1]["mean_display"], "-");
    }

    #[tokio::test]
    async fn more_than_six_scores_is_a_bad_request() {
        let response = router(state())
            .oneshot(post_json(
                "/api/v1/assessments/result",
                json!({ "movement": [1, 2, 3, 4, 5, 6, 7], "outcome": [1] }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn export_endpoint_returns_a_named_pdf() {
        let response = router(state())
            .oneshot(post_json(
                "/api/v1/assessments/export",
                json!({
                    "subject": { "name": "Budi Santoso", "age": "15", "gender": "male" },
                    "movement": [20, 20, 20, 20, 20, 20],
                    "outcome": [20, 20, 20, 20, 20, 20],
                }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Hasil-Tes-Tenis-Meja-Budi_Santoso.pdf\""
        );
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn export_without_a_result_is_unprocessable() {
        let response = router(state())
            .oneshot(post_json(
                "/api/v1/assessments/export",
                json!({ "movement": [10], "outcome": [] }),
            ))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}

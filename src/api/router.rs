//! HTTP router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Layers (outermost → innermost):
//! 1. CORS (permissive; the web client is served from another origin)
//! 2. Request logger

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router over shared state.
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/risk-score", post(endpoints::risk::score))
        .route("/nudges", post(endpoints::nudges::generate))
        .route("/sessions", post(endpoints::sessions::create))
        .route(
            "/sessions/:id",
            get(endpoints::sessions::detail).delete(endpoints::sessions::close),
        )
        .route("/sessions/:id/vitals", post(endpoints::sessions::log_vitals))
        .route("/sessions/:id/nudges", get(endpoints::sessions::nudges))
        .route(
            "/sessions/:id/dismissed/:nudge_id",
            post(endpoints::sessions::dismiss),
        )
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::models::CurrentVitalsView;

    fn test_core_state() -> Arc<CoreState> {
        Arc::new(CoreState::new())
    }

    fn make_request(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(core: &Arc<CoreState>, req: Request<Body>) -> Response {
        api_router(core.clone()).oneshot(req).await.unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn crisis_vitals() -> Value {
        json!({
            "systolic_bp": 156, "diastolic_bp": 98, "heart_rate": 95,
            "weight": 80.0, "sleep_hours": 5.0, "exercise_minutes": 10,
            "fatigue_score": 3, "pain_score": 2, "stress_level": 8
        })
    }

    async fn create_session(core: &Arc<CoreState>) -> String {
        let response = send(core, make_request("POST", "/sessions", None)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        json["sessionId"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_reports_session_count() {
        let core = test_core_state();
        core.create_session().unwrap();

        let response = send(&core, make_request("GET", "/health", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["sessions"], 1);
    }

    #[tokio::test]
    async fn risk_score_endpoint() {
        let core = test_core_state();
        let response = send(
            &core,
            make_request("POST", "/risk-score", Some(crisis_vitals())),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json, json!({ "score": 99, "level": "high" }));
    }

    #[tokio::test]
    async fn risk_score_rejects_malformed_body() {
        let core = test_core_state();
        let response = send(
            &core,
            make_request("POST", "/risk-score", Some(json!({ "systolic_bp": 120 }))),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert!(json["error"]["message"].as_str().unwrap().contains("diastolic_bp"));
    }

    #[tokio::test]
    async fn risk_score_without_json_content_type_is_bad_request() {
        let core = test_core_state();
        let req = Request::builder()
            .method("POST")
            .uri("/risk-score")
            .body(Body::from(crisis_vitals().to_string()))
            .unwrap();
        let response = send(&core, req).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn stateless_nudges_reject_out_of_range_score() {
        let core = test_core_state();
        let body = json!({
            "riskScore": 300,
            "currentVitals": CurrentVitalsView::baseline(),
            "hour": 11
        });
        let response = send(&core, make_request("POST", "/nudges", Some(body))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn stateless_nudges_ranked_and_truncated() {
        let core = test_core_state();
        let body = json!({
            "riskScore": 99,
            "riskLevel": "high",
            "currentVitals": CurrentVitalsView::baseline(),
            "recentLogs": [
                { "timestamp": "2024-12-13T18:00:00", "sodium": 3800.0, "calories": 1200.0 },
                { "timestamp": "2024-12-13T12:30:00", "sodium": 3200.0, "calories": 900.0 }
            ],
            "timeOfDay": "morning",
            "hour": 8,
            "isWeekend": false,
            "lastLoggedVitals": crisis_vitals(),
            "dismissedIds": ["logged-bp-emergency"]
        });
        let response = send(&core, make_request("POST", "/nudges", Some(body))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        let nudges = json.as_array().unwrap();
        assert_eq!(nudges.len(), 6);
        assert_eq!(nudges[0]["id"], "logged-multi-risk");
        assert_eq!(nudges[0]["type"], "critical");
        assert!(nudges.iter().all(|n| n["id"] != "logged-bp-emergency"));

        let priorities: Vec<u64> = nudges
            .iter()
            .map(|n| n["priority"].as_u64().unwrap())
            .collect();
        assert!(priorities.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn stateless_nudges_for_mild_context() {
        let core = test_core_state();
        let mut view = CurrentVitalsView::baseline();
        view.weight.trend = crate::models::enums::Trend::Stable;
        let body = json!({
            "riskScore": 12,
            "currentVitals": view,
            "hour": 11,
            "isWeekend": false
        });
        let response = send(&core, make_request("POST", "/nudges", Some(body))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        // 128 systolic and 145 mg/dL glucose: only the moderate glucose nudge fires.
        let ids: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["glucose-moderate"]);
    }

    #[tokio::test]
    async fn stateless_nudges_reject_bad_hour() {
        let core = test_core_state();
        let body = json!({
            "riskScore": 12,
            "currentVitals": CurrentVitalsView::baseline(),
            "hour": 30
        });
        let response = send(&core, make_request("POST", "/nudges", Some(body))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn session_lifecycle() {
        let core = test_core_state();
        let id = create_session(&core).await;

        let response = send(&core, make_request("GET", &format!("/sessions/{id}"), None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["risk"]["score"], 72);
        assert_eq!(json["recentLogs"].as_array().unwrap().len(), 3);

        let response = send(
            &core,
            make_request("DELETE", &format!("/sessions/{id}"), None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&core, make_request("GET", &format!("/sessions/{id}"), None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn log_vitals_then_feed_then_dismiss() {
        let core = test_core_state();
        let id = create_session(&core).await;

        let body = json!({
            "vitals": crisis_vitals(),
            "sodium": 3100.0,
            "calories": 480.0,
            "loggedAt": "2024-12-16T09:00:00"
        });
        let response = send(
            &core,
            make_request("POST", &format!("/sessions/{id}/vitals"), Some(body)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["score"], 99);
        assert_eq!(json["level"], "high");
        assert!(json["prediction"].as_str().unwrap().starts_with("High-risk"));
        assert_eq!(json["vitals"]["bloodPressure"]["value"], "156/98");

        let feed_uri = format!("/sessions/{id}/nudges?hour=11&weekend=false");
        let response = send(&core, make_request("GET", &feed_uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let feed = body_json(response).await;
        assert_eq!(feed["allClear"], false);
        assert_eq!(feed["nudges"][0]["id"], "logged-multi-risk");

        let response = send(
            &core,
            make_request(
                "POST",
                &format!("/sessions/{id}/dismissed/logged-multi-risk"),
                None,
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&core, make_request("GET", &feed_uri, None)).await;
        let feed = body_json(response).await;
        let nudges = feed["nudges"].as_array().unwrap();
        assert!(nudges.iter().all(|n| n["id"] != "logged-multi-risk"));
        assert!(nudges.len() <= 6);
    }

    #[tokio::test]
    async fn log_vitals_rejects_malformed_body() {
        let core = test_core_state();
        let id = create_session(&core).await;
        let response = send(
            &core,
            make_request(
                "POST",
                &format!("/sessions/{id}/vitals"),
                Some(json!({ "sodium": 3100.0 })),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn dismissing_unknown_nudge_is_not_found() {
        let core = test_core_state();
        let id = create_session(&core).await;

        let long = "x".repeat(512);
        for junk in ["bogus", long.as_str()] {
            let uri = format!("/sessions/{id}/dismissed/{junk}");
            let response = send(&core, make_request("POST", &uri, None)).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            let json = body_json(response).await;
            assert_eq!(json["error"]["code"], "NOT_FOUND");
        }

        let response = send(&core, make_request("GET", &format!("/sessions/{id}"), None)).await;
        let json = body_json(response).await;
        assert_eq!(json["dismissed"], json!([]));
    }

    #[tokio::test]
    async fn session_limit_is_service_unavailable() {
        let core = Arc::new(CoreState::with_limits(
            crate::nudges::NudgeEngine::new(),
            1,
            std::time::Duration::from_secs(3600),
        ));
        create_session(&core).await;

        let response = send(&core, make_request("POST", "/sessions", None)).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "UNAVAILABLE");
        assert_eq!(core.session_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn create_session_from_scenario() {
        let core = test_core_state();
        let response = send(
            &core,
            make_request("POST", "/sessions?scenario=bp-crisis", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["risk"]["score"], 85);
        assert_eq!(json["vitals"]["bloodPressure"]["value"], "156/98");
        let id = json["sessionId"].as_str().unwrap().to_string();

        let uri = format!("/sessions/{id}/nudges?hour=11&weekend=false");
        let feed = body_json(send(&core, make_request("GET", &uri, None)).await).await;
        assert_eq!(feed["nudges"][0]["id"], "bp-critical");

        let response = send(
            &core,
            make_request("POST", "/sessions?scenario=meltdown", None),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_session_id_is_bad_request() {
        let core = test_core_state();
        let response = send(&core, make_request("GET", "/sessions/not-a-uuid", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let core = test_core_state();
        let uri = format!("/sessions/{}/nudges", uuid::Uuid::new_v4());
        let response = send(&core, make_request("GET", &uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn cors_preflight_is_allowed() {
        let core = test_core_state();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/risk-score")
            .header("Origin", "http://localhost:5173")
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();
        let response = send(&core, req).await;
        assert!(response.status().is_success());
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}

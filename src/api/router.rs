//! Route table for the API.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use super::endpoints::{analyze, health, sessions};
use super::types::ApiContext;

/// Build the full application router. CORS is permissive; the browser
/// client is served from a different origin during development.
pub fn build_router(ctx: ApiContext) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/analyze", post(analyze::analyze))
        .route("/api/sessions/:id", get(sessions::get_session))
        .route("/api/sessions/:id/field", post(sessions::set_field))
        .route("/api/sessions/:id/cart", post(sessions::cart))
        .route("/api/sessions/:id/toggle", post(sessions::toggle))
        .route("/api/sessions/:id/submit", post(sessions::submit))
        .route("/api/sessions/:id/reset", post(sessions::reset))
        .layer(cors)
        .with_state(ctx)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::extraction::{ExtractionService, MockGenerativeClient};

    use super::*;

    const CATALOG_RESPONSE: &str = r#"{
        "context": {
            "detectedType": "Cafe Menu",
            "appTitle": "Cafe Orders",
            "actionButtonLabel": "Place Order",
            "summaryLabel": "Items",
            "layoutType": "catalog"
        },
        "items": [
            {"id": "espresso", "name": "Espresso", "value": "3", "category": "Drinks"},
            {"id": "croissant", "name": "Croissant", "value": "4.50", "category": "Food"}
        ]
    }"#;

    const RULE_RESPONSE: &str = r#"{
        "type": "threshold_discount",
        "threshold": 10,
        "benefitValue": 15,
        "originalText": "15% off orders over 10"
    }"#;

    fn app(client: MockGenerativeClient) -> Router {
        build_router(ApiContext::new(Arc::new(ExtractionService::new(
            Arc::new(client),
        ))))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn analyze_request() -> Request<Body> {
        post_json(
            "/api/analyze",
            serde_json::json!({
                "images": [{"data": "data:image/jpeg;base64,aGVsbG8="}]
            }),
        )
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app(MockGenerativeClient::new());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn analyze_without_images_is_rejected_before_extraction() {
        let app = app(MockGenerativeClient::new());
        let response = app
            .oneshot(post_json("/api/analyze", serde_json::json!({"images": []})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn analyze_creates_catalog_session() {
        let app = app(MockGenerativeClient::new().respond(CATALOG_RESPONSE));
        let response = app.oneshot(analyze_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["context"]["layoutType"], "catalog");
        assert_eq!(json["phase"], "editing");
        assert_eq!(json["groups"].as_array().unwrap().len(), 2);
        assert_eq!(json["metrics"]["progress"], 0);
    }

    #[tokio::test]
    async fn analyze_failure_serves_fallback_portal() {
        let app = app(MockGenerativeClient::new().fail("quota exhausted"));
        let response = app.oneshot(analyze_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["context"]["appTitle"], "Data Entry Portal");
        assert_eq!(json["context"]["layoutType"], "form");
        assert!(json["groups"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_catalog_flow_with_rule() {
        // rule extraction runs first, then document extraction
        let app = app(MockGenerativeClient::new()
            .respond(RULE_RESPONSE)
            .respond(CATALOG_RESPONSE));

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({
                    "images": [{"data": "aGVsbG8=", "mimeType": "image/jpeg"}],
                    "ruleText": "give 15% off orders over 10"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        let id = json["sessionId"].as_str().unwrap().to_string();
        assert_eq!(json["ruleStatus"]["triggered"], false);

        // three espressos: 9.0, still below threshold
        for _ in 0..3 {
            let response = app
                .clone()
                .oneshot(post_json(
                    &format!("/api/sessions/{id}/cart"),
                    serde_json::json!({"itemId": "espresso", "op": "increment"}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        // one croissant pushes the cart to 13.50
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/cart"),
                serde_json::json!({"itemId": "croissant", "op": "increment"}),
            ))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["metrics"]["metricValue"], 13.5);
        assert_eq!(json["ruleStatus"]["triggered"], true);
        assert_eq!(json["ruleStatus"]["message"], "Benefit Applied: 15%");

        // submit, then further mutation conflicts
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/submit"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["phase"], "submitted");

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/cart"),
                serde_json::json!({"itemId": "espresso", "op": "increment"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = json_body(response).await;
        assert_eq!(json["error"]["code"], "SESSION_SUBMITTED");
    }

    #[tokio::test]
    async fn form_field_flow() {
        let form_response = CATALOG_RESPONSE
            .replace("catalog", "form")
            .replace("Place Order", "Submit Order");
        let app = app(MockGenerativeClient::new().respond(&form_response));

        let response = app.clone().oneshot(analyze_request()).await.unwrap();
        let json = json_body(response).await;
        let id = json["sessionId"].as_str().unwrap().to_string();
        // form state seeded from extracted values
        assert_eq!(json["state"]["values"]["espresso"], "3");

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/field"),
                serde_json::json!({"itemId": "espresso", "value": "42"}),
            ))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["state"]["values"]["espresso"], "42");

        // cart ops are invalid on a form session
        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/cart"),
                serde_json::json!({"itemId": "espresso", "op": "increment"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_session_is_404() {
        let app = app(MockGenerativeClient::new());
        let id = uuid::Uuid::new_v4();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(post_json(
                &format!("/api/sessions/{id}/reset"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_item_is_400() {
        let app = app(MockGenerativeClient::new().respond(CATALOG_RESPONSE));
        let response = app.clone().oneshot(analyze_request()).await.unwrap();
        let json = json_body(response).await;
        let id = json["sessionId"].as_str().unwrap().to_string();

        let response = app
            .oneshot(post_json(
                &format!("/api/sessions/{id}/cart"),
                serde_json::json!({"itemId": "flat_white", "op": "increment"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn reset_discards_session() {
        let app = app(MockGenerativeClient::new().respond(CATALOG_RESPONSE));
        let response = app.clone().oneshot(analyze_request()).await.unwrap();
        let json = json_body(response).await;
        let id = json["sessionId"].as_str().unwrap().to_string();

        let response = app
            .clone()
            .oneshot(post_json(
                &format!("/api/sessions/{id}/reset"),
                serde_json::json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_base64_image_is_400() {
        let app = app(MockGenerativeClient::new());
        let response = app
            .oneshot(post_json(
                "/api/analyze",
                serde_json::json!({"images": [{"data": "!!not-base64!!"}]}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

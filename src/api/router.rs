//! Application router.
//!
//! `GET /` serves the form, `/api/*` the JSON endpoints. Request spans come
//! from `TraceLayer`; uploads are capped by `DefaultBodyLimit`.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

pub fn api_router(ctx: ApiContext) -> Router {
    let body_limit = ctx.max_upload_bytes;

    let api = Router::new()
        .route(
            "/analyze",
            post(endpoints::analyze::analyze).fallback(endpoints::analyze::method_not_allowed),
        )
        .route("/health", get(endpoints::health::check));

    Router::new()
        .route("/", get(endpoints::home::page))
        .nest("/api", api)
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::types::testing;
    use crate::pipeline::narrative::MockNarrator;
    use crate::pipeline::ocr::MockOcr;

    const BOUNDARY: &str = "medlens-test-boundary";
    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn multipart_body(description: Option<&str>, image: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(text) = description {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\n{text}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(bytes) = image {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"monitor.png\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn analyze_text_only() {
        let (ctx, store) = testing::context(MockNarrator::new("Consider an ECG."), MockOcr::new(&[]));
        let app = api_router(ctx);

        let body = multipart_body(Some("Patient reports chest pain and diabetes"), None);
        let response = app.oneshot(analyze_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["boolean_query"], "chest pain OR diabetes");
        assert_eq!(json["ai_analysis"], "Consider an ECG.");
        assert_eq!(json["image_analysis"], serde_json::json!({}));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[tokio::test]
    async fn analyze_with_image() {
        let (ctx, _) = testing::context(
            MockNarrator::new("ok"),
            MockOcr::new(&["90/60 mm Hg", "SpO2 97 %", "36.9 C"]),
        );
        let app = api_router(ctx);

        let body = multipart_body(Some("dizzy when standing"), Some(PNG_HEADER));
        let response = app.oneshot(analyze_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["boolean_query"], "No relevant terms found.");
        assert_eq!(
            json["image_analysis"],
            serde_json::json!({
                "BP": "90/60 mmHg (Abnormal)",
                "Temperature": "36.9°C (Normal)",
                "Oxygen": "97% (Normal)",
            })
        );
    }

    #[tokio::test]
    async fn empty_file_field_is_ignored() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::failing("not called"));
        let app = api_router(ctx);

        let body = multipart_body(Some("cough"), Some(b""));
        let response = app.oneshot(analyze_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["boolean_query"], "cough");
    }

    #[tokio::test]
    async fn narrative_failure_is_reported() {
        let (ctx, store) = testing::context(MockNarrator::failing("quota exceeded"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let response = app
            .oneshot(analyze_request(multipart_body(Some("cough"), None)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Network error: quota exceeded");
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn non_image_upload_is_bad_request() {
        let (ctx, store) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let body = multipart_body(Some("cough"), Some(b"just some text"));
        let response = app.oneshot(analyze_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn get_on_analyze_is_rejected() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let request = Request::builder()
            .method("GET")
            .uri("/api/analyze")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Only POST requests are allowed");
    }

    #[tokio::test]
    async fn oversized_upload_is_payload_too_large() {
        let (ctx, store) = testing::context(MockNarrator::new("ok"), MockOcr::new(&["72 bpm"]));
        let app = api_router(ctx);

        let mut image = PNG_HEADER.to_vec();
        image.resize(1024 * 1024 + 1, 0);
        let response = app
            .oneshot(analyze_request(multipart_body(Some("fever"), Some(&image))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["success"], false);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn non_multipart_body_is_bad_request() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let request = Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"description":"cough"}"#))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn health_reports_vocabulary_size() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let request = Request::builder()
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["taxonomy_terms"], 3);
        assert_eq!(json["version"], crate::config::APP_VERSION);
    }

    #[tokio::test]
    async fn home_serves_form() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("name=\"description\""));
        assert!(html.contains("name=\"image\""));
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let (ctx, _) = testing::context(MockNarrator::new("ok"), MockOcr::new(&[]));
        let app = api_router(ctx);

        let request = Request::builder().uri("/nonexistent").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

use axum::{middleware as axum_middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{country, generation, handlers, images, middleware, trips};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        // Health, config and metrics
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Country facts (proxied)
        .route("/country", get(country::get_country))
        // Static trip routes
        .route("/trips/{mode}", get(trips::get_waypoints))
        // Generated trip images
        .route("/images/{mode}", get(images::get_image))
        .route("/generation/status", get(generation::get_status))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(middleware::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        // The map frontend is served from a different origin
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    use shamrock_core::{
        ArtifactStore, Config, CountryClient, ImageOrchestrator, PollConfig,
        SqliteArtifactStore, TripImage, TripMode, IMAGE_CONTENT_TYPE,
        testing::MockGenerationClient,
    };

    fn test_state(store: Arc<SqliteArtifactStore>) -> Arc<AppState> {
        // Country client pointed at a closed port; the /country tests
        // expect the failure path
        Arc::new(AppState::new(
            Config::default(),
            store as Arc<dyn ArtifactStore>,
            CountryClient::with_base_url("http://127.0.0.1:1"),
            None,
        ))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_config_is_sanitized() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/config").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("api_key_configured"));
        assert!(!text.contains("0000000000"));
    }

    #[tokio::test]
    async fn test_trips_known_mode() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/trips/foot").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[0]["name"], "Trinity College Dublin");
    }

    #[tokio::test]
    async fn test_trips_unknown_mode_is_404() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, _) = get(app, "/api/v1/trips/rocket").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_image_not_generated_yet_is_404() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/images/foot").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("foot"));
    }

    #[tokio::test]
    async fn test_image_unknown_mode_is_400() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, _) = get(app, "/api/v1/images/rocket").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_image_served_with_stored_content_type() {
        let store = Arc::new(SqliteArtifactStore::in_memory().unwrap());
        store
            .put(TripImage::from_payload(TripMode::Bike, vec![7u8; 25]))
            .unwrap();
        let app = create_router(test_state(Arc::clone(&store)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/images/bike")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            IMAGE_CONTENT_TYPE
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.len(), 25);
    }

    #[tokio::test]
    async fn test_generation_status_disabled() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/generation/status").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["enabled"], false);
        assert_eq!(json["running"], false);
    }

    #[tokio::test]
    async fn test_generation_status_with_orchestrator() {
        let store = Arc::new(SqliteArtifactStore::in_memory().unwrap());
        store
            .put(TripImage::from_payload(TripMode::Car, vec![1u8; 5]))
            .unwrap();

        let orchestrator = Arc::new(ImageOrchestrator::new(
            Arc::new(MockGenerationClient::new()),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            PollConfig::default(),
        ));

        let state = Arc::new(AppState::new(
            Config::default(),
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            CountryClient::with_base_url("http://127.0.0.1:1"),
            Some(orchestrator),
        ));

        let (status, body) = get(create_router(state), "/api/v1/generation/status").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["enabled"], true);
        assert_eq!(json["stored"][0], "car");
    }

    #[tokio::test]
    async fn test_country_upstream_failure_is_502() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        let (status, body) = get(app, "/api/v1/country").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("network"));
    }

    #[tokio::test]
    async fn test_metrics_exposition() {
        let app = create_router(test_state(Arc::new(
            SqliteArtifactStore::in_memory().unwrap(),
        )));

        // A first request so the request counters exist
        let (status, _) = get(app.clone(), "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(app, "/api/v1/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let text = String::from_utf8(body).unwrap();
        assert!(text.contains("shamrock_http_requests_total"));
    }
}

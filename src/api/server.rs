use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::api::handlers::{health, predict};
use crate::AppState;

/// Credentialed CORS for the configured origins. Methods and headers are
/// mirrored because `*` is not allowed together with credentials; a `*`
/// origin entry mirrors the request origin for the same reason.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(AllowOrigin::mirror_request());
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/predict", post(predict))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request},
    };
    use tower::ServiceExt;

    async fn allowed_origin(origins: &[String], origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/predict", post(|| async { "ok" }))
            .layer(cors_layer(origins));
        let request = Request::builder()
            .method("POST")
            .uri("/predict")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned()
    }

    #[tokio::test]
    async fn wildcard_origin_mirrors_request() {
        let origins = vec!["*".to_string()];
        let allowed = allowed_origin(&origins, "https://any.example").await;
        assert_eq!(allowed.unwrap(), "https://any.example");
    }

    #[tokio::test]
    async fn listed_origins_only() {
        let origins = vec!["https://famcare7.vercel.app".to_string()];
        assert!(allowed_origin(&origins, "https://any.example").await.is_none());
        assert_eq!(
            allowed_origin(&origins, "https://famcare7.vercel.app").await.unwrap(),
            "https://famcare7.vercel.app"
        );
    }
}

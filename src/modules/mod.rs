pub mod movies;

use marquee_kernel::ModuleRegistry;

/// Register all application modules with the registry.
pub fn register_all(registry: &mut ModuleRegistry) {
    registry.register(movies::create_module());
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use marquee_kernel::settings::Settings;
    use tower::ServiceExt;

    fn app() -> axum::Router {
        let mut registry = ModuleRegistry::new();
        register_all(&mut registry);
        marquee_http::build_router(&registry, &Settings::default())
    }

    #[test]
    fn register_all_registers_the_movies_module() {
        let mut registry = ModuleRegistry::new();
        register_all(&mut registry);

        assert_eq!(registry.module_count(), 1);
        assert!(registry.get_module("movies").is_some());
    }

    #[tokio::test]
    async fn healthz_responds_ok() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
    }

    #[tokio::test]
    async fn openapi_document_covers_the_movie_routes() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let spec: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        let paths = spec["paths"].as_object().unwrap();
        assert!(paths.contains_key("/movies"));
        assert!(paths.contains_key("/movies/top-rated"));
        assert!(paths.contains_key("/movies/{id}/rating"));
        assert!(paths.contains_key("/healthz"));
    }

    #[tokio::test]
    async fn movie_routes_are_mounted_under_their_module_name() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/movies/top-rated")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }
}

//! Router assembly for the Marquee HTTP server.

use axum::{routing::get, Router};
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};

use marquee_kernel::ModuleRegistry;

/// Builder for the main HTTP router: module mounting plus the global
/// middleware stack.
pub struct RouterBuilder {
    router: Router,
}

impl RouterBuilder {
    pub fn new() -> Self {
        Self {
            router: Router::new(),
        }
    }

    /// Add a single route to the router.
    pub fn route(mut self, path: &str, route: axum::routing::MethodRouter) -> Self {
        self.router = self.router.route(path, route);
        self
    }

    /// Mount a module's router under `/{module_name}`.
    pub fn mount_module(mut self, module_name: &str, module_router: Router) -> Self {
        let mount_path = format!("/{}", module_name);
        self.router = self.router.nest(&mount_path, module_router);
        self
    }

    /// Apply the global middleware stack: request/response tracing,
    /// permissive CORS, generated `x-request-id` headers, and a
    /// whole-request timeout.
    pub fn with_middleware(mut self, request_timeout_ms: u64) -> Self {
        let trace = TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().include_headers(true))
            .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
            .on_response(DefaultOnResponse::new().level(tracing::Level::INFO));

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        self.router = self
            .router
            .layer(trace)
            .layer(cors)
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TimeoutLayer::new(Duration::from_millis(request_timeout_ms)));
        self
    }

    /// Merge OpenAPI fragments from all modules and serve the result.
    ///
    /// The merged document is mounted as Swagger UI at `/swagger-ui` and as
    /// raw JSON at `/docs/openapi.json`.
    pub fn with_openapi(mut self, registry: &ModuleRegistry) -> Self {
        let mut openapi_spec = serde_json::json!({
            "openapi": "3.0.0",
            "info": {
                "title": "Marquee API",
                "version": "1.0.0",
                "description": "In-memory movie catalog API"
            },
            "paths": {},
            "components": {
                "schemas": {}
            }
        });

        // Error responses share one wire shape across the whole API.
        openapi_spec["components"]["schemas"]["ErrorBody"] = serde_json::json!({
            "type": "object",
            "properties": {
                "message": {
                    "type": "string"
                }
            },
            "required": ["message"]
        });

        openapi_spec["paths"]["/healthz"] = serde_json::json!({
            "get": {
                "summary": "Health check",
                "responses": {
                    "200": {
                        "description": "OK",
                        "content": {
                            "text/plain": {
                                "schema": {
                                    "type": "string"
                                }
                            }
                        }
                    }
                }
            }
        });

        for module in registry.modules() {
            let Some(module_spec) = module.openapi() else {
                continue;
            };

            // Module paths are declared relative to the module root; prefix
            // them with the mount point.
            if let Some(paths) = module_spec.get("paths").and_then(|p| p.as_object()) {
                for (path, path_item) in paths {
                    let suffix = if path == "/" { "" } else { path.as_str() };
                    let prefixed_path = format!("/{}{}", module.name(), suffix);
                    openapi_spec["paths"][prefixed_path] = path_item.clone();
                }
            }

            if let Some(schemas) = module_spec
                .get("components")
                .and_then(|c| c.get("schemas"))
                .and_then(|s| s.as_object())
            {
                for (schema_name, schema_def) in schemas {
                    openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
                }
            }
        }

        // SwaggerUI wants a typed utoipa document; fall back to a bare spec
        // if the merged JSON does not deserialize.
        let openapi_obj: utoipa::openapi::OpenApi = serde_json::from_value(openapi_spec.clone())
            .unwrap_or_else(|_| {
                utoipa::openapi::OpenApiBuilder::new()
                    .info(
                        utoipa::openapi::InfoBuilder::new()
                            .title("Marquee API")
                            .version("1.0.0")
                            .build(),
                    )
                    .build()
            });

        self.router = self.router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi_obj),
        );

        // Raw JSON spec for external consumers.
        self.router = self.router.route(
            "/docs/openapi.json",
            get(move || async move { axum::Json(openapi_spec.clone()) }),
        );

        self
    }

    /// Build the final router.
    pub fn build(self) -> Router {
        self.router
    }
}

impl Default for RouterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

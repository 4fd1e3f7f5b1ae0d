use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::{method_not_allowed, not_found};
use crate::http::{cors_layer, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Where the generated OpenAPI document is served.
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// Combine API routes with documentation UIs and cross-cutting middleware.
///
/// - Swagger UI at `/api-docs`, raw document at [`OPENAPI_JSON_PATH`]
/// - ReDoc at `/redoc`, RapiDoc at `/rapidoc`, Scalar at `/scalar`
/// - `apis` merged at the root, so their paths are served as declared
/// - JSON 404 fallback and 405 fallback
/// - request tracing, security headers, optional CORS, compression
///
/// Health endpoints are merged by the app with [`health_router`](super::health_router).
///
/// # Errors
/// Returns `InvalidInput` when a configured CORS origin is invalid.
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let mut router = Router::new()
        .merge(SwaggerUi::new("/api-docs").url(OPENAPI_JSON_PATH, T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new(OPENAPI_JSON_PATH).path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if let Some(cors) = cors_layer(&server_config.cors_allowed_origins)? {
        router = router.layer(cors);
    }

    Ok(router.layer(CompressionLayer::new()))
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// In-flight requests finish before `cleanup` starts. `cleanup` is given at
/// most `shutdown_timeout`; past that it is abandoned with a warning.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { signal_handle.wait_for_signal().await })
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Server encountered an error"));

    info!(timeout = ?shutdown_timeout, "Running cleanup");
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => tracing::warn!(timeout = ?shutdown_timeout, "Cleanup timed out, exiting anyway"),
    }

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "Test API"))]
    struct TestDoc;

    fn app(config: &ServerConfig) -> Router {
        let apis = Router::new().route("/things", get(|| async { "things" }));
        create_router::<TestDoc>(apis, config).unwrap()
    }

    async fn get_path(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_api_routes_are_served_at_root() {
        let response = get_path(app(&ServerConfig::default()), "/things").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let response = get_path(app(&ServerConfig::default()), OPENAPI_JSON_PATH).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(doc["info"]["title"], "Test API");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let response = get_path(app(&ServerConfig::default()), "/nope").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "ROUTE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_wrong_method_returns_json_405() {
        let response = app(&ServerConfig::default())
            .oneshot(Request::delete("/things").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "METHOD_NOT_ALLOWED");
    }

    #[tokio::test]
    async fn test_cors_origin_is_echoed() {
        let config = ServerConfig::default().with_cors_origins(["http://localhost:5173"]);
        let response = app(&config)
            .oneshot(
                Request::get("/things")
                    .header(header::ORIGIN, "http://localhost:5173")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );
    }

    #[test]
    fn test_invalid_cors_origin_fails() {
        let config = ServerConfig::default().with_cors_origins(["bad\norigin"]);
        let apis = Router::new();
        assert!(create_router::<TestDoc>(apis, &config).is_err());
    }
}

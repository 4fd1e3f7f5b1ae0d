//! OpenAPI documentation configuration

use axum_helpers::HealthResponse;
use utoipa::OpenApi;

/// Combined OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Products API",
        version = "1.0.0",
        description = "Create, read, update and delete products stored in MongoDB",
        contact(name = "Thanawat Phumphothong", email = "tanawatflook@hotmail.com")
    ),
    servers(
        (url = "http://localhost:3000/", description = "Local development server")
    ),
    paths(
        axum_helpers::server::health::health_handler,
        crate::api::health::ready
    ),
    components(schemas(HealthResponse)),
    nest(
        (path = "/products", api = domain_products::ApiDoc)
    ),
    tags(
        (name = "Products", description = "Product management endpoints"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;

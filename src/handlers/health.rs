use actix_web::HttpResponse;
use serde_json::json;

/// GET /
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running")),
    tag = "health"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "running", "service": "order-api" }))
}

/// Fallback for every unmatched route.
pub async fn route_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({ "error": "Route not found" }))
}

use actix_web::HttpResponse;
use serde_json::json;

pub async fn health_check() -> HttpResponse {
    tracing::info!("Health check");
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::database::Store;

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub timestamp: i64,
    pub database: String,
}

pub async fn root() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("collegeFlow server is running")
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up; `database` reports the store ping", body = HealthResponse)
    )
)]
pub async fn health_check(store: web::Data<dyn Store>) -> impl Responder {
    let database_up = match store.ping().await {
        Ok(()) => true,
        Err(e) => {
            log::warn!("⚠️  Database ping failed: {}", e);
            false
        }
    };

    HttpResponse::Ok().json(HealthResponse {
        status: if database_up { "healthy" } else { "degraded" }.to_string(),
        service: "college-flow-service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now().timestamp(),
        database: if database_up { "up" } else { "down" }.to_string(),
    })
}

use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{InsertAck, Review};
use crate::services::Claims;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/add-review",
    tag = "Reviews",
    responses(
        (status = 200, description = "Review stored", body = InsertAck),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_review(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
    review: web::Json<Review>,
) -> Result<HttpResponse, AppError> {
    log::info!("⭐ POST /add-review - by {}", user.email);

    let inserted_id = store.insert_review(review.into_inner()).await?;
    Ok(HttpResponse::Ok().json(InsertAck::new(inserted_id)))
}

#[utoipa::path(
    get,
    path = "/reviews",
    tag = "Reviews",
    responses(
        (status = 200, description = "Every review, newest first")
    )
)]
pub async fn list_reviews(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("⭐ GET /reviews");

    let reviews = store.list_reviews().await?;
    Ok(HttpResponse::Ok().json(reviews))
}

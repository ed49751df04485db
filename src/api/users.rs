use actix_web::{web, HttpResponse};

use super::found_or_miss;
use crate::config::MissPolicy;
use crate::database::Store;
use crate::models::{ExistsAck, InsertAck, UpdateAck, User, UserCreation, UserUpdate};
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "User created, or marker that the email is already registered", body = InsertAck),
        (status = 400, description = "Body is not a user (email is required)")
    )
)]
pub async fn create_user(
    store: web::Data<dyn Store>,
    user: web::Json<User>,
) -> Result<HttpResponse, AppError> {
    let email = user.email.clone();
    log::info!("👤 POST /users - email: {}", email);

    match store.create_user(user.into_inner()).await? {
        UserCreation::Created(inserted_id) => {
            log::info!("✅ User created: {}", email);
            Ok(HttpResponse::Ok().json(InsertAck::new(inserted_id)))
        }
        UserCreation::AlreadyExists => {
            log::info!("ℹ️  User already exists: {}", email);
            Ok(HttpResponse::Ok().json(ExistsAck::user()))
        }
    }
}

#[utoipa::path(
    get,
    path = "/user/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "The user, or null when no user has this email"),
        (status = 401, description = "Missing or invalid session token"),
        (status = 404, description = "No user has this email (LOOKUP_MISS=not_found)")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    store: web::Data<dyn Store>,
    miss: web::Data<MissPolicy>,
    email: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("👤 GET /user/{}", email);

    let user = store.find_user(&email).await?;
    found_or_miss(user, *miss.get_ref(), "user")
}

#[utoipa::path(
    put,
    path = "/user/{email}",
    tag = "Users",
    params(
        ("email" = String, Path, description = "User email")
    ),
    responses(
        (status = 200, description = "Update applied, creating the user when absent", body = UpdateAck),
        (status = 400, description = "A known field has the wrong type"),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_user(
    store: web::Data<dyn Store>,
    email: web::Path<String>,
    update: web::Json<UserUpdate>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔧 PUT /user/{}", email);

    let fields = update
        .into_inner()
        .into_set_fields(&email)
        .map_err(|e| AppError::InvalidRequest(e.to_string()))?;

    let ack = store.upsert_user(&email, fields).await?;

    if ack.upserted_count > 0 {
        log::info!("✅ User created by upsert: {}", email);
    }

    Ok(HttpResponse::Ok().json(ack))
}

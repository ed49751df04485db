use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{Admission, InsertAck};
use crate::services::Claims;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/add-admission",
    tag = "Admissions",
    responses(
        (status = 200, description = "Admission stored", body = InsertAck),
        (status = 400, description = "Body is not an admission (candidate_email is required)"),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_admission(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
    admission: web::Json<Admission>,
) -> Result<HttpResponse, AppError> {
    // The submitted candidate_email is stored as sent; it is not matched against the token.
    log::info!(
        "📝 POST /add-admission - by {} for {}",
        user.email,
        admission.candidate_email
    );

    let inserted_id = store.insert_admission(admission.into_inner()).await?;
    log::info!("✅ Admission stored: {}", inserted_id);

    Ok(HttpResponse::Ok().json(InsertAck::new(inserted_id)))
}

#[utoipa::path(
    get,
    path = "/my-admissions",
    tag = "Admissions",
    responses(
        (status = 200, description = "Admissions whose candidate_email is the token's email"),
        (status = 401, description = "Missing or invalid session token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn my_admissions(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /my-admissions - {}", user.email);

    let admissions = store.admissions_for(&user.email).await?;
    log::info!("✅ Listed {} admissions", admissions.len());

    Ok(HttpResponse::Ok().json(admissions))
}

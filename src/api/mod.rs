pub mod admissions;
pub mod auth;
pub mod colleges;
pub mod health;
pub mod reviews;
pub mod swagger;
pub mod users;

use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::config::MissPolicy;
use crate::middleware::AuthMiddleware;
use crate::utils::AppError;

/// Registers every route. Expects `Data<dyn Store>`, `Data<AuthService>` and
/// `Data<MissPolicy>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::InvalidRequest(err.to_string()).into()),
    )
    .route("/", web::get().to(health::root))
    .route("/health", web::get().to(health::health_check))
    // Session
    .route("/jwt", web::post().to(auth::issue_session))
    .route("/logout", web::get().to(auth::logout))
    // Colleges
    .route("/colleges", web::get().to(colleges::list_colleges))
    .route("/search-college", web::get().to(colleges::search_colleges))
    .route("/college/{id}", web::get().to(colleges::get_college))
    .route("/gallery-images", web::get().to(colleges::gallery_images))
    .route("/research-papers", web::get().to(colleges::research_papers))
    // Admissions - JWT required
    .service(
        web::resource("/add-admission")
            .wrap(AuthMiddleware)
            .route(web::post().to(admissions::add_admission)),
    )
    .service(
        web::resource("/my-admissions")
            .wrap(AuthMiddleware)
            .route(web::get().to(admissions::my_admissions)),
    )
    // Reviews
    .service(
        web::resource("/add-review")
            .wrap(AuthMiddleware)
            .route(web::post().to(reviews::add_review)),
    )
    .route("/reviews", web::get().to(reviews::list_reviews))
    // Users
    .route("/users", web::post().to(users::create_user))
    .service(
        web::resource("/user/{email}")
            .wrap(AuthMiddleware)
            .route(web::get().to(users::get_user))
            .route(web::put().to(users::update_user)),
    );
}

/// Answers a single-document lookup according to the configured miss policy.
pub(crate) fn found_or_miss<T: Serialize>(
    found: Option<T>,
    policy: MissPolicy,
    what: &str,
) -> Result<HttpResponse, AppError> {
    match (found, policy) {
        (Some(document), _) => Ok(HttpResponse::Ok().json(document)),
        (None, MissPolicy::Empty) => Ok(HttpResponse::Ok().json(serde_json::Value::Null)),
        (None, MissPolicy::NotFound) => Err(AppError::NotFound(what.to_string())),
    }
}

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "College Flow API",
        version = "1.0.0",
        description = "REST backend for the College Flow web app.\n\n**Authentication:** `POST /jwt` issues a session token. Protected routes expect it as a Bearer token (or the `token` cookie when the server runs with TOKEN_TRANSPORT=cookie)."
    ),
    paths(
        // Auth
        crate::api::auth::issue_session,
        crate::api::auth::logout,

        // Health
        crate::api::health::health_check,

        // Colleges
        crate::api::colleges::list_colleges,
        crate::api::colleges::search_colleges,
        crate::api::colleges::get_college,
        crate::api::colleges::gallery_images,
        crate::api::colleges::research_papers,

        // Admissions
        crate::api::admissions::add_admission,
        crate::api::admissions::my_admissions,

        // Reviews
        crate::api::reviews::add_review,
        crate::api::reviews::list_reviews,

        // Users
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
    ),
    components(
        schemas(
            crate::services::auth_service::TokenResponse,
            crate::api::health::HealthResponse,
            crate::models::InsertAck,
            crate::models::ExistsAck,
            crate::models::UpdateAck,
        )
    ),
    tags(
        (name = "Auth", description = "Session token issuance and logout."),
        (name = "Health", description = "Liveness and database reachability."),
        (name = "Colleges", description = "College catalog, search, gallery and research papers."),
        (name = "Admissions", description = "Admission applications. Requires a session token."),
        (name = "Reviews", description = "College reviews. Posting requires a session token."),
        (name = "Users", description = "User profiles keyed by email."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}

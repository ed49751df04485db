use actix_web::{web, HttpResponse};

use crate::config::TokenTransport;
use crate::services::auth_service::{AuthService, SessionRequest, TokenResponse};
use crate::utils::AppError;

/// Signs the posted identity payload as-is; no credential check happens here.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    responses(
        (status = 200, description = "Token in the body (header mode) or in the `token` cookie (cookie mode)", body = TokenResponse),
        (status = 400, description = "Payload has no email")
    )
)]
pub async fn issue_session(
    auth: web::Data<AuthService>,
    request: web::Json<SessionRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    let token = auth.issue(request.into_inner())?;

    let response = match auth.transport() {
        TokenTransport::Header => HttpResponse::Ok().json(TokenResponse { token }),
        TokenTransport::Cookie => HttpResponse::Ok()
            .cookie(auth.session_cookie(token))
            .json(serde_json::json!({ "success": true })),
    };

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Session cookie cleared (cookie mode)")
    )
)]
pub async fn logout(auth: web::Data<AuthService>) -> HttpResponse {
    log::info!("👋 GET /logout");

    let mut response = HttpResponse::Ok();
    if auth.transport() == TokenTransport::Cookie {
        response.cookie(auth.removal_cookie());
    }

    response.json(serde_json::json!({ "success": true }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{http::header::AUTHORIZATION, http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::api::test_support::{auth, bearer, test_app};
    use crate::config::{MissPolicy, TokenTransport};
    use crate::database::memory::MemoryStore;
    use crate::services::auth_service::TOKEN_COOKIE;

    #[actix_web::test]
    async fn test_header_mode_returns_usable_token() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone());

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "email": "a@x.com" }))
                .to_request(),
        )
        .await;
        let token = body["token"].as_str().unwrap();

        let claims = auth(TokenTransport::Header).verify(token).unwrap();
        assert_eq!(claims.email, "a@x.com");

        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/my-admissions")
                .insert_header((AUTHORIZATION, format!("Bearer {}", token)))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_session_without_email_is_rejected() {
        let app = test_app!(Arc::new(MemoryStore::default()));

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "name": "anonymous" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_cookie_mode_round_trip() {
        let store = Arc::new(MemoryStore::default());
        let app = test_app!(store.clone(), auth(TokenTransport::Cookie), MissPolicy::Empty);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/jwt")
                .set_json(json!({ "email": "c@x.com" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == TOKEN_COOKIE)
            .expect("session cookie")
            .into_owned();
        assert_eq!(cookie.http_only(), Some(true));

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": true }));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/my-admissions").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);

        // Bearer tokens are not accepted in cookie mode.
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/my-admissions")
                .insert_header(bearer("c@x.com"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_logout_clears_cookie_in_cookie_mode() {
        let app = test_app!(
            Arc::new(MemoryStore::default()),
            auth(TokenTransport::Cookie),
            MissPolicy::Empty
        );

        let resp = test::call_service(&app, test::TestRequest::get().uri("/logout").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == TOKEN_COOKIE)
            .expect("removal cookie");
        assert_eq!(cookie.value(), "");
        assert!(cookie.max_age().is_some_and(|age| age.is_zero()));
    }

    #[actix_web::test]
    async fn test_logout_in_header_mode_sets_no_cookie() {
        let app = test_app!(Arc::new(MemoryStore::default()));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/logout").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.response().cookies().count(), 0);
    }
}

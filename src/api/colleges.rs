use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::found_or_miss;
use crate::config::MissPolicy;
use crate::database::Store;
use crate::services::college_service;
use crate::utils::AppError;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of the college name
    pub search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/colleges",
    tag = "Colleges",
    responses(
        (status = 200, description = "Every college document")
    )
)]
pub async fn list_colleges(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🏫 GET /colleges");

    let colleges = store.list_colleges().await?;
    log::info!("✅ Listed {} colleges", colleges.len());

    Ok(HttpResponse::Ok().json(colleges))
}

#[utoipa::path(
    get,
    path = "/search-college",
    tag = "Colleges",
    params(SearchQuery),
    responses(
        (status = 200, description = "Colleges whose name contains the search text; all colleges when it is empty")
    )
)]
pub async fn search_colleges(
    store: web::Data<dyn Store>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let search = college_service::search_filter(query.search.as_deref());
    log::info!("🔍 GET /search-college - search: {:?}", search);

    let colleges = store.search_colleges(search).await?;
    Ok(HttpResponse::Ok().json(colleges))
}

#[utoipa::path(
    get,
    path = "/college/{id}",
    tag = "Colleges",
    params(
        ("id" = String, Path, description = "College id (24 hex characters)")
    ),
    responses(
        (status = 200, description = "The college, or null when no college has this id"),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No college has this id (LOOKUP_MISS=not_found)")
    )
)]
pub async fn get_college(
    store: web::Data<dyn Store>,
    miss: web::Data<MissPolicy>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    log::info!("🏫 GET /college/{}", id);

    let college = store.find_college(&id).await?;
    found_or_miss(college, *miss.get_ref(), "college")
}

#[utoipa::path(
    get,
    path = "/gallery-images",
    tag = "Colleges",
    responses(
        (status = 200, description = "Gallery images of every college, flattened in college order")
    )
)]
pub async fn gallery_images(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🖼️  GET /gallery-images");

    let images = college_service::gallery_images(store.list_colleges().await?);
    Ok(HttpResponse::Ok().json(images))
}

#[utoipa::path(
    get,
    path = "/research-papers",
    tag = "Colleges",
    responses(
        (status = 200, description = "Research papers of every college, each with its collegeName")
    )
)]
pub async fn research_papers(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📚 GET /research-papers");

    let papers = college_service::research_papers(store.list_colleges().await?);
    Ok(HttpResponse::Ok().json(papers))
}

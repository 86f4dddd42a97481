use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;

use crate::error::ApiError;
use crate::models::*;
use crate::portfolio::{Portfolio, DEFAULT_FEATURED_LIMIT};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(
                web::resource("/projects")
                    .route(web::get().to(get_projects))
                    .default_service(web::route().to(method_not_allowed)),
            )
            // registered before the slug catch-all so "featured" never
            // resolves as a slug
            .service(
                web::resource("/projects/featured")
                    .route(web::get().to(get_featured_projects))
                    .default_service(web::route().to(method_not_allowed)),
            )
            .service(
                web::resource("/projects/{slug}")
                    .route(web::get().to(get_project))
                    .default_service(web::route().to(method_not_allowed)),
            ),
    );
    cfg.route("/healthz", web::get().to(healthz));
}

#[derive(Clone)]
pub struct AppState {
    pub portfolio: Portfolio,
}

#[derive(Debug, Deserialize)]
pub struct ProjectsQuery {
    category: Option<String>,
    featured: Option<String>,
    limit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    limit: Option<String>,
}

/// One bundled fetch per request: projects, categories and stats travel in
/// the same envelope so the grid never needs a second round trip.
async fn project_listing(portfolio: &Portfolio, filter: ProjectFilter) -> ProjectsEnvelope {
    let projects = portfolio.list_projects(&filter).await;
    let categories = portfolio.categories().await;
    let stats = portfolio.stats().await;
    ProjectsEnvelope {
        success: true,
        data: ProjectsData {
            total_count: projects.len(),
            projects,
            categories,
            stats,
        },
        filters_applied: filter,
        timestamp: Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(
        ("category" = Option<String>, Query, description = "Exact category, or the sentinel `All`"),
        ("featured" = Option<String>, Query, description = "Restrict to featured projects when truthy"),
        ("limit" = Option<String>, Query, description = "Positive result cap; anything else is ignored")
    ),
    responses(
        (status = 200, description = "Published projects with categories and stats", body = ProjectsEnvelope),
        (status = 405, description = "Method not allowed")
    )
)]
pub async fn get_projects(
    query: web::Query<ProjectsQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let q = query.into_inner();
    let filter = ProjectFilter::from_params(q.category.as_deref(), q.featured.as_deref(), q.limit.as_deref());
    let envelope = project_listing(&data.portfolio, filter).await;
    Ok(HttpResponse::Ok().json(envelope))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/featured",
    params(
        ("limit" = Option<String>, Query, description = "Positive result cap, default 6")
    ),
    responses(
        (status = 200, description = "Featured projects", body = ProjectsEnvelope)
    )
)]
pub async fn get_featured_projects(
    query: web::Query<FeaturedQuery>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let limit = query
        .limit
        .as_deref()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_FEATURED_LIMIT);
    let filter = ProjectFilter {
        category: None,
        featured: true,
        limit: Some(limit),
    };
    let envelope = project_listing(&data.portfolio, filter).await;
    Ok(HttpResponse::Ok().json(envelope))
}

#[utoipa::path(
    get,
    path = "/api/v1/projects/{slug}",
    params(("slug" = String, Path, description = "Project slug")),
    responses(
        (status = 200, description = "Project", body = Project),
        (status = 404, description = "No published project with that slug")
    )
)]
pub async fn get_project(
    data: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let slug = path.into_inner();
    match data.portfolio.project_by_slug(&slug).await {
        Some(project) => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "data": project
        }))),
        None => Err(ApiError::NotFound),
    }
}

pub async fn healthz(data: web::Data<AppState>) -> HttpResponse {
    if data.portfolio.is_reachable().await {
        HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
    } else {
        HttpResponse::ServiceUnavailable().json(serde_json::json!({ "status": "unavailable" }))
    }
}

/// The read surface accepts GET only; everything else is refused before any
/// store access happens.
async fn method_not_allowed() -> Result<HttpResponse, ApiError> {
    Err(ApiError::MethodNotAllowed)
}

use crate::models::{
    CategoryCount, PortfolioStats, Project, ProjectFilter, ProjectImage, ProjectsData,
    ProjectsEnvelope,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::get_projects,
        crate::routes::get_featured_projects,
        crate::routes::get_project,
    ),
    components(schemas(
        Project, ProjectImage, ProjectFilter,
        PortfolioStats, CategoryCount,
        ProjectsEnvelope, ProjectsData,
    )),
    tags(
        (name = "projects", description = "Published portfolio projects"),
    )
)]
pub struct ApiDoc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub type Id = i64;

/// Filter value meaning "no category restriction".
pub const ALL_CATEGORIES: &str = "All";

/// Substituted when a project has no (or a dangling) featured media reference.
pub const PLACEHOLDER_IMAGE: &str = "/api/placeholder/600/400";

/// A published portfolio entry as exposed over the API. `tags` and
/// `technologies_used` are always concrete string lists here, never the raw
/// serialized text the store keeps.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Project {
    pub id: Id,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub technologies_used: Vec<String>,
    pub results_achieved: Option<String>,
    pub client_name: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub is_featured: bool,
    pub featured_image_path: String,
    pub featured_image_alt: String,
    pub images: Vec<ProjectImage>,
}

/// An attached gallery image: a media row joined with its per-project order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ProjectImage {
    pub file_path: String,
    pub alt_text: Option<String>,
    pub original_name: String,
    pub sort_order: i32,
}

/// A project row as persisted (also the in-memory snapshot shape). Tag lists
/// stay raw JSON text here; `featured_image` is a weak media reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Id,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub technologies_used: Option<String>,
    pub results_achieved: Option<String>,
    pub client_name: Option<String>,
    pub completion_date: Option<NaiveDate>,
    pub featured_image: Option<Id>,
    pub is_featured: bool,
    pub is_published: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// A stored file reference, owned independently of any project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: Id,
    pub file_path: String,
    pub alt_text: Option<String>,
    pub original_name: String,
}

/// Join row attaching a media item to a project with its own ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectImageRecord {
    pub project_id: Id,
    pub media_id: Id,
    pub sort_order: i32,
}

/// Per-request filter. Absent fields serialize away entirely so the
/// `filters_applied` echo is `{}` for an unfiltered request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ProjectFilter {
    /// Builds a filter from raw query parameters. Malformed input is
    /// normalized to safe defaults, never rejected: the category is trimmed
    /// and dropped when empty or the `"All"` sentinel, `featured` is truthy
    /// iff present, non-empty and not `"0"`, and `limit` must parse as a
    /// positive integer or it is treated as absent.
    pub fn from_params(
        category: Option<&str>,
        featured: Option<&str>,
        limit: Option<&str>,
    ) -> Self {
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
            .map(str::to_owned);
        let featured = featured.map(|v| !v.is_empty() && v != "0").unwrap_or(false);
        let limit = limit
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|n| *n > 0);
        Self {
            category,
            featured,
            limit,
        }
    }
}

/// Recomputed-per-request aggregate over published projects.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PortfolioStats {
    pub total_projects: i64,
    pub by_category: Vec<CategoryCount>,
    pub featured_projects: i64,
}

/// Outer envelope of the projects endpoint; also the contract the grid
/// controller deserializes against.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectsEnvelope {
    pub success: bool,
    pub data: ProjectsData,
    pub filters_applied: ProjectFilter,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectsData {
    pub projects: Vec<Project>,
    pub categories: Vec<String>,
    pub stats: PortfolioStats,
    pub total_count: usize,
}

/// Decodes a stored JSON text field into a string list. Total: NULL, empty,
/// and malformed input all come back as an empty list; non-string array
/// elements are skipped.
pub fn decode_string_list(raw: Option<&str>) -> Vec<String> {
    let raw = match raw {
        Some(s) if !s.trim().is_empty() => s,
        _ => return Vec::new(),
    };
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Resolves the featured image pair for a project. A missing path falls back
/// to the fixed placeholder; a missing alt text derives one from the title.
pub fn featured_image_or_default(
    title: &str,
    path: Option<String>,
    alt: Option<String>,
) -> (String, String) {
    match path.filter(|p| !p.is_empty()) {
        Some(path) => {
            let alt = alt
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| derived_alt(title));
            (path, alt)
        }
        None => (PLACEHOLDER_IMAGE.to_owned(), derived_alt(title)),
    }
}

fn derived_alt(title: &str) -> String {
    format!("{title} - Portfolio Project")
}

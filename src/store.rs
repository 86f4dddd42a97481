use async_trait::async_trait;

use crate::models::*;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
    #[error("storage unavailable")]
    Unavailable,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only access to the portfolio catalogue. All operations are fallible
/// here; the degrade-to-empty policy lives one layer up in
/// [`crate::portfolio::Portfolio`].
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    /// Published projects matching `filter`, ordered featured-first, then
    /// `sort_order` ascending, then creation time descending. `limit` caps
    /// the result after ordering.
    async fn list_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>>;

    /// Exact-slug lookup among published projects.
    async fn project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>>;

    /// Distinct non-empty categories of published projects, ascending.
    /// The `"All"` sentinel is not part of the stored vocabulary.
    async fn categories(&self) -> StoreResult<Vec<String>>;

    async fn stats(&self) -> StoreResult<PortfolioStats>;

    /// Connectivity probe for the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

#[cfg(feature = "inmem-store")]
pub mod inmem {
    use super::*;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::{Arc, RwLock};

    const SNAPSHOT_PATH: &str = "data/portfolio.json";

    /// On-disk snapshot shape: plain relational rows, mirroring the SQL
    /// schema so the same seed data works against either backend.
    #[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
    pub struct PortfolioData {
        #[serde(default)]
        pub projects: Vec<ProjectRecord>,
        #[serde(default)]
        pub media: Vec<MediaRecord>,
        #[serde(default)]
        pub project_images: Vec<ProjectImageRecord>,
    }

    /// Snapshot-seeded store. The catalogue is edited out of band, so this
    /// backend never writes; it only filters and normalizes what the
    /// snapshot provided.
    #[derive(Clone)]
    pub struct InMemStore {
        data: Arc<RwLock<PortfolioData>>,
    }

    impl InMemStore {
        fn data_dir() -> PathBuf {
            std::env::var("FOLIO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data"))
        }

        fn snapshot_path() -> PathBuf {
            if std::env::var("FOLIO_DATA_DIR").is_ok() {
                let mut p = Self::data_dir();
                p.push("portfolio.json");
                p
            } else {
                PathBuf::from(SNAPSHOT_PATH)
            }
        }

        fn load_data_from(path: &Path) -> PortfolioData {
            match std::fs::read(path) {
                Ok(bytes) => match serde_json::from_slice::<PortfolioData>(&bytes) {
                    Ok(data) => {
                        log::info!(
                            "loaded portfolio snapshot '{}' ({} projects)",
                            path.display(),
                            data.projects.len()
                        );
                        data
                    }
                    Err(e) => {
                        log::warn!(
                            "failed to parse portfolio snapshot '{}': {e}; starting empty",
                            path.display()
                        );
                        PortfolioData::default()
                    }
                },
                Err(e) => {
                    log::warn!(
                        "no portfolio snapshot at '{}': {e}; starting empty",
                        path.display()
                    );
                    PortfolioData::default()
                }
            }
        }

        pub fn new() -> Self {
            Self::with_data(Self::load_data_from(&Self::snapshot_path()))
        }

        pub fn with_data(data: PortfolioData) -> Self {
            Self {
                data: Arc::new(RwLock::new(data)),
            }
        }

        fn project_from_record(data: &PortfolioData, rec: &ProjectRecord) -> Project {
            let media_by_id: HashMap<Id, &MediaRecord> =
                data.media.iter().map(|m| (m.id, m)).collect();

            let featured = rec.featured_image.and_then(|id| media_by_id.get(&id));
            let (featured_image_path, featured_image_alt) = featured_image_or_default(
                &rec.title,
                featured.map(|m| m.file_path.clone()),
                featured.and_then(|m| m.alt_text.clone()),
            );

            let mut images: Vec<ProjectImage> = data
                .project_images
                .iter()
                .filter(|pi| pi.project_id == rec.id)
                .filter_map(|pi| {
                    media_by_id.get(&pi.media_id).map(|m| ProjectImage {
                        file_path: m.file_path.clone(),
                        alt_text: m.alt_text.clone(),
                        original_name: m.original_name.clone(),
                        sort_order: pi.sort_order,
                    })
                })
                .collect();
            images.sort_by_key(|img| img.sort_order);

            Project {
                id: rec.id,
                title: rec.title.clone(),
                slug: rec.slug.clone(),
                description: rec.description.clone(),
                category: rec.category.clone(),
                tags: decode_string_list(rec.tags.as_deref()),
                technologies_used: decode_string_list(rec.technologies_used.as_deref()),
                results_achieved: rec.results_achieved.clone(),
                client_name: rec.client_name.clone(),
                completion_date: rec.completion_date,
                is_featured: rec.is_featured,
                featured_image_path,
                featured_image_alt,
                images,
            }
        }
    }

    impl Default for InMemStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl PortfolioStore for InMemStore {
        async fn list_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
            let data = self.data.read().unwrap();
            let mut rows: Vec<&ProjectRecord> =
                data.projects.iter().filter(|p| p.is_published).collect();
            if let Some(cat) = filter.category.as_deref() {
                rows.retain(|p| p.category.as_deref() == Some(cat));
            }
            if filter.featured {
                rows.retain(|p| p.is_featured);
            }
            rows.sort_by(|a, b| {
                b.is_featured
                    .cmp(&a.is_featured)
                    .then(a.sort_order.cmp(&b.sort_order))
                    .then(b.created_at.cmp(&a.created_at))
            });
            if let Some(limit) = filter.limit {
                rows.truncate(limit as usize);
            }
            Ok(rows
                .into_iter()
                .map(|rec| Self::project_from_record(&data, rec))
                .collect())
        }

        async fn project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
            let data = self.data.read().unwrap();
            Ok(data
                .projects
                .iter()
                .find(|p| p.slug == slug && p.is_published)
                .map(|rec| Self::project_from_record(&data, rec)))
        }

        async fn categories(&self) -> StoreResult<Vec<String>> {
            let data = self.data.read().unwrap();
            let mut cats: Vec<String> = data
                .projects
                .iter()
                .filter(|p| p.is_published)
                .filter_map(|p| p.category.clone())
                .filter(|c| !c.is_empty())
                .collect();
            cats.sort();
            cats.dedup();
            Ok(cats)
        }

        async fn stats(&self) -> StoreResult<PortfolioStats> {
            let data = self.data.read().unwrap();
            let published: Vec<&ProjectRecord> =
                data.projects.iter().filter(|p| p.is_published).collect();

            let mut counts: HashMap<String, i64> = HashMap::new();
            for p in &published {
                if let Some(cat) = &p.category {
                    *counts.entry(cat.clone()).or_insert(0) += 1;
                }
            }
            let mut by_category: Vec<CategoryCount> = counts
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect();
            by_category.sort_by(|a, b| b.count.cmp(&a.count).then(a.category.cmp(&b.category)));

            Ok(PortfolioStats {
                total_projects: published.len() as i64,
                featured_projects: published.iter().filter(|p| p.is_featured).count() as i64,
                by_category,
            })
        }

        async fn ping(&self) -> StoreResult<()> {
            Ok(())
        }
    }
}

// Postgres implementation (feature = "postgres-store")
#[cfg(feature = "postgres-store")]
pub mod pg {
    use super::*;
    use sqlx::{Pool, Postgres};

    const PROJECT_SELECT: &str = "SELECT p.id, p.title, p.slug, p.description, p.category, \
         p.tags, p.technologies_used, p.results_achieved, p.client_name, p.completion_date, \
         p.is_featured, m.file_path AS featured_image_path, m.alt_text AS featured_image_alt \
         FROM portfolio_projects p LEFT JOIN media m ON p.featured_image = m.id";

    #[derive(sqlx::FromRow)]
    struct ProjectJoinRow {
        id: Id,
        title: String,
        slug: String,
        description: String,
        category: Option<String>,
        tags: Option<String>,
        technologies_used: Option<String>,
        results_achieved: Option<String>,
        client_name: Option<String>,
        completion_date: Option<chrono::NaiveDate>,
        is_featured: bool,
        featured_image_path: Option<String>,
        featured_image_alt: Option<String>,
    }

    impl ProjectJoinRow {
        fn into_project(self, images: Vec<ProjectImage>) -> Project {
            let (featured_image_path, featured_image_alt) = featured_image_or_default(
                &self.title,
                self.featured_image_path,
                self.featured_image_alt,
            );
            Project {
                id: self.id,
                title: self.title,
                slug: self.slug,
                description: self.description,
                category: self.category,
                tags: decode_string_list(self.tags.as_deref()),
                technologies_used: decode_string_list(self.technologies_used.as_deref()),
                results_achieved: self.results_achieved,
                client_name: self.client_name,
                completion_date: self.completion_date,
                is_featured: self.is_featured,
                featured_image_path,
                featured_image_alt,
                images,
            }
        }
    }

    #[derive(Clone)]
    pub struct PgStore {
        pool: Pool<Postgres>,
    }

    impl PgStore {
        /// The pool is built once at process start and handed in; the store
        /// never reaches for ambient connection state.
        pub fn new(pool: Pool<Postgres>) -> Self {
            Self { pool }
        }

        async fn project_images(&self, project_id: Id) -> StoreResult<Vec<ProjectImage>> {
            let images = sqlx::query_as::<_, ProjectImage>(
                "SELECT m.file_path, m.alt_text, m.original_name, pi.sort_order \
                 FROM portfolio_images pi JOIN media m ON pi.media_id = m.id \
                 WHERE pi.project_id = $1 ORDER BY pi.sort_order ASC",
            )
            .bind(project_id)
            .fetch_all(&self.pool)
            .await?;
            Ok(images)
        }

        async fn hydrate(&self, row: ProjectJoinRow) -> StoreResult<Project> {
            let images = self.project_images(row.id).await?;
            Ok(row.into_project(images))
        }
    }

    #[async_trait]
    impl PortfolioStore for PgStore {
        async fn list_projects(&self, filter: &ProjectFilter) -> StoreResult<Vec<Project>> {
            let mut conditions = vec!["p.is_published = TRUE".to_owned()];
            let mut param = 0usize;

            let category_param = filter.category.as_ref().map(|_| {
                param += 1;
                param
            });
            if let Some(n) = category_param {
                conditions.push(format!("p.category = ${n}"));
            }
            if filter.featured {
                conditions.push("p.is_featured = TRUE".to_owned());
            }

            let mut sql = format!(
                "{PROJECT_SELECT} WHERE {} \
                 ORDER BY p.is_featured DESC, p.sort_order ASC, p.created_at DESC",
                conditions.join(" AND ")
            );
            let limit_param = filter.limit.map(|_| {
                param += 1;
                param
            });
            if let Some(n) = limit_param {
                sql.push_str(&format!(" LIMIT ${n}"));
            }

            let mut query = sqlx::query_as::<_, ProjectJoinRow>(&sql);
            if let Some(cat) = filter.category.as_deref() {
                query = query.bind(cat);
            }
            if let Some(limit) = filter.limit {
                query = query.bind(limit);
            }

            let rows = query.fetch_all(&self.pool).await?;
            let mut projects = Vec::with_capacity(rows.len());
            for row in rows {
                projects.push(self.hydrate(row).await?);
            }
            Ok(projects)
        }

        async fn project_by_slug(&self, slug: &str) -> StoreResult<Option<Project>> {
            let sql = format!("{PROJECT_SELECT} WHERE p.slug = $1 AND p.is_published = TRUE");
            let row = sqlx::query_as::<_, ProjectJoinRow>(&sql)
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
            match row {
                Some(row) => Ok(Some(self.hydrate(row).await?)),
                None => Ok(None),
            }
        }

        async fn categories(&self) -> StoreResult<Vec<String>> {
            let cats = sqlx::query_scalar::<_, String>(
                "SELECT DISTINCT category FROM portfolio_projects \
                 WHERE category IS NOT NULL AND category <> '' AND is_published = TRUE \
                 ORDER BY category ASC",
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(cats)
        }

        async fn stats(&self) -> StoreResult<PortfolioStats> {
            let total_projects = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM portfolio_projects WHERE is_published = TRUE",
            )
            .fetch_one(&self.pool)
            .await?;

            let by_category = sqlx::query_as::<_, CategoryCount>(
                "SELECT category, COUNT(*) AS count FROM portfolio_projects \
                 WHERE is_published = TRUE AND category IS NOT NULL \
                 GROUP BY category ORDER BY count DESC, category ASC",
            )
            .fetch_all(&self.pool)
            .await?;

            let featured_projects = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM portfolio_projects \
                 WHERE is_published = TRUE AND is_featured = TRUE",
            )
            .fetch_one(&self.pool)
            .await?;

            Ok(PortfolioStats {
                total_projects,
                by_category,
                featured_projects,
            })
        }

        async fn ping(&self) -> StoreResult<()> {
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&self.pool)
                .await?;
            Ok(())
        }
    }
}

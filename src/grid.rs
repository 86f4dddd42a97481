//! Browser-side counterpart of the projects endpoint: owns the grid's
//! category state, issues one fetch per user action, and renders the result
//! as HTML. Superseded responses are discarded by a request sequence number
//! rather than cancelled.

use crate::models::{Project, ProjectsEnvelope, ALL_CATEGORIES, PLACEHOLDER_IMAGE};

/// Shown in each card's tag strip at most.
const MAX_CARD_TAGS: usize = 3;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("server reported failure")]
    Api,
}

pub struct GridController {
    http: reqwest::Client,
    api_base: String,
    current_category: String,
    projects: Vec<Project>,
    issued: u64,
}

impl GridController {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            current_category: ALL_CATEGORIES.to_owned(),
            projects: Vec::new(),
            issued: 0,
        }
    }

    pub fn current_category(&self) -> &str {
        &self.current_category
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// The sentinel category omits the parameter entirely, matching the
    /// server-side default; anything else is percent-encoded.
    pub fn request_url(&self, category: &str) -> String {
        if category == ALL_CATEGORIES {
            format!("{}/api/v1/projects", self.api_base)
        } else {
            format!(
                "{}/api/v1/projects?category={}",
                self.api_base,
                urlencoding::encode(category)
            )
        }
    }

    /// Switches the grid to `category` and paints the outcome.
    pub async fn select_category(&mut self, category: &str) -> String {
        self.current_category = category.to_owned();
        self.reload().await
    }

    /// Re-issues the current category's fetch; this is also the retry action
    /// wired to the error panel.
    pub async fn reload(&mut self) -> String {
        let seq = self.begin_request();
        let outcome = self.fetch(&self.current_category.clone()).await;
        // seq is the latest issued within this call, so the response is
        // never stale here
        self.complete_request(seq, outcome).unwrap_or_default()
    }

    /// Hands out the sequence number for a fetch about to be dispatched.
    /// Exposed (with [`Self::complete_request`]) for callers that overlap
    /// requests instead of awaiting them one at a time.
    pub fn begin_request(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Applies a finished fetch. Returns the markup to paint, or `None` when
    /// a newer request was issued meanwhile and this response must be
    /// dropped.
    pub fn complete_request(
        &mut self,
        seq: u64,
        outcome: Result<ProjectsEnvelope, GridError>,
    ) -> Option<String> {
        if seq < self.issued {
            log::warn!(
                "discarding stale portfolio response (request {seq}, latest {})",
                self.issued
            );
            return None;
        }
        Some(match outcome {
            Ok(envelope) => {
                self.projects = envelope.data.projects;
                render_grid(&self.projects)
            }
            Err(e) => {
                log::error!("failed to load portfolio projects: {e}");
                render_error_panel("Failed to load portfolio projects")
            }
        })
    }

    async fn fetch(&self, category: &str) -> Result<ProjectsEnvelope, GridError> {
        let url = self.request_url(category);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(GridError::Status(response.status().as_u16()));
        }
        let envelope = response.json::<ProjectsEnvelope>().await?;
        if !envelope.success {
            return Err(GridError::Api);
        }
        Ok(envelope)
    }
}

/// Escapes text for insertion into HTML. Applied to every data-sourced
/// string before it reaches markup; skipping it is not an option.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_grid(projects: &[Project]) -> String {
    if projects.is_empty() {
        return render_empty_panel();
    }
    projects.iter().map(render_card).collect()
}

fn render_empty_panel() -> String {
    r#"<div class="col-span-full text-center py-16">
    <div class="w-24 h-24 bg-gray-100 rounded-full flex items-center justify-center mx-auto mb-6">
        <span class="text-3xl">🎨</span>
    </div>
    <h3 class="text-xl font-semibold text-gray-900 mb-2">No Projects Found</h3>
    <p class="text-gray-600">No projects found for the selected category.</p>
</div>"#
        .to_owned()
}

pub fn render_error_panel(message: &str) -> String {
    format!(
        r#"<div class="col-span-full text-center py-16">
    <div class="w-24 h-24 bg-red-50 rounded-full flex items-center justify-center mx-auto mb-6">
        <span class="text-3xl text-red-500">⚠️</span>
    </div>
    <h3 class="text-xl font-semibold text-gray-900 mb-2">Error Loading Projects</h3>
    <p class="text-gray-600 mb-4">{}</p>
    <button data-action="retry" class="px-6 py-2 bg-red-500 text-white rounded-lg hover:bg-red-600 transition-colors">Try Again</button>
</div>"#,
        escape_html(message)
    )
}

fn render_card(project: &Project) -> String {
    let tags: String = project
        .tags
        .iter()
        .take(MAX_CARD_TAGS)
        .map(|tag| {
            format!(
                r#"<span class="px-2 py-1 bg-gray-100 text-gray-600 text-xs rounded-md font-medium">{}</span>"#,
                escape_html(tag)
            )
        })
        .collect();

    let results = match &project.results_achieved {
        Some(results) => format!(
            r#"<div class="bg-red-50 text-red-600 px-3 py-2 rounded-lg text-sm font-medium">📈 {}</div>"#,
            escape_html(results)
        ),
        None => String::new(),
    };

    format!(
        r#"<div class="portfolio-item bg-white rounded-xl overflow-hidden shadow-sm hover:shadow-lg transition-all duration-500 group">
    <div class="relative aspect-video bg-gray-200">
        <img src="{src}" alt="{alt}" class="w-full h-full object-cover" loading="lazy" onerror="this.src='{placeholder}'">
        <div class="portfolio-overlay">
            <div class="text-white">
                <h3 class="text-lg font-semibold mb-2">{title}</h3>
                <button class="bg-white/20 text-white px-3 py-1 rounded text-sm hover:bg-white/30 transition-colors">👁️ View Details</button>
            </div>
        </div>
    </div>
    <div class="p-6">
        <div class="flex flex-wrap gap-2 mb-3">{tags}</div>
        <h3 class="text-lg font-semibold text-gray-900 mb-2">{title}</h3>
        <p class="text-gray-600 text-sm mb-3">{description}</p>
        {results}
    </div>
</div>"#,
        src = escape_html(&project.featured_image_path),
        alt = escape_html(&project.featured_image_alt),
        placeholder = PLACEHOLDER_IMAGE,
        title = escape_html(&project.title),
        description = escape_html(&project.description),
        tags = tags,
        results = results,
    )
}

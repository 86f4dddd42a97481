use folio::grid::{escape_html, render_error_panel, render_grid, GridController, GridError};
use folio::models::{
    PortfolioStats, Project, ProjectFilter, ProjectsData, ProjectsEnvelope, ALL_CATEGORIES,
};

fn project(title: &str, tags: &[&str], results_achieved: Option<&str>) -> Project {
    Project {
        id: 1,
        title: title.into(),
        slug: "sample".into(),
        description: format!("{title} description"),
        category: Some("Branding".into()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        technologies_used: Vec::new(),
        results_achieved: results_achieved.map(Into::into),
        client_name: None,
        completion_date: None,
        is_featured: false,
        featured_image_path: "/uploads/sample.jpg".into(),
        featured_image_alt: "Sample".into(),
        images: Vec::new(),
    }
}

fn envelope(projects: Vec<Project>) -> ProjectsEnvelope {
    ProjectsEnvelope {
        success: true,
        data: ProjectsData {
            total_count: projects.len(),
            projects,
            categories: vec![ALL_CATEGORIES.into()],
            stats: PortfolioStats::default(),
        },
        filters_applied: ProjectFilter::default(),
        timestamp: "2024-01-01 00:00:00".into(),
    }
}

#[test]
fn escape_html_covers_the_special_characters() {
    assert_eq!(
        escape_html(r#"<a href="x">&'"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
    );
    assert_eq!(escape_html("plain text"), "plain text");
}

#[test]
fn cards_never_emit_injected_markup_raw() {
    let html = render_grid(&[project(
        "<script>alert(1)</script>",
        &["<b>bold</b>"],
        Some("up 10% & climbing"),
    )]);
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"));
    assert!(html.contains("up 10% &amp; climbing"));
}

#[test]
fn cards_show_at_most_three_tags() {
    let html = render_grid(&[project("Sample", &["one", "two", "three", "four"], None)]);
    assert!(html.contains(">one<"));
    assert!(html.contains(">two<"));
    assert!(html.contains(">three<"));
    assert!(!html.contains(">four<"));
}

#[test]
fn results_callout_appears_only_when_present() {
    let with = render_grid(&[project("Sample", &[], Some("Tripled signups"))]);
    assert!(with.contains("Tripled signups"));
    assert!(with.contains("📈"));

    let without = render_grid(&[project("Sample", &[], None)]);
    assert!(!without.contains("📈"));
}

#[test]
fn zero_projects_render_the_empty_panel() {
    let html = render_grid(&[]);
    assert!(html.contains("No Projects Found"));
    assert!(html.contains("No projects found for the selected category."));
}

#[test]
fn error_panel_escapes_its_message_and_offers_retry() {
    let html = render_error_panel("<oops>");
    assert!(html.contains("Error Loading Projects"));
    assert!(html.contains("Try Again"));
    assert!(html.contains("&lt;oops&gt;"));
    assert!(!html.contains("<oops>"));
}

#[test]
fn sentinel_category_omits_the_query_parameter() {
    let grid = GridController::new("http://localhost:8080");
    assert_eq!(
        grid.request_url(ALL_CATEGORIES),
        "http://localhost:8080/api/v1/projects"
    );
    assert_eq!(
        grid.request_url("Web Design"),
        "http://localhost:8080/api/v1/projects?category=Web%20Design"
    );
}

#[test]
fn stale_responses_are_discarded() {
    let mut grid = GridController::new("http://localhost:8080");

    let first = grid.begin_request();
    let second = grid.begin_request();

    // the older response arrives late and must not be painted
    let stale = grid.complete_request(first, Ok(envelope(vec![project("Old", &[], None)])));
    assert!(stale.is_none());
    assert!(grid.projects().is_empty());

    let fresh = grid.complete_request(second, Ok(envelope(vec![project("New", &[], None)])));
    let html = fresh.expect("latest response must be painted");
    assert!(html.contains("New"));
    assert_eq!(grid.projects().len(), 1);
}

#[test]
fn failed_fetch_paints_the_error_panel_without_clearing_state() {
    let mut grid = GridController::new("http://localhost:8080");

    let seq = grid.begin_request();
    let html = grid
        .complete_request(seq, Ok(envelope(vec![project("Kept", &[], None)])))
        .unwrap();
    assert!(html.contains("Kept"));

    let seq = grid.begin_request();
    let html = grid.complete_request(seq, Err(GridError::Api)).unwrap();
    assert!(html.contains("Error Loading Projects"));
    // the last successful list survives for the retry path
    assert_eq!(grid.projects().len(), 1);
}

//! Development server rendering pages from the content directory on every request

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::content::{
    compile_slides, decode_slug, format_title, ContentError, FsStore, Library, SpecialPage,
};
use crate::helpers::{lecture_url, url_for};
use crate::templates::{CourseRef, LinkData, Pages};
use crate::Site;

/// Server state
struct ServerState {
    site: Site,
    pages: Pages,
}

/// Errors raised while answering a request
#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Render(#[from] anyhow::Error),
}

type PageResult = std::result::Result<String, ServerError>;

impl ServerState {
    fn library(&self) -> Library<FsStore> {
        self.site.library()
    }

    /// Title of `course`, falling back to one derived from its slug
    fn course_ref(&self, library: &Library<FsStore>, course: &str) -> CourseRef {
        let title = library
            .get_course(course, false)
            .map(|c| c.title)
            .unwrap_or_else(|_| format_title(&decode_slug(course)));
        CourseRef {
            slug: course.to_string(),
            title,
        }
    }

    fn back_to_lecture(&self, course: &str, lecture: &str) -> LinkData {
        LinkData {
            title: "Back to Lecture".to_string(),
            url: lecture_url(&self.site.config, course, lecture),
        }
    }

    fn respond(&self, result: PageResult) -> Response {
        match result {
            Ok(html) => Html(html).into_response(),
            Err(ServerError::Content(e)) if e.is_not_found() => self.not_found(&e.to_string()),
            Err(e) => {
                tracing::error!("Request failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
            }
        }
    }

    fn not_found(&self, message: &str) -> Response {
        match self.pages.not_found(message) {
            Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render not found page: {}", e);
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
        }
    }
}

/// Build the application router
pub fn router(site: &Site) -> Result<Router> {
    let state = Arc::new(ServerState {
        site: site.clone(),
        pages: Pages::new(&site.config)?,
    });

    Ok(Router::new()
        .route("/", get(index_handler))
        .route("/api/courses", get(courses_api_handler))
        .route("/courses/:course/:lecture", get(course_page_handler))
        .route(
            "/courses/:course/:lecture/assignment",
            get(assignment_handler),
        )
        .route("/assignments/:course/:lecture", get(assignment_handler))
        .route("/courses/:course/:lecture/practice", get(practice_handler))
        .route(
            "/courses/:course/:lecture/presentation",
            get(presentation_handler),
        )
        .route("/slides/:course/:lecture", get(slides_handler))
        .route("/content/*path", get(content_asset_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the development server
pub async fn start(site: &Site, ip: &str, port: u16, open: bool) -> Result<()> {
    let app = router(site)?;

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, url_for(&site.config, "/"));
    println!("Server running at {}", url);
    println!("Serving content from {}", site.content_dir.display());
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(State(state): State<Arc<ServerState>>) -> Response {
    state.respond(index_page(&state))
}

async fn courses_api_handler(State(state): State<Arc<ServerState>>) -> Response {
    match state.library().list_courses(true) {
        Ok(courses) => Json(state.pages.catalog(&courses)).into_response(),
        Err(e) => {
            tracing::error!("Failed to list courses: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

async fn course_page_handler(
    State(state): State<Arc<ServerState>>,
    Path((course, page)): Path<(String, String)>,
) -> Response {
    state.respond(course_page(&state, &course, &page))
}

async fn assignment_handler(
    State(state): State<Arc<ServerState>>,
    Path((course, lecture)): Path<(String, String)>,
) -> Response {
    state.respond(companion_page(&state, &course, &lecture, Companion::Assignment))
}

async fn practice_handler(
    State(state): State<Arc<ServerState>>,
    Path((course, lecture)): Path<(String, String)>,
) -> Response {
    state.respond(companion_page(&state, &course, &lecture, Companion::Practice))
}

async fn presentation_handler(
    State(state): State<Arc<ServerState>>,
    Path((course, lecture)): Path<(String, String)>,
) -> Response {
    state.respond(presentation_page(&state, &course, &lecture))
}

async fn slides_handler(
    State(state): State<Arc<ServerState>>,
    Path((course, lecture)): Path<(String, String)>,
) -> Response {
    state.respond(slides_page(&state, &course, &lecture).await)
}

fn index_page(state: &ServerState) -> PageResult {
    let courses = state.library().list_courses(true)?;
    Ok(state.pages.index(&courses)?)
}

/// Lecture page, or a course-level page such as `resources`
fn course_page(state: &ServerState, course: &str, page: &str) -> PageResult {
    let library = state.library();
    let course_ref = state.course_ref(&library, course);

    if let Some(special) = SpecialPage::from_stem(page) {
        let document = library.get_special_page(course, special)?;
        let back = LinkData {
            title: "Back to Courses".to_string(),
            url: url_for(&state.site.config, "/"),
        };
        return Ok(state.pages.document(&course_ref, &document, &back)?);
    }

    let navigation = library.get_navigation(course, page)?;
    Ok(state.pages.lecture(&course_ref, &navigation)?)
}

#[derive(Debug, Clone, Copy)]
enum Companion {
    Assignment,
    Practice,
}

fn companion_page(state: &ServerState, course: &str, lecture: &str, companion: Companion) -> PageResult {
    let library = state.library();
    let document = match companion {
        Companion::Assignment => library.get_assignment(course, lecture)?,
        Companion::Practice => library.get_practice(course, lecture)?,
    };
    Ok(state.pages.document(
        &state.course_ref(&library, course),
        &document,
        &state.back_to_lecture(course, lecture),
    )?)
}

fn presentation_page(state: &ServerState, course: &str, lecture: &str) -> PageResult {
    let library = state.library();
    let current = library.get_lecture(course, lecture)?;
    Ok(state
        .pages
        .presentation(&state.course_ref(&library, course), &current)?)
}

async fn slides_page(state: &ServerState, course: &str, lecture: &str) -> PageResult {
    let (current, slides) = state.library().slides(course, lecture)?;
    let slides = compile_slides(state.pages.markdown(), slides).await?;
    Ok(state.pages.slides(course, &current, &slides)?)
}

/// Serve a non-document file from a course directory
async fn content_asset_handler(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
) -> Response {
    let relative = request
        .uri()
        .path()
        .trim_start_matches("/content")
        .to_string();

    if !is_public_asset(&relative, state.library().reader().extension()) {
        return state.not_found(&format!("No such file: {}", decode_slug(&relative)));
    }
    match relative.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(_) => return state.not_found("Invalid path"),
    }

    let mut service = ServeDir::new(&state.site.content_dir);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

async fn fallback_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    state.not_found(&format!("No page at {}", decode_slug(uri.path())))
}

/// Documents and dot-files are never served raw
fn is_public_asset(path: &str, extension: &str) -> bool {
    let path = decode_slug(path);
    let mut segments = path.split('/').filter(|s| !s.is_empty()).peekable();
    if segments.peek().is_none() {
        return false;
    }

    segments.all(|segment| !segment.starts_with('.'))
        && std::path::Path::new(path.as_ref())
            .extension()
            .and_then(|e| e.to_str())
            != Some(extension)
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn write(dir: &std::path::Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn app() -> (TempDir, Router) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "courses/sql/_course.mdx", "---\ntitle: SQL Server\n---\n");
        write(root, "courses/sql/01-select.mdx", "---\ntitle: Select\n---\n## From\nfrom");
        write(root, "courses/sql/01-select.assignment.mdx", "---\ntitle: Homework\n---\nQuery");
        write(root, "courses/sql/02-hidden.mdx", "---\nvisible: false\n---\nSecret");
        write(root, "courses/sql/project.mdx", "Build a database");
        write(root, "courses/sql/diagram.svg", "<svg/>");
        write(root, "courses/C#/intro.mdx", "Hello C#");
        let site = Site::new(root).unwrap();
        let app = router(&site).unwrap();
        (dir, app)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index() {
        let (_dir, app) = app();
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("SQL Server"));
        assert!(body.contains("Select"));
        assert!(!body.contains("02-hidden"));
    }

    #[tokio::test]
    async fn test_lecture_page() {
        let (_dir, app) = app();
        let (status, body) = get(app, "/courses/sql/01-select").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h2>From</h2>"));
        assert!(body.contains("/courses/sql/01-select/assignment"));
    }

    #[tokio::test]
    async fn test_hidden_lecture_reachable_by_url() {
        let (_dir, app) = app();
        let (status, body) = get(app, "/courses/sql/02-hidden").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Secret"));
    }

    #[tokio::test]
    async fn test_encoded_course_slug() {
        let (_dir, app) = app();
        let (status, body) = get(app, "/courses/C%23/intro").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Hello C#"));
    }

    #[tokio::test]
    async fn test_assignment_routes() {
        let (_dir, app) = app();
        let (status, body) = get(app.clone(), "/courses/sql/01-select/assignment").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Homework"));

        let (status, _) = get(app.clone(), "/assignments/sql/01-select").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get(app, "/courses/sql/02-hidden/assignment").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_special_page() {
        let (_dir, app) = app();
        let (status, body) = get(app.clone(), "/courses/sql/project").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Build a database"));

        let (status, _) = get(app, "/courses/sql/resources").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_slides_and_presentation() {
        let (_dir, app) = app();
        let (status, body) = get(app.clone(), "/slides/sql/01-select").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"id="slide-1""#));
        assert!(body.contains("<h1>Select</h1>"));

        let (status, body) = get(app, "/courses/sql/01-select/presentation").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Exit Presentation"));
    }

    #[tokio::test]
    async fn test_not_found() {
        let (_dir, app) = app();
        let (status, body) = get(app.clone(), "/courses/sql/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("lecture not found"));

        let (status, _) = get(app, "/no/such/page/here").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_courses_api() {
        let (_dir, app) = app();
        let (status, body) = get(app, "/api/courses").await;
        assert_eq!(status, StatusCode::OK);

        let courses: serde_json::Value = serde_json::from_str(&body).unwrap();
        let slugs: Vec<&str> = courses
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["C#", "sql"]);
    }

    #[tokio::test]
    async fn test_content_assets() {
        let (_dir, app) = app();
        let (status, body) = get(app.clone(), "/content/sql/diagram.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<svg/>");

        let (status, _) = get(app, "/content/sql/01-select.mdx").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_is_public_asset() {
        assert!(is_public_asset("/sql/images/a.png", "mdx"));
        assert!(!is_public_asset("/sql/intro.mdx", "mdx"));
        assert!(!is_public_asset("/sql/.git/config", "mdx"));
        assert!(!is_public_asset("/", "mdx"));
    }
}
